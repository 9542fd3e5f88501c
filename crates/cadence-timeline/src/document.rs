use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::composer::{GroupItem, SequenceItem};
use crate::effect::{EffectKey, TargetId};
use crate::keyframe::KeyedDescription;
use crate::stage::Stage;
use cadence_core::{CadenceError, CadenceResult, Duration};

/// A named effect in a timeline document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectSpec {
    pub target: String,
    #[serde(default)]
    pub pseudo_element: Option<String>,
    pub keyframes: KeyedDescription,
}

/// One entry inside a composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entry {
    /// Reference to a named effect.
    Effect(String),
    /// Names the next effect of a sequence.
    Label { label: String },
    Nested(Composition),
}

/// A group or sequence node of the composition tree.
///
/// A nested node is realized first and then placed in its parent as a group. Inside a
/// parent sequence only the first realized member keeps a label, so labels written in a
/// nested sequence do not survive; put labels on the outermost sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Composition {
    Group {
        #[serde(default)]
        base: Duration,
        items: Vec<Entry>,
    },
    Sequence {
        #[serde(default)]
        base: Duration,
        items: Vec<Entry>,
    },
}

/// Serialized timeline: targets, named effects, and how they are composed.
///
/// ```json
/// {
///   "targets": ["box"],
///   "effects": { "fade": { "target": "box", "keyframes": { "0": {"opacity": 0}, "400": {"opacity": 1} } } },
///   "timeline": { "kind": "sequence", "items": [ { "label": "intro" }, "fade" ] }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineDocument {
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub effects: BTreeMap<String, EffectSpec>,
    #[serde(default)]
    pub timeline: Option<Composition>,
}

/// A document realized onto a stage.
#[derive(Debug, Clone)]
pub struct BuiltTimeline {
    pub stage: Stage,
    /// Effect name → key on `stage`.
    pub effects: BTreeMap<String, EffectKey>,
    /// Effects touched by the top-level composition, in encounter order.
    pub order: Vec<EffectKey>,
}

impl TimelineDocument {
    pub fn from_json(source: &str) -> CadenceResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn load_from_file(path: &std::path::Path) -> CadenceResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    /// Compile every effect (in name order) and apply the composition tree.
    pub fn build(&self) -> CadenceResult<BuiltTimeline> {
        let mut stage = Stage::new();
        for target in &self.targets {
            stage.add_target(TargetId::new(target.clone()));
        }

        let mut effects = BTreeMap::new();
        for (name, spec) in &self.effects {
            let key = stage
                .compile(
                    &TargetId::new(spec.target.clone()),
                    spec.pseudo_element.as_deref(),
                    &spec.keyframes,
                )
                .map_err(|e| CadenceError::contract(format!("effect '{}': {}", name, e)))?;
            effects.insert(name.clone(), key);
        }

        let order = match &self.timeline {
            Some(composition) => realize(&mut stage, &effects, composition)?,
            None => effects.values().copied().collect(),
        };

        tracing::info!(
            "built timeline: {} effect(s), ends at {}",
            stage.len(),
            stage.end_time()
        );
        Ok(BuiltTimeline {
            stage,
            effects,
            order,
        })
    }
}

fn lookup(effects: &BTreeMap<String, EffectKey>, name: &str) -> CadenceResult<EffectKey> {
    effects
        .get(name)
        .copied()
        .ok_or_else(|| CadenceError::contract(format!("unknown effect '{}'", name)))
}

fn realize(
    stage: &mut Stage,
    effects: &BTreeMap<String, EffectKey>,
    composition: &Composition,
) -> CadenceResult<Vec<EffectKey>> {
    match composition {
        Composition::Group { base, items } => {
            let mut resolved = Vec::with_capacity(items.len());
            for entry in items {
                resolved.push(match entry {
                    Entry::Effect(name) => GroupItem::Effect(lookup(effects, name)?),
                    Entry::Nested(inner) => GroupItem::Group(realize(stage, effects, inner)?),
                    Entry::Label { label } => {
                        return Err(CadenceError::contract(format!(
                            "label '{}' is only allowed inside a sequence",
                            label
                        )))
                    }
                });
            }
            stage.group(*base, resolved)
        }
        Composition::Sequence { base, items } => {
            let mut resolved = Vec::with_capacity(items.len());
            for entry in items {
                resolved.push(match entry {
                    Entry::Effect(name) => SequenceItem::Effect(lookup(effects, name)?),
                    Entry::Label { label } => SequenceItem::Label(label.clone()),
                    Entry::Nested(inner) => SequenceItem::Group(realize(stage, effects, inner)?),
                });
            }
            stage.sequence(*base, resolved)
        }
    }
}
