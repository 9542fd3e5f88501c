use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::composer::{self, GroupItem, SequenceItem};
use crate::compiler;
use crate::effect::{ComputedTiming, EffectKey, TargetId, TimedEffect};
use crate::keyframe::KeyedDescription;
use cadence_core::{CadenceError, CadenceResult, Duration};

/// The composition root: registered targets plus every effect compiled against them.
///
/// Effects are never removed, so an [`EffectKey`] stays valid for the stage's lifetime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stage {
    targets: BTreeSet<TargetId>,
    effects: Vec<TimedEffect>,
}

impl Stage {
    /// Create an empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element that effects may be compiled against.
    pub fn add_target(&mut self, target: TargetId) -> &mut Self {
        self.targets.insert(target);
        self
    }

    pub fn has_target(&self, target: &TargetId) -> bool {
        self.targets.contains(target)
    }

    pub fn targets(&self) -> impl Iterator<Item = &TargetId> {
        self.targets.iter()
    }

    pub(crate) fn insert(&mut self, effect: TimedEffect) -> EffectKey {
        self.effects.push(effect);
        EffectKey(self.effects.len() - 1)
    }

    pub fn get(&self, key: EffectKey) -> Option<&TimedEffect> {
        self.effects.get(key.0)
    }

    pub fn get_mut(&mut self, key: EffectKey) -> Option<&mut TimedEffect> {
        self.effects.get_mut(key.0)
    }

    /// Like [`get`](Self::get) but an unknown key is a contract violation.
    pub fn effect(&self, key: EffectKey) -> CadenceResult<&TimedEffect> {
        self.get(key)
            .ok_or_else(|| CadenceError::contract(format!("{} is not on this stage", key)))
    }

    pub fn effect_mut(&mut self, key: EffectKey) -> CadenceResult<&mut TimedEffect> {
        self.effects
            .get_mut(key.0)
            .ok_or_else(|| CadenceError::contract(format!("{} is not on this stage", key)))
    }

    /// All effects under the root, in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (EffectKey, &TimedEffect)> {
        self.effects
            .iter()
            .enumerate()
            .map(|(i, e)| (EffectKey(i), e))
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// First effect whose id equals `label`.
    pub fn find_by_id(&self, label: &str) -> Option<EffectKey> {
        self.iter()
            .find(|(_, e)| e.id() == Some(label))
            .map(|(key, _)| key)
    }

    /// Delay of the effect tagged with `label`, if any.
    pub fn delay_of(&self, label: &str) -> Option<Duration> {
        self.find_by_id(label)
            .and_then(|key| self.get(key))
            .map(|e| e.delay())
    }

    pub fn computed_timing(&self, key: EffectKey) -> CadenceResult<ComputedTiming> {
        Ok(self.effect(key)?.computed_timing())
    }

    /// Effects attached to `target`.
    pub fn effects_for<'a>(
        &'a self,
        target: &'a TargetId,
    ) -> impl Iterator<Item = (EffectKey, &'a TimedEffect)> + 'a {
        self.iter().filter(move |(_, e)| &e.target == target)
    }

    /// Latest `delay + duration` over all effects.
    pub fn end_time(&self) -> Duration {
        self.effects
            .iter()
            .fold(Duration::zero(), |acc, e| acc.max(e.computed_timing().end_time()))
    }

    /// Compile a keyed description into a new paused effect. See [`compiler::compile`].
    pub fn compile(
        &mut self,
        target: &TargetId,
        pseudo_element: Option<&str>,
        description: &KeyedDescription,
    ) -> CadenceResult<EffectKey> {
        compiler::compile(self, target, pseudo_element, description)
    }

    /// Start every item together at `base`. See [`composer::group`].
    pub fn group<I>(&mut self, base: Duration, items: I) -> CadenceResult<Vec<EffectKey>>
    where
        I: IntoIterator,
        I::Item: Into<GroupItem>,
    {
        composer::group(self, base, items)
    }

    /// Chain items one after another from `base`. See [`composer::sequence`].
    pub fn sequence<I>(&mut self, base: Duration, items: I) -> CadenceResult<Vec<EffectKey>>
    where
        I: IntoIterator,
        I::Item: Into<SequenceItem>,
    {
        composer::sequence(self, base, items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyframe::Keyframes;

    fn stage_with_box() -> Stage {
        let mut stage = Stage::new();
        stage.add_target(TargetId::new("box"));
        stage
    }

    #[test]
    fn test_stage_creation() {
        let stage = stage_with_box();
        assert!(stage.is_empty());
        assert!(stage.has_target(&TargetId::new("box")));
        assert!(!stage.has_target(&TargetId::new("title")));
        assert!(stage.end_time().is_zero());
    }

    #[test]
    fn test_unknown_key_is_contract_violation() {
        let stage = stage_with_box();
        let err = stage.effect(EffectKey(7)).unwrap_err();
        assert!(err.is_contract());
    }

    #[test]
    fn test_find_by_id_and_end_time() {
        let mut stage = stage_with_box();
        let box_id = TargetId::new("box");
        let a = stage
            .compile(&box_id, None, &Keyframes::new().at(400.0, [("x", 1)]).build())
            .unwrap();
        let b = stage
            .compile(&box_id, None, &Keyframes::new().at(100.0, [("x", 2)]).build())
            .unwrap();
        stage.sequence(Duration::zero(), vec![SequenceItem::from(a), "tail".into(), b.into()])
            .unwrap();

        assert_eq!(stage.find_by_id("tail"), Some(b));
        assert_eq!(stage.delay_of("tail").unwrap().as_millis(), 400.0);
        assert!(stage.delay_of("missing").is_none());
        assert_eq!(stage.end_time().as_millis(), 500.0);
        assert_eq!(stage.effects_for(&box_id).count(), 2);
    }
}
