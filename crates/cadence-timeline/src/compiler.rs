//! Keyframe compilation: keyed description → (duration, offsets, options).

use crate::effect::{EffectKey, TargetId, TimedEffect};
use crate::keyframe::{parse_time_key, CompositionOptions, KeyedDescription, KeyframeStep};
use crate::stage::Stage;
use cadence_core::{CadenceError, CadenceResult, Duration};

/// Steps and options resolved from a keyed description, ready for the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledKeyframes {
    /// Sorted ascending by offset.
    pub steps: Vec<KeyframeStep>,
    pub options: CompositionOptions,
}

/// Resolve a keyed description without attaching it to a stage.
///
/// Time keys are processed largest first; the largest fixes the duration and every
/// step's offset is its time divided by that duration. With no time keys the result is
/// an instant effect (duration 0, no steps). With a zero duration every offset is 0.
pub fn resolve_keyframes(
    pseudo_element: Option<&str>,
    description: &KeyedDescription,
) -> CadenceResult<CompiledKeyframes> {
    let mut options = CompositionOptions::new(pseudo_element.map(str::to_string));
    let mut timed = Vec::new();

    for (key, value) in description.entries() {
        let Some(time) = parse_time_key(key) else {
            options.merge_option(key, value);
            continue;
        };
        if time < 0.0 {
            return Err(CadenceError::contract(format!(
                "keyframe time '{}' is negative",
                key
            )));
        }
        let properties = value.as_object().ok_or_else(|| {
            CadenceError::contract(format!(
                "keyframe at '{}' must be an object of properties, got {}",
                key, value
            ))
        })?;
        // `offset` is reserved for the normalized step position.
        if properties.contains_key("offset") {
            return Err(CadenceError::contract(format!(
                "keyframe at '{}' sets reserved property 'offset'",
                key
            )));
        }
        timed.push((time, properties));
    }

    timed.sort_by(|a, b| b.0.total_cmp(&a.0));
    let duration = timed.first().map(|(time, _)| *time).unwrap_or(0.0);
    options.duration = Duration::from_millis(duration);

    let mut steps: Vec<KeyframeStep> = timed
        .into_iter()
        .map(|(time, properties)| {
            let offset = if duration > 0.0 { time / duration } else { 0.0 };
            let properties = properties
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            KeyframeStep::new(offset, properties)
        })
        .collect();

    // The engine rejects offsets that are not monotonic.
    steps.sort_by(|a, b| a.offset.total_cmp(&b.offset));

    Ok(CompiledKeyframes { steps, options })
}

/// Compile a keyed description into a paused effect on `stage`.
///
/// The target must already be registered on the stage.
pub fn compile(
    stage: &mut Stage,
    target: &TargetId,
    pseudo_element: Option<&str>,
    description: &KeyedDescription,
) -> CadenceResult<EffectKey> {
    if !stage.has_target(target) {
        tracing::error!("compile called with unregistered target '{}'", target);
        return Err(CadenceError::contract(format!(
            "target '{}' is not reachable from the stage",
            target
        )));
    }

    let CompiledKeyframes { steps, options } = resolve_keyframes(pseudo_element, description)?;
    tracing::debug!(
        "compiled {} step(s) over {} for '{}'",
        steps.len(),
        options.duration,
        target
    );

    Ok(stage.insert(TimedEffect::new(target.clone(), steps, options)))
}
