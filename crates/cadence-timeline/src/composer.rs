//! Group (parallel) and sequence (serial) composition.
//!
//! Both operations are additive on `delay`: an effect's existing delay is kept and the
//! composition offset is added on top, so nested compositions stack.

use crate::effect::{EffectKey, TimingPatch};
use crate::stage::Stage;
use cadence_core::{CadenceResult, Duration};

/// An item of a `group` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupItem {
    Effect(EffectKey),
    /// Effects returned by an earlier group or sequence.
    Group(Vec<EffectKey>),
}

impl From<EffectKey> for GroupItem {
    fn from(key: EffectKey) -> Self {
        GroupItem::Effect(key)
    }
}

impl From<Vec<EffectKey>> for GroupItem {
    fn from(keys: Vec<EffectKey>) -> Self {
        GroupItem::Group(keys)
    }
}

/// An item of a `sequence` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequenceItem {
    /// Names the next effect appended to the sequence.
    Label(String),
    Effect(EffectKey),
    /// Members start together at the cursor.
    Group(Vec<EffectKey>),
}

impl From<&str> for SequenceItem {
    fn from(label: &str) -> Self {
        SequenceItem::Label(label.to_string())
    }
}

impl From<String> for SequenceItem {
    fn from(label: String) -> Self {
        SequenceItem::Label(label)
    }
}

impl From<EffectKey> for SequenceItem {
    fn from(key: EffectKey) -> Self {
        SequenceItem::Effect(key)
    }
}

impl From<Vec<EffectKey>> for SequenceItem {
    fn from(keys: Vec<EffectKey>) -> Self {
        SequenceItem::Group(keys)
    }
}

impl From<GroupItem> for SequenceItem {
    fn from(item: GroupItem) -> Self {
        match item {
            GroupItem::Effect(key) => SequenceItem::Effect(key),
            GroupItem::Group(keys) => SequenceItem::Group(keys),
        }
    }
}

/// Shift every effect in `items` by `base`, keeping their relative offsets.
///
/// Nested groups are flattened one level. Returns the touched effects in encounter
/// order. Unknown keys are rejected before any effect is modified.
pub fn group<I>(stage: &mut Stage, base: Duration, items: I) -> CadenceResult<Vec<EffectKey>>
where
    I: IntoIterator,
    I::Item: Into<GroupItem>,
{
    let keys: Vec<EffectKey> = items
        .into_iter()
        .flat_map(|item| match item.into() {
            GroupItem::Effect(key) => vec![key],
            GroupItem::Group(keys) => keys,
        })
        .collect();

    for key in &keys {
        stage.effect(*key)?;
    }

    for key in &keys {
        let effect = stage.effect_mut(*key)?;
        let delay = effect.delay() + base;
        effect.update_timing(TimingPatch::delay(delay));
    }

    tracing::debug!("grouped {} effect(s) at {}", keys.len(), base);
    Ok(keys)
}

/// Accumulator threaded through a `sequence` fold.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceState {
    /// Where the next item starts.
    pub cursor: Duration,
    pub pending_label: Option<String>,
    pub touched: Vec<EffectKey>,
}

impl SequenceState {
    pub fn new(base: Duration) -> Self {
        Self {
            cursor: base,
            pending_label: None,
            touched: Vec::new(),
        }
    }

    /// Apply one item and return the advanced state.
    pub fn step(mut self, stage: &mut Stage, item: SequenceItem) -> CadenceResult<Self> {
        match item {
            SequenceItem::Label(label) => {
                if let Some(dropped) = self.pending_label.replace(label) {
                    tracing::debug!("label '{}' replaced before use", dropped);
                }
            }
            SequenceItem::Effect(key) => {
                let duration = self.place(stage, key)?;
                self.cursor = self.cursor + duration;
            }
            SequenceItem::Group(keys) => {
                let mut longest = Duration::zero();
                for key in keys {
                    longest = longest.max(self.place(stage, key)?);
                }
                self.cursor = self.cursor + longest;
            }
        }
        Ok(self)
    }

    /// Start `key` at the cursor, hand it the pending label (or clear its id), and
    /// return its duration. Does not advance the cursor.
    fn place(&mut self, stage: &mut Stage, key: EffectKey) -> CadenceResult<Duration> {
        let cursor = self.cursor;
        let effect = stage.effect_mut(key)?;
        let delay = cursor + effect.delay();
        effect.update_timing(TimingPatch::delay(delay));
        effect.set_id(self.pending_label.take());
        self.touched.push(key);
        Ok(effect.duration())
    }
}

/// Chain items one after another starting at `base`.
///
/// A label names the next effect appended; a group starts all its members at the cursor
/// and advances it by the longest member. A trailing label is dropped. Unknown keys are
/// rejected before any effect is modified.
pub fn sequence<I>(stage: &mut Stage, base: Duration, items: I) -> CadenceResult<Vec<EffectKey>>
where
    I: IntoIterator,
    I::Item: Into<SequenceItem>,
{
    let items: Vec<SequenceItem> = items.into_iter().map(Into::into).collect();
    for item in &items {
        match item {
            SequenceItem::Label(_) => {}
            SequenceItem::Effect(key) => {
                stage.effect(*key)?;
            }
            SequenceItem::Group(keys) => {
                for key in keys {
                    stage.effect(*key)?;
                }
            }
        }
    }

    let state = items
        .into_iter()
        .try_fold(SequenceState::new(base), |state, item| state.step(stage, item))?;

    if let Some(label) = &state.pending_label {
        tracing::debug!("trailing label '{}' has no effect to name", label);
    }
    tracing::debug!(
        "sequenced {} effect(s) from {} to {}",
        state.touched.len(),
        base,
        state.cursor
    );
    Ok(state.touched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::TargetId;
    use crate::keyframe::Keyframes;

    fn stage_with(durations: &[f64]) -> (Stage, Vec<EffectKey>) {
        let mut stage = Stage::new();
        let target = TargetId::new("box");
        stage.add_target(target.clone());
        let keys = durations
            .iter()
            .map(|d| {
                let desc = Keyframes::new().at(0.0, [("x", 0)]).at(*d, [("x", 1)]).build();
                stage.compile(&target, None, &desc).unwrap()
            })
            .collect();
        (stage, keys)
    }

    fn delay(stage: &Stage, key: EffectKey) -> f64 {
        stage.effect(key).unwrap().delay().as_millis()
    }

    #[test]
    fn test_group_shifts_all_by_base() {
        let (mut stage, keys) = stage_with(&[100.0, 200.0]);
        let touched = group(
            &mut stage,
            Duration::from_millis(50.0),
            vec![GroupItem::from(keys[0]), GroupItem::from(keys[1])],
        )
        .unwrap();
        assert_eq!(touched, keys);
        assert_eq!(delay(&stage, keys[0]), 50.0);
        assert_eq!(delay(&stage, keys[1]), 50.0);
        assert_eq!(stage.effect(keys[1]).unwrap().duration().as_millis(), 200.0);
    }

    #[test]
    fn test_group_accumulates() {
        let (mut stage, keys) = stage_with(&[100.0]);
        group(&mut stage, Duration::from_millis(30.0), vec![keys[0]]).unwrap();
        group(&mut stage, Duration::zero(), vec![keys[0]]).unwrap();
        assert_eq!(delay(&stage, keys[0]), 30.0);
        group(&mut stage, Duration::from_millis(20.0), vec![keys[0]]).unwrap();
        assert_eq!(delay(&stage, keys[0]), 50.0);
    }

    #[test]
    fn test_group_flattens_nested_groups() {
        let (mut stage, keys) = stage_with(&[100.0, 200.0, 300.0]);
        let touched = group(
            &mut stage,
            Duration::from_millis(10.0),
            vec![GroupItem::Group(vec![keys[0], keys[1]]), GroupItem::Effect(keys[2])],
        )
        .unwrap();
        assert_eq!(touched, vec![keys[0], keys[1], keys[2]]);
    }

    #[test]
    fn test_group_rejects_unknown_key_without_mutation() {
        let (mut stage, keys) = stage_with(&[100.0]);
        let err = group(
            &mut stage,
            Duration::from_millis(10.0),
            vec![keys[0], EffectKey(99)],
        )
        .unwrap_err();
        assert!(err.is_contract());
        assert_eq!(delay(&stage, keys[0]), 0.0);
    }

    #[test]
    fn test_sequence_labels_and_chains() {
        let (mut stage, keys) = stage_with(&[400.0, 250.0]);
        let items: Vec<SequenceItem> = vec!["A".into(), keys[0].into(), keys[1].into()];
        sequence(&mut stage, Duration::zero(), items).unwrap();

        let x = stage.effect(keys[0]).unwrap();
        let y = stage.effect(keys[1]).unwrap();
        assert_eq!(x.id(), Some("A"));
        assert_eq!(y.id(), None);
        assert_eq!(y.delay(), x.delay() + x.duration());
    }

    #[test]
    fn test_sequence_group_advances_by_longest() {
        let (mut stage, keys) = stage_with(&[500.0, 300.0, 100.0]);
        let items = vec![
            SequenceItem::Group(vec![keys[0], keys[1]]),
            SequenceItem::Effect(keys[2]),
        ];
        sequence(&mut stage, Duration::zero(), items).unwrap();
        assert_eq!(delay(&stage, keys[0]), 0.0);
        assert_eq!(delay(&stage, keys[1]), 0.0);
        assert_eq!(delay(&stage, keys[2]), 500.0);
    }

    #[test]
    fn test_sequence_label_goes_to_first_group_member() {
        let (mut stage, keys) = stage_with(&[100.0, 100.0]);
        let items: Vec<SequenceItem> = vec!["intro".into(), vec![keys[0], keys[1]].into()];
        sequence(&mut stage, Duration::zero(), items).unwrap();
        assert_eq!(stage.effect(keys[0]).unwrap().id(), Some("intro"));
        assert_eq!(stage.effect(keys[1]).unwrap().id(), None);
    }

    #[test]
    fn test_sequence_later_label_overwrites_and_trailing_dropped() {
        let (mut stage, keys) = stage_with(&[100.0]);
        let items: Vec<SequenceItem> = vec!["A".into(), "B".into(), keys[0].into(), "C".into()];
        let touched = sequence(&mut stage, Duration::zero(), items).unwrap();
        assert_eq!(touched, vec![keys[0]]);
        assert_eq!(stage.effect(keys[0]).unwrap().id(), Some("B"));
        assert!(stage.find_by_id("C").is_none());
    }

    #[test]
    fn test_sequence_clears_stale_id() {
        let (mut stage, keys) = stage_with(&[100.0]);
        sequence(&mut stage, Duration::zero(), vec![SequenceItem::from("old"), keys[0].into()])
            .unwrap();
        sequence(&mut stage, Duration::zero(), vec![keys[0]]).unwrap();
        assert_eq!(stage.effect(keys[0]).unwrap().id(), None);
    }

    #[test]
    fn test_sequence_keeps_existing_delay_and_base() {
        let (mut stage, keys) = stage_with(&[100.0, 200.0]);
        group(&mut stage, Duration::from_millis(25.0), vec![keys[1]]).unwrap();
        sequence(&mut stage, Duration::from_millis(1000.0), vec![keys[0], keys[1]]).unwrap();
        assert_eq!(delay(&stage, keys[0]), 1000.0);
        assert_eq!(delay(&stage, keys[1]), 1125.0);
    }

    #[test]
    fn test_sequence_state_fold_in_isolation() {
        let (mut stage, keys) = stage_with(&[100.0, 40.0]);
        let state = SequenceState::new(Duration::from_millis(5.0))
            .step(&mut stage, "L".into())
            .unwrap();
        assert_eq!(state.pending_label.as_deref(), Some("L"));

        let state = state.step(&mut stage, keys[0].into()).unwrap();
        assert!(state.pending_label.is_none());
        assert_eq!(state.cursor.as_millis(), 105.0);

        let state = state
            .step(&mut stage, SequenceItem::Group(Vec::new()))
            .unwrap();
        assert_eq!(state.cursor.as_millis(), 105.0);

        let state = state.step(&mut stage, keys[1].into()).unwrap();
        assert_eq!(state.cursor.as_millis(), 145.0);
        assert_eq!(state.touched, keys);
    }
}
