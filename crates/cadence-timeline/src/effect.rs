use serde::{Deserialize, Serialize};

use crate::keyframe::{CompositionOptions, KeyframeStep};
use cadence_core::Duration;

/// Names an element registered on a [`Stage`](crate::Stage).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub String);

impl TargetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for TargetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable handle to an effect owned by a stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectKey(pub(crate) usize);

impl EffectKey {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for EffectKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "effect#{}", self.0)
    }
}

/// Timing as the animation engine would report it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ComputedTiming {
    pub delay: Duration,
    pub duration: Duration,
}

impl ComputedTiming {
    /// When the effect finishes, relative to composition start.
    pub fn end_time(&self) -> Duration {
        self.delay + self.duration
    }
}

/// Partial timing update; `None` fields are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimingPatch {
    pub delay: Option<Duration>,
    pub duration: Option<Duration>,
}

impl TimingPatch {
    pub fn delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            duration: None,
        }
    }
}

/// One compiled animation attached to a target.
///
/// Created paused by the compiler. Composition rewrites only `delay` and `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEffect {
    pub target: TargetId,
    id: Option<String>,
    delay: Duration,
    steps: Vec<KeyframeStep>,
    options: CompositionOptions,
}

impl TimedEffect {
    pub fn new(target: TargetId, steps: Vec<KeyframeStep>, options: CompositionOptions) -> Self {
        Self {
            target,
            id: None,
            delay: Duration::zero(),
            steps,
            options,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: Option<String>) {
        self.id = id;
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn duration(&self) -> Duration {
        self.options.duration
    }

    pub fn steps(&self) -> &[KeyframeStep] {
        &self.steps
    }

    pub fn options(&self) -> &CompositionOptions {
        &self.options
    }

    pub fn pseudo_element(&self) -> Option<&str> {
        self.options.pseudo_element.as_deref()
    }

    pub fn computed_timing(&self) -> ComputedTiming {
        ComputedTiming {
            delay: self.delay,
            duration: self.options.duration,
        }
    }

    pub fn update_timing(&mut self, patch: TimingPatch) {
        if let Some(delay) = patch.delay {
            self.delay = delay;
        }
        if let Some(duration) = patch.duration {
            self.options.duration = duration;
        }
    }
}
