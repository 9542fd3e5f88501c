//! # cadence-timeline
//!
//! Turns declarative, time-keyed animation descriptions into resolved effects and
//! composes them into parallel groups and serial sequences.
//!
//! Every effect lives on a [`Stage`], the composition root. Composition only ever
//! rewrites an effect's `delay` and `id`; durations and keyframe offsets are frozen
//! when the effect is compiled.

pub mod compiler;
pub mod composer;
pub mod document;
pub mod effect;
pub mod keyframe;
pub mod stage;
pub mod validate;

pub use compiler::{compile, resolve_keyframes, CompiledKeyframes};
pub use composer::{group, sequence, GroupItem, SequenceItem, SequenceState};
pub use document::{BuiltTimeline, Composition, TimelineDocument};
pub use effect::{ComputedTiming, EffectKey, TargetId, TimedEffect, TimingPatch};
pub use keyframe::{CompositionOptions, Fill, KeyedDescription, KeyframeStep, Keyframes, PropertyMap};
pub use stage::Stage;
pub use validate::validate_stage;
