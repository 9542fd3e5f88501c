//! In-process stand-in for an animation engine.
//!
//! A `VirtualAnimation` keeps a hold time while paused and advances with the tokio
//! clock while running, so drift and readiness latency can be modelled without a
//! renderer.

use async_trait::async_trait;
use tokio::time::Instant;

use crate::engine::{PlayState, PlaybackHandle};
use cadence_core::{CadenceError, CadenceResult, LogicalTime};
use cadence_timeline::{ComputedTiming, Stage, TimedEffect, TimingPatch};

#[derive(Debug, Clone)]
pub struct VirtualAnimation {
    id: Option<String>,
    timing: ComputedTiming,
    state: PlayState,
    hold_time: LogicalTime,
    started_at: Option<Instant>,
    /// Logical ms advanced per real ms while running.
    playback_rate: f64,
    ready_delay: Option<std::time::Duration>,
    ready_failure: Option<String>,
}

impl VirtualAnimation {
    /// A paused animation mirroring `effect`'s label and timing.
    pub fn from_effect(effect: &TimedEffect) -> Self {
        Self {
            id: effect.id().map(str::to_string),
            timing: effect.computed_timing(),
            state: PlayState::Paused,
            hold_time: LogicalTime::zero(),
            started_at: None,
            playback_rate: 1.0,
            ready_delay: None,
            ready_failure: None,
        }
    }

    /// One animation per effect under the stage, in creation order.
    pub fn from_stage(stage: &Stage) -> Vec<Self> {
        stage.iter().map(|(_, effect)| Self::from_effect(effect)).collect()
    }

    /// Report ready only after `delay` has passed.
    pub fn with_ready_delay(mut self, delay: std::time::Duration) -> Self {
        self.ready_delay = Some(delay);
        self
    }

    /// Run faster or slower than the clock, to model drift.
    pub fn with_playback_rate(mut self, rate: f64) -> Self {
        self.playback_rate = rate;
        self
    }

    /// Fail readiness with `message`.
    pub fn with_ready_failure(mut self, message: impl Into<String>) -> Self {
        self.ready_failure = Some(message.into());
        self
    }
}

#[async_trait]
impl PlaybackHandle for VirtualAnimation {
    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn computed_timing(&self) -> ComputedTiming {
        self.timing
    }

    fn update_timing(&mut self, patch: TimingPatch) {
        if let Some(delay) = patch.delay {
            self.timing.delay = delay;
        }
        if let Some(duration) = patch.duration {
            self.timing.duration = duration;
        }
    }

    fn current_time(&self) -> LogicalTime {
        match (self.state, self.started_at) {
            (PlayState::Running, Some(started)) => {
                let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
                self.hold_time.offset_by(elapsed_ms * self.playback_rate)
            }
            _ => self.hold_time,
        }
    }

    fn set_current_time(&mut self, time: LogicalTime) {
        self.hold_time = time;
        if self.state == PlayState::Running {
            self.started_at = Some(Instant::now());
        }
    }

    fn play_state(&self) -> PlayState {
        self.state
    }

    fn play(&mut self) {
        if self.state != PlayState::Running {
            self.state = PlayState::Running;
            self.started_at = Some(Instant::now());
        }
    }

    fn pause(&mut self) {
        if self.state == PlayState::Running {
            self.hold_time = self.current_time();
            self.started_at = None;
            self.state = PlayState::Paused;
        }
    }

    async fn ready(&mut self) -> CadenceResult<()> {
        if let Some(delay) = self.ready_delay.take() {
            tokio::time::sleep(delay).await;
        }
        match &self.ready_failure {
            Some(message) => Err(CadenceError::engine(message.clone())),
            None => Ok(()),
        }
    }
}
