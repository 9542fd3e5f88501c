use async_trait::async_trait;

use cadence_core::{CadenceResult, LogicalTime};
use cadence_timeline::{ComputedTiming, TimingPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    Paused,
    Running,
}

/// One live effect as exposed by the animation engine.
#[async_trait]
pub trait PlaybackHandle: Send {
    /// Label assigned during composition.
    fn id(&self) -> Option<String>;

    fn computed_timing(&self) -> ComputedTiming;

    fn update_timing(&mut self, patch: TimingPatch);

    fn current_time(&self) -> LogicalTime;

    fn set_current_time(&mut self, time: LogicalTime);

    fn play_state(&self) -> PlayState;

    fn play(&mut self);

    fn pause(&mut self);

    /// Resolves once the engine can start the effect without a visible stall.
    async fn ready(&mut self) -> CadenceResult<()>;
}

#[async_trait]
impl<H: PlaybackHandle + ?Sized> PlaybackHandle for Box<H> {
    fn id(&self) -> Option<String> {
        (**self).id()
    }

    fn computed_timing(&self) -> ComputedTiming {
        (**self).computed_timing()
    }

    fn update_timing(&mut self, patch: TimingPatch) {
        (**self).update_timing(patch)
    }

    fn current_time(&self) -> LogicalTime {
        (**self).current_time()
    }

    fn set_current_time(&mut self, time: LogicalTime) {
        (**self).set_current_time(time)
    }

    fn play_state(&self) -> PlayState {
        (**self).play_state()
    }

    fn play(&mut self) {
        (**self).play()
    }

    fn pause(&mut self) {
        (**self).pause()
    }

    async fn ready(&mut self) -> CadenceResult<()> {
        (**self).ready().await
    }
}
