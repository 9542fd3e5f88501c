use futures::future::try_join_all;

use crate::clock::{Clock, TokioClock};
use crate::engine::PlaybackHandle;
use cadence_core::{CadenceError, CadenceResult, Duration, LogicalTime, PlaybackConfig};

/// Where a `play` call starts on the logical timeline.
#[derive(Debug, Clone, PartialEq)]
pub enum StartAt {
    /// Each effect continues from its own current time.
    Own,
    Time(LogicalTime),
    /// The delay of the effect carrying this label.
    Label(String),
}

impl From<LogicalTime> for StartAt {
    fn from(time: LogicalTime) -> Self {
        StartAt::Time(time)
    }
}

impl From<f64> for StartAt {
    fn from(millis: f64) -> Self {
        StartAt::Time(LogicalTime::from_millis(millis))
    }
}

impl From<&str> for StartAt {
    fn from(label: &str) -> Self {
        StartAt::Label(label.to_string())
    }
}

impl From<String> for StartAt {
    fn from(label: String) -> Self {
        StartAt::Label(label)
    }
}

impl<T: Into<StartAt>> From<Option<T>> for StartAt {
    fn from(start: Option<T>) -> Self {
        start.map(Into::into).unwrap_or(StartAt::Own)
    }
}

/// Resolve `start` against `handles`. `None` means every effect keeps its own time.
pub fn resolve_start<H: PlaybackHandle>(handles: &[H], start: &StartAt) -> Option<LogicalTime> {
    match start {
        StartAt::Own => None,
        StartAt::Time(time) => Some(*time),
        StartAt::Label(label) => {
            let found = handles
                .iter()
                .find(|h| h.id().as_deref() == Some(label.as_str()))
                .map(|h| LogicalTime::from(h.computed_timing().delay));
            if found.is_none() {
                tracing::warn!("label '{}' not found; playing unsynchronized", label);
            }
            found
        }
    }
}

/// Plays a set of effects as one unit on a shared clock.
pub struct Synchronizer<C: Clock = TokioClock> {
    clock: C,
    config: PlaybackConfig,
}

impl Synchronizer<TokioClock> {
    pub fn from_config(config: PlaybackConfig) -> Self {
        Self {
            clock: TokioClock::from_config(&config),
            config,
        }
    }
}

impl Default for Synchronizer<TokioClock> {
    fn default() -> Self {
        Self::from_config(PlaybackConfig::default())
    }
}

impl<C: Clock> Synchronizer<C> {
    pub fn new(clock: C, config: PlaybackConfig) -> Self {
        Self { clock, config }
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    /// Play every handle for `dur` logical milliseconds from `start` and return the
    /// logical time they were frozen at.
    ///
    /// The real-time wait is `|dur|` but the stop time is `current + dur`, so a
    /// negative `dur` moves the effects backwards after waiting forwards. Every handle
    /// is paused at the stop time before this returns.
    pub async fn play<H: PlaybackHandle>(
        &self,
        handles: &mut [H],
        dur: f64,
        start: impl Into<StartAt>,
    ) -> CadenceResult<LogicalTime> {
        if !dur.is_finite() {
            tracing::error!("play called with non-finite duration {}", dur);
            return Err(CadenceError::contract(format!(
                "play duration must be finite, got {}",
                dur
            )));
        }

        let start = start.into();
        let resolved = resolve_start(handles, &start);

        self.await_ready(handles).await?;

        let mut current = resolved.unwrap_or_default();
        for handle in handles.iter_mut() {
            let time = resolved.unwrap_or_else(|| handle.current_time());
            handle.set_current_time(time);
            current = time;
        }
        for handle in handles.iter_mut() {
            handle.play();
        }
        tracing::info!(
            "playing {} effect(s) from {} for {}ms",
            handles.len(),
            current,
            dur
        );

        self.clock.elapse(Duration::from_millis(dur.abs())).await;

        let stop = current.offset_by(dur);
        for handle in handles.iter_mut() {
            handle.pause();
            handle.set_current_time(stop);
        }
        tracing::info!("stopped {} effect(s) at {}", handles.len(), stop);
        Ok(stop)
    }

    /// Freeze every handle at `at` without advancing.
    pub async fn seek<H: PlaybackHandle>(
        &self,
        handles: &mut [H],
        at: impl Into<StartAt>,
    ) -> CadenceResult<LogicalTime> {
        self.play(handles, 0.0, at).await
    }

    /// Join on every handle's readiness, bounded by `ready_timeout_ms` if set.
    async fn await_ready<H: PlaybackHandle>(&self, handles: &mut [H]) -> CadenceResult<()> {
        let readiness = try_join_all(handles.iter_mut().map(|h| h.ready()));
        let joined = match self.config.ready_timeout_ms {
            Some(ms) => tokio::time::timeout(std::time::Duration::from_millis(ms), readiness)
                .await
                .map_err(|_| CadenceError::engine(format!("effects not ready after {}ms", ms)))?,
            None => readiness.await,
        };
        joined?;
        tracing::debug!("{} effect(s) ready", handles.len());
        Ok(())
    }
}
