use async_trait::async_trait;

use cadence_core::{Duration, PlaybackConfig};

/// Real-time wait signal shared by every effect on a root.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Resolve after `duration` of logical time has passed in real time.
    async fn elapse(&self, duration: Duration);
}

/// Sleeps on the tokio timer, scaled by `time_scale` real ms per logical ms.
#[derive(Debug, Clone)]
pub struct TokioClock {
    time_scale: f64,
}

impl TokioClock {
    pub fn new(time_scale: f64) -> Self {
        Self {
            time_scale: if time_scale.is_finite() { time_scale.max(0.0) } else { 1.0 },
        }
    }

    pub fn from_config(config: &PlaybackConfig) -> Self {
        Self::new(config.time_scale)
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[async_trait]
impl Clock for TokioClock {
    async fn elapse(&self, duration: Duration) {
        tokio::time::sleep((duration * self.time_scale).to_std()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_clock_waits_scaled_duration() {
        let clock = TokioClock::new(0.5);
        let start = tokio::time::Instant::now();
        clock.elapse(Duration::from_millis(200.0)).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= std::time::Duration::from_millis(100));
        assert!(elapsed < std::time::Duration::from_millis(101));
    }

    #[test]
    fn test_invalid_scale_falls_back() {
        assert_eq!(TokioClock::new(f64::NAN).time_scale, 1.0);
        assert_eq!(TokioClock::new(-2.0).time_scale, 0.0);
    }
}
