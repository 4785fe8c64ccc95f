//! Frame clocks: what paces the animation ticks.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Default animation interval (100 ms).
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_millis(100);

/// Paces the animation loop.
///
/// # Implementations
///
/// - **Production**: `TokioClock` - wraps `tokio::time::interval`
/// - **Testing**: `ManualClock` - virtual time, ticks return immediately
#[async_trait]
pub trait FrameClock: Send {
    /// Waits for the next frame.
    async fn tick(&mut self);

    /// Time since the clock was created.
    ///
    /// In tests, this is the virtual time.
    fn elapsed(&self) -> Duration;

    /// The frame period.
    fn period(&self) -> Duration;
}

/// Wall-clock ticks backed by Tokio.
pub struct TokioClock {
    start: Instant,
    interval: Interval,
}

impl TokioClock {
    /// Creates a clock ticking every `period`. Must be called inside a runtime.
    ///
    /// The first tick fires immediately. Late ticks are delayed rather than
    /// bunched up, the same as a GUI animation timer.
    pub fn new(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            start: Instant::now(),
            interval,
        }
    }
}

#[async_trait]
impl FrameClock for TokioClock {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }

    fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    fn period(&self) -> Duration {
        self.interval.period()
    }
}

/// Virtual clock that advances one period per tick without waiting.
#[derive(Debug, Clone)]
pub struct ManualClock {
    period: Duration,
    now: Duration,
    ticks: u64,
}

impl ManualClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            now: Duration::ZERO,
            ticks: 0,
        }
    }

    /// Advances virtual time without counting a tick.
    pub fn advance(&mut self, duration: Duration) {
        self.now += duration;
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(DEFAULT_FRAME_INTERVAL)
    }
}

#[async_trait]
impl FrameClock for ManualClock {
    async fn tick(&mut self) {
        // The first tick fires at t = 0, like an interval.
        if self.ticks > 0 {
            self.now += self.period;
        }
        self.ticks += 1;
    }

    fn elapsed(&self) -> Duration {
        self.now
    }

    fn period(&self) -> Duration {
        self.period
    }
}
