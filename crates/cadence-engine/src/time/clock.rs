use std::time::{Duration, Instant};

/// Opaque monotonic timestamp in nanoseconds.
///
/// Samples are ordered and non-decreasing within a process lifetime. The
/// epoch is arbitrary (fixed at clock construction), so only differences and
/// comparisons between samples from the same clock are meaningful.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockSample(u64);

impl ClockSample {
    pub const ZERO: Self = Self(0);

    /// Sentinel for "has not happened yet".
    ///
    /// Compare against it with ordering operators only; arithmetic involving
    /// the sentinel is refused by [`duration_since`](Self::duration_since)
    /// and saturated by [`saturating_add_nanos`](Self::saturating_add_nanos).
    pub const FAR_FUTURE: Self = Self(u64::MAX);

    #[inline]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self(nanos)
    }

    #[inline]
    pub const fn is_far_future(self) -> bool {
        self.0 == u64::MAX
    }

    /// Nanoseconds elapsed since `earlier`.
    ///
    /// Returns `None` when either sample is the far-future sentinel or when
    /// `earlier` is actually later than `self`.
    #[inline]
    pub fn duration_since(self, earlier: Self) -> Option<u64> {
        if self.is_far_future() || earlier.is_far_future() {
            return None;
        }
        self.0.checked_sub(earlier.0)
    }

    /// Advances the sample, saturating at the far-future sentinel.
    ///
    /// A saturated result means the moment is unboundedly far away and will
    /// never be reached by a real sample.
    #[inline]
    pub fn saturating_add_nanos(self, nanos: u64) -> Self {
        Self(self.0.saturating_add(nanos))
    }
}

/// Source of monotonic time for the stepper and the control loop.
///
/// `sleep` must block for at least the requested duration when it can;
/// overshoot is expected (OS scheduling granularity) and undershoot is
/// compensated by the stepper's carried error, so implementations do not
/// need to be precise.
pub trait Clock {
    /// Returns the current sample. Strictly monotonic within a process.
    fn now(&mut self) -> ClockSample;

    /// Largest representable sample, used as a deadline sentinel.
    fn max_sample(&self) -> ClockSample {
        ClockSample::FAR_FUTURE
    }

    /// Blocks the calling thread for at least `nanos` nanoseconds.
    fn sleep(&mut self, nanos: u64);
}

/// Wall clock backed by `std::time::Instant`, anchored at construction.
///
/// `Instant` is already monotonic; strictness (no two equal samples) is
/// enforced by bumping repeated readings by one nanosecond.
#[derive(Debug, Clone)]
pub struct SystemClock {
    epoch: Instant,
    last: u64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            last: 0,
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&mut self) -> ClockSample {
        let elapsed = self.epoch.elapsed().as_nanos();
        // Keep real samples strictly below the sentinel.
        let raw = elapsed.min((u64::MAX - 1) as u128) as u64;
        self.last = if raw > self.last { raw } else { self.last + 1 };
        ClockSample(self.last)
    }

    fn sleep(&mut self, nanos: u64) {
        std::thread::sleep(Duration::from_nanos(nanos));
    }
}

/// Deterministic clock for tests and headless harnesses.
///
/// Time advances only when told: explicitly via [`advance`](Self::advance),
/// by `sleep` (the requested duration plus a configurable overshoot), and
/// optionally by a fixed cost per `now()` reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: u64,
    sleep_overshoot: u64,
    now_cost: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `sleep` wakes late by `nanos` beyond the requested duration.
    pub fn with_sleep_overshoot(mut self, nanos: u64) -> Self {
        self.sleep_overshoot = nanos;
        self
    }

    /// Every `now()` reading costs `nanos` of simulated time.
    pub fn with_now_cost(mut self, nanos: u64) -> Self {
        self.now_cost = nanos;
        self
    }

    /// Moves simulated time forward.
    pub fn advance(&mut self, nanos: u64) {
        self.now = self.now.saturating_add(nanos);
    }

    /// Changes the sleep overshoot for subsequent sleeps.
    pub fn set_sleep_overshoot(&mut self, nanos: u64) {
        self.sleep_overshoot = nanos;
    }
}

impl Clock for ManualClock {
    fn now(&mut self) -> ClockSample {
        self.now = self.now.saturating_add(self.now_cost);
        ClockSample(self.now)
    }

    fn sleep(&mut self, nanos: u64) {
        self.now = self
            .now
            .saturating_add(nanos)
            .saturating_add(self.sleep_overshoot);
    }
}
