use anyhow::{Context, Result, ensure};

use super::{Clock, ClockSample, NANOS_PER_SEC};

/// Fixed-step scheduler.
///
/// Converts a target tick period into a sequence of equally spaced logical
/// steps. Each [`step`](Self::step) either sleeps until the next deadline
/// (returning `true`) or reports that the deadline was already missed
/// (returning `false`, a "skip"). Both are valid outcomes; there is no error
/// state.
///
/// Phase is anchored to `last_step + period` rather than to the wake-up
/// time, so jitter in any one step is corrected over the following steps
/// instead of drifting the cadence. The carried `error` absorbs sleep
/// overshoot and timer granularity; it always stays within
/// `(-period, period]`.
#[derive(Debug, Clone)]
pub struct FixedStepper {
    period: u64,
    max_sample: ClockSample,
    error: i64,
    last_step: ClockSample,
}

impl FixedStepper {
    /// Creates a stepper with the given tick period in nanoseconds.
    ///
    /// The baseline is captured from `clock` immediately, so the first
    /// deadline is one period from now.
    pub fn new(period_nanos: u64, clock: &mut impl Clock) -> Result<Self> {
        ensure!(period_nanos > 0, "tick period must be positive");
        Ok(Self {
            period: period_nanos,
            max_sample: clock.max_sample(),
            error: 0,
            last_step: clock.now(),
        })
    }

    /// Creates a stepper from a tick rate in Hz.
    pub fn from_rate(hz: u64, clock: &mut impl Clock) -> Result<Self> {
        ensure!(hz > 0, "tick rate must be positive");
        Self::new(NANOS_PER_SEC / hz, clock).context("tick rate out of range")
    }

    /// Target step period in nanoseconds.
    #[inline]
    pub fn period(&self) -> u64 {
        self.period
    }

    /// Carried timing error in nanoseconds, always within `(-period, period]`.
    #[inline]
    pub fn error(&self) -> i64 {
        self.error
    }

    /// Advances to the next step deadline.
    ///
    /// Returns `false` when the deadline had already passed on entry (a
    /// skip): no sleep is issued, the overshoot is folded into the carried
    /// error, and the baseline still advances by exactly one period so the
    /// cadence keeps its phase. Returns `true` after sleeping out the
    /// remainder of the period.
    pub fn step(&mut self, clock: &mut impl Clock) -> bool {
        let now = clock.now();
        let deadline = self.deadline();
        let elapsed = now.duration_since(self.last_step).unwrap_or(0);

        let on_time = elapsed < self.period;
        let woke = if on_time {
            let remaining = (self.period - elapsed) as i64;
            // A positive carried error means previous steps ran late; sleep
            // that much less so the cadence pulls back on schedule.
            let request = remaining - self.error;
            if request > 0 {
                clock.sleep(request as u64);
            }
            clock.now()
        } else {
            now
        };

        self.error = fold_error(self.error + signed_since(woke, deadline), self.period);
        self.last_step = deadline;
        on_time
    }

    fn deadline(&self) -> ClockSample {
        let deadline = self.last_step.saturating_add_nanos(self.period);
        deadline.min(self.max_sample)
    }
}

/// Signed nanoseconds from `origin` to `sample`; zero if the sentinel is
/// involved (distances against it are undefined).
fn signed_since(sample: ClockSample, origin: ClockSample) -> i64 {
    if let Some(ahead) = sample.duration_since(origin) {
        ahead as i64
    } else if let Some(behind) = origin.duration_since(sample) {
        -(behind as i64)
    } else {
        0
    }
}

/// Folds an error value back into `(-period, period]`.
///
/// Whole periods of error are dropped rather than repaid: a stepper that
/// fell several ticks behind reports skips instead of sleeping them off.
fn fold_error(error: i64, period: u64) -> i64 {
    error % period as i64
}
