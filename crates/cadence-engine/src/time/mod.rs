//! Monotonic time and fixed-step scheduling.

mod clock;
mod stepper;

pub use clock::{Clock, ClockSample, ManualClock, SystemClock};
pub use stepper::FixedStepper;

/// Nanoseconds per second, for rate/period conversions.
pub const NANOS_PER_SEC: u64 = 1_000_000_000;
