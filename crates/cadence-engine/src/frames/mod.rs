//! Buffered frame handoff between the update producer and the draw consumer.
//!
//! The producer records into one slot between `begin`/`end`; the consumer
//! only ever reads the slot most recently published by `end`. The two roles
//! run on one thread today, but the protocol keeps them separable: `end`
//! publishes in a single assignment and `draw_latest` never touches slot
//! bookkeeping.

mod buffer;
mod slot;

pub use buffer::{FrameBuffer, FrameStatus};
pub use slot::FrameSlot;
