//! Cadence engine crate.
//!
//! Runs game logic at a fixed tick rate while handing completed frames to a
//! draw cadence derived from the display's refresh rate. The two rates are
//! intentionally decoupled: simulation may run faster or slower than the
//! screen, and the draw side always sees the newest fully written frame.

pub mod core;
pub mod coords;
pub mod frames;
pub mod logging;
pub mod paint;
pub mod runner;
pub mod scene;
pub mod time;
