//! Recorded draw streams.
//!
//! Frame producers push renderer-agnostic commands here during a frame;
//! backends consume them when the frame is submitted. Extending the scene
//! means adding a payload struct and a `DrawCmd` variant, plus a matching
//! interpreter in the backend.

mod cmd;
mod list;

pub use cmd::{DrawCmd, RectCmd, TextCmd};
pub use list::CommandList;
