use anyhow::Result;

use crate::frames::FrameSlot;

/// Rendering backend consuming completed frames.
///
/// `submit` executes the recorded clear and draw commands for one frame. It
/// may block on backend-specific synchronization (vsync, queue limits);
/// that is accepted latency, not an error. A returned error is fatal to the
/// frame buffer.
pub trait RenderBackend {
    fn submit(&mut self, frame: &FrameSlot) -> Result<()>;
}
