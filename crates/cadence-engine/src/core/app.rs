use anyhow::Result;

use crate::frames::FrameSlot;

/// Application contract implemented by higher layers.
///
/// Every callback runs inside a begin/end pair on the frame buffer, so
/// init-time and teardown-time drawing use the same protocol as steady-state
/// frames. A returned error is fatal to the loop.
pub trait App {
    /// Target simulation rate in ticks per second. Queried once, after
    /// [`on_init`](Self::on_init).
    fn tick_rate(&self) -> u64;

    /// Called once before the loop starts, inside the setup frame.
    fn on_init(&mut self, frame: &mut FrameSlot) -> Result<()> {
        let _ = frame;
        Ok(())
    }

    /// Advances the simulation by one update and records the resulting
    /// frame. Called once per loop iteration.
    fn on_update(&mut self, frame: &mut FrameSlot) -> Result<()>;

    /// Called once after the loop exits, inside the final frame.
    fn on_shutdown(&mut self, frame: &mut FrameSlot) -> Result<()> {
        let _ = frame;
        Ok(())
    }
}
