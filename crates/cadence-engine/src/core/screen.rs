use anyhow::Result;

/// Windowing-layer view of the active display.
pub trait Screen {
    /// Drains pending platform events and reports whether a quit was
    /// requested. Non-blocking; checked once per loop iteration.
    fn poll_quit(&mut self) -> bool;

    /// Current refresh rate of the display in Hz.
    ///
    /// `Ok(0)` means the rate is unknown and the caller substitutes its
    /// fallback; an `Err` is a failed query and fatal to the loop.
    fn refresh_rate(&mut self) -> Result<u32>;
}
