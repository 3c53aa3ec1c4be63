use crate::paint::Color;
use crate::scene::CommandList;

/// One buffered frame of render-ready state.
///
/// Written exclusively by the producer between `begin`/`end`; read
/// exclusively by the consumer during `draw_latest`. Never both at once for
/// the same slot.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FrameSlot {
    pub clear_color: Color,
    pub commands: CommandList,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores the clean baseline, keeping command-list capacity.
    pub fn reset(&mut self) {
        self.clear_color = Color::BLACK;
        self.commands.clear();
    }
}
