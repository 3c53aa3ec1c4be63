use crate::coords::Vec2;
use crate::paint::Color;

use super::{DrawCmd, RectCmd, TextCmd};

/// Recorded draw stream for one frame.
///
/// Commands are kept in insertion order, which is also paint order.
/// `clear()` keeps allocated capacity so per-frame recording does not
/// reallocate once warmed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CommandList {
    items: Vec<DrawCmd>,
}

impl CommandList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops recorded commands, keeping capacity for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Returns commands in insertion (paint) order.
    #[inline]
    pub fn items(&self) -> &[DrawCmd] {
        &self.items
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn push(&mut self, cmd: DrawCmd) {
        self.items.push(cmd);
    }

    /// Records a solid rectangle.
    pub fn push_rect(&mut self, origin: Vec2, size: Vec2, color: Color) {
        self.push(DrawCmd::Rect(RectCmd { origin, size, color }));
    }

    /// Records a text block.
    pub fn push_text(&mut self, text: impl Into<String>, size: f32, color: Color, origin: Vec2) {
        self.push(DrawCmd::Text(TextCmd {
            text: text.into(),
            size,
            color,
            origin,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_insertion_order() {
        let mut list = CommandList::new();
        list.push_rect(Vec2::ZERO, Vec2::new(1.0, 1.0), Color::BLACK);
        list.push_text("hello", 14.0, Color::WHITE, Vec2::new(8.0, 8.0));

        assert_eq!(list.len(), 2);
        assert!(matches!(list.items()[0], DrawCmd::Rect(_)));
        assert!(matches!(list.items()[1], DrawCmd::Text(_)));
    }

    #[test]
    fn clear_empties_but_keeps_capacity() {
        let mut list = CommandList::new();
        for _ in 0..16 {
            list.push_rect(Vec2::ZERO, Vec2::ZERO, Color::BLACK);
        }
        let cap = list.items.capacity();

        list.clear();
        assert!(list.is_empty());
        assert_eq!(list.items.capacity(), cap);
    }
}
