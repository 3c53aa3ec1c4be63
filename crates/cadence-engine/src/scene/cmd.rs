use crate::coords::Vec2;
use crate::paint::Color;

/// Renderer-agnostic draw command stream.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Rect(RectCmd),
    Text(TextCmd),
}

/// Solid rectangle payload.
#[derive(Debug, Clone, PartialEq)]
pub struct RectCmd {
    /// Top-left corner in logical pixels.
    pub origin: Vec2,
    pub size: Vec2,
    pub color: Color,
}

/// Text block payload.
///
/// Rasterization belongs to the backend; the engine records the string and
/// placement only.
#[derive(Debug, Clone, PartialEq)]
pub struct TextCmd {
    pub text: String,
    /// Font size in logical pixels.
    pub size: f32,
    pub color: Color,
    /// Top-left of the text block in logical pixels.
    pub origin: Vec2,
}
