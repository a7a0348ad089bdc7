//! Label Render Backend Trait
//!
//! Defines the interface between the label pass and the host renderer.
//! Keeps the label logic independent of OpenGL/Vulkan/Metal specifics; the
//! host owns all graphics-device state.

use std::collections::HashMap;

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec4;

/// RGBA color, components in [0, 1]
pub type Rgba = Vec4;

/// Fonts offered by the host's text renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Font {
    /// Proportional UI font
    #[default]
    Proportional,
    /// Fixed-width font
    Basic,
}

/// Axis-aligned screen rectangle in pixels
///
/// Screen space has its origin in the lower-left corner, so `top > bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenRect {
    /// Left edge
    pub left: i32,
    /// Top edge
    pub top: i32,
    /// Right edge
    pub right: i32,
    /// Bottom edge
    pub bottom: i32,
}

impl ScreenRect {
    /// Width in pixels
    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    /// Height in pixels
    pub const fn height(&self) -> i32 {
        self.top - self.bottom
    }
}

/// Backend-agnostic label drawing interface
pub trait LabelRenderBackend {
    /// Draw an alpha-blended filled rectangle
    fn draw_translucent_quad(
        &mut self,
        rect: ScreenRect,
        color: Rgba,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Draw a string with its baseline starting at `(x, y)`
    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        color: Rgba,
        text: &str,
        font: Font,
    ) -> Result<(), Box<dyn std::error::Error>>;

    /// Width of `text` in pixels when drawn with `font`
    fn measure_text_width(&self, text: &str, font: Font) -> i32;
}

/// A single recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Background box
    Quad {
        /// Covered area
        rect: ScreenRect,
        /// Fill color including alpha
        color: Rgba,
    },
    /// Text string
    Text {
        /// Left edge
        x: i32,
        /// Baseline
        y: i32,
        /// Text color
        color: Rgba,
        /// Drawn string
        text: String,
        /// Font used
        font: Font,
    },
}

/// In-process backend that records draw calls instead of issuing them
///
/// Text width is looked up in a table of per-string overrides first and
/// otherwise computed from a fixed glyph advance.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    commands: Vec<DrawCommand>,
    text_widths: HashMap<String, i32>,
    glyph_advance: i32,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingBackend {
    /// Default advance per character in pixels
    pub const DEFAULT_GLYPH_ADVANCE: i32 = 7;

    /// Create an empty recorder
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            text_widths: HashMap::new(),
            glyph_advance: Self::DEFAULT_GLYPH_ADVANCE,
        }
    }

    /// Use a different per-character advance
    pub fn with_glyph_advance(mut self, advance: i32) -> Self {
        self.glyph_advance = advance;
        self
    }

    /// Report a fixed width for one particular string
    pub fn with_text_width(mut self, text: impl Into<String>, width: i32) -> Self {
        self.text_widths.insert(text.into(), width);
        self
    }

    /// Everything drawn so far
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Recorded quads
    pub fn quads(&self) -> impl Iterator<Item = (&ScreenRect, &Rgba)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Quad { rect, color } => Some((rect, color)),
            DrawCommand::Text { .. } => None,
        })
    }

    /// Recorded text draws as `(x, y, color, text)`
    pub fn texts(&self) -> impl Iterator<Item = (i32, i32, &Rgba, &str)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { x, y, color, text, .. } => Some((*x, *y, color, text.as_str())),
            DrawCommand::Quad { .. } => None,
        })
    }

    /// Drop the recorded commands, typically at the start of a frame
    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl LabelRenderBackend for RecordingBackend {
    fn draw_translucent_quad(
        &mut self,
        rect: ScreenRect,
        color: Rgba,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.commands.push(DrawCommand::Quad { rect, color });
        Ok(())
    }

    fn draw_text(
        &mut self,
        x: i32,
        y: i32,
        color: Rgba,
        text: &str,
        font: Font,
    ) -> Result<(), Box<dyn std::error::Error>> {
        self.commands.push(DrawCommand::Text {
            x,
            y,
            color,
            text: text.to_string(),
            font,
        });
        Ok(())
    }

    fn measure_text_width(&self, text: &str, _font: Font) -> i32 {
        self.text_widths
            .get(text)
            .copied()
            .unwrap_or_else(|| text.chars().count() as i32 * self.glyph_advance)
    }
}
