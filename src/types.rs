//! Shared boundary types for the demo.
//!
//! This module defines the two key data contracts:
//! - Engine → Renderer (in-memory): `ResolvedFrame` containing `DrawOp`s
//! - Renderer → Player (in-memory): `Frame`s of terminal `Cell`s

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Shared colour and geometry primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const DARK_RED: Color = Color::rgb(139, 0, 0);
    pub const DARK_GREEN: Color = Color::rgb(0, 100, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color { r, g, b, a }
    }

    /// Per-channel linear interpolation. Channels are truncated, not rounded.
    pub fn lerp(from: Color, to: Color, t: f32) -> Color {
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t) as u8;
        Color {
            r: mix(from.r, to.r),
            g: mix(from.g, to.g),
            b: mix(from.b, to.b),
            a: mix(from.a, to.a),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }
}

// ---------------------------------------------------------------------------
// Engine → Renderer boundary (in-memory only, never serialized)
// ---------------------------------------------------------------------------

/// Index into the scene's texture registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub usize);

/// A single sprite draw.
///
/// `dst` places the sprite: its origin point lands on `(dst.x, dst.y)` and the
/// source region is stretched to `dst.width` × `dst.height`. Rotation is in
/// radians around the origin.
#[derive(Debug, Clone)]
pub struct DrawOp {
    pub texture: TextureId,
    /// `None` draws the whole texture.
    pub src: Option<Rect>,
    pub dst: Rect,
    /// Pivot in source-rectangle space.
    pub origin: Vec2,
    pub rotation: f32,
    pub flip_vertical: bool,
    pub tint: Color,
    pub opacity: f32,
    /// Sort key. Ops with a larger depth are drawn later and end up on top.
    pub depth: f32,
}

impl DrawOp {
    /// Whole texture, untinted and unrotated, top-left at `dst`.
    pub fn sprite(texture: TextureId, dst: Rect, depth: f32) -> Self {
        DrawOp {
            texture,
            src: None,
            dst,
            origin: Vec2::ZERO,
            rotation: 0.0,
            flip_vertical: false,
            tint: Color::WHITE,
            opacity: 1.0,
            depth,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedFrame {
    pub width: u32,
    pub height: u32,
    pub clear: Color,
    pub ops: Vec<DrawOp>,
}

// ---------------------------------------------------------------------------
// Renderer → Player boundary
// ---------------------------------------------------------------------------

/// One terminal cell: two vertically stacked pixels drawn as an upper half block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub upper: Color,
    pub lower: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            upper: Color::BLACK,
            lower: Color::BLACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}

#[derive(Debug, Clone)]
pub enum Frame {
    Full { cells: Vec<Vec<Cell>> },
    Diff { changes: Vec<CellChange> },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        assert_eq!(Color::lerp(Color::BLACK, Color::DARK_GREEN, 0.0), Color::BLACK);
        assert_eq!(Color::lerp(Color::BLACK, Color::DARK_GREEN, 1.0), Color::DARK_GREEN);
        assert_eq!(
            Color::lerp(Color::BLACK, Color::DARK_GREEN, 0.5),
            Color::rgb(0, 50, 0)
        );
    }

    #[test]
    fn test_color_deserializes_without_alpha() {
        let c: Color = serde_json::from_str(r#"{"r":64,"g":0,"b":0}"#).unwrap();
        assert_eq!(c, Color::rgb(64, 0, 0));
    }

    #[test]
    fn test_rect_contains_is_half_open() {
        let r = Rect::new(0, 0, 16, 16);
        assert!(r.contains(0, 0));
        assert!(r.contains(15, 15));
        assert!(!r.contains(16, 0));
        assert!(!r.intersects(&Rect::new(16, 0, 16, 16)));
        assert!(r.intersects(&Rect::new(15, 15, 16, 16)));
    }
}
