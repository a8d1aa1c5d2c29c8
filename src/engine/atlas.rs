//! Glyph atlas: maps characters to cells of a fixed-grid font sheet.
//!
//! Cells are numbered in raster order (left to right, top to bottom). The
//! character → cell mapping is fixed and total: anything outside the font's
//! character set resolves to the blank cell.

use anyhow::{Result, bail, ensure};

use crate::texture::Texture;
use crate::types::{Rect, TextureId, Vec2};

/// Every mapped character, in cell order. `SHEET_ORDER[i]` lives in cell `i`.
pub const SHEET_ORDER: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ!?:;0123456789\"(),-.' ";

/// Cell used for the space character and for anything the font lacks.
pub const BLANK_INDEX: usize = 47;

/// Number of cells a sheet must provide to cover the whole mapping.
pub const REQUIRED_CELLS: usize = 48;

/// Result of a glyph lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub index: usize,
    pub rect: Rect,
    /// Narrow glyphs get a tighter horizontal advance in the scroller.
    pub narrow: bool,
}

/// Cell index and narrowness for `ch`. Case-insensitive and total.
pub fn glyph_index(ch: char) -> (usize, bool) {
    let ch = ch.to_ascii_uppercase();
    match ch {
        '0'..='9' => (ch as usize - '0' as usize + 30, false),
        'I' => (8, true),
        '!' => (26, true),
        '\'' => (46, true),
        ' ' => (BLANK_INDEX, false),
        '?' => (27, false),
        ':' => (28, false),
        ';' => (29, false),
        '"' => (40, false),
        '(' => (41, false),
        ')' => (42, false),
        ',' => (43, false),
        '-' => (44, false),
        '.' => (45, false),
        'A'..='Z' => (ch as usize - 'A' as usize, false),
        _ => (BLANK_INDEX, false),
    }
}

#[derive(Debug, Clone)]
pub struct GlyphAtlas {
    texture: TextureId,
    cell_width: u32,
    cell_height: u32,
    rects: Vec<Rect>,
}

impl GlyphAtlas {
    /// Slice `image` into `cell_count` cells of `cell_width` × `cell_height`.
    ///
    /// A `cell_count` of zero takes every whole cell in the image.
    pub fn new(
        texture: TextureId,
        image: &Texture,
        cell_width: u32,
        cell_height: u32,
        cell_count: usize,
    ) -> Result<Self> {
        ensure!(
            cell_width > 0 && cell_height > 0,
            "Glyph cell size must be non-zero, got {cell_width}x{cell_height}"
        );
        let columns = (image.width / cell_width) as usize;
        let rows = (image.height / cell_height) as usize;
        let available = columns * rows;
        let cell_count = if cell_count == 0 {
            available
        } else {
            cell_count
        };
        if cell_count > available {
            bail!(
                "Font sheet {}x{} holds {available} cells of {cell_width}x{cell_height}, {cell_count} requested",
                image.width,
                image.height,
            );
        }
        if cell_count < REQUIRED_CELLS {
            bail!("Font sheet needs at least {REQUIRED_CELLS} glyph cells, has {cell_count}");
        }

        let rects = (0..cell_count)
            .map(|i| {
                Rect::new(
                    ((i % columns) as u32 * cell_width) as i32,
                    ((i / columns) as u32 * cell_height) as i32,
                    cell_width as i32,
                    cell_height as i32,
                )
            })
            .collect();

        Ok(GlyphAtlas {
            texture,
            cell_width,
            cell_height,
            rects,
        })
    }

    pub fn lookup(&self, ch: char) -> Glyph {
        let (index, narrow) = glyph_index(ch);
        Glyph {
            index,
            rect: self.rects[index],
            narrow,
        }
    }

    pub fn texture(&self) -> TextureId {
        self.texture
    }

    pub fn cell_width(&self) -> u32 {
        self.cell_width
    }

    pub fn cell_height(&self) -> u32 {
        self.cell_height
    }

    pub fn cell_count(&self) -> usize {
        self.rects.len()
    }

    /// Rotation pivot: the cell centre, integer-divided.
    pub fn origin(&self) -> Vec2 {
        Vec2::new((self.cell_width / 2) as f32, (self.cell_height / 2) as f32)
    }

    pub fn rect(&self, index: usize) -> Option<Rect> {
        self.rects.get(index).copied()
    }
}
