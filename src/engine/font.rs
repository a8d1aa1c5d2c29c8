//! Built-in glyph sheet, used when no font image is configured.
//!
//! Each glyph is 5 rows tall with variable width. All rows within a single
//! glyph are guaranteed to have the same length. A non-space character in a
//! row means "filled"; a space means "empty". Glyphs are blown up into blocks
//! and laid out in atlas cell order, so the result slots straight into a
//! `GlyphAtlas` in place of a loaded sheet.

use crate::texture::Texture;
use crate::types::Color;

use super::atlas::SHEET_ORDER;

/// The height of every glyph (constant).
pub const GLYPH_HEIGHT: u32 = 5;

/// Smallest cell edge that holds every glyph at one pixel per block.
pub const MIN_CELL: u32 = 5;

/// Cells per row of the generated sheet.
pub const SHEET_COLUMNS: u32 = 10;

/// Return the 5-row bitmap for `ch`, or `None` if the character is not in
/// the font.  The caller should handle case folding before calling this.
pub fn glyph(ch: char) -> Option<[&'static str; 5]> {
    let g = match ch {
        'A' => [" ### ", "#   #", "#####", "#   #", "#   #"],
        'B' => ["#### ", "#   #", "#### ", "#   #", "#### "],
        'C' => [" ### ", "#   #", "#    ", "#   #", " ### "],
        'D' => ["#### ", "#   #", "#   #", "#   #", "#### "],
        'E' => ["#####", "#    ", "###  ", "#    ", "#####"],
        'F' => ["#####", "#    ", "###  ", "#    ", "#    "],
        'G' => [" ### ", "#    ", "#  ##", "#   #", " ### "],
        'H' => ["#   #", "#   #", "#####", "#   #", "#   #"],
        'I' => ["###", " # ", " # ", " # ", "###"],
        'J' => ["  ###", "   # ", "   # ", "#  # ", " ##  "],
        'K' => ["#   #", "#  # ", "###  ", "#  # ", "#   #"],
        'L' => ["#    ", "#    ", "#    ", "#    ", "#####"],
        'M' => ["#   #", "## ##", "# # #", "#   #", "#   #"],
        'N' => ["#   #", "##  #", "# # #", "#  ##", "#   #"],
        'O' => [" ### ", "#   #", "#   #", "#   #", " ### "],
        'P' => ["#### ", "#   #", "#### ", "#    ", "#    "],
        'Q' => [" ### ", "#   #", "# # #", "#  # ", " ## #"],
        'R' => ["#### ", "#   #", "#### ", "#  # ", "#   #"],
        'S' => [" ####", "#    ", " ### ", "    #", "#### "],
        'T' => ["#####", "  #  ", "  #  ", "  #  ", "  #  "],
        'U' => ["#   #", "#   #", "#   #", "#   #", " ### "],
        'V' => ["#   #", "#   #", "#   #", " # # ", "  #  "],
        'W' => ["#   #", "#   #", "# # #", "## ##", "#   #"],
        'X' => ["#   #", " # # ", "  #  ", " # # ", "#   #"],
        'Y' => ["#   #", " # # ", "  #  ", "  #  ", "  #  "],
        'Z' => ["#####", "   # ", "  #  ", " #   ", "#####"],

        '0' => [" ### ", "#   #", "#   #", "#   #", " ### "],
        '1' => [" # ", "## ", " # ", " # ", "###"],
        '2' => [" ### ", "#   #", "  ## ", " #   ", "#####"],
        '3' => [" ### ", "#   #", "  ## ", "#   #", " ### "],
        '4' => ["#  # ", "#  # ", "#####", "   # ", "   # "],
        '5' => ["#####", "#    ", "#### ", "    #", "#### "],
        '6' => [" ### ", "#    ", "#### ", "#   #", " ### "],
        '7' => ["#####", "   # ", "  #  ", " #   ", " #   "],
        '8' => [" ### ", "#   #", " ### ", "#   #", " ### "],
        '9' => [" ### ", "#   #", " ####", "   # ", " ### "],

        ' ' => ["   ", "   ", "   ", "   ", "   "],
        '!' => ["#", "#", "#", " ", "#"],
        '.' => [" ", " ", " ", " ", "#"],
        '-' => ["     ", "     ", "#####", "     ", "     "],
        '?' => [" ### ", "#   #", "  ## ", "     ", "  #  "],
        ':' => [" ", "#", " ", "#", " "],
        ';' => ["  ", " #", "  ", " #", "# "],
        '"' => ["# #", "# #", "   ", "   ", "   "],
        '(' => [" #", "# ", "# ", "# ", " #"],
        ')' => ["# ", " #", " #", " #", "# "],
        ',' => ["  ", "  ", "  ", " #", "# "],
        '\'' => ["#", "#", " ", " ", " "],

        _ => return None,
    };
    debug_assert!(
        g.iter().all(|row| row.len() == g[0].len()),
        "glyph '{ch}' has inconsistent row widths",
    );
    Some(g)
}

/// Rasterize the built-in font into a sheet of `cell_width` × `cell_height`
/// cells, white on transparent, one cell per entry of `SHEET_ORDER`.
pub fn build_sheet(cell_width: u32, cell_height: u32) -> Texture {
    let cells = SHEET_ORDER.chars().count() as u32;
    let rows = cells.div_ceil(SHEET_COLUMNS);
    let mut sheet = Texture::filled(
        SHEET_COLUMNS * cell_width,
        rows * cell_height,
        Color::TRANSPARENT,
    );

    // Widest glyph is 5 columns; leave a block of margin.
    let block = (cell_width.min(cell_height) / 6).max(1);

    for (i, ch) in SHEET_ORDER.chars().enumerate() {
        let Some(g) = glyph(ch) else { continue };
        let i = i as u32;
        let glyph_w = g[0].len() as u32 * block;
        let glyph_h = GLYPH_HEIGHT * block;
        let left = (i % SHEET_COLUMNS) * cell_width + cell_width.saturating_sub(glyph_w) / 2;
        let top = (i / SHEET_COLUMNS) * cell_height + cell_height.saturating_sub(glyph_h) / 2;

        for (row, line) in g.iter().enumerate() {
            for (col, c) in line.chars().enumerate() {
                if c == ' ' {
                    continue;
                }
                let x0 = left + col as u32 * block;
                let y0 = top + row as u32 * block;
                for y in y0..y0 + block {
                    for x in x0..x0 + block {
                        sheet.set(x, y, Color::WHITE);
                    }
                }
            }
        }
    }

    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::atlas::{BLANK_INDEX, GlyphAtlas};
    use crate::types::TextureId;

    #[test]
    fn test_every_mapped_character_has_a_glyph() {
        for ch in SHEET_ORDER.chars() {
            assert!(glyph(ch).is_some(), "missing glyph for {ch:?}");
        }
    }

    #[test]
    fn test_sheet_feeds_an_atlas() {
        let sheet = build_sheet(32, 25);
        assert_eq!((sheet.width, sheet.height), (320, 125));
        let atlas = GlyphAtlas::new(TextureId(0), &sheet, 32, 25, 48).unwrap();
        assert_eq!(atlas.cell_count(), 48);
    }

    #[test]
    fn test_smallest_cells_stay_inside_the_sheet() {
        for (w, h) in [(MIN_CELL, MIN_CELL), (MIN_CELL, 25), (32, MIN_CELL)] {
            let sheet = build_sheet(w, h);
            assert_eq!((sheet.width, sheet.height), (SHEET_COLUMNS * w, 5 * h));
            // 'W' is five blocks wide; all of it lands inside its own cell.
            let index = 22;
            let (cx, cy) = (index % SHEET_COLUMNS * w, index / SHEET_COLUMNS * h);
            let inked = (cy..cy + h)
                .flat_map(|y| (cx..cx + w).map(move |x| (x, y)))
                .filter(|&(x, y)| sheet.get(x, y) == Color::WHITE)
                .count();
            let expected = glyph('W').unwrap().concat().matches('#').count();
            assert_eq!(inked, expected);
            assert!(GlyphAtlas::new(TextureId(0), &sheet, w, h, 48).is_ok());
        }
    }

    #[test]
    fn test_letters_are_inked_and_space_is_blank() {
        let sheet = build_sheet(32, 25);
        let inked = |index: usize| {
            let (cx, cy) = (index as u32 % SHEET_COLUMNS * 32, index as u32 / SHEET_COLUMNS * 25);
            (cy..cy + 25).any(|y| (cx..cx + 32).any(|x| sheet.get(x, y) == Color::WHITE))
        };
        assert!(inked(0));
        assert!(inked(39));
        assert!(!inked(BLANK_INDEX));
    }
}
