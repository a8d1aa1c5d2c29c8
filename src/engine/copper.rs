//! Copper bars: horizontal gradient strips bouncing between two rows.

use crate::types::{DrawOp, Rect, TextureId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopperBar {
    pub position: i32,
    pub upper_limit: i32,
    pub lower_limit: i32,
    /// +1 or -1.
    pub direction: i32,
}

impl CopperBar {
    pub fn new(position: i32, upper_limit: i32, lower_limit: i32, direction: i32) -> Self {
        CopperBar {
            position,
            upper_limit,
            lower_limit,
            direction: if direction < 0 { -1 } else { 1 },
        }
    }

    /// Step one row. The direction flips once the bar has overshot a limit,
    /// so it can sit one row outside the range for a single tick.
    pub fn advance(&mut self) {
        self.position += self.direction;
        if self.position > self.upper_limit || self.position < self.lower_limit {
            self.direction = -self.direction;
        }
    }

    /// Queue the strip at the current row, stretched to the texture's size.
    pub fn render(&self, ops: &mut Vec<DrawOp>, texture: TextureId, size: (u32, u32), depth: f32) {
        let (width, height) = size;
        ops.push(DrawOp::sprite(
            texture,
            Rect::new(0, self.position, width as i32, height as i32),
            depth,
        ));
    }
}
