//! Renderer — the deterministic rasterizer.
//!
//! Takes a `ResolvedFrame` (in-memory, from the engine) and produces pixels,
//! then packs those pixels into terminal cells for the player.
//!
//! The renderer is pure and stateless. Given the same input, it always
//! produces the same output. It knows nothing about time, animation,
//! or terminals.

use crate::texture::Texture;
use crate::types::{Cell, CellChange, Color, DrawOp, Frame, Rect, ResolvedFrame};

pub struct Renderer;

impl Renderer {
    /// Rasterize a resolved frame into an off-screen image.
    ///
    /// Draw operations are stably sorted by depth so that higher depths
    /// paint over lower ones; equal depths keep submission order.
    pub fn rasterize(frame: &ResolvedFrame, textures: &[Texture]) -> Texture {
        let mut target = Texture::filled(frame.width, frame.height, frame.clear);

        let mut ops: Vec<_> = frame.ops.iter().collect();
        ops.sort_by(|a, b| a.depth.total_cmp(&b.depth));

        for op in ops {
            if let Some(texture) = textures.get(op.texture.0) {
                Self::draw(&mut target, texture, op);
            }
        }

        target
    }

    /// Draw one sprite with nearest-neighbour sampling.
    fn draw(target: &mut Texture, texture: &Texture, op: &DrawOp) {
        let src = op
            .src
            .unwrap_or(Rect::new(0, 0, texture.width as i32, texture.height as i32));
        let dst = op.dst;
        if src.width <= 0 || src.height <= 0 || dst.width <= 0 || dst.height <= 0 {
            return;
        }
        if op.opacity <= 0.0 {
            return;
        }

        // Source texels per destination pixel.
        let sx = src.width as f32 / dst.width as f32;
        let sy = src.height as f32 / dst.height as f32;
        let (sin, cos) = op.rotation.sin_cos();

        // Destination-space bounding box of the transformed sprite.
        let corners = [
            (0.0, 0.0),
            (src.width as f32, 0.0),
            (0.0, src.height as f32),
            (src.width as f32, src.height as f32),
        ];
        let (mut min_x, mut min_y) = (f32::MAX, f32::MAX);
        let (mut max_x, mut max_y) = (f32::MIN, f32::MIN);
        for (cx, cy) in corners {
            let lx = (cx - op.origin.x) / sx;
            let ly = (cy - op.origin.y) / sy;
            let x = dst.x as f32 + lx * cos - ly * sin;
            let y = dst.y as f32 + lx * sin + ly * cos;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        }

        let x0 = (min_x.floor() as i64).max(0);
        let y0 = (min_y.floor() as i64).max(0);
        let x1 = (max_x.ceil() as i64).min(target.width as i64);
        let y1 = (max_y.ceil() as i64).min(target.height as i64);

        for py in y0..y1 {
            for px in x0..x1 {
                // Pixel centre relative to the anchor, rotated back into
                // sprite space.
                let dx = px as f32 + 0.5 - dst.x as f32;
                let dy = py as f32 + 0.5 - dst.y as f32;
                let u = (dx * cos + dy * sin) * sx + op.origin.x;
                let v = (-dx * sin + dy * cos) * sy + op.origin.y;
                if u < 0.0 || v < 0.0 || u >= src.width as f32 || v >= src.height as f32 {
                    continue;
                }

                let row = if op.flip_vertical {
                    src.height - 1 - v as i32
                } else {
                    v as i32
                };
                let tx = src.x + u as i32;
                let ty = src.y + row;
                if tx < 0 || ty < 0 || tx >= texture.width as i32 || ty >= texture.height as i32 {
                    continue;
                }

                let texel = texture.get(tx as u32, ty as u32);
                let below = target.get(px as u32, py as u32);
                target.set(
                    px as u32,
                    py as u32,
                    blend(below, texel, op.tint, op.opacity),
                );
            }
        }
    }

    /// Integer nearest-neighbour upscale.
    pub fn upscale(image: &Texture, scale: u32) -> Texture {
        let scale = scale.max(1);
        if scale == 1 {
            return image.clone();
        }
        let width = image.width * scale;
        let height = image.height * scale;
        let mut pixels = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            let sy = y / scale;
            for x in 0..width {
                pixels.push(image.get(x / scale, sy));
            }
        }
        Texture {
            width,
            height,
            pixels,
        }
    }

    /// Pack pixel rows in pairs into half-block terminal cells. An odd final
    /// row is paired with `fill`.
    pub fn to_cells(image: &Texture, fill: Color) -> Vec<Vec<Cell>> {
        (0..image.height.div_ceil(2))
            .map(|row| {
                let top = row * 2;
                (0..image.width)
                    .map(|x| Cell {
                        upper: image.get(x, top),
                        lower: if top + 1 < image.height {
                            image.get(x, top + 1)
                        } else {
                            fill
                        },
                    })
                    .collect()
            })
            .collect()
    }

    /// Turn a cell grid into a player frame. The first frame, and any frame
    /// whose size changed, is sent in full; the rest are diffs.
    pub fn frame(prev: Option<&[Vec<Cell>]>, grid: &[Vec<Cell>]) -> Frame {
        match prev {
            Some(prev) if same_shape(prev, grid) => Frame::Diff {
                changes: Self::diff(prev, grid),
            },
            _ => Frame::Full {
                cells: grid.to_vec(),
            },
        }
    }

    /// Compute a cell-level diff between two grids.
    pub fn diff(prev: &[Vec<Cell>], next: &[Vec<Cell>]) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (y, (prev_row, next_row)) in prev.iter().zip(next.iter()).enumerate() {
            for (x, (prev_cell, next_cell)) in prev_row.iter().zip(next_row.iter()).enumerate() {
                if prev_cell != next_cell {
                    changes.push(CellChange {
                        x: x as u16,
                        y: y as u16,
                        cell: *next_cell,
                    });
                }
            }
        }
        changes
    }
}

fn same_shape(a: &[Vec<Cell>], b: &[Vec<Cell>]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(ra, rb)| ra.len() == rb.len())
}

/// Straight-alpha "over" of a tinted texel onto `below`.
fn blend(below: Color, texel: Color, tint: Color, opacity: f32) -> Color {
    let alpha = texel.a as f32 / 255.0 * tint.a as f32 / 255.0 * opacity.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return below;
    }
    let mix = |t: u8, k: u8, b: u8| {
        let src = t as f32 * k as f32 / 255.0;
        (src * alpha + b as f32 * (1.0 - alpha)).round() as u8
    };
    Color {
        r: mix(texel.r, tint.r, below.r),
        g: mix(texel.g, tint.g, below.g),
        b: mix(texel.b, tint.b, below.b),
        a: (alpha * 255.0 + below.a as f32 * (1.0 - alpha)).round() as u8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TextureId, Vec2};

    fn frame(width: u32, height: u32, ops: Vec<DrawOp>) -> ResolvedFrame {
        ResolvedFrame {
            width,
            height,
            clear: Color::BLACK,
            ops,
        }
    }

    #[test]
    fn test_unrotated_sprite_copies_pixels() {
        let tex = Texture::checkerboard(Color::RED, Color::WHITE, 4, 4, 2, 2);
        let out = Renderer::rasterize(
            &frame(8, 8, vec![DrawOp::sprite(TextureId(0), Rect::new(2, 3, 4, 4), 0.0)]),
            &[tex.clone()],
        );
        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(out.get(x + 2, y + 3), tex.get(x, y));
            }
        }
        assert_eq!(out.get(0, 0), Color::BLACK);
        assert_eq!(out.get(6, 3), Color::BLACK);
    }

    #[test]
    fn test_clips_at_canvas_edges() {
        let tex = Texture::filled(4, 4, Color::WHITE);
        let out = Renderer::rasterize(
            &frame(4, 4, vec![DrawOp::sprite(TextureId(0), Rect::new(-2, -2, 4, 4), 0.0)]),
            &[tex],
        );
        assert_eq!(out.get(0, 0), Color::WHITE);
        assert_eq!(out.get(1, 1), Color::WHITE);
        assert_eq!(out.get(2, 2), Color::BLACK);
    }

    #[test]
    fn test_depth_order_not_submission_order() {
        let textures = [
            Texture::filled(2, 2, Color::RED),
            Texture::filled(2, 2, Color::WHITE),
        ];
        let ops = vec![
            DrawOp::sprite(TextureId(0), Rect::new(0, 0, 2, 2), 1.0),
            DrawOp::sprite(TextureId(1), Rect::new(0, 0, 2, 2), 0.5),
        ];
        let out = Renderer::rasterize(&frame(2, 2, ops), &textures);
        assert_eq!(out.get(0, 0), Color::RED);

        // Ties keep submission order.
        let ops = vec![
            DrawOp::sprite(TextureId(0), Rect::new(0, 0, 2, 2), 0.0),
            DrawOp::sprite(TextureId(1), Rect::new(0, 0, 2, 2), 0.0),
        ];
        let out = Renderer::rasterize(&frame(2, 2, ops), &textures);
        assert_eq!(out.get(0, 0), Color::WHITE);
    }

    #[test]
    fn test_quarter_turn_is_clockwise_about_origin() {
        let mut tex = Texture::filled(2, 1, Color::RED);
        tex.set(1, 0, Color::WHITE);
        let op = DrawOp {
            rotation: std::f32::consts::FRAC_PI_2,
            ..DrawOp::sprite(TextureId(0), Rect::new(5, 5, 2, 1), 0.0)
        };
        let out = Renderer::rasterize(&frame(10, 10, vec![op]), &[tex]);
        assert_eq!(out.get(4, 5), Color::RED);
        assert_eq!(out.get(4, 6), Color::WHITE);
        assert_eq!(out.get(5, 5), Color::BLACK);
    }

    #[test]
    fn test_origin_anchors_sprite_centre() {
        let tex = Texture::filled(4, 4, Color::WHITE);
        let op = DrawOp {
            origin: Vec2::new(2.0, 2.0),
            ..DrawOp::sprite(TextureId(0), Rect::new(4, 4, 4, 4), 0.0)
        };
        let out = Renderer::rasterize(&frame(8, 8, vec![op]), &[tex]);
        assert_eq!(out.get(2, 2), Color::WHITE);
        assert_eq!(out.get(5, 5), Color::WHITE);
        assert_eq!(out.get(6, 6), Color::BLACK);
        assert_eq!(out.get(1, 1), Color::BLACK);
    }

    #[test]
    fn test_vertical_flip_within_source_rect() {
        let sheet = Texture::gradient(Color::BLACK, Color::WHITE, 1, 8);
        let op = DrawOp {
            src: Some(Rect::new(0, 4, 1, 4)),
            flip_vertical: true,
            ..DrawOp::sprite(TextureId(0), Rect::new(0, 0, 1, 4), 0.0)
        };
        let out = Renderer::rasterize(&frame(1, 4, vec![op]), &[sheet.clone()]);
        for y in 0..4 {
            assert_eq!(out.get(0, y), sheet.get(0, 7 - y));
        }
    }

    #[test]
    fn test_tint_and_opacity_blend() {
        let white = [Texture::filled(1, 1, Color::WHITE)];
        let shadow = DrawOp {
            tint: Color::BLACK,
            opacity: 0.5,
            ..DrawOp::sprite(TextureId(0), Rect::new(0, 0, 1, 1), 0.0)
        };
        let mut f = frame(1, 1, vec![shadow]);
        f.clear = Color::rgb(200, 100, 0);
        let out = Renderer::rasterize(&f, &white);
        assert_eq!(out.get(0, 0), Color::rgb(100, 50, 0));

        let faint = DrawOp {
            opacity: 0.1,
            ..DrawOp::sprite(TextureId(0), Rect::new(0, 0, 1, 1), 0.0)
        };
        let out = Renderer::rasterize(&frame(1, 1, vec![faint]), &white);
        assert_eq!(out.get(0, 0), Color::rgb(26, 26, 26));
    }

    #[test]
    fn test_transparent_texels_leave_target_untouched() {
        let tex = [Texture::filled(2, 2, Color::TRANSPARENT)];
        let out = Renderer::rasterize(
            &frame(2, 2, vec![DrawOp::sprite(TextureId(0), Rect::new(0, 0, 2, 2), 0.0)]),
            &tex,
        );
        assert!(out.pixels.iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn test_upscale_is_blocky() {
        let image = Texture::checkerboard(Color::BLACK, Color::WHITE, 2, 2, 1, 1);
        let big = Renderer::upscale(&image, 3);
        assert_eq!((big.width, big.height), (6, 6));
        for y in 0..6 {
            for x in 0..6 {
                assert_eq!(big.get(x, y), image.get(x / 3, y / 3));
            }
        }
    }

    #[test]
    fn test_cells_pair_rows() {
        let image = Texture::gradient(Color::BLACK, Color::WHITE, 2, 3);
        let cells = Renderer::to_cells(&image, Color::BLACK);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0][1].upper, image.get(1, 0));
        assert_eq!(cells[0][1].lower, image.get(1, 1));
        assert_eq!(cells[1][0].upper, image.get(0, 2));
        assert_eq!(cells[1][0].lower, Color::BLACK);
    }

    #[test]
    fn test_first_frame_full_then_diff() {
        let a = vec![vec![Cell::default(); 3]; 2];
        let mut b = a.clone();
        b[1][2].upper = Color::WHITE;

        assert!(matches!(Renderer::frame(None, &a), Frame::Full { .. }));
        match Renderer::frame(Some(a.as_slice()), &b) {
            Frame::Diff { changes } => {
                assert_eq!(changes.len(), 1);
                assert_eq!((changes[0].x, changes[0].y), (2, 1));
            }
            Frame::Full { .. } => panic!("expected diff"),
        }
        let smaller = vec![vec![Cell::default(); 2]; 2];
        assert!(matches!(Renderer::frame(Some(a.as_slice()), &smaller), Frame::Full { .. }));
    }
}
