//! Engine — the scene composer.
//!
//! Owns the animation state (phase, scroll offset, copper bars) and turns it
//! into a `ResolvedFrame` of sprite draws, once per fixed tick.
//!
//! The engine understands time, animation and layering. It never touches
//! pixels or terminals: that is the renderer's and the player's job.

pub mod atlas;
pub mod copper;
pub mod font;

use anyhow::Result;

use crate::config::DemoConfig;
use crate::texture::Texture;
use crate::types::{Color, DrawOp, Rect, ResolvedFrame, TextureId};
use atlas::{Glyph, GlyphAtlas};
use copper::CopperBar;

/// Phase advance per tick, in radians.
pub const PHASE_STEP: f32 = 0.08;
/// Vertical bob of the scroller, in pixels.
pub const SINE_AMPLITUDE: f32 = 20.0;
/// Peak letter tilt, in degrees.
pub const ROTATION_AMPLITUDE: f32 = 20.0;
/// Horizontal advance removed around a narrow glyph.
pub const NARROW_TIGHTEN: i32 = 10;
/// Extra run-in past the right edge before the message re-enters.
pub const SCROLL_MARGIN: i32 = 32;
/// Distance from the text baseline to the mirrored copy.
pub const REFLECTION_DROP: f32 = 70.0;
/// The floor starts this far below the vertical centre.
pub const FLOOR_OFFSET: u32 = 35;
/// Checkerboard tile edge, in pixels.
pub const CHECKER_TILE: u32 = 16;
/// Radius of the background's circular drift.
pub const BACKGROUND_DRIFT: f32 = 32.0;
pub const COPPER_HEIGHT: u32 = 5;

const SHADOW_OFFSET: i32 = 8;
const SHADOW_OPACITY: f32 = 0.5;
const REFLECTION_OPACITY: f32 = 0.1;

const DEPTH_BACKDROP: f32 = 0.0;
const DEPTH_SHADOW: f32 = 0.1;
const DEPTH_TEXT: f32 = 0.5;
const DEPTH_COPPER_UP: f32 = 1.0;
const DEPTH_COPPER_DOWN: f32 = 0.0;

const FONT: TextureId = TextureId(0);
const CHECKER: TextureId = TextureId(1);
const FLOOR: TextureId = TextureId(2);
const COPPER_UP: TextureId = TextureId(3);
const COPPER_DOWN: TextureId = TextureId(4);

/// Vertical offset and rotation (radians) of the `index`-th character.
///
/// The rotation leads the bob by a quarter cycle, so letters tilt most while
/// crossing the baseline.
pub fn scroller_motion(theta: f32, index: usize) -> (f32, f32) {
    let phase = theta + index as f32;
    let sine = SINE_AMPLITUDE * phase.sin();
    let rotation = (ROTATION_AMPLITUDE * (std::f32::consts::FRAC_PI_2 + phase).sin()).to_radians();
    (sine, rotation)
}

/// One scroller character after layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPlacement {
    pub glyph: Glyph,
    /// Horizontal anchor of the main copy.
    pub x: i32,
    pub sine: f32,
    pub rotation: f32,
}

pub struct Engine {
    width: u32,
    height: u32,
    message: Vec<char>,
    atlas: GlyphAtlas,
    textures: Vec<Texture>,
    copper_up: CopperBar,
    copper_down: CopperBar,
    theta: f32,
    scroll_offset: i32,
    tick: u64,
}

impl Engine {
    /// Build the atlas and the procedural textures.
    pub fn new(config: &DemoConfig) -> Result<Self> {
        config.validate()?;
        let width = config.screen_width;
        let height = config.screen_height;
        let palette = &config.palette;

        let font_sheet = match &config.font.path {
            Some(path) => Texture::load_png(path)?,
            None => font::build_sheet(config.font.cell_width, config.font.cell_height),
        };
        let atlas = GlyphAtlas::new(
            FONT,
            &font_sheet,
            config.font.cell_width,
            config.font.cell_height,
            config.font.cell_count,
        )?;
        tracing::debug!(
            width = font_sheet.width,
            height = font_sheet.height,
            cells = atlas.cell_count(),
            "font sheet ready"
        );

        // Registry order must match the TextureId constants.
        let textures = vec![
            font_sheet,
            Texture::checkerboard(
                palette.checker_a,
                palette.checker_b,
                width * 2,
                height,
                CHECKER_TILE,
                CHECKER_TILE,
            ),
            Texture::gradient(
                palette.floor_top,
                palette.floor_bottom,
                width,
                height.saturating_sub(FLOOR_OFFSET),
            ),
            Texture::double_gradient(
                palette.copper_up_top,
                palette.copper_up_bottom,
                width,
                COPPER_HEIGHT,
            ),
            Texture::double_gradient(
                palette.copper_down_top,
                palette.copper_down_bottom,
                width,
                COPPER_HEIGHT,
            ),
        ];

        let centre_y = (height / 2) as i32;
        let (top, bottom) = (centre_y - 40, centre_y + 32);

        Ok(Engine {
            width,
            height,
            message: config.message.chars().collect(),
            atlas,
            textures,
            copper_up: CopperBar::new(top, bottom, top, 1),
            copper_down: CopperBar::new(bottom, bottom, top, -1),
            theta: 0.0,
            scroll_offset: Self::scroll_start_for(width),
            tick: 0,
        })
    }

    fn scroll_start_for(width: u32) -> i32 {
        width as i32 + SCROLL_MARGIN
    }

    /// Offset the message restarts from after leaving the screen.
    pub fn scroll_start(&self) -> i32 {
        Self::scroll_start_for(self.width)
    }

    /// Advance one fixed tick.
    pub fn update(&mut self) {
        self.copper_up.advance();
        self.copper_down.advance();

        self.theta += PHASE_STEP;

        self.scroll_offset -= 1;
        let run = self.atlas.cell_width() as i32 * self.message.len() as i32;
        if self.scroll_offset < -run {
            self.scroll_offset = self.scroll_start();
        }

        self.tick += 1;
    }

    /// Advance `ticks` fixed ticks.
    pub fn advance(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.update();
        }
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    pub fn copper_bars(&self) -> (&CopperBar, &CopperBar) {
        (&self.copper_up, &self.copper_down)
    }

    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    pub fn textures(&self) -> &[Texture] {
        &self.textures
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn centre_y(&self) -> f32 {
        (self.height / 2) as f32
    }

    /// Lay the message out for the current tick.
    ///
    /// A narrow glyph tightens the line twice: once right after its own
    /// lookup, and again before the next character. Both corrections apply to
    /// everything that follows, the first also to the narrow glyph itself.
    pub fn layout_scroller(&self) -> Vec<GlyphPlacement> {
        let advance = self.atlas.cell_width() as i32;
        let mut tighten = 0;
        let mut prev_narrow = false;

        self.message
            .iter()
            .enumerate()
            .map(|(i, &ch)| {
                if prev_narrow {
                    tighten += NARROW_TIGHTEN;
                }
                let (sine, rotation) = scroller_motion(self.theta, i);
                let glyph = self.atlas.lookup(ch);
                if glyph.narrow {
                    tighten += NARROW_TIGHTEN;
                }
                prev_narrow = glyph.narrow;

                GlyphPlacement {
                    glyph,
                    x: self.scroll_offset + advance * i as i32 - tighten,
                    sine,
                    rotation,
                }
            })
            .collect()
    }

    /// Emit the draw list for the current tick. The renderer orders it by depth.
    pub fn compose(&self) -> ResolvedFrame {
        let mut ops = Vec::new();

        self.draw_background(&mut ops);
        self.draw_floor(&mut ops);
        self.draw_scroller(&mut ops);
        self.copper_up.render(
            &mut ops,
            COPPER_UP,
            self.texture_size(COPPER_UP),
            DEPTH_COPPER_UP,
        );
        self.copper_down.render(
            &mut ops,
            COPPER_DOWN,
            self.texture_size(COPPER_DOWN),
            DEPTH_COPPER_DOWN,
        );

        ResolvedFrame {
            width: self.width,
            height: self.height,
            clear: Color::BLACK,
            ops,
        }
    }

    fn texture_size(&self, id: TextureId) -> (u32, u32) {
        let tex = &self.textures[id.0];
        (tex.width, tex.height)
    }

    fn draw_background(&self, ops: &mut Vec<DrawOp>) {
        let drift = self.theta * 0.6;
        let x = (BACKGROUND_DRIFT * drift.cos() - BACKGROUND_DRIFT) as i32;
        let y = (BACKGROUND_DRIFT * drift.sin() - BACKGROUND_DRIFT) as i32;
        let (w, h) = self.texture_size(CHECKER);
        ops.push(DrawOp::sprite(
            CHECKER,
            Rect::new(x, y, w as i32, h as i32),
            DEPTH_BACKDROP,
        ));
    }

    fn draw_floor(&self, ops: &mut Vec<DrawOp>) {
        let (w, h) = self.texture_size(FLOOR);
        let y = (self.height / 2 + FLOOR_OFFSET) as i32;
        ops.push(DrawOp::sprite(
            FLOOR,
            Rect::new(0, y, w as i32, h as i32),
            DEPTH_BACKDROP,
        ));
    }

    fn draw_scroller(&self, ops: &mut Vec<DrawOp>) {
        let centre_y = self.centre_y();
        let cell_w = self.atlas.cell_width() as i32;
        let cell_h = self.atlas.cell_height() as i32;
        let origin = self.atlas.origin();

        for placement in self.layout_scroller() {
            let glyph_op = |x: i32, y: i32, rotation: f32| DrawOp {
                texture: self.atlas.texture(),
                src: Some(placement.glyph.rect),
                dst: Rect::new(x, y, cell_w, cell_h),
                origin,
                rotation,
                flip_vertical: false,
                tint: Color::WHITE,
                opacity: 1.0,
                depth: DEPTH_TEXT,
            };

            ops.push(DrawOp {
                tint: Color::BLACK,
                opacity: SHADOW_OPACITY,
                depth: DEPTH_SHADOW,
                ..glyph_op(
                    placement.x - SHADOW_OFFSET,
                    (centre_y + placement.sine - SHADOW_OFFSET as f32) as i32,
                    placement.rotation,
                )
            });

            ops.push(glyph_op(
                placement.x,
                (centre_y + placement.sine) as i32,
                placement.rotation,
            ));

            ops.push(DrawOp {
                flip_vertical: true,
                opacity: REFLECTION_OPACITY,
                depth: DEPTH_SHADOW,
                ..glyph_op(
                    placement.x,
                    (REFLECTION_DROP + centre_y - placement.sine) as i32,
                    -placement.rotation,
                )
            });
        }
    }
}
