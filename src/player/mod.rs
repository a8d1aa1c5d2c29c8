//! Player — the runtime frame loop.
//!
//! Drives the engine at a fixed tick rate and pushes each rendered frame to
//! the terminal. The player does not decide what is drawn; it schedules
//! ticks, polls the quit key, and writes cells.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use crossterm::{cursor, event, execute, queue, style, terminal};

use crate::config::{DemoConfig, matches_binding};
use crate::engine::Engine;
use crate::menubar::print_menu_item;
use crate::renderer::Renderer;
use crate::types::{Cell, Color, Frame};

/// Upper half block: foreground paints the top pixel, background the bottom.
const HALF_BLOCK: char = '\u{2580}';

/// Ticks the scheduler may fall behind before it drops them.
const MAX_LAG_TICKS: u32 = 5;

pub struct Player {
    engine: Engine,
    config: DemoConfig,
    grid: Option<Vec<Vec<Cell>>>,
}

impl Player {
    pub fn new(engine: Engine, config: DemoConfig) -> Self {
        Self {
            engine,
            config,
            grid: None,
        }
    }

    /// Terminal size needed for the canvas plus the status line.
    pub fn required_size(&self) -> (u16, u16) {
        let (w, h) = self.config.window_size();
        let cols = u16::try_from(w).unwrap_or(u16::MAX);
        let rows = u16::try_from(h.div_ceil(2) + 1).unwrap_or(u16::MAX);
        (cols, rows)
    }

    /// Run the demo in the terminal until the quit key is pressed.
    ///
    /// Sets up the terminal, enters the frame loop, and restores the terminal
    /// on exit (even on error).
    pub fn play(&mut self) -> Result<()> {
        let (term_w, term_h) = terminal::size()?;
        let (need_w, need_h) = self.required_size();
        if term_w < need_w || term_h < need_h {
            bail!(
                "Terminal too small: need {}x{}, have {}x{}",
                need_w,
                need_h,
                term_w,
                term_h,
            );
        }

        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;

        tracing::info!(fps = self.config.fps, scale = self.config.scale, "demo loop started");
        let result = self.run_loop(&mut stdout);
        tracing::info!(ticks = self.engine.tick(), "demo loop stopped");

        // Always restore terminal state.
        let _ = execute!(
            stdout,
            style::ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();

        result
    }

    // -----------------------------------------------------------------------
    // Frame loop
    // -----------------------------------------------------------------------

    fn run_loop(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let tick = Duration::from_secs_f64(1.0 / self.config.fps as f64);
        let mut deadline = Instant::now();

        self.present(stdout)?;

        loop {
            if self.poll_until(deadline)? {
                return Ok(());
            }

            deadline += tick;
            let now = Instant::now();
            if now > deadline + tick * MAX_LAG_TICKS {
                tracing::debug!("frame loop fell behind, resynchronising");
                deadline = now;
            }

            self.engine.update();
            self.present(stdout)?;
        }
    }

    /// Handle input until `deadline`. Returns true when quit was requested.
    fn poll_until(&mut self, deadline: Instant) -> Result<bool> {
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                return Ok(false);
            }
            match event::read()? {
                event::Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    if matches_binding(&self.config.key_bindings.quit, &key)
                        || matches_binding("Ctrl-c", &key)
                    {
                        return Ok(true);
                    }
                }
                event::Event::Resize(_, _) => {
                    // Force a full redraw on the next frame.
                    self.grid = None;
                }
                _ => {}
            }
            if timeout.is_zero() {
                return Ok(false);
            }
        }
    }

    // -----------------------------------------------------------------------
    // Terminal output
    // -----------------------------------------------------------------------

    fn present(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let frame = self.engine.compose();
        let image = Renderer::rasterize(&frame, self.engine.textures());
        let image = Renderer::upscale(&image, self.config.scale);
        let grid = Renderer::to_cells(&image, frame.clear);

        match Renderer::frame(self.grid.as_deref(), &grid) {
            Frame::Full { cells } => {
                queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
                render_full(stdout, &cells)?;
            }
            Frame::Diff { changes } => {
                for change in changes {
                    queue!(
                        stdout,
                        cursor::MoveTo(change.x, change.y),
                        style::PrintStyledContent(styled(&change.cell)),
                    )?;
                }
            }
        }
        self.grid = Some(grid);

        self.render_status(stdout)?;
        stdout.flush()?;
        Ok(())
    }

    fn render_status(&self, stdout: &mut io::Stdout) -> Result<()> {
        let (_, status_y) = self.required_size();
        let status_y = status_y - 1;
        let (_, term_h) = terminal::size()?;
        if status_y >= term_h {
            return Ok(()); // No room for status bar.
        }

        queue!(
            stdout,
            cursor::MoveTo(0, status_y),
            style::ResetColor,
            terminal::Clear(terminal::ClearType::CurrentLine),
            style::Print(" "),
        )?;
        print_menu_item(stdout, &format!("[{}] quit", self.config.key_bindings.quit))?;
        print_menu_item(stdout, &format!("  tick [{}]", self.engine.tick()))?;
        Ok(())
    }
}

fn render_full(stdout: &mut io::Stdout, cells: &[Vec<Cell>]) -> Result<()> {
    for (y, row) in cells.iter().enumerate() {
        queue!(stdout, cursor::MoveTo(0, y as u16))?;
        for cell in row {
            queue!(stdout, style::PrintStyledContent(styled(cell)))?;
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn styled(cell: &Cell) -> style::StyledContent<char> {
    let mut cs = style::ContentStyle::default();
    cs.foreground_color = Some(to_ct_color(cell.upper));
    cs.background_color = Some(to_ct_color(cell.lower));
    style::StyledContent::new(cs, HALF_BLOCK)
}

pub fn to_ct_color(c: Color) -> style::Color {
    style::Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}
