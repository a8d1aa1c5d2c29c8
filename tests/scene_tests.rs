use amiga_scroller::{
    config::DemoConfig,
    engine::{Engine, atlas, font},
    renderer::Renderer,
    texture::Texture,
    types::Color,
};

fn render(engine: &Engine) -> Texture {
    Renderer::rasterize(&engine.compose(), engine.textures())
}

#[test]
fn first_frame_shows_drifted_checkerboard_and_floor() -> anyhow::Result<()> {
    let engine = Engine::new(&DemoConfig::default())?;
    let image = render(&engine);
    assert_eq!((image.width, image.height), (320, 200));

    // The tile sheet starts 32px up, so the top row shows tile row 2.
    assert_eq!(image.get(0, 0), Color::BLACK);
    assert_eq!(image.get(16, 0), Color::DARK_GREEN);

    // Floor gradient row 64 of 165.
    assert_eq!(image.get(0, 199), Color::rgb(0, 38, 0));
    Ok(())
}

#[test]
fn copper_bars_paint_over_the_backdrop() -> anyhow::Result<()> {
    let engine = Engine::new(&DemoConfig::default())?;
    let image = render(&engine);
    let config = DemoConfig::default();
    let up = Texture::double_gradient(
        config.palette.copper_up_top,
        config.palette.copper_up_bottom,
        320,
        5,
    );
    let down = Texture::double_gradient(
        config.palette.copper_down_top,
        config.palette.copper_down_bottom,
        320,
        5,
    );
    for row in 0..5 {
        assert_eq!(image.get(300, 60 + row), up.get(0, row));
        assert_eq!(image.get(300, 132 + row), down.get(0, row));
    }
    Ok(())
}

#[test]
fn message_scrolls_into_view() -> anyhow::Result<()> {
    let mut engine = Engine::new(&DemoConfig::default())?;
    let has_white = |image: &Texture| image.pixels.iter().any(|&c| c == Color::WHITE);

    assert!(!has_white(&render(&engine)));
    engine.advance(200);
    assert!(has_white(&render(&engine)));
    Ok(())
}

#[test]
fn scroll_cycle_has_fixed_length() -> anyhow::Result<()> {
    let config = DemoConfig {
        message: "Copper".into(),
        ..DemoConfig::default()
    };
    let mut engine = Engine::new(&config)?;
    let start = engine.scroll_offset();
    // 352 down to -192 inclusive, then the wrap.
    let period = (start + 32 * 6 + 1) as u64;
    engine.advance(period - 1);
    assert_eq!(engine.scroll_offset(), -192);
    engine.update();
    assert_eq!(engine.scroll_offset(), start);
    engine.advance(period);
    assert_eq!(engine.scroll_offset(), start);
    Ok(())
}

#[test]
fn frames_are_deterministic() -> anyhow::Result<()> {
    let config = DemoConfig::default();
    let mut a = Engine::new(&config)?;
    let mut b = Engine::new(&config)?;
    a.advance(123);
    for _ in 0..123 {
        b.update();
    }
    assert_eq!(render(&a), render(&b));
    Ok(())
}

#[test]
fn loaded_font_sheet_matches_built_in() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("font.png");
    font::build_sheet(32, 25).save_png(&path)?;

    let mut config = DemoConfig::default();
    let mut built_in = Engine::new(&config)?;
    config.font.path = Some(path);
    let mut loaded = Engine::new(&config)?;

    built_in.advance(250);
    loaded.advance(250);
    assert_eq!(render(&built_in), render(&loaded));
    assert_eq!(loaded.atlas().cell_count(), atlas::REQUIRED_CELLS);
    Ok(())
}

#[test]
fn undersized_font_sheet_is_rejected() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tiny.png");
    Texture::filled(64, 25, Color::WHITE).save_png(&path)?;

    let config = DemoConfig {
        font: amiga_scroller::config::FontConfig {
            path: Some(path),
            cell_count: 0,
            ..Default::default()
        },
        ..DemoConfig::default()
    };
    assert!(Engine::new(&config).is_err());
    Ok(())
}

#[test]
fn presentation_scales_and_packs_cells() -> anyhow::Result<()> {
    let config = DemoConfig {
        scale: 2,
        ..DemoConfig::default()
    };
    let engine = Engine::new(&config)?;
    let image = Renderer::upscale(&render(&engine), config.scale);
    assert_eq!((image.width, image.height), config.window_size());

    let cells = Renderer::to_cells(&image, Color::BLACK);
    assert_eq!(cells.len(), 200);
    assert!(cells.iter().all(|row| row.len() == 640));
    Ok(())
}
