use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use amiga_scroller::{
    config::DemoConfig, engine::Engine, player::Player, renderer::Renderer,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

const PLAY_USAGE: &str = "amiga-scroller [play] [--config <config.json>]";
const SNAPSHOT_USAGE: &str = "amiga-scroller snapshot <tick> <output.png> [--config <config.json>]";
const CONFIG_USAGE: &str = "amiga-scroller config [--config <config.json>]";

fn run() -> Result<()> {
    let (config_path, args) = split_config_flag(std::env::args().skip(1))?;
    let config = match &config_path {
        Some(path) => DemoConfig::from_file(path)?,
        None => DemoConfig::load(),
    };

    let mut args = args.into_iter();
    let command = args.next();
    match command.as_deref() {
        None | Some("play") => play(config),
        Some("snapshot") => {
            let tick = args
                .next()
                .context(SNAPSHOT_USAGE)?
                .parse::<u64>()
                .context("tick must be a non-negative integer")?;
            let output = args.next().context(SNAPSHOT_USAGE)?;
            snapshot(&config, tick, Path::new(&output))
        }
        Some("config") => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        _ => bail!(
            "Amiga scroller — copper bars and a sine scroller in your terminal\n\nUsage:\n  {PLAY_USAGE}\n  {SNAPSHOT_USAGE}\n  {CONFIG_USAGE}"
        ),
    }
}

/// Pull `--config <path>` out of the argument list, wherever it appears.
fn split_config_flag(args: impl Iterator<Item = String>) -> Result<(Option<PathBuf>, Vec<String>)> {
    let mut config = None;
    let mut rest = Vec::new();
    let mut args = args;
    while let Some(arg) = args.next() {
        if arg == "--config" {
            let path = args.next().context("--config needs a path")?;
            config = Some(PathBuf::from(path));
        } else {
            rest.push(arg);
        }
    }
    Ok((config, rest))
}

fn play(config: DemoConfig) -> Result<()> {
    let engine = Engine::new(&config)?;
    let mut player = Player::new(engine, config);
    player.play()
}

fn snapshot(config: &DemoConfig, tick: u64, output: &Path) -> Result<()> {
    let mut engine = Engine::new(config)?;
    engine.advance(tick);

    let frame = engine.compose();
    let image = Renderer::rasterize(&frame, engine.textures());
    let image = Renderer::upscale(&image, config.scale);
    image.save_png(output)?;

    eprintln!(
        "Rendered tick {} at {}x{} -> {}",
        tick,
        image.width,
        image.height,
        output.display(),
    );

    Ok(())
}
