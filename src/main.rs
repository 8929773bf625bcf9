use clap::builder::RangedU64ValueParser;
use clap::Parser;
use log::{info, warn};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use pixelpoint::codec::{channels_for_path, load_image, save_image};
use pixelpoint::{
    block_size, resample_with_block_size, OutputMode, PixelBuffer, ResampleConfig,
    LARGE_THRESHOLD, SMALL_THRESHOLD,
};

mod demo;
mod input;
mod quad;
mod render;
mod terminal_setup;

use render::frame::run_app_loop;
use render::{AppResult, AppState, ImageInfo};
use terminal_setup::{cleanup_terminal, enter_terminal, install_panic_hook};

#[derive(Debug, Parser)]
#[command(name = "pixelpoint", version, about = "Pixel-art image viewer for the terminal")]
struct Cli {
    /// Image to pixelate (runs demo if omitted)
    input: Option<PathBuf>,
    #[arg(long, help = "Use the built-in demo image", conflicts_with = "input")]
    demo: bool,
    #[arg(
        short,
        long,
        value_name = "PATH",
        help = "Save the full-size pixelated image"
    )]
    output: Option<PathBuf>,
    #[arg(long, help = "Skip the terminal viewer")]
    no_view: bool,
    #[arg(
        long,
        value_name = "N",
        default_value_t = LARGE_THRESHOLD,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..),
        help = "Minimum long side of the reduced image"
    )]
    long_side: usize,
    #[arg(
        long,
        value_name = "N",
        default_value_t = SMALL_THRESHOLD,
        value_parser = RangedU64ValueParser::<usize>::new().range(1..),
        help = "Minimum short side of the reduced image"
    )]
    short_side: usize,
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u32).range(1..),
        help = "Force the block size instead of searching for one"
    )]
    block_size: Option<u32>,
}

fn load_source(cli: &Cli) -> AppResult<(PixelBuffer, String)> {
    match cli.input.as_ref() {
        Some(path) if !cli.demo => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok((load_image(path)?, name))
        }
        _ => Ok((demo::generate_demo_image()?, "demo".to_string())),
    }
}

fn save_pixelated(source: &PixelBuffer, block: usize, path: &Path) -> AppResult<()> {
    let channels = channels_for_path(path);
    let expanded = resample_with_block_size(&source.view(), block, channels, OutputMode::Expand)?;
    if expanded.is_empty() {
        warn!(
            "{}x{} source is too small for block size {block}; nothing saved",
            source.width(),
            source.height()
        );
        return Ok(());
    }
    save_image(&expanded, path)?;
    Ok(())
}

fn detect_truecolor() -> bool {
    match std::env::var("COLORTERM") {
        Ok(val) => !val.is_empty() && (val == "truecolor" || val == "24bit"),
        Err(_) => match std::env::var("TERM_PROGRAM") {
            Ok(prog) => prog != "Apple_Terminal",
            Err(_) => match std::env::var("TERM") {
                Ok(term) => {
                    term.contains("ghostty") || term.contains("kitty") || term.contains("wezterm")
                }
                Err(_) => false,
            },
        },
    }
}

fn run_viewer(app_state: &mut AppState) -> AppResult<()> {
    let mut stdout = BufWriter::with_capacity(1024 * 1024, io::stdout());
    enter_terminal(&mut stdout)?;
    let run_result = match input::spawn_input_thread() {
        Ok(input_rx) => run_app_loop(app_state, &input_rx, &mut stdout),
        Err(err) => Err(err.into()),
    };
    let cleanup_result = cleanup_terminal(&mut stdout);

    run_result?;
    cleanup_result
}

fn main() -> AppResult<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    install_panic_hook();
    let cli = Cli::parse();

    let (source, name) = load_source(&cli)?;
    let config = ResampleConfig {
        large_threshold: cli.long_side,
        small_threshold: cli.short_side,
        ..ResampleConfig::default()
    };
    let block = match cli.block_size {
        Some(forced) => forced as usize,
        None => block_size(source.width(), source.height(), &config),
    };
    info!(
        "{name}: {}x{} source, block size {block}",
        source.width(),
        source.height()
    );

    let reduced = resample_with_block_size(&source.view(), block, 3, OutputMode::Shrink)?;

    if let Some(path) = cli.output.as_deref() {
        save_pixelated(&source, block, path)?;
    }

    let info = ImageInfo {
        name,
        source_width: source.width(),
        source_height: source.height(),
        block_size: block,
    };
    drop(source);

    if reduced.is_empty() {
        warn!("reduced image is empty; nothing to display");
        return Ok(());
    }
    if cli.no_view {
        return Ok(());
    }

    let mut app_state = AppState::new(reduced, info, detect_truecolor());
    run_viewer(&mut app_state)
}
