//! Reelcap CLI: plan and render caption overlays for vertical video.
//!
//! Usage:
//!   reelcap plan --width W --height H       Show the aspect plan, scaled style, and safe band
//!   reelcap render --words FILE [OPTIONS]   Render caption PNGs and an overlay manifest
//!   reelcap config                          Print the effective caption configuration

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use reelcap_caption_model::video::FrameRate;
use reelcap_common::config::AppConfig;
use reelcap_common::logging::{init_logging, logging_for_verbosity};

mod commands;

#[derive(Parser)]
#[command(
    name = "reelcap",
    about = "Caption overlays for short-form vertical video",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show how a source of the given size would be captioned
    Plan {
        /// Source width in pixels
        #[arg(long)]
        width: i64,

        /// Source height in pixels
        #[arg(long)]
        height: i64,

        /// Caption configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render caption images for a word timestamp file
    Render {
        /// Word timestamps (JSON array of {word|text, start, end})
        #[arg(short, long)]
        words: PathBuf,

        /// Source width in pixels
        #[arg(long)]
        width: i64,

        /// Source height in pixels
        #[arg(long)]
        height: i64,

        /// Source duration (seconds)
        #[arg(long)]
        duration: f64,

        /// TrueType/OpenType font file
        #[arg(long)]
        font: Option<PathBuf>,

        /// Caption configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Nominal frame rate, e.g. 30 or 30000/1001
        #[arg(long)]
        frame_rate: Option<FrameRate>,

        /// Average frame rate reported by the prober
        #[arg(long)]
        avg_frame_rate: Option<FrameRate>,

        /// Also write captions.srt
        #[arg(long)]
        srt: bool,

        /// Also write captions.vtt
        #[arg(long)]
        vtt: bool,
    },

    /// Print the effective caption configuration
    Config {
        /// Caption configuration (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app = AppConfig::load();
    init_logging(&logging_for_verbosity(&app.logging, cli.verbose));

    match cli.command {
        Commands::Plan {
            width,
            height,
            config,
            json,
        } => commands::plan::run(width, height, config, json, &app)?,
        Commands::Render {
            words,
            width,
            height,
            duration,
            font,
            config,
            output,
            frame_rate,
            avg_frame_rate,
            srt,
            vtt,
        } => {
            commands::render::run(
                commands::render::RenderArgs {
                    words,
                    width,
                    height,
                    duration,
                    font,
                    config,
                    output,
                    frame_rate,
                    avg_frame_rate,
                    srt,
                    vtt,
                },
                &app,
            )?;
        }
        Commands::Config { config } => commands::config::run(config, &app)?,
    }

    Ok(())
}
