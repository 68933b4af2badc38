//! Render caption images and the overlay manifest.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use reelcap_caption_model::geometry::{AspectPlan, SafeAreaBounds};
use reelcap_caption_model::style::ActiveStyle;
use reelcap_caption_model::video::{FrameRate, SourceVideo};
use reelcap_caption_model::word::parse_words;
use reelcap_common::config::AppConfig;
use reelcap_common::ReelcapError;
use reelcap_layout_core::subtitles::{cues_for_groups, SubtitleFormat};
use reelcap_layout_core::CaptionAnomaly;
use reelcap_render_engine::{CaptionPipeline, CaptionRun, OverlayEntry, TrueTypeFont};
use serde::Serialize;

use super::load_caption_config;

pub const MANIFEST_FILE: &str = "overlays.json";

pub struct RenderArgs {
    pub words: PathBuf,
    pub width: i64,
    pub height: i64,
    pub duration: f64,
    pub font: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub frame_rate: Option<FrameRate>,
    pub avg_frame_rate: Option<FrameRate>,
    pub srt: bool,
    pub vtt: bool,
}

/// Overlay manifest written next to the caption images.
#[derive(Debug, Serialize)]
struct OverlayManifest<'a> {
    generated_at: DateTime<Utc>,
    source: &'a SourceVideo,
    font: &'a str,
    plan: &'a AspectPlan,
    style: &'a ActiveStyle,
    safe_area: &'a SafeAreaBounds,
    width_budget: u32,
    overlays: Vec<ManifestEntry>,
    anomalies: &'a [CaptionAnomaly],
}

#[derive(Debug, Serialize)]
struct ManifestEntry {
    file: String,
    #[serde(flatten)]
    overlay: OverlayEntry,
}

pub fn run(args: RenderArgs, app: &AppConfig) -> anyhow::Result<()> {
    if !(args.duration.is_finite() && args.duration > 0.0) {
        anyhow::bail!("Duration must be a positive number of seconds");
    }
    let (Ok(width), Ok(height)) = (u32::try_from(args.width), u32::try_from(args.height)) else {
        return Err(ReelcapError::invalid_dimensions(args.width, args.height).into());
    };

    let (config, config_path) = load_caption_config(args.config, app)?;
    if let Some(ref path) = config_path {
        println!("Using caption config {}", path.display());
    }

    let font_path = args
        .font
        .or_else(|| app.default_font.clone())
        .context("No font given: pass --font or set default_font in the app config")?;
    let font = TrueTypeFont::from_file(&font_path)?;

    let content = std::fs::read_to_string(&args.words)
        .with_context(|| format!("Failed to read {}", args.words.display()))?;
    let words = parse_words(&content)
        .with_context(|| format!("Failed to parse word timestamps in {}", args.words.display()))?;

    let mut source = SourceVideo::new(width, height, args.duration);
    source.frame_rate = args.frame_rate;
    source.avg_frame_rate = args.avg_frame_rate;

    let run = CaptionPipeline::new(config, &font).run(&source, &words)?;

    let output = args.output.unwrap_or_else(|| app.output_dir.clone());
    let mut subtitles = Vec::new();
    if args.srt {
        subtitles.push(SubtitleFormat::Srt);
    }
    if args.vtt {
        subtitles.push(SubtitleFormat::Vtt);
    }
    let written = write_run(&run, &source, &font_path.display().to_string(), &output, &subtitles)?;

    let (out_w, out_h) = run.output_size();
    println!("Rendered {} captions for {}x{}", run.images.len(), out_w, out_h);
    println!("  Groups: {}", run.groups.len());
    println!("  Font size: {}px", run.style.font_size);
    println!("  Width budget: {}px", run.width_budget);
    if !run.anomalies.is_empty() {
        println!("  Anomalies: {}", run.anomalies.len());
        for anomaly in &run.anomalies {
            println!("    - {anomaly}");
        }
    }
    println!();
    for path in &written {
        println!("  {}", path.display());
    }

    Ok(())
}

/// Write caption PNGs, the overlay manifest, and any subtitle files.
///
/// Returns the manifest and subtitle paths.
pub fn write_run(
    run: &CaptionRun,
    source: &SourceVideo,
    font: &str,
    output: &Path,
    subtitles: &[SubtitleFormat],
) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory {}", output.display()))?;

    let mut overlays = Vec::with_capacity(run.images.len());
    for caption in &run.images {
        let file = format!("caption_{:04}.png", caption.index);
        let path = output.join(&file);
        caption
            .image
            .save(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        overlays.push(ManifestEntry {
            file,
            overlay: caption.overlay(),
        });
    }
    tracing::info!(count = overlays.len(), dir = %output.display(), "Wrote caption images");

    let manifest = OverlayManifest {
        generated_at: Utc::now(),
        source,
        font,
        plan: &run.plan,
        style: &run.style,
        safe_area: &run.safe_area,
        width_budget: run.width_budget,
        overlays,
        anomalies: &run.anomalies,
    };
    let manifest_path = output.join(MANIFEST_FILE);
    std::fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    let mut written = vec![manifest_path];
    if !subtitles.is_empty() {
        let cues = cues_for_groups(&run.groups, source.duration_secs);
        for format in subtitles {
            let path = output.join(match format {
                SubtitleFormat::Srt => "captions.srt",
                SubtitleFormat::Vtt => "captions.vtt",
            });
            std::fs::write(&path, format.render(&cues))
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), cues = cues.len(), "Wrote subtitles");
            written.push(path);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcap_caption_model::config::CaptionConfig;
    use reelcap_caption_model::word::WordTimestamp;
    use reelcap_render_engine::BlockFont;

    #[test]
    fn test_write_run_outputs() {
        let dir = std::env::temp_dir().join("reelcap_cli_render_test");
        let _ = std::fs::remove_dir_all(&dir);

        let source = SourceVideo::new(1080, 1920, 3.0);
        let words = vec![
            WordTimestamp::new("hello", 0.0, 0.4),
            WordTimestamp::new("there", 0.45, 0.9),
            WordTimestamp::new("friend", 1.8, 2.4),
        ];
        let run = CaptionPipeline::new(CaptionConfig::default(), &BlockFont)
            .run(&source, &words)
            .unwrap();
        assert_eq!(run.images.len(), 2);

        let written = write_run(&run, &source, "block", &dir, &[SubtitleFormat::Srt]).unwrap();
        assert_eq!(written.len(), 2);
        assert!(dir.join("caption_0000.png").exists());
        assert!(dir.join("caption_0001.png").exists());

        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join(MANIFEST_FILE)).unwrap())
                .unwrap();
        assert_eq!(manifest["overlays"][0]["file"], "caption_0000.png");
        assert_eq!(manifest["overlays"][0]["text"], "HELLO THERE");
        assert_eq!(manifest["overlays"][1]["text"], "FRIEND");
        assert_eq!(manifest["font"], "block");
        assert!(manifest["anomalies"].as_array().unwrap().is_empty());

        let srt = std::fs::read_to_string(dir.join("captions.srt")).unwrap();
        assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:00,900\nHELLO THERE\n"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
