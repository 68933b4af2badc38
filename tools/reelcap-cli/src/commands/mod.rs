pub mod config;
pub mod plan;
pub mod render;

use std::path::{Path, PathBuf};

use reelcap_caption_model::config::CaptionConfig;
use reelcap_common::config::AppConfig;
use reelcap_common::ReelcapError;

/// Resolve the caption configuration for a command.
///
/// An explicit `--config` wins over the app config's default file; with
/// neither, built-in defaults apply. Returns the file that was used.
pub fn load_caption_config(
    explicit: Option<PathBuf>,
    app: &AppConfig,
) -> anyhow::Result<(CaptionConfig, Option<PathBuf>)> {
    let Some(path) = explicit.or_else(|| app.default_caption_config.clone()) else {
        return Ok((CaptionConfig::default(), None));
    };
    let config = read_caption_config(&path)?;
    Ok((config, Some(path)))
}

fn read_caption_config(path: &Path) -> anyhow::Result<CaptionConfig> {
    let config = CaptionConfig::from_json_file(path)
        .map_err(|e| ReelcapError::config(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), "Loaded caption config");
    Ok(config)
}
