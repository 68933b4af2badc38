//! Print the effective caption configuration.

use std::path::PathBuf;

use reelcap_common::config::{config_file_path, AppConfig};

use super::load_caption_config;

pub fn run(config: Option<PathBuf>, app: &AppConfig) -> anyhow::Result<()> {
    let (config, path) = load_caption_config(config, app)?;

    eprintln!("App config: {}", config_file_path().display());
    match path {
        Some(path) => eprintln!("Caption config: {}", path.display()),
        None => eprintln!("Caption config: built-in defaults"),
    }

    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
