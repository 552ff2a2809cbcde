use std::{env, path::PathBuf};

use color_eyre::{Result, eyre::Context};
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;

const DEFAULT_EVENT_LOG_LEN: i64 = 5;

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
    #[serde(default)]
    pub config_dir: PathBuf,

    /// Capture mouse clicks (needed to click buttons and the clear glyph)
    #[serde(default = "enabled")]
    pub mouse: bool,
    /// Bracketed paste into search fields
    #[serde(default = "enabled")]
    pub paste: bool,
}

fn enabled() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: get_data_dir(),
            config_dir: get_config_dir(),
            mouse: true,
            paste: true,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct GalleryConfig {
    /// Story shown first; unknown ids fall back to the first story
    #[serde(default)]
    pub start_story: Option<String>,
    /// Number of observer events kept in the event log
    #[serde(default = "default_event_log_len")]
    pub event_log_len: usize,
}

fn default_event_log_len() -> usize {
    DEFAULT_EVENT_LOG_LEN as usize
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            start_story: None,
            event_log_len: default_event_log_len(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
}

impl Config {
    pub fn new(cli_source: Option<crate::cli::ClapSource>) -> Result<Self> {
        let data_dir = get_data_dir();
        let config_dir = get_config_dir();
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("config_dir", config_dir.to_string_lossy().to_string())?
            .set_default("mouse", true)?
            .set_default("paste", true)?
            .set_default("gallery.event_log_len", DEFAULT_EVENT_LOG_LEN)?;

        // config.toml, config.yaml, ... whichever exists
        builder = builder.add_source(config::File::from(config_dir.join("config")).required(false));

        // Add CLI source last (highest priority)
        if let Some(cli_source) = cli_source {
            builder = builder.add_source(cli_source);
        }

        let cfg: Self = builder
            .build()
            .context("Error building config")?
            .try_deserialize()
            .context("Error deserialize config")?;

        Ok(cfg)
    }
}

fn dir_from_env(suffix: &str) -> Option<PathBuf> {
    env::var(format!("{}_{suffix}", PROJECT_NAME.clone()))
        .ok()
        .map(PathBuf::from)
}

pub fn get_data_dir() -> PathBuf {
    if let Some(dir) = dir_from_env("DATA") {
        dir
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(dir) = dir_from_env("CONFIG") {
        dir
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "yyang", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use clap::Parser;
    use tempfile::tempdir;

    use crate::cli::{ClapSource, Cli};

    use super::*;

    fn env_key(suffix: &str) -> String {
        format!("{}_{suffix}", PROJECT_NAME.clone())
    }

    #[test]
    fn defaults() {
        let empty = tempdir().unwrap();
        temp_env::with_vars(
            [(env_key("CONFIG").as_str(), empty.path().to_str())],
            || {
                let config = Config::new(None).unwrap();
                assert!(config.config.mouse);
                assert!(config.config.paste);
                assert_eq!(config.gallery.event_log_len, 5);
                assert_eq!(config.gallery.start_story, None);
                assert_eq!(config.config.config_dir, empty.path());
            },
        );
    }

    #[test]
    fn data_dir_from_env() {
        let temp_data = tempdir().unwrap();

        temp_env::with_vars(
            [(env_key("DATA").as_str(), temp_data.path().to_str())],
            || {
                let config = Config::new(None).unwrap();
                assert_eq!(config.config.data_dir, temp_data.path());
            },
        );
    }

    #[test]
    fn data_dir_from_cli() {
        let args = Cli::parse_from(["test-config", "--data-dir", ".cli-data"]);
        let config = Config::new(Some(ClapSource::new(&args))).expect("Failed to load config");

        assert_eq!(config.config.data_dir, PathBuf::from(".cli-data"));
    }

    #[test]
    fn story_and_mouse_from_cli() {
        let args = Cli::parse_from(["test-config", "--story", "search-active", "--no-mouse"]);
        let config = Config::new(Some(ClapSource::new(&args))).expect("Failed to load config");

        assert_eq!(config.gallery.start_story.as_deref(), Some("search-active"));
        assert!(!config.config.mouse);

        let args = Cli::parse_from(["test-config"]);
        let config = Config::new(Some(ClapSource::new(&args))).expect("Failed to load config");
        assert!(config.config.mouse);
    }

    #[test]
    fn config_file_then_cli() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "paste = false\n\n[gallery]\nevent_log_len = 3\nstart_story = \"search-default\"\n",
        )
        .unwrap();

        temp_env::with_vars(
            [(env_key("CONFIG").as_str(), dir.path().to_str())],
            || {
                let config = Config::new(None).unwrap();
                assert!(!config.config.paste);
                assert_eq!(config.gallery.event_log_len, 3);
                assert_eq!(config.gallery.start_story.as_deref(), Some("search-default"));

                let args = Cli::parse_from(["test-config", "--story", "button-text-ai"]);
                let config = Config::new(Some(ClapSource::new(&args))).unwrap();
                assert_eq!(config.gallery.start_story.as_deref(), Some("button-text-ai"));
                assert_eq!(config.gallery.event_log_len, 3);
            },
        );
    }
}
