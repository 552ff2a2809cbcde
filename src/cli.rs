use clap::{Parser, Subcommand};
use color_eyre::Result;
use config::Source;

use crate::config::{get_config_dir, get_data_dir};

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 60.0)]
    pub frame_rate: f64,

    /// Path to the data directory
    #[arg(short, long, value_name = "PATH")]
    pub data_dir: Option<String>,

    /// Story to open first
    #[arg(short, long, value_name = "ID")]
    pub story: Option<String>,

    /// Do not capture the mouse
    #[arg(long)]
    pub no_mouse: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every story id
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Render one story without a terminal and print it
    Snapshot {
        /// Story id, see `list`
        story: String,
        #[arg(long, default_value_t = 60)]
        width: u16,
        #[arg(long, default_value_t = 6)]
        height: u16,
        /// Focus the first focusable element before rendering
        #[arg(long)]
        focus: bool,
    },
}

const VERSION_MESSAGE: &str = concat!(env!("CARGO_PKG_VERSION"));

pub fn version() -> String {
    let author = clap::crate_authors!();

    let data_dir_path = get_data_dir().display().to_string();
    let config_dir_path = get_config_dir().display().to_string();

    format!(
        "\
{VERSION_MESSAGE}

Authors: {author}

Config directory: {config_dir_path}
Data directory: {data_dir_path}"
    )
}

/// Command line overrides, fed to the config builder as its last source
#[derive(Debug, Clone)]
pub(crate) struct ClapSource {
    pub data_dir: Option<String>,
    pub story: Option<String>,
    pub no_mouse: bool,
}

impl ClapSource {
    pub fn new(cli: &Cli) -> Self {
        Self {
            data_dir: cli.data_dir.clone(),
            story: cli.story.clone(),
            no_mouse: cli.no_mouse,
        }
    }
}

impl Source for ClapSource {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        let mut map = config::Map::new();
        if let Some(data_dir) = &self.data_dir {
            map.insert(
                "data_dir".to_string(),
                config::Value::new(None, data_dir.clone()),
            );
        }
        if let Some(story) = &self.story {
            map.insert(
                "gallery.start_story".to_string(),
                config::Value::new(None, story.clone()),
            );
        }
        // only an explicit flag overrides the config file
        if self.no_mouse {
            map.insert("mouse".to_string(), config::Value::new(None, false));
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_defaults() {
        let cli = Cli::parse_from(["design_kit", "snapshot", "search-default"]);
        let Some(Commands::Snapshot {
            story,
            width,
            height,
            focus,
        }) = cli.command
        else {
            panic!("expected snapshot command");
        };
        assert_eq!(story, "search-default");
        assert_eq!((width, height), (60, 6));
        assert!(!focus);
    }

    #[test]
    fn collect_only_set_values() {
        let cli = Cli::parse_from(["design_kit"]);
        assert!(ClapSource::new(&cli).collect().unwrap().is_empty());

        let cli = Cli::parse_from(["design_kit", "-s", "button-text-ai", "--no-mouse", "list"]);
        let map = ClapSource::new(&cli).collect().unwrap();
        assert_eq!(map.len(), 2);
        assert!(matches!(cli.command, Some(Commands::List { json: false })));
    }
}
