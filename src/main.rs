mod actions;
mod app;
mod cli;
mod component;
mod config;
mod page;
mod snapshot;
mod stories;
mod theme;
#[cfg(not(tarpaulin_include))]
mod tui;
mod utils;

use app::{App, RootState};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use dotenv::dotenv;
use tracing::info;

#[cfg(not(tarpaulin_include))]
async fn run() -> Result<()> {
    use cli::{ClapSource, Commands};

    let args = cli::Cli::parse();

    let config = crate::config::Config::new(Some(ClapSource::new(&args)))
        .context("Error when loading config")?;
    utils::logging::init(&config.config.data_dir)?;
    info!(
        config_dir = %config.config.config_dir.display(),
        data_dir = %config.config.data_dir.display(),
        "Starting {}",
        env!("CARGO_PKG_NAME")
    );

    match &args.command {
        Some(Commands::List { json }) => {
            let stories = stories::catalog();
            if *json {
                let listing: Vec<_> = stories.iter().map(|s| s.listing()).collect();
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                println!("{}", stories::format_listing(&stories));
            }
            Ok(())
        }
        Some(Commands::Snapshot {
            story,
            width,
            height,
            focus,
        }) => {
            let story = stories::find(story).ok_or_else(|| {
                eyre!("Unknown story `{story}`, run `list` to see every story id")
            })?;
            for line in snapshot::render_story(&story, *width, *height, *focus)? {
                println!("{line}");
            }
            Ok(())
        }
        None => {
            let tui = tui::Tui::new()?
                .tick_rate(args.tick_rate)
                .frame_rate(args.frame_rate)
                .mouse(config.config.mouse)
                .paste(config.config.paste);
            let mut app = App::new(RootState::new(config), tui.into())?;

            app.run().await?;
            Ok(())
        }
    }
}

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> Result<()> {
    dotenv().ok();
    utils::errors::init()?;

    run().await
}
