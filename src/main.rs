mod api;
mod app;
mod application;
mod config;
mod domain;
mod host;
mod logging;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use iced::window;

use crate::api::ServerClient;
use crate::application::{DispatchOutcome, DownloadTrigger, SettingsPanel};
use crate::config::AppConfig;
use crate::host::{
    ClickTarget, ContextKind, JsonFileStorage, MenuClick, MenuRegistry, PageContext,
    RfdNotifier, SettingsStorage,
};

#[derive(Parser)]
#[command(name = "video-to-server")]
#[command(about = "Send videos to a local download server")]
struct Cli {
    /// Config file to use instead of ~/.config/video-to-server/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the settings window (default)
    Settings,
    /// Register the context-menu entries and list them
    Menus {
        /// Only list entries shown on this page
        #[arg(long)]
        page_url: Option<String>,
        /// URL of the clicked element
        #[arg(long)]
        src_url: Option<String>,
        #[arg(long, value_enum, default_value = "video")]
        context: ContextKind,
    },
    /// Dispatch a menu click and wait for the server
    Click {
        /// Menu entry id, e.g. youtubeDownloadMenu or generalDownloadMenu
        #[arg(long)]
        menu: String,
        #[arg(long)]
        page_url: String,
        #[arg(long)]
        src_url: Option<String>,
    },
    /// Print the quality the next request would use
    Quality,
}

fn main() -> Result<()> {
    if logging::init_logging().is_err() {
        logging::init_logging_stderr();
    }

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config::load_or_init_at(path)?,
        None => config::load_or_init()?,
    };

    let store = JsonFileStorage::new(config.settings_file()?);
    tracing::debug!(settings = %store.path().display(), "using settings store");
    let storage: Arc<dyn SettingsStorage> = Arc::new(store);

    let command = match cli.command.unwrap_or(Command::Settings) {
        Command::Settings => return run_settings_window(config, storage),
        Command::Menus {
            page_url,
            src_url,
            context,
        } => {
            let trigger = DownloadTrigger::new(storage, ServerClient::new(config.server));
            return list_menus(&trigger, page_url, src_url, context);
        }
        Command::Click {
            menu,
            page_url,
            src_url,
        } => HeadlessCommand::Click {
            click: MenuClick {
                menu_item_id: menu,
                src_url,
            },
            page: PageContext { url: page_url },
        },
        Command::Quality => HeadlessCommand::Quality,
    };

    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    runtime.block_on(run_headless(command, config, storage))
}

/// Commands that talk to the store or the server and need an async runtime.
enum HeadlessCommand {
    Click { click: MenuClick, page: PageContext },
    Quality,
}

fn run_settings_window(config: AppConfig, storage: Arc<dyn SettingsStorage>) -> Result<()> {
    let panel = SettingsPanel::new(storage, Arc::new(RfdNotifier::new("Video to Server")));
    let qualities = config.settings.qualities;

    iced::application(
        move || app::SettingsApp::boot(panel.clone(), qualities.clone()),
        app::update,
        app::view,
    )
    .title("Video to Server")
    .window(window::Settings {
        size: iced::Size::new(380.0, 320.0),
        ..Default::default()
    })
    .run()
    .map_err(|e| anyhow::anyhow!("settings window failed: {e}"))
}

fn list_menus(
    trigger: &DownloadTrigger,
    page_url: Option<String>,
    src_url: Option<String>,
    context: ContextKind,
) -> Result<()> {
    let mut registry = MenuRegistry::new();
    trigger.register_menus(&mut registry)?;

    let entries = match page_url {
        Some(page_url) => registry.visible_for(&ClickTarget {
            page_url,
            context,
            src_url,
        }),
        None => registry.entries().collect(),
    };
    for entry in entries {
        println!("{}\t{}", entry.id, entry.title);
    }
    Ok(())
}

async fn run_headless(
    command: HeadlessCommand,
    config: AppConfig,
    storage: Arc<dyn SettingsStorage>,
) -> Result<()> {
    let trigger = DownloadTrigger::new(storage, ServerClient::new(config.server));

    match command {
        HeadlessCommand::Click { click, page } => {
            match trigger.on_menu_click(&click, &page).await? {
                DispatchOutcome::Sent(reply) => println!("Request was sent: {reply}"),
                DispatchOutcome::Failed(e) => bail!("request failed ({}): {e}", e.kind()),
                DispatchOutcome::Ignored => println!("Nothing to download for this click"),
            }
        }
        HeadlessCommand::Quality => println!("{}", trigger.resolve_quality().await?),
    }

    Ok(())
}
