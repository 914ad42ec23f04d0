use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;

mod browser;
mod builder;
mod client;
mod config;
mod controller;
mod logger;
mod selection;
mod server;
mod theme;
mod ui;

use builder::ActionRequest;
use client::HttpService;
use config::Config;
use controller::Controller;
use logger::{FileLog, LogSink};
use selection::{GivenText, SelectionSource, SystemSelection};

#[derive(Parser)]
#[command(name = "hazmel", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the URL builder service.
    Serve {
        #[arg(long)]
        addr: Option<String>,
    },
    /// Open the action window for the current selection.
    Gui {
        /// Use this text instead of the desktop selection.
        #[arg(long)]
        text: Option<String>,
    },
    /// Print the URL for one action without starting anything.
    Url {
        #[arg(long)]
        action: String,
        #[arg(long)]
        text: String,
        #[arg(long)]
        template: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
    /// List the AI models.
    Models,
    /// Print the effective configuration.
    Config {
        /// Also write it to config.json next to the executable.
        #[arg(long)]
        save: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = Config::load();

    match cli.command.unwrap_or(Command::Gui { text: None }) {
        Command::Serve { addr } => {
            let file_log = FileLog::open(cfg.log_path("hazmel-api.log"), "Hazmel API");
            eprintln!("Logging to {}", file_log.path().display());
            let log: Arc<dyn LogSink> = Arc::new(file_log);
            let addr = addr.unwrap_or_else(|| cfg.bind_addr.clone());
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(server::serve(&addr, log))?;
        }
        Command::Gui { text } => {
            let log: Arc<dyn LogSink> = Arc::new(FileLog::open(cfg.log_path("hazmel-gui.log"), "Hazmel GUI"));
            log.info("App starting");
            let selection: Box<dyn SelectionSource> = match text {
                Some(text) => Box::new(GivenText(text)),
                None => Box::new(SystemSelection),
            };
            let service = HttpService::new(&cfg.api_url, Duration::from_secs(cfg.request_timeout_secs))?;
            let controller = Controller::new(
                selection,
                Box::new(service),
                browser::from_config(&cfg),
                Arc::clone(&log),
            );
            ui::run(&cfg, controller, log)?;
        }
        Command::Url {
            action,
            text,
            template,
            model,
        } => {
            let request = ActionRequest::parse(&action, &text, template.as_deref(), model.as_deref())?;
            println!("{}", builder::build_url(&request));
        }
        Command::Models => {
            for model in builder::list_models() {
                println!("{}", model);
            }
        }
        Command::Config { save } => {
            println!("{}", serde_json::to_string_pretty(&cfg)?);
            if save {
                cfg.save()?;
                eprintln!("Saved {}", Config::path().display());
            }
        }
    }
    Ok(())
}
