//! CLI argument parsing and dispatch.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docgenie_core::config;
use docgenie_core::export::ExportFormat;

#[derive(Parser)]
#[command(name = "docgenie")]
#[command(version, about = "Convert documents to markdown and chat about them")]
struct Cli {
    /// Server base URL (overrides config)
    #[arg(long, global = true, env = "DOCGENIE_SERVER_URL")]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List converted sessions, newest first
    Sessions {
        /// Only show sessions whose filename contains this text
        #[arg(long, short)]
        filter: Option<String>,
    },

    /// Print a session's outline, markdown and chat transcript
    Show {
        /// Session ID
        id: String,
    },

    /// Upload documents for conversion and load the resulting session
    Upload {
        /// Files to convert (pdf, docx, pptx, html, htm, png, jpg, jpeg)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Run OCR on scanned pages and images
        #[arg(long)]
        ocr: bool,

        /// Skip table extraction
        #[arg(long)]
        no_tables: bool,
    },

    /// Ask a question about a session (or the server's default context)
    Chat {
        /// Session to ask about
        #[arg(long, short)]
        session: Option<String>,

        /// The question
        query: String,
    },

    /// Delete a session
    Delete {
        /// Session ID
        id: String,
    },

    /// Export a session's document
    Export {
        /// Session ID
        id: String,

        /// Output format: markdown, json or html
        #[arg(long, short, default_value = "markdown")]
        format: ExportFormat,

        /// Write to this path instead of stdout
        #[arg(long, short)]
        out: Option<PathBuf>,
    },

    /// Print the URL of a session's original file
    Open {
        /// Session ID
        id: String,

        /// Open the URL in the default browser
        #[arg(long)]
        launch: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the config file path
    Path,
    /// Create a default config file
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::Config::load().context("load config")?;
    if let Some(server) = cli.server.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        config.server.base_url = server.to_string();
    }

    // Held until exit so buffered log lines are flushed.
    let _log_guard = docgenie_core::logging::init(&config).context("init logging")?;
    tracing::debug!(server = %config.server.base_url, "starting");

    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli.command, &config).await })
}

async fn dispatch(command: Commands, config: &config::Config) -> Result<()> {
    match command {
        Commands::Sessions { filter } => commands::sessions::list(config, filter).await,
        Commands::Show { id } => commands::sessions::show(config, id).await,
        Commands::Upload {
            files,
            ocr,
            no_tables,
        } => commands::upload::run(config, &files, ocr, no_tables).await,
        Commands::Chat { session, query } => commands::chat::run(config, session, query).await,
        Commands::Delete { id } => commands::sessions::delete(config, id).await,
        Commands::Export { id, format, out } => {
            commands::export::run(config, &id, format, out.as_deref()).await
        }
        Commands::Open { id, launch } => commands::open::run(config, &id, launch).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
