//! pricetape CLI - keeps a local cryptocurrency price history file current.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use pricetape_fetch::ClientConfig;
use std::path::PathBuf;
use std::time::Duration;

mod commands;
mod display;

use display::SourceArg;

#[derive(Parser)]
#[command(name = "pricetape")]
#[command(about = "Maintain a local cryptocurrency price history file", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Quiet mode (suppress progress output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch observations newer than the last persisted point and merge them in
    Update {
        #[command(flatten)]
        fetch: FetchArgs,
    },

    /// Rebuild full history by paginating backward from now
    Backfill {
        #[command(flatten)]
        fetch: FetchArgs,

        /// Skip confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show stats of the persisted series (no network access)
    Info {
        /// Series file path
        #[arg(short, long, default_value = "price_data.json")]
        output: PathBuf,
    },
}

/// Options shared by the fetching subcommands.
#[derive(clap::Args)]
struct FetchArgs {
    /// Upstream market-data API
    #[arg(short, long, value_enum, default_value = "coingecko")]
    source: SourceArg,

    /// Asset identifier in the source's namespace (coin id, asset slug, or
    /// trading pair)
    #[arg(short, long, default_value = "bittensor")]
    asset: String,

    /// Quote currency
    #[arg(long, default_value = "usd")]
    vs_currency: String,

    /// Series file path
    #[arg(short, long, default_value = "price_data.json")]
    output: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Pause between backfill pages in milliseconds
    #[arg(long, default_value = "2000")]
    pause: u64,

    /// Maximum number of backfill pages per run
    #[arg(long, default_value = "120")]
    max_pages: u32,

    /// Hidden: override the source API endpoint (tests only)
    #[arg(long, hide = true)]
    base_url: Option<String>,
}

impl FetchArgs {
    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.timeout),
            pause: Duration::from_millis(self.pause),
            max_pages: self.max_pages,
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Update { fetch } => commands::update::update(&fetch, cli.quiet).await,
        Commands::Backfill { fetch, yes } => {
            commands::backfill::backfill(&fetch, yes, cli.quiet).await
        }
        Commands::Info { output } => commands::info::show_info(&output),
    }
}
