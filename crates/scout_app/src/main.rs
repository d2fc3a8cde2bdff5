mod platform;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use engine_logging::engine_info;
use scout_core::Msg;
use scout_engine::EngineHandle;

use platform::app::{run_interactive, run_search, App};
use platform::config::{load_config, Overrides};
use platform::effects::EffectRunner;
use platform::logging::{self, LogDestination};

#[derive(Parser, Debug)]
#[command(name = "channel-scout")]
#[command(about = "Search YouTube channels through a scraping service and export them as CSV")]
struct Cli {
    /// RON config file (defaults to ./scout.ron when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the scraping service
    #[arg(long, global = true, env = "SCOUT_BASE_URL")]
    base_url: Option<String>,

    /// Status checks before a search times out
    #[arg(long, global = true)]
    attempts: Option<u32>,

    /// Pause between status checks, in milliseconds
    #[arg(long, global = true)]
    delay_ms: Option<u64>,

    /// Directory for the CSV export and saved session
    #[arg(long, global = true)]
    out_dir: Option<PathBuf>,

    /// Double embedded quotes in CSV fields
    #[arg(long, global = true)]
    escape_quotes: bool,

    /// Where log output goes
    #[arg(long, global = true, value_enum, default_value = "file")]
    log: LogDestination,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one search and print the results
    Search {
        /// Search text sent to the scraper
        query: String,

        /// Maximum number of channels to scrape
        #[arg(long, default_value = "10")]
        max: String,

        /// Write the results to youtube_channels.csv
        #[arg(long)]
        export: bool,

        /// Show details for the channel with this name
        #[arg(long)]
        select: Option<String>,
    },
    /// Read queries and commands from stdin
    Interactive {
        #[arg(long, default_value = "10")]
        max: String,
    },
    /// Print the last saved session
    Show,
    /// Export the last saved session as CSV
    Export,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::initialize(cli.log, engine_logging::default_level());

    let config = load_config(cli.config.as_deref())?.with_overrides(Overrides {
        base_url: cli.base_url,
        max_attempts: cli.attempts,
        poll_delay_ms: cli.delay_ms,
        output_dir: cli.out_dir,
        escape_quotes: cli.escape_quotes,
    });
    engine_info!(
        "Starting with base_url={} max_attempts={} delay_ms={}",
        config.base_url,
        config.max_attempts,
        config.poll_delay_ms
    );

    let engine = EngineHandle::new(config.engine_config()).context("failed to start engine")?;
    let runner = EffectRunner::new(
        engine,
        config.output_dir.clone(),
        config.export_options(),
    );
    let mut app = App::new(runner, config.output_dir.clone());
    let mut stdout = std::io::stdout();

    match cli.command {
        Command::Search {
            query,
            max,
            export,
            select,
        } => run_search(&mut app, query, max, select.as_deref(), export),
        Command::Interactive { max } => run_interactive(&mut app, max),
        Command::Show => {
            if !app.restore_session() {
                anyhow::bail!("no saved session in {}", config.output_dir.display());
            }
            app.render(&mut stdout)?;
            Ok(())
        }
        Command::Export => {
            if !app.restore_session() {
                anyhow::bail!("no saved session in {}", config.output_dir.display());
            }
            app.dispatch(Msg::ExportClicked);
            app.render(&mut stdout)?;
            Ok(())
        }
    }
}
