//! NOC link monitor.
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────┐
//!   │                         noc-monitor                          │
//!   │                                                              │
//!   │  interval ──▶ ┌────────┐   result   ┌─────────┐   event       │
//!   │     tick      │ probe  │──────────▶│ tracker │──────────┐    │
//!   │               │icmp/tcp│  classify  │debounce │          ▼    │
//!   │               └────────┘            └─────────┘   ┌──────────┐│
//!   │                                                   │   sink   ││
//!   │  SIGINT/SIGTERM ──▶ shutdown ──▶ stop loop        │ log+tty  ││
//!   │                                                   └──────────┘│
//!   └──────────────────────────────────────────────────────────────┘
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use noc_monitor::lifecycle::{signals, startup, Shutdown};
use noc_monitor::observability::logging;
use noc_monitor::sink::read_history;

const DEFAULT_CONFIG: &str = "noc-monitor.toml";

#[derive(Parser)]
#[command(name = "noc-monitor")]
#[command(about = "Monitor core, aggregation and backhaul link reachability", long_about = None)]
struct Cli {
    /// Configuration file (default: noc-monitor.toml if present, else built-in defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start monitoring (default)
    Run,
    /// Validate the configuration and exit
    Validate,
    /// Print the event history recorded in the log file
    History,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = startup::resolve_config(cli.config.as_deref(), Path::new(DEFAULT_CONFIG))?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Validate => {
            println!(
                "configuration OK: {} link(s), interval {}s, threshold {}, timeout {}s",
                config.links.len(),
                config.interval_secs,
                config.threshold,
                config.timeout_secs
            );
            Ok(())
        }
        Commands::History => {
            for record in read_history(&config.log_file)? {
                println!("{} {} {}", record.time, record.link, record.status);
            }
            Ok(())
        }
        Commands::Run => {
            logging::init_logging(&config.observability);
            tracing::info!("noc-monitor v{} starting", env!("CARGO_PKG_VERSION"));

            let mut runner = startup::build_runner(&config)?;
            println!("Telecom NOC Monitoring Started\n");

            let shutdown = Shutdown::new();
            let rx = shutdown.subscribe();
            signals::spawn_signal_handler(shutdown);

            runner.run(rx).await;

            tracing::info!("Shutdown complete");
            Ok(())
        }
    }
}
