//! Example: query a Source server from the command line
//!
//! Prints server info, players and rules as JSON.
//!
//! Run with: `cargo run --example query -- 127.0.0.1:27015 --players --rules`

#![allow(clippy::uninlined_format_args)]

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use source_query::utils::logging::init_logging;
use source_query::{QueryConfig, QueryError, ServerQuery};

#[derive(Parser, Debug)]
#[command(name = "query", about = "Query a Source engine game server")]
struct Args {
    /// Server address: host:port, host,port or steam://connect/host:port
    address: String,

    /// Also list connected players
    #[arg(long)]
    players: bool,

    /// Also list server rules
    #[arg(long)]
    rules: bool,

    /// Receive timeout in milliseconds
    #[arg(long, default_value_t = 3000)]
    timeout_ms: u64,

    /// Optional TOML config file; command line flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => QueryConfig::from_file(path)?,
        None => QueryConfig::default(),
    };
    config.client.receive_timeout = Duration::from_millis(args.timeout_ms);
    config.logging.json_format = args.json_logs;
    config.validate_strict()?;
    init_logging(&config.logging)?;

    let mut query = ServerQuery::connect(&args.address, &config).await?;

    let info = query.info().await?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    println!("latency: {:?}", info.latency);

    if args.players {
        let players = query.players().await?;
        println!("{}", serde_json::to_string_pretty(&players)?);
    }

    if args.rules {
        // many games disable rules; report it instead of failing the run
        match query.rules().await {
            Ok(rules) => println!("{}", serde_json::to_string_pretty(&rules)?),
            Err(QueryError::Timeout | QueryError::EmptyResponse) => {
                eprintln!("server did not return rules")
            }
            Err(e) => return Err(e.into()),
        }
    }

    query.close();
    source_query::utils::global_metrics().log_metrics();
    Ok(())
}
