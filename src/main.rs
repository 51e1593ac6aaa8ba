mod config;
mod host_list;
mod idrac;
mod query_engine;
mod script_server;

use anyhow::Result;
use clap::Parser;
use config::{Config, DEFAULT_CONFIG_FILE};
use host_list::CsvHostFile;
use query_engine::Snmp2Connector;
use tokio::io::{stdin, stdout, BufReader};
use tracing_subscriber::EnvFilter;

/// Print Dell iDRAC health statuses as `name:value` pairs for a poller.
#[derive(Parser, Debug)]
#[command(name = "idrac_status", version)]
struct Cli {
    /// Host id in the host list; missing or non-numeric prints all zeros
    host_id: Option<String>,
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: String,
    /// Read one host id per line from stdin and answer each
    #[arg(long, conflicts_with = "host_id")]
    script_server: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;
    init_tracing(&config.log_level);

    let store = CsvHostFile {
        filename: config.hosts_file.clone(),
    };

    if cli.script_server {
        return script_server::serve(BufReader::new(stdin()), stdout(), &store, &Snmp2Connector)
            .await;
    }

    let status = idrac::idrac_status(cli.host_id.as_deref(), &store, &Snmp2Connector).await?;
    print!("{status}");

    Ok(())
}

// stdout carries the result line, so logs go to stderr
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
