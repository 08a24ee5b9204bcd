//! munro-api server - read-only HTTP API over the munro dataset

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use log::{error, info};
use munro_api::catalog::{load_dataset, MunroIndex};
use munro_api::config::ServiceConfig;
use munro_api::filter::FilterOptions;
use munro_api::network::Server;
use munro_api::pagination::FilterPolicy;
use munro_api::service::MunroService;
use munro_api::store::MemoryStore;
use std::path::PathBuf;
use std::sync::Arc;

/// munro-api - browse, filter and paginate Scottish munros over HTTP
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Host to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Dataset file: a JSON object mapping identifiers to records
    #[arg(short = 'D', long, default_value = "./data/munro_data.json")]
    data: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Maximum concurrent requests
    #[arg(short = 'c', long, default_value = "100")]
    max_connections: usize,

    /// Reject list requests that carry no filter parameter
    #[arg(long)]
    require_filter: bool,

    /// Reject filter clauses without a recognized operator instead of dropping them
    #[arg(long)]
    strict_filters: bool,

    /// Keep the fractional part of numeric filter literals
    #[arg(long)]
    fractional_literals: bool,
}

impl Args {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            filter_policy: if self.require_filter {
                FilterPolicy::Required
            } else {
                FilterPolicy::Optional
            },
            filter: FilterOptions {
                reject_unknown_operators: self.strict_filters,
                fractional_literals: self.fractional_literals,
            },
            max_connections: self.max_connections,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Loading dataset from {}", args.data.display());
    let records = load_dataset(&args.data)?;

    // The index is built once and never changes while serving
    let index = Arc::new(MunroIndex::from_names(records.keys().cloned()));
    let store = Arc::new(MemoryStore::seed(records));
    info!("Loaded {} munros", index.len());

    let config = args.service_config();
    let service = Arc::new(MunroService::new(index, store, config));
    let server = Server::new(service, config.max_connections);

    let addr = Some(std::net::SocketAddr::from((
        args.host
            .parse::<std::net::IpAddr>()
            .context("Invalid host address")?,
        args.port,
    )));

    info!("Server configuration:");
    info!("   - Host: {}", args.host);
    info!("   - Port: {}", args.port);
    info!("   - Max connections: {}", args.max_connections);
    info!("   - Filter policy: {:?}", config.filter_policy);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.run(addr).await {
            error!("Server error: {}", e);
        }
    });

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    info!("Shutting down server");
    server_handle.abort();

    Ok(())
}
