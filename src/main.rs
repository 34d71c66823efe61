//! Metadata relay (v1)
//!
//! Decodes the propagation headers of every incoming request and exposes them
//! on `/inspect`, together with the headers a downstream call would carry.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ───────────────▶ request id ─▶ trace span ─▶ metadata middleware ─▶ handler
//!                                                   (MetadataCodec::decode)   │
//!                                                                             ▼
//!     Client Response                                                  propagate()
//!     ◀─────────────────────────────────────────────────────────────── JSON body
//!
//!     config file ─▶ watcher ─▶ ArcSwap<InnerState> (new codec per reload)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use meta_relay::config::{self, ConfigWatcher, Overrides, RelayConfig};
use meta_relay::lifecycle::{wait_for_signal, Shutdown};
use meta_relay::observability::logging;
use meta_relay::HttpServer;

#[derive(Parser)]
#[command(name = "meta-relay")]
#[command(about = "Decodes and relays request metadata headers", long_about = None)]
struct Args {
    /// Path to a TOML configuration file. Watched for changes.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Application identity written as the caller on outgoing requests.
    #[arg(long)]
    appid: Option<String>,

    /// Default color for requests that carry none.
    #[arg(long)]
    color: Option<String>,

    /// Bind address, e.g. 127.0.0.1:8080.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let overrides = Overrides {
        app_id: args.appid,
        default_color: args.color,
        bind_address: args.bind,
    };

    let config = match &args.config {
        Some(path) => config::load_config_with(path, &overrides)?,
        None => config::finalize(RelayConfig::default(), &overrides)?,
    };

    logging::init(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        app_id = %config.metadata.app_id,
        default_color = %config.metadata.default_color,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path, overrides, config.clone());
            (Some(watcher.run()?), updates)
        }
        None => (None, tokio::sync::mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config);
    let server_shutdown = shutdown.subscribe();
    let mut server_task = tokio::spawn(server.run(listener, config_updates, server_shutdown));

    tokio::select! {
        _ = wait_for_signal() => {
            shutdown.trigger();
            server_task.await??;
        }
        res = &mut server_task => res??,
    }
    tracing::info!("Shutdown complete");
    Ok(())
}
