use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::Notify;

mod config;
mod error;
mod github;
mod handler;
mod http;
mod logger;
mod secrets;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let cfg = config::Config::load_from(&args.config)?;
    logger::init(&cfg)?;

    // Worker threads follow `server.workers`, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }

    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(config::AppState::new(&cfg)?);
    let active_connections = Arc::new(AtomicUsize::new(0));
    let shutdown = Arc::new(Notify::new());

    logger::log_server_start(&addr, &cfg);
    server::start_signal_handler(Arc::clone(&shutdown));

    server::start_server_loop(listener, state, Arc::clone(&active_connections), shutdown).await;

    let grace = Duration::from_secs(std::cmp::max(
        cfg.performance.read_timeout,
        cfg.performance.write_timeout,
    ));
    server::drain_connections(&active_connections, grace).await;
    Ok(())
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "github-secrets-proxy")]
#[command(about = "Lists the GitHub organizations of the mounted account")]
#[command(version)]
struct Args {
    /// Configuration file, extension optional
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,
}
