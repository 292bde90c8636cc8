use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

mod config;
mod generator;
mod handler;
mod http;
mod logger;
mod server;

#[derive(Parser, Debug)]
#[command(name = "utility_generator")]
#[command(about = "UUID, password and QR code link generator over HTTP")]
struct Cli {
    /// Configuration file, without extension
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = config::Config::load_from(&cli.config)?;

    logger::init(&cfg)?;

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        logger::log_config(&format!("Using {workers} worker threads"));
    } else {
        logger::log_config("Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    let state = Arc::new(config::AppState::new(&cfg));
    let active_connections = Arc::new(AtomicUsize::new(0));

    let signals = Arc::new(server::SignalHandler::new());
    server::start_signal_handler(Arc::clone(&signals));

    logger::log_server_start(&addr, &cfg);
    logger::log_config(&format!("Max body size: {} bytes", cfg.http.max_body_size));
    logger::log_config(&format!(
        "Max connections: {:?}",
        cfg.performance.max_connections
    ));

    server::start_server_loop(
        listener,
        Arc::clone(&state),
        Arc::clone(&active_connections),
        Arc::clone(&signals.shutdown),
    )
    .await;

    let grace = Duration::from_secs(cfg.performance.write_timeout);
    let remaining = server::drain_connections(&active_connections, grace).await;
    if remaining > 0 {
        logger::log_warning(&format!(
            "Shutting down with {remaining} connection(s) still open"
        ));
    }
    logger::log_signal("Server stopped");

    Ok(())
}
