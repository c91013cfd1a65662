use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use dualstack_http_server::config::{Args, ListenerConfig};
use dualstack_http_server::{logger, server, shutdown};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_logger(&args.log_dir)
        .with_context(|| format!("cannot initialize logging in {}", args.log_dir.display()))?;

    let config = ListenerConfig::from_args(&args).inspect_err(|e| error!("{}", e))?;

    let listener = server::bind_dual_stack(config.port).inspect_err(|e| error!("{}", e))?;

    info!(
        "Server running at http://127.0.0.1:{}/ serving {}",
        config.port,
        config.document_root.display()
    );

    let notify_shutdown = shutdown::start_shutdown_listener();
    server::serve(listener, Arc::new(config), notify_shutdown).await;
    Ok(())
}
