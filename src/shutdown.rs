use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{info, warn};

/// Spawns a Ctrl+C watcher that notifies on every signal. `notify_one` stores
/// a permit, so a signal arriving between two accepts is not lost.
pub fn start_shutdown_listener() -> Arc<Notify> {
    let notify = Arc::new(Notify::new());
    let notify_clone = notify.clone();
    tokio::spawn(async move {
        loop {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Ctrl C bind Error: {}", e);
                return;
            }
            info!("Ctrl+C received");
            notify_clone.notify_one();
        }
    });
    notify
}
