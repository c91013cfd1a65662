use std::io;
use std::path::Path;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

/// Console plus daily rolling `server.log` in `log_dir`. Level comes from
/// `RUST_LOG`, defaulting to `info`.
pub fn init_logger(log_dir: &Path) -> io::Result<()> {
    // 创建日志目录
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "server.log");

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(true)
        .with_span_events(FmtSpan::CLOSE);

    let file_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(false)
        .with_writer(file_appender);

    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(io::Error::other)?;

    info!("Logger initialized");
    Ok(())
}
