use std::env;
use std::io;

use once_cell::sync::OnceCell;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

// Keeps the non-blocking writer alive for the lifetime of the process.
static FILE_GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// Initialize tracing once at startup.
///
/// Filtering comes from `RUST_LOG` (default `info`). Logs go to stderr;
/// setting `RUST_LOG_FILE=logs/app.log` adds a daily-rolling file layer.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .compact();

    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer);

    if let Ok(log_path) = env::var("RUST_LOG_FILE") {
        let path = std::path::Path::new(&log_path);
        let dir = path.parent().unwrap_or(std::path::Path::new("."));
        let file = path
            .file_name()
            .unwrap_or(std::ffi::OsStr::new("app.log"));
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, file));
        let _ = FILE_GUARD.set(guard);

        let file_layer = fmt::layer()
            .with_writer(writer)
            .with_target(true)
            .with_level(true)
            .compact();
        registry.with(file_layer).init();
    } else {
        registry.init();
    }

    // Route panics through the subscriber so they land in the log file too.
    std::panic::set_hook(Box::new(|info| {
        let mut msg = String::new();
        if let Some(loc) = info.location() {
            msg.push_str(&format!("panic at {}:{}:{} ", loc.file(), loc.line(), loc.column()));
        }
        if let Some(s) = info.payload().downcast_ref::<&str>() {
            msg.push_str(s);
        } else if let Some(s) = info.payload().downcast_ref::<String>() {
            msg.push_str(s);
        } else {
            msg.push_str("<non-string panic>");
        }
        tracing::error!("{}", msg);
    }));
}
