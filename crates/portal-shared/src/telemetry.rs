//! Telemetry setup

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Installs the global subscriber: JSON to stdout, plus a daily-rolling JSON file
/// when `log_dir` is set. Keep the returned guard alive for the process lifetime.
pub fn init_telemetry(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,portal_api=debug,portal_core=debug"));
    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json().with_target(true));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "portal-server.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}
