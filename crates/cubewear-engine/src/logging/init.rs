use std::sync::Once;

/// Filter used when neither the config nor `RUST_LOG` provides one.
///
/// wgpu logs adapter and pipeline details at `info`; keep it at `warn`.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "cubewear_engine=debug,wgpu=warn").
///
/// `write_style` controls ANSI coloring behavior.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

/// Explicit filter, then `RUST_LOG`, then `DEFAULT_FILTER`.
fn resolve_filter(explicit: Option<String>, env: Option<String>) -> String {
    let usable = |f: &String| !f.trim().is_empty();
    explicit
        .filter(usable)
        .or_else(|| env.filter(usable))
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored, as is a logger
/// that some other code installed first. Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = resolve_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        let mut builder = env_logger::Builder::new();
        builder.parse_filters(&filter);
        builder.write_style(config.write_style);

        if builder.try_init().is_ok() {
            log::debug!("logging initialized with filter {filter:?}");
        }
    });
}
