use tracing::Subscriber;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

use crate::config::LoggingConfig;

// ============================================================================
// Logging Setup
// ============================================================================
//
// The subscriber is installed before configuration is loaded, with RUST_LOG
// or the default filter. Once configuration is known the filter is swapped
// through a reload handle, unless RUST_LOG was given explicitly.
//
// ============================================================================

pub struct LogHandle {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

impl LogHandle {
    /// Switch to the configured filter. RUST_LOG, when set, keeps precedence.
    pub fn apply_config(&self, config: &LoggingConfig) -> anyhow::Result<()> {
        if self.from_env {
            return Ok(());
        }
        self.handle.reload(EnvFilter::try_new(&config.filter)?)?;
        tracing::debug!(filter = %config.filter, "Applied configured log filter");
        Ok(())
    }

    pub fn current_filter(&self) -> anyhow::Result<String> {
        Ok(self.handle.with_current(|filter| filter.to_string())?)
    }
}

/// Filter taken from RUST_LOG if present, otherwise the default logging filter.
pub fn bootstrap_filter() -> (EnvFilter, bool) {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, true),
        Err(_) => (EnvFilter::new(LoggingConfig::default().filter), false),
    }
}

pub fn build_subscriber(
    filter: EnvFilter,
    from_env: bool,
) -> (impl Subscriber + Send + Sync + 'static, LogHandle) {
    let (filter_layer, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt::layer().with_target(true).with_thread_ids(true));

    (subscriber, LogHandle { handle, from_env })
}

/// Install the global subscriber with the bootstrap filter.
pub fn init_tracing() -> anyhow::Result<LogHandle> {
    let (filter, from_env) = bootstrap_filter();
    let (subscriber, handle) = build_subscriber(filter, from_env);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(handle)
}
