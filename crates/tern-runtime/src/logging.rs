//! Diagnostics logging for the runtime itself.
//!
//! Off unless a filter is configured, so a compiled program's own stdout and
//! stderr stay exactly as the program wrote them.

use tracing_subscriber::EnvFilter;

use crate::config::RuntimeConfig;

/// Install a stderr `fmt` subscriber filtered by `config.log_filter`.
///
/// Does nothing when no filter is configured or when the host process has
/// already installed a global subscriber.
pub(crate) fn init(config: &RuntimeConfig) {
    let Some(directive) = config.log_filter.as_deref() else {
        return;
    };

    let filter = match EnvFilter::try_new(directive) {
        Ok(filter) => filter,
        Err(error) => {
            eprintln!("tern runtime: invalid log filter `{directive}`: {error}");
            return;
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}
