//! Process-wide runtime configuration.
//!
//! Compiled programs have no command line of their own to configure the
//! runtime, so settings come from the environment:
//!
//! - `TERN_ON_VIOLATION`: `exit` (default) or `panic`
//! - `TERN_SEED`: decimal `u64` seed for `random(from, to)`
//! - `TERN_LOG`: `tracing` filter directive, logging is off when unset

use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::OnceLock;

use derive_more::{Display, Error};

use crate::fail_fast::OnViolation;
use crate::logging;

pub const ENV_ON_VIOLATION: &str = "TERN_ON_VIOLATION";
pub const ENV_SEED: &str = "TERN_SEED";
pub const ENV_LOG: &str = "TERN_LOG";

static CONFIG: OnceLock<RuntimeConfig> = OnceLock::new();

#[derive(Display, Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[display("{var}: unknown violation policy `{value}` (expected `exit` or `panic`)")]
    UnknownPolicy { var: &'static str, value: String },

    #[display("{var}: invalid seed `{value}`: {source}")]
    InvalidSeed {
        var: &'static str,
        value: String,
        source: ParseIntError,
    },
}

impl FromStr for OnViolation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exit" | "abort" => Ok(OnViolation::Exit),
            "panic" => Ok(OnViolation::Panic),
            _ => Err(ConfigError::UnknownPolicy {
                var: ENV_ON_VIOLATION,
                value: s.to_owned(),
            }),
        }
    }
}

/// Settings shared by every runtime operation in the process.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Escalation policy for contract violations.
    pub on_violation: OnViolation,

    /// Fixed seed for the random generator; entropy when `None`.
    pub seed: Option<u64>,

    /// `tracing` filter directive; logging stays off when `None`.
    pub log_filter: Option<String>,
}

impl RuntimeConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_ON_VIOLATION) {
            config.on_violation = value.parse()?;
        }

        if let Some(value) = lookup(ENV_SEED) {
            let seed = value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidSeed {
                    var: ENV_SEED,
                    value,
                    source,
                })?;
            config.seed = Some(seed);
        }

        config.log_filter = lookup(ENV_LOG).filter(|filter| !filter.trim().is_empty());

        Ok(config)
    }

    #[must_use]
    pub fn with_on_violation(mut self, on_violation: OnViolation) -> Self {
        self.on_violation = on_violation;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_log_filter(mut self, filter: impl Into<String>) -> Self {
        self.log_filter = Some(filter.into());
        self
    }
}

/// Install `config` for the rest of the process.
///
/// Returns `false` when a configuration was already in effect, either from
/// an earlier call or from lazy loading on first use.
pub fn install(config: RuntimeConfig) -> bool {
    let mut installed = false;
    CONFIG.get_or_init(|| {
        installed = true;
        logging::init(&config);
        config
    });
    installed
}

/// The configuration in effect, loaded from the environment on first use.
pub fn current() -> &'static RuntimeConfig {
    CONFIG.get_or_init(|| {
        let config = load_from_env();
        logging::init(&config);
        config
    })
}

fn load_from_env() -> RuntimeConfig {
    let config = RuntimeConfig::from_env().unwrap_or_else(|error| {
        eprintln!("tern runtime: ignoring configuration: {error}");
        RuntimeConfig::default()
    });

    // Unit tests observe violations as panics via `#[should_panic]`.
    #[cfg(test)]
    let config = config.with_on_violation(OnViolation::Panic);

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = RuntimeConfig::from_lookup(lookup_in(&[])).unwrap();
        assert_eq!(config, RuntimeConfig::default());
        assert_eq!(config.on_violation, OnViolation::Exit);
    }

    #[test]
    fn test_reads_all_variables() {
        let config = RuntimeConfig::from_lookup(lookup_in(&[
            (ENV_ON_VIOLATION, "Panic"),
            (ENV_SEED, " 42 "),
            (ENV_LOG, "tern_runtime=debug"),
        ]))
        .unwrap();

        assert_eq!(
            config,
            RuntimeConfig::default()
                .with_on_violation(OnViolation::Panic)
                .with_seed(42)
                .with_log_filter("tern_runtime=debug")
        );
    }

    #[test]
    fn test_blank_log_filter_disables_logging() {
        let config = RuntimeConfig::from_lookup(lookup_in(&[(ENV_LOG, "  ")])).unwrap();
        assert_eq!(config.log_filter, None);
    }

    #[test]
    fn test_rejects_unknown_policy() {
        let error = RuntimeConfig::from_lookup(lookup_in(&[(ENV_ON_VIOLATION, "ignore")]))
            .unwrap_err();
        assert!(matches!(error, ConfigError::UnknownPolicy { .. }));
        assert!(error.to_string().contains("`ignore`"));
    }

    #[test]
    fn test_rejects_malformed_seed() {
        let error =
            RuntimeConfig::from_lookup(lookup_in(&[(ENV_SEED, "-1")])).unwrap_err();
        assert!(matches!(error, ConfigError::InvalidSeed { .. }));
        assert!(error.to_string().starts_with("TERN_SEED: invalid seed `-1`"));
    }
}
