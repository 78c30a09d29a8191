//! Tern runtime library.
//!
//! Provides the native runtime functions required by Tern's compiled output:
//! - Immutable strings (`__tern_string_*`)
//! - Growable integer arrays with power-of-two capacities (`__tern_int_array_*`)
//! - Per-type printing, line and integer input (`__tern_print_*`, `__tern_read_*`)
//! - Bounded random integers (`__tern_random`)
//!
//! Every precondition violation (bad index, bad range, negative size, ...)
//! prints a diagnostic and exits with status 1. Rust callers can use the
//! `try_*` methods to get a [`RuntimeError`] instead.

pub mod abi;
pub mod buffer;
pub mod config;
pub mod error;
pub mod fail_fast;
pub mod int_array;
pub mod io;
mod logging;
pub mod random;
pub mod string;
pub mod symbols;

pub use buffer::{Buffer, capacity_for};
pub use config::{ConfigError, RuntimeConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use fail_fast::{EXIT_VIOLATION, OnViolation, OrFailFast};
pub use int_array::IntArray;
pub use io::RuntimePrint;
pub use string::TernString;

// =============================================================================
// Initialization
// =============================================================================

/// Initialize the Tern runtime from the environment.
///
/// Optional: every entry point loads the configuration lazily on first use.
/// Calling it from the program entry makes configuration errors and the
/// logging subscriber show up before any output.
#[unsafe(no_mangle)]
pub extern "C" fn __tern_init() {
    let config = config::current();
    tracing::debug!(?config, "tern runtime initialized");
}

/// Install `config` for the rest of the process (for Rust hosts).
///
/// Returns `false` when a configuration was already in effect.
pub fn init_with(config: RuntimeConfig) -> bool {
    config::install(config)
}
