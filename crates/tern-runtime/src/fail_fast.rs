//! Escalation of contract violations.
//!
//! Compiled programs have no way to observe a [`RuntimeError`]: the only
//! outcome of a violation they can see is process termination with
//! [`EXIT_VIOLATION`]. Rust embedders can opt into [`OnViolation::Panic`]
//! instead, or call the `try_*` forms of each operation directly.
//!
//! The panic policy applies to the Rust API only. A panic cannot unwind out
//! of an `extern "C"` function, so the C entry points always exit.

use std::io::Write;

use crate::config;
use crate::error::{RuntimeError, RuntimeResult};

/// Exit status of a process terminated by a contract violation.
pub const EXIT_VIOLATION: i32 = 1;

/// Prefix of the diagnostic line written to stderr.
pub const DIAGNOSTIC_PREFIX: &str = "tern runtime error: ";

/// What to do once a violation has been detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnViolation {
    /// Print the diagnostic and exit with [`EXIT_VIOLATION`].
    #[default]
    Exit,
    /// Unwind with the diagnostic as the panic message.
    Panic,
}

/// Report `error` and terminate according to the installed policy.
#[cold]
pub fn escalate(error: &RuntimeError) -> ! {
    let policy = config::current().on_violation;
    escalate_with(policy, error)
}

/// Report `error` and terminate according to `policy`.
#[cold]
pub fn escalate_with(policy: OnViolation, error: &RuntimeError) -> ! {
    // Loading the configuration installs the log subscriber.
    config::current();
    tracing::error!(%error, "runtime contract violation");
    match policy {
        OnViolation::Exit => {
            // Output already written by the program must survive the exit.
            let _ = std::io::stdout().flush();
            eprintln!("{DIAGNOSTIC_PREFIX}{error}");
            std::process::exit(EXIT_VIOLATION)
        }
        OnViolation::Panic => panic!("{DIAGNOSTIC_PREFIX}{error}"),
    }
}

/// Unwraps a runtime result, escalating the error on violation.
pub trait OrFailFast<T> {
    fn or_fail_fast(self) -> T;

    /// Like [`or_fail_fast`](OrFailFast::or_fail_fast), but always exits
    /// whatever the installed policy.
    fn or_exit(self) -> T;
}

impl<T> OrFailFast<T> for RuntimeResult<T> {
    #[inline]
    #[track_caller]
    fn or_fail_fast(self) -> T {
        match self {
            Ok(value) => value,
            Err(error) => escalate(&error),
        }
    }

    #[inline]
    fn or_exit(self) -> T {
        match self {
            Ok(value) => value,
            Err(error) => escalate_with(OnViolation::Exit, &error),
        }
    }
}
