// src/diagnostics.rs
//! Diagnostics policy for precondition checks in the numerics code.
//!
//! Checks come in three severities:
//!
//! - [`Severity::Critical`]: an invariant whose violation would be undefined
//!   behaviour (null source pointer, index out of range). Always checked,
//!   logged and then turned into a panic.
//! - [`Severity::Bad`]: a precondition whose violation silently produces a
//!   wrong numeric result (non-normalized rotation axis, ...). Checked when
//!   debug assertions are on or with the `check-bad` feature; panics only with
//!   `panic-on-bad`.
//! - [`Severity::Warning`]: suspicious but legal input (zero scale factor,
//!   division by zero, ...). Checked with the `check-warn` feature, which is on
//!   by default. Never changes control flow.
//!
//! Every report goes through `tracing` under the [`TARGET`] target.

use core::fmt;

/// tracing target of all diagnostics
pub const TARGET: &str = "yama::diagnostics";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    Bad,
    Warning,
}

impl Severity {
    /// Whether checks of this severity are compiled in.
    #[inline]
    pub const fn is_enabled(self) -> bool {
        match self {
            Severity::Critical => true,
            Severity::Bad => cfg!(any(debug_assertions, feature = "check-bad")),
            Severity::Warning => cfg!(feature = "check-warn"),
        }
    }

    /// Whether a failed check of this severity panics.
    #[inline]
    pub const fn is_fatal(self) -> bool {
        match self {
            Severity::Critical => true,
            Severity::Bad => cfg!(feature = "panic-on-bad"),
            Severity::Warning => false,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::Bad => "bad",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log a critical failure and panic.
#[cold]
#[inline(never)]
#[track_caller]
pub fn critical(message: &str) -> ! {
    tracing::error!(target: TARGET, severity = Severity::Critical.as_str(), "{}", message);
    panic!("{}", message);
}

/// Report a failed check.
///
/// Called by the `assert_*` macros once the condition is known to be false.
#[cold]
#[inline(never)]
#[track_caller]
pub fn report(severity: Severity, message: &str) {
    match severity {
        Severity::Critical => critical(message),
        Severity::Bad => {
            tracing::error!(target: TARGET, severity = severity.as_str(), "{}", message);
        }
        Severity::Warning => {
            tracing::warn!(target: TARGET, severity = severity.as_str(), "{}", message);
        }
    }

    if severity.is_fatal() {
        panic!("{}", message);
    }
}

macro_rules! assert_critical {
    ($cond:expr, $msg:expr $(,)?) => {
        if !$cond {
            $crate::diagnostics::report($crate::diagnostics::Severity::Critical, $msg);
        }
    };
}

macro_rules! assert_bad {
    ($cond:expr, $msg:expr $(,)?) => {
        if $crate::diagnostics::Severity::Bad.is_enabled() && !$cond {
            $crate::diagnostics::report($crate::diagnostics::Severity::Bad, $msg);
        }
    };
}

macro_rules! assert_warn {
    ($cond:expr, $msg:expr $(,)?) => {
        if $crate::diagnostics::Severity::Warning.is_enabled() && !$cond {
            $crate::diagnostics::report($crate::diagnostics::Severity::Warning, $msg);
        }
    };
}

pub(crate) use {assert_bad, assert_critical, assert_warn};
