//! Pluggable log/error sinks.
//!
//! Every fatal or advisory condition is handed to a [`LogSink`] together with a
//! [`Severity`]. The sink decides the policy: returning `Err` aborts the current
//! operation, returning `Ok(())` lets it continue with an empty result for the
//! offending item.
//!
//! | Sink           | `Error`       | `Warning`     |
//! |----------------|---------------|---------------|
//! | `RaiseOnError` | raise         | log, continue |
//! | `WarnOnly`     | log, continue | log, continue |
//! | `Strict`       | raise         | raise         |
//! | `MemorySink`   | record        | record        |

use crate::error::{Result, StyleError};
use parking_lot::Mutex;
use std::fmt;

/// How serious a reported condition is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receives every error and warning raised while resolving or rendering.
///
/// `report` may run while [`Stylesheets`] holds its internal build lock. A sink
/// must not call back into the same `Stylesheets` from `report`: the lock is
/// not reentrant and the call deadlocks.
///
/// [`Stylesheets`]: crate::render::Stylesheets
pub trait LogSink: Send + Sync {
    /// Report a condition. `Err` aborts the caller, `Ok` lets it continue.
    fn report(&self, severity: Severity, error: StyleError) -> Result<()>;
}

/// Default policy: errors raise, warnings are logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct RaiseOnError;

impl LogSink for RaiseOnError {
    fn report(&self, severity: Severity, error: StyleError) -> Result<()> {
        match severity {
            Severity::Error => Err(error),
            Severity::Warning => {
                crate::log!("warning"; "{error}");
                Ok(())
            }
        }
    }
}

/// Downgrades every error to a logged warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct WarnOnly;

impl LogSink for WarnOnly {
    fn report(&self, _severity: Severity, error: StyleError) -> Result<()> {
        crate::log!("warning"; "{error}");
        Ok(())
    }
}

/// Treats warnings as fatal too.
#[derive(Debug, Default, Clone, Copy)]
pub struct Strict;

impl LogSink for Strict {
    fn report(&self, _severity: Severity, error: StyleError) -> Result<()> {
        Err(error)
    }
}

/// Silently records every report.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(Severity, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far.
    pub fn entries(&self) -> Vec<(Severity, String)> {
        self.entries.lock().clone()
    }

    /// Messages reported with the given severity.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl LogSink for MemorySink {
    fn report(&self, severity: Severity, error: StyleError) -> Result<()> {
        self.entries.lock().push((severity, error.to_string()));
        Ok(())
    }
}

impl<S: LogSink + ?Sized> LogSink for std::sync::Arc<S> {
    fn report(&self, severity: Severity, error: StyleError) -> Result<()> {
        (**self).report(severity, error)
    }
}
