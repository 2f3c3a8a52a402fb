//! Three-way result for operations that may fall back to offline data.
//!
//! Remote operations in Rosetta rarely fail outright: missing credentials,
//! an app that cannot be found or a single failed sub-request all resolve to
//! a best-effort value. [`Outcome`] keeps that best-effort value but records
//! why it is not the full answer, so callers decide whether degraded data is
//! acceptable instead of finding out from the logs.

use std::fmt;

/// Result of an operation that can degrade instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// The operation completed against live services.
    Ok(T),
    /// A value was produced, but from partial or mock data.
    Degraded {
        /// The best-effort value.
        value: T,
        /// Why the value is degraded.
        reason: String,
    },
    /// No value could be produced.
    Fatal(String),
}

impl<T> Outcome<T> {
    /// Creates a degraded outcome.
    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self::Degraded {
            value,
            reason: reason.into(),
        }
    }

    /// Creates a fatal outcome.
    pub fn fatal(reason: impl Into<String>) -> Self {
        Self::Fatal(reason.into())
    }

    /// Returns true for [`Outcome::Ok`].
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Returns true for [`Outcome::Degraded`].
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }

    /// Returns true for [`Outcome::Fatal`].
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Fatal(_))
    }

    /// Borrows the value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ok(value) | Self::Degraded { value, .. } => Some(value),
            Self::Fatal(_) => None,
        }
    }

    /// Consumes the outcome and returns the value, if any.
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Ok(value) | Self::Degraded { value, .. } => Some(value),
            Self::Fatal(_) => None,
        }
    }

    /// The degradation or failure reason.
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Degraded { reason, .. } | Self::Fatal(reason) => Some(reason),
        }
    }

    /// Maps the contained value, keeping the status.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Self::Ok(value) => Outcome::Ok(f(value)),
            Self::Degraded { value, reason } => Outcome::Degraded {
                value: f(value),
                reason,
            },
            Self::Fatal(reason) => Outcome::Fatal(reason),
        }
    }

    /// Marks the outcome as degraded. Reasons accumulate, separated by `; `.
    pub fn degrade(self, extra: impl Into<String>) -> Self {
        let extra = extra.into();
        match self {
            Self::Ok(value) => Self::Degraded {
                value,
                reason: extra,
            },
            Self::Degraded { value, reason } => Self::Degraded {
                value,
                reason: format!("{reason}; {extra}"),
            },
            fatal @ Self::Fatal(_) => fatal,
        }
    }

    /// Strict view: only [`Outcome::Ok`] is a success.
    pub fn into_strict(self) -> Result<T, String> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Degraded { reason, .. } | Self::Fatal(reason) => Err(reason),
        }
    }

    /// Short status label (`ok`, `degraded`, `fatal`).
    pub fn status(&self) -> &'static str {
        match self {
            Self::Ok(_) => "ok",
            Self::Degraded { .. } => "degraded",
            Self::Fatal(_) => "fatal",
        }
    }
}

impl<T, E: fmt::Display> From<Result<T, E>> for Outcome<T> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(e) => Self::Fatal(e.to_string()),
        }
    }
}
