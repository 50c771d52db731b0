//! Error Kinds
//!
//! Every error raised by the engine, whether pure or storage-backed, maps onto one of
//! these kinds so callers can branch on the category without matching every variant.

use std::fmt;

use serde::Serialize;

/// Category of a failed operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// The referenced record does not exist or is not owned by the caller.
    NotFound,

    /// The request collides with existing state.
    Conflict,

    /// The request itself is malformed.
    InvalidInput,

    /// The request is well formed but a business rule forbids it.
    PolicyViolation,

    /// The referenced record exists but cannot currently be used.
    Unavailable,

    /// The backing store aborted the whole multi-step mutation.
    TransactionFailed,
}

impl ErrorKind {
    /// Stable identifier for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InvalidInput => "invalid_input",
            Self::PolicyViolation => "policy_violation",
            Self::Unavailable => "unavailable",
            Self::TransactionFailed => "transaction_failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
