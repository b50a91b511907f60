//! Error types for alignment search
//!
//! Every failure is a typed value. Nothing here is retried: the search is
//! deterministic, so a second attempt would reproduce the same error.

extern crate alloc;
use alloc::string::String;

use thiserror::Error;

/// Failure of a locate operation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// No alignment phase of the needle occurs in the encoded haystack
    #[error("needle ({needle_len} bytes) not found under any base64 alignment")]
    NotFound {
        /// Length of the needle that was searched for
        needle_len: usize,
    },

    /// A textual match was found but failed byte-level verification
    #[error("integrity check failed at encoded offset {offset}: {reason}")]
    Integrity {
        /// Character offset in the encoded haystack where the check failed
        offset: usize,
        /// What did not agree
        reason: String,
    },

    /// Inputs too small (or empty) to search for
    #[error("malformed input: {reason}")]
    MalformedInput {
        /// Why the input was rejected
        reason: String,
    },
}

impl LocateError {
    pub fn malformed(reason: impl Into<String>) -> Self {
        LocateError::MalformedInput {
            reason: reason.into(),
        }
    }

    pub fn integrity(offset: usize, reason: impl Into<String>) -> Self {
        LocateError::Integrity {
            offset,
            reason: reason.into(),
        }
    }

    /// Only `NotFound` describes a legitimate outcome rather than a defect
    /// in the inputs or in the match.
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, LocateError::NotFound { .. })
    }
}

/// Result alias for this crate
pub type Result<T> = core::result::Result<T, LocateError>;
