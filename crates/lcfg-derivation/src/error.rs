/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for derivations, derivation lists and the derivation map.

use thiserror::Error;

/// Errors produced by derivation operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    /// Malformed derivation string.
    #[error("Invalid derivation '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// A derivation without a file name.
    #[error("Invalid derivation: {reason}")]
    InvalidDerivation { reason: String },

    /// A list position past the end of the list.
    #[error("Invalid derivation list position {index} (list has {len} entries)")]
    InvalidIndex { index: usize, len: usize },

    /// A full probe cycle found neither an empty slot nor the same id.
    ///
    /// The resize policy should make this impossible; seeing it means the
    /// map's load bookkeeping is wrong.
    #[error("No free space in derivation map for id {id:#018x} (capacity {capacity})")]
    NoFreeSlot { id: u64, capacity: usize },

    /// Rejected derivation map configuration.
    #[error("Invalid derivation map configuration: {message}")]
    Config { message: String },
}

impl DerivationError {
    /// Stable short code for this kind of error.
    pub fn code(&self) -> &'static str {
        match self {
            DerivationError::Parse { .. } => "L-DRV-1",
            DerivationError::InvalidDerivation { .. } => "L-DRV-2",
            DerivationError::InvalidIndex { .. } => "L-DRV-3",
            DerivationError::NoFreeSlot { .. } => "L-DRV-4",
            DerivationError::Config { .. } => "L-DRV-5",
        }
    }

    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        DerivationError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn duplicate_file(file: &str) -> Self {
        DerivationError::InvalidDerivation {
            reason: format!("the list already has an entry for '{}'", file),
        }
    }

    pub(crate) fn missing_file() -> Self {
        DerivationError::InvalidDerivation {
            reason: "a derivation needs a file name".to_string(),
        }
    }
}

/// Result type for derivation operations.
pub type DerivationResult<T> = Result<T, DerivationError>;
