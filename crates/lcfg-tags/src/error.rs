/*
 * error.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Error types for tags, tag lists and templates.

use thiserror::Error;

/// Errors produced by tag, tag list and template operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// Malformed tag or tag list string.
    #[error("Invalid tag '{input}': {reason}")]
    Parse { input: String, reason: String },

    /// A name that is not acceptable as a tag.
    #[error("Invalid tag: {reason}")]
    InvalidTag { reason: String },

    /// A node handle that does not belong to this list (or was removed).
    #[error("Invalid tag list node")]
    InvalidNode,

    /// Malformed template pattern.
    #[error("Invalid template '{pattern}': {reason}")]
    InvalidTemplate { pattern: String, reason: String },

    /// No template is registered for the field.
    #[error("Failed to find template for field '{field}'")]
    TemplateNotFound { field: String },

    /// The template needs more tags than the list holds.
    #[error(
        "Insufficient tags for template '{template}': need {required}, got {available}"
    )]
    InsufficientTags {
        template: String,
        required: usize,
        available: usize,
    },
}

impl TagError {
    /// Stable short code for this kind of error.
    pub fn code(&self) -> &'static str {
        match self {
            TagError::Parse { .. } => "L-TAG-1",
            TagError::InvalidTag { .. } => "L-TAG-2",
            TagError::InvalidNode => "L-TAG-3",
            TagError::InvalidTemplate { .. } => "L-TAG-4",
            TagError::TemplateNotFound { .. } => "L-TAG-5",
            TagError::InsufficientTags { .. } => "L-TAG-6",
        }
    }

    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        TagError::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_template(pattern: &str, reason: impl Into<String>) -> Self {
        TagError::InvalidTemplate {
            pattern: pattern.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type for tag operations.
pub type TagResult<T> = Result<T, TagError>;
