/*
 * text.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Whitespace handling shared by the string parsers.

/// Separators accepted between tokens in tag, template and derivation
/// strings.
pub fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Split on runs of separators, never yielding empty tokens.
pub fn split_separated(input: &str) -> impl Iterator<Item = &str> {
    input.split(is_separator).filter(|token| !token.is_empty())
}

/// Strip leading whitespace only; trailing and internal whitespace is kept
/// so that validators can reject it.
pub fn trim_leading_whitespace(input: &str) -> &str {
    input.trim_start_matches(char::is_whitespace)
}
