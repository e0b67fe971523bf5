/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Shared utilities for the LCFG core data structures.
//!
//! Everything here is small and dependency-light so that the tag and
//! derivation crates can agree on:
//!
//! - [`Change`]: the status reported by every mutating operation
//! - [`WriteOptions`]: flags accepted by the `to_string_buf` serializers
//! - [`djb2`] and [`content_hash`]: the two hash functions the core relies on
//! - whitespace helpers shared by the string parsers

pub mod change;
pub mod hash;
pub mod options;
pub mod text;

pub use change::Change;
pub use hash::{content_hash, djb2};
pub use options::WriteOptions;
pub use text::{is_separator, split_separated, trim_leading_whitespace};
