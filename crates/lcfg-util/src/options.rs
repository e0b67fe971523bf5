/*
 * options.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Serialization options.

/// Flags accepted by every `to_string_buf` serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    /// Terminate the output with a single `'\n'`.
    pub newline: bool,
}

impl WriteOptions {
    /// Options that append a trailing newline.
    pub const NEWLINE: WriteOptions = WriteOptions { newline: true };

    /// Number of extra bytes these options add after the payload.
    pub fn suffix_len(self) -> usize {
        usize::from(self.newline)
    }

    /// Append the configured suffix to `buf`.
    pub fn finish(self, buf: &mut String) {
        if self.newline {
            buf.push('\n');
        }
    }
}
