/*
 * derivation.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! A single provenance record: one source file and the lines within it.
//!
//! The string form is `file` or `file:line,line,...`. Serialising happens
//! a lot (every resource carries its derivation), so the serialised length
//! is cached and only recomputed after a mutation.

use std::cell::Cell;
use std::fmt;
use std::str::FromStr;

use lcfg_util::{Change, WriteOptions};

use crate::error::{DerivationError, DerivationResult};

const INITIAL_LINES: usize = 4;

/// A source file plus the set of line numbers it contributed.
#[derive(Debug, Clone, Default)]
pub struct Derivation {
    file: String,
    lines: Vec<u32>,
    /// Serialised length, `None` when stale.
    length: Cell<Option<usize>>,
}

impl Derivation {
    /// An empty derivation. It is not valid until it has a file.
    pub fn new() -> Self {
        Self::default()
    }

    /// A derivation for `file` with no lines.
    pub fn for_file(file: &str) -> DerivationResult<Self> {
        let mut drv = Derivation::new();
        drv.set_file(file.to_string())?;
        Ok(drv)
    }

    /// Parse `file` or `file:l1,l2,...`.
    ///
    /// The file name runs up to the last `:`. Line numbers may come in any
    /// order; duplicates and empty items are dropped.
    ///
    /// # Example
    ///
    /// ```
    /// use lcfg_derivation::Derivation;
    ///
    /// let drv = Derivation::from_string("foo.rpms:9,1,5").unwrap();
    /// assert_eq!(drv.file(), "foo.rpms");
    /// assert_eq!(drv.lines(), &[9, 1, 5]);
    /// ```
    pub fn from_string(input: &str) -> DerivationResult<Derivation> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DerivationError::parse(input, "empty derivation"));
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(DerivationError::parse(
                input,
                "a single derivation cannot contain whitespace",
            ));
        }

        let (file, lines) = match trimmed.rfind(':') {
            Some(colon) => (&trimmed[..colon], Some(&trimmed[colon + 1..])),
            None => (trimmed, None),
        };
        if file.is_empty() {
            return Err(DerivationError::parse(input, "missing file name"));
        }

        let mut drv = Derivation::for_file(file)?;
        for item in lines.into_iter().flat_map(|l| l.split(',')) {
            if item.is_empty() {
                continue;
            }
            let line = item.parse::<u32>().map_err(|_| {
                DerivationError::parse(input, format!("invalid line number '{}'", item))
            })?;
            drv.add_line(line);
        }
        Ok(drv)
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    /// Replace the file name. Empty names are rejected.
    pub fn set_file(&mut self, file: String) -> DerivationResult<()> {
        if file.is_empty() {
            return Err(DerivationError::missing_file());
        }
        self.file = file;
        self.length.set(None);
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        !self.file.is_empty()
    }

    /// Line numbers in their current order.
    pub fn lines(&self) -> &[u32] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn has_lines(&self) -> bool {
        !self.lines.is_empty()
    }

    pub fn has_line(&self, line: u32) -> bool {
        self.lines.contains(&line)
    }

    /// Add a line number unless it is already present.
    pub fn add_line(&mut self, line: u32) -> Change {
        if self.has_line(line) {
            return Change::None;
        }
        if self.lines.len() == self.lines.capacity() {
            let extra = self.lines.capacity().max(INITIAL_LINES);
            self.lines.reserve_exact(extra);
        }
        self.lines.push(line);
        self.length.set(None);
        Change::Added
    }

    /// Add every line of `other` to this derivation.
    pub fn merge_lines(&mut self, other: &Derivation) -> Change {
        let mut change = Change::None;
        for &line in &other.lines {
            if self.add_line(line).is_changed() {
                change = Change::Modified;
            }
        }
        change
    }

    /// Sort the line numbers ascending, as needed for canonical output.
    pub fn sort_lines(&mut self) {
        self.lines.sort_unstable();
    }

    pub fn lines_sorted(&self) -> bool {
        self.lines.windows(2).all(|w| w[0] <= w[1])
    }

    /// Serialised length without options, computed on first use.
    pub fn get_length(&self) -> usize {
        if let Some(length) = self.length.get() {
            return length;
        }
        let mut length = self.file.len();
        if !self.lines.is_empty() {
            // ':' plus one ',' between each pair of lines
            length += self.lines.len();
            length += self.lines.iter().map(|&l| decimal_len(l)).sum::<usize>();
        }
        self.length.set(Some(length));
        length
    }

    /// Serialise into `buf`, reusing its allocation.
    ///
    /// Lines are written in their current order; call
    /// [`sort_lines`](Self::sort_lines) first for canonical output. Returns
    /// the number of bytes written.
    pub fn to_string_buf(&self, options: WriteOptions, buf: &mut String) -> usize {
        buf.clear();
        self.append_to(buf);
        options.finish(buf);
        buf.len()
    }

    /// Append the serialised form to `buf` without clearing it.
    pub(crate) fn append_to(&self, buf: &mut String) {
        use std::fmt::Write;

        buf.reserve(self.get_length() + 1);
        buf.push_str(&self.file);
        for (i, line) in self.lines.iter().enumerate() {
            buf.push(if i == 0 { ':' } else { ',' });
            // Writing to a String cannot fail.
            let _ = write!(buf, "{}", line);
        }
    }
}

fn decimal_len(n: u32) -> usize {
    n.checked_ilog10().map_or(1, |d| d as usize + 1)
}

impl PartialEq for Derivation {
    /// Same file and the same set of lines, in any order.
    fn eq(&self, other: &Self) -> bool {
        self.file == other.file
            && self.lines.len() == other.lines.len()
            && self.lines.iter().all(|l| other.has_line(*l))
    }
}

impl Eq for Derivation {}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        self.append_to(&mut buf);
        f.write_str(&buf)
    }
}

impl FromStr for Derivation {
    type Err = DerivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Derivation::from_string(s)
    }
}
