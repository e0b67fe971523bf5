/*
 * tag.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! A single resource tag.
//!
//! Tags are the atoms of LCFG list resources: the value `"web devel prod"`
//! is three tags. A tag is shared between lists as `Rc<Tag>`; lists never
//! copy one merely because they hold it, and the tag is dropped as soon as
//! the last list (or caller) lets go of it.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use lcfg_util::{WriteOptions, djb2, trim_leading_whitespace};

use crate::error::{TagError, TagResult};

/// A resource tag name with its cached djb2 hash.
#[derive(Debug, Clone, Default)]
pub struct Tag {
    name: String,
    hash: u64,
}

impl Tag {
    /// Create an empty tag. An empty tag is not valid until a name is set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a tag from a string.
    ///
    /// Leading whitespace is skipped. What remains must be a valid name:
    /// non-empty, with no whitespace anywhere.
    ///
    /// # Example
    ///
    /// ```
    /// use lcfg_tags::Tag;
    ///
    /// let tag = Tag::from_string("  web").unwrap();
    /// assert_eq!(tag.name(), "web");
    /// assert!(Tag::from_string("a b").is_err());
    /// ```
    pub fn from_string(input: &str) -> TagResult<Rc<Tag>> {
        let trimmed = trim_leading_whitespace(input);
        if trimmed.is_empty() {
            return Err(TagError::parse(input, "empty tag"));
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(TagError::parse(input, "tag names cannot contain whitespace"));
        }

        let mut tag = Tag::new();
        tag.set_name(trimmed.to_string())?;
        Ok(Rc::new(tag))
    }

    /// Whether `name` is acceptable as a tag name.
    pub fn valid_name(name: &str) -> bool {
        !name.is_empty() && !name.contains(char::is_whitespace)
    }

    /// A tag is valid once it carries a valid name.
    pub fn is_valid(&self) -> bool {
        Self::valid_name(&self.name)
    }

    /// Replace the name, recomputing the cached hash.
    ///
    /// The previous name is only dropped when the new one is accepted.
    pub fn set_name(&mut self, name: String) -> TagResult<()> {
        if !Self::valid_name(&name) {
            return Err(TagError::InvalidTag {
                reason: format!("'{}' is not a valid tag name", name),
            });
        }
        self.hash = djb2(&name);
        self.name = name;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Length of the name in bytes.
    pub fn len(&self) -> usize {
        self.name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty()
    }

    /// The djb2 hash of the name (0 for an unnamed tag).
    pub fn name_hash(&self) -> u64 {
        self.hash
    }

    /// Exact name match. Lengths are compared before bytes.
    pub fn matches(&self, name: &str) -> bool {
        self.name.len() == name.len() && self.name == name
    }

    /// Byte-wise comparison of the two names.
    pub fn compare(&self, other: &Tag) -> Ordering {
        self.name.as_bytes().cmp(other.name.as_bytes())
    }

    /// Serialize into `buf`, reusing its allocation.
    ///
    /// Returns the number of bytes written.
    pub fn to_string_buf(&self, options: WriteOptions, buf: &mut String) -> usize {
        buf.clear();
        buf.reserve(self.name.len() + options.suffix_len());
        buf.push_str(&self.name);
        options.finish(buf);
        buf.len()
    }
}

impl PartialEq for Tag {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash && self.name == other.name
    }
}

impl Eq for Tag {}

impl PartialOrd for Tag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Tag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
