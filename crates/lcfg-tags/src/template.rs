/*
 * template.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Resource name templates.
//!
//! A template such as `foo_$_$` describes how a list resource's child
//! resources are named: each `$` is a placeholder to be filled with a tag.
//! The text before the first `_$` is the field name the template belongs to
//! (`foo` here).
//!
//! Templates for several fields are written as one whitespace-separated
//! string and parsed into a [`TemplateChain`].

use std::fmt;
use std::str::FromStr;

use lcfg_util::{WriteOptions, split_separated};

use crate::error::{TagError, TagResult};

/// Maximum number of `$` placeholders in one template.
pub const MAX_DEPTH: usize = 5;

const PLACEHOLDER: u8 = b'$';
const FIELD_SEPARATOR: &str = "_$";

/// A single validated name pattern.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    tmpl: String,
    name_len: usize,
    /// Placeholder offsets, rightmost first.
    places: [usize; MAX_DEPTH],
    pcount: usize,
}

impl Template {
    /// Create a template from a pattern.
    ///
    /// # Example
    ///
    /// ```
    /// use lcfg_tags::Template;
    ///
    /// let t = Template::new("foo_$_bar_$").unwrap();
    /// assert_eq!(t.name(), "foo");
    /// assert_eq!(t.places(), &[10, 4]);
    /// ```
    pub fn new(pattern: &str) -> TagResult<Template> {
        let mut template = Template::default();
        template.set_pattern(pattern)?;
        Ok(template)
    }

    /// Validate `pattern` and, if it is acceptable, make it this template's
    /// pattern.
    ///
    /// A pattern starts with a letter, continues with letters, digits, `_`
    /// or `$`, has between 1 and [`MAX_DEPTH`] placeholders, and contains
    /// `_$` (whose position ends the field name).
    pub fn set_pattern(&mut self, pattern: &str) -> TagResult<()> {
        let bytes = pattern.as_bytes();

        let Some(first) = bytes.first() else {
            return Err(TagError::invalid_template(pattern, "empty template"));
        };
        if !first.is_ascii_alphabetic() {
            return Err(TagError::invalid_template(
                pattern,
                "first character must be a letter",
            ));
        }
        if let Some(bad) = bytes
            .iter()
            .find(|&&b| !(b.is_ascii_alphanumeric() || b == b'_' || b == PLACEHOLDER))
        {
            return Err(TagError::invalid_template(
                pattern,
                format!("invalid character '{}'", char::from(*bad)),
            ));
        }

        let mut places = [0; MAX_DEPTH];
        let mut pcount = 0;
        for (offset, _) in bytes
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, b)| **b == PLACEHOLDER)
        {
            if pcount == MAX_DEPTH {
                return Err(TagError::invalid_template(
                    pattern,
                    format!("too many placeholders (maximum is {})", MAX_DEPTH),
                ));
            }
            places[pcount] = offset;
            pcount += 1;
        }
        if pcount == 0 {
            return Err(TagError::invalid_template(pattern, "no '$' placeholders"));
        }

        let Some(name_len) = pattern.find(FIELD_SEPARATOR) else {
            return Err(TagError::invalid_template(
                pattern,
                "missing '_$' after the field name",
            ));
        };

        self.tmpl = pattern.to_string();
        self.name_len = name_len;
        self.places = places;
        self.pcount = pcount;
        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.pcount > 0
    }

    pub fn pattern(&self) -> &str {
        &self.tmpl
    }

    /// The field name prefix, e.g. `foo` for `foo_$_$`.
    pub fn name(&self) -> &str {
        &self.tmpl[..self.name_len]
    }

    pub fn name_len(&self) -> usize {
        self.name_len
    }

    /// Number of placeholders.
    pub fn pcount(&self) -> usize {
        self.pcount
    }

    /// Placeholder byte offsets, rightmost first.
    pub fn places(&self) -> &[usize] {
        &self.places[..self.pcount]
    }

    /// Whether this template belongs to `field`.
    pub fn matches(&self, field: &str) -> bool {
        self.is_valid() && field.len() == self.name_len && self.name() == field
    }

    pub fn to_string_buf(&self, options: WriteOptions, buf: &mut String) -> usize {
        buf.clear();
        buf.reserve(self.tmpl.len() + options.suffix_len());
        buf.push_str(&self.tmpl);
        options.finish(buf);
        buf.len()
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tmpl)
    }
}

/// The templates for all the fields of one resource, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateChain {
    templates: Vec<Template>,
}

impl TemplateChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse whitespace-separated patterns. One bad pattern fails the lot.
    pub fn from_string(input: &str) -> TagResult<TemplateChain> {
        let templates = split_separated(input)
            .map(Template::new)
            .collect::<TagResult<Vec<_>>>()?;
        Ok(TemplateChain { templates })
    }

    pub fn push(&mut self, template: Template) {
        self.templates.push(template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// The first template whose field name is exactly `field`.
    pub fn find(&self, field: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.matches(field))
    }

    pub fn to_string_buf(&self, options: WriteOptions, buf: &mut String) -> usize {
        let patterns: usize = self.templates.iter().map(|t| t.tmpl.len()).sum();

        buf.clear();
        buf.reserve(patterns + self.len().saturating_sub(1) + options.suffix_len());
        for (i, template) in self.templates.iter().enumerate() {
            if i > 0 {
                buf.push(' ');
            }
            buf.push_str(&template.tmpl);
        }
        options.finish(buf);
        buf.len()
    }
}

impl fmt::Display for TemplateChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        self.to_string_buf(WriteOptions::default(), &mut buf);
        f.write_str(&buf)
    }
}

impl FromStr for TemplateChain {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TemplateChain::from_string(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_template() {
        let t = Template::new("foo_$_$").unwrap();
        assert_eq!(t.name(), "foo");
        assert_eq!(t.name_len(), 3);
        assert_eq!(t.pcount(), 2);
        assert_eq!(t.places(), &[6, 4]);
        assert!(t.matches("foo"));
        assert!(!t.matches("fo"));
        assert!(!t.matches("foo_"));
    }

    #[test]
    fn test_name_ends_at_first_separator() {
        let t = Template::new("a$b_$c_$").unwrap();
        assert_eq!(t.name(), "a$b");
        assert_eq!(t.pcount(), 3);
        assert_eq!(t.places(), &[7, 4, 1]);
    }

    #[test]
    fn test_max_depth() {
        assert!(Template::new("x_$_$_$_$_$").is_ok());
        let err = Template::new("x_$_$_$_$_$_$").unwrap_err();
        assert!(matches!(err, TagError::InvalidTemplate { .. }));
    }

    #[test]
    fn test_invalid_patterns() {
        for pattern in ["", "1foo_$", "_foo_$", "foo", "foo_", "foo$", "foo-bar_$", "foo_$ "] {
            let err = Template::new(pattern).unwrap_err();
            assert!(
                matches!(err, TagError::InvalidTemplate { .. }),
                "pattern {:?} should be rejected",
                pattern
            );
        }
    }

    #[test]
    fn test_set_pattern_keeps_old_value_on_error() {
        let mut t = Template::new("foo_$").unwrap();
        assert!(t.set_pattern("bad").is_err());
        assert_eq!(t.pattern(), "foo_$");
        assert!(t.is_valid());
    }

    #[test]
    fn test_default_is_invalid() {
        let t = Template::default();
        assert!(!t.is_valid());
        assert!(!t.matches(""));
    }

    #[test]
    fn test_chain_from_string_and_find() {
        let chain = TemplateChain::from_string("foo_$ bar_$_$\n baz_x_$").unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.find("bar").unwrap().pattern(), "bar_$_$");
        assert_eq!(chain.find("baz_x").unwrap().pattern(), "baz_x_$");
        assert!(chain.find("baz").is_none());
        assert!(chain.find("ba").is_none());
        assert!(chain.find("qux").is_none());
        assert_eq!(chain.to_string(), "foo_$ bar_$_$ baz_x_$");
    }

    #[test]
    fn test_chain_parse_is_all_or_nothing() {
        let err = TemplateChain::from_string("foo_$ bad bar_$").unwrap_err();
        assert!(matches!(err, TagError::InvalidTemplate { ref pattern, .. } if pattern == "bad"));
    }

    #[test]
    fn test_chain_to_string_buf_newline() {
        let chain = TemplateChain::from_string("a_$ b_$").unwrap();
        let mut buf = String::new();
        assert_eq!(chain.to_string_buf(WriteOptions::NEWLINE, &mut buf), 8);
        assert_eq!(buf, "a_$ b_$\n");
    }
}
