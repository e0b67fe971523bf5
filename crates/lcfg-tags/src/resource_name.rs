/*
 * resource_name.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Building concrete resource names from a template and a tag list.

use crate::error::{TagError, TagResult};
use crate::tag_list::TagList;
use crate::template::{MAX_DEPTH, TemplateChain};

/// Resolve `field` to a resource name using `tags`.
///
/// The template for `field` is filled from the right: its rightmost `$`
/// takes the last tag of the list, the next placeholder to the left takes
/// the tag before that, and so on. Tags before the ones consumed are
/// ignored.
///
/// # Example
///
/// ```
/// use lcfg_tags::{TagList, TemplateChain, build_resource_name};
///
/// let templates = TemplateChain::from_string("foo_$_$ bar_$").unwrap();
/// let tags = TagList::from_string("a b").unwrap();
/// assert_eq!(build_resource_name(&templates, &tags, "foo").unwrap(), "foo_a_b");
/// assert_eq!(build_resource_name(&templates, &tags, "bar").unwrap(), "bar_b");
/// ```
pub fn build_resource_name(
    templates: &TemplateChain,
    tags: &TagList,
    field: &str,
) -> TagResult<String> {
    let mut buf = String::new();
    build_resource_name_into(templates, tags, field, &mut buf)?;
    Ok(buf)
}

/// Like [`build_resource_name`], writing into a caller-supplied buffer.
///
/// The buffer is cleared but keeps its allocation, so one buffer can be
/// reused across many names. Returns the length of the name.
pub fn build_resource_name_into(
    templates: &TemplateChain,
    tags: &TagList,
    field: &str,
    buf: &mut String,
) -> TagResult<usize> {
    let Some(template) = templates.find(field) else {
        tracing::trace!(field, "no template for field");
        return Err(TagError::TemplateNotFound {
            field: field.to_string(),
        });
    };

    let pattern = template.pattern();
    let insufficient = || TagError::InsufficientTags {
        template: pattern.to_string(),
        required: template.pcount(),
        available: tags.len(),
    };
    if tags.len() < template.pcount() {
        return Err(insufficient());
    }

    // Pair each placeholder (rightmost first) with a tag taken from the tail
    // of the list, collecting the name right to left.
    let mut pieces: Vec<&str> = Vec::with_capacity(2 * MAX_DEPTH + 1);
    let mut length = pattern.len() - template.pcount();
    let mut end = pattern.len();
    let mut cursor = tags.iter();
    for &place in template.places() {
        let tag = cursor.prev().ok_or_else(insufficient)?;
        pieces.push(&pattern[place + 1..end]);
        pieces.push(tag.name());
        length += tag.len();
        end = place;
    }
    pieces.push(&pattern[..end]);

    buf.clear();
    buf.reserve(length);
    for piece in pieces.iter().rev() {
        buf.push_str(piece);
    }
    debug_assert_eq!(buf.len(), length);
    Ok(length)
}
