/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Resource tags, tag lists and name templates for the LCFG core.
//!
//! LCFG list resources hold an ordered list of *tags*; each tag names a
//! child resource whose full name comes from a *template*. For example,
//! with the template `client_$` and the tags `web devel`, the children are
//! `client_web` and `client_devel`.
//!
//! # Architecture
//!
//! - [`Tag`]: a validated name, shared between lists as `Rc<Tag>`
//! - [`TagList`]: an ordered doubly-linked list with O(1) insert/remove at
//!   a [`NodeId`], set algebra and string round-tripping
//! - [`TagIter`]: a bidirectional cursor over a [`TagList`]
//! - [`Template`] / [`TemplateChain`]: validated `$` patterns, one per field
//! - [`build_resource_name`]: combines the three
//!
//! # Example
//!
//! ```
//! use lcfg_tags::{TagList, TemplateChain, build_resource_name};
//!
//! let tags = TagList::from_string("web devel prod").unwrap();
//! assert_eq!(tags.to_string(), "web devel prod");
//!
//! let templates = TemplateChain::from_string("client_$").unwrap();
//! let name = build_resource_name(&templates, &tags, "client").unwrap();
//! assert_eq!(name, "client_prod");
//! ```

pub mod error;
pub mod iter;
pub mod resource_name;
pub mod tag;
pub mod tag_list;
pub mod template;

pub use error::{TagError, TagResult};
pub use iter::TagIter;
pub use resource_name::{build_resource_name, build_resource_name_into};
pub use tag::Tag;
pub use tag_list::{NodeId, TagList};
pub use template::{MAX_DEPTH, Template, TemplateChain};

// Re-export for convenience
pub use lcfg_util::{Change, WriteOptions};
