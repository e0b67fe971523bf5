/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Derivations for the LCFG core.
//!
//! A *derivation* records where a configuration value came from: a source
//! file and the line numbers within it that contributed. Values built from
//! several files carry a list of derivations, and identical lists are
//! interned in a hash map so they are parsed and stored once.
//!
//! # Architecture
//!
//! - [`Derivation`]: one file plus its lines, shared as `Rc<Derivation>`
//! - [`DerivationList`]: at most one derivation per file, merged with
//!   copy-on-write so shared derivations are never changed under another
//!   owner
//! - [`DerivationMap`]: open-addressing table keyed by the content hash of
//!   a list's string form
//! - [`MapConfig`]: the map's sizing policy, loadable from TOML
//!
//! # Example
//!
//! ```
//! use lcfg_derivation::{Change, DerivationList};
//!
//! let mut list = DerivationList::from_string("foo.rpms:1 bar.h:7").unwrap();
//! assert_eq!(list.merge_file_line("foo.rpms", Some(5)).unwrap(), Change::Modified);
//! assert_eq!(list.to_string(), "foo.rpms:1,5 bar.h:7");
//! ```

pub mod config;
pub mod derivation;
pub mod error;
pub mod list;
pub mod map;

pub use config::MapConfig;
pub use derivation::Derivation;
pub use error::{DerivationError, DerivationResult};
pub use list::DerivationList;
pub use map::DerivationMap;

// Re-export for convenience
pub use lcfg_util::{Change, WriteOptions};
