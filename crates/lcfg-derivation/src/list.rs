/*
 * list.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Ordered lists of derivations, at most one per file.
//!
//! A value assembled from several source files carries a list such as
//! `foo.rpms:1,5 bar.h:7`. Lists are built up by merging, and derivations
//! are shared between lists as `Rc<Derivation>`. Merging into a shared
//! derivation clones it first (copy-on-write), so another list holding the
//! same derivation never sees the change.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use lcfg_util::{Change, WriteOptions, split_separated};

use crate::derivation::Derivation;
use crate::error::{DerivationError, DerivationResult};

/// Derivations in first-insertion order, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct DerivationList {
    items: Vec<Rc<Derivation>>,
    /// Content hash identifying this list inside a derivation map.
    id: Cell<Option<u64>>,
}

impl DerivationList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rc<Derivation>> {
        self.items.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Rc<Derivation>> {
        self.items.get(index)
    }

    /// The map id, if this list has been given one.
    ///
    /// Ids are assigned by [`DerivationMap`](crate::DerivationMap) and are
    /// read-only outside this crate:
    ///
    /// ```compile_fail
    /// use lcfg_derivation::DerivationList;
    ///
    /// let list = DerivationList::new();
    /// list.set_id(12345);
    /// ```
    pub fn id(&self) -> Option<u64> {
        self.id.get()
    }

    pub(crate) fn set_id(&self, id: u64) {
        self.id.set(Some(id));
    }

    /// Position of the derivation for `file`.
    pub fn find_index(&self, file: &str) -> Option<usize> {
        self.items.iter().position(|drv| drv.file() == file)
    }

    /// The derivation for `file`.
    pub fn find(&self, file: &str) -> Option<&Rc<Derivation>> {
        self.find_index(file).map(|i| &self.items[i])
    }

    pub fn contains(&self, file: &str) -> bool {
        self.find_index(file).is_some()
    }

    fn changed(&self, change: Change) -> Change {
        if change.is_changed() {
            self.id.set(None);
        }
        change
    }

    /// Insert `drv` after position `after`, or at the start when `after` is
    /// `None`.
    ///
    /// A file that already has an entry is rejected; use
    /// [`merge_derivation`](Self::merge_derivation) to add lines to it.
    pub fn insert_next(
        &mut self,
        after: Option<usize>,
        drv: Rc<Derivation>,
    ) -> DerivationResult<Change> {
        if !drv.is_valid() {
            return Err(DerivationError::missing_file());
        }
        if self.contains(drv.file()) {
            return Err(DerivationError::duplicate_file(drv.file()));
        }
        let position = match after {
            Some(index) if index < self.items.len() => index + 1,
            Some(index) => {
                return Err(DerivationError::InvalidIndex {
                    index,
                    len: self.items.len(),
                });
            }
            None => 0,
        };
        self.items.insert(position, drv);
        Ok(self.changed(Change::Added))
    }

    /// Remove the entry after position `after`, or the first entry when
    /// `after` is `None`.
    ///
    /// Returns `Ok(None)` for an empty list, otherwise the removed entry.
    pub fn remove_next(&mut self, after: Option<usize>) -> DerivationResult<Option<Rc<Derivation>>> {
        if self.items.is_empty() {
            return Ok(None);
        }
        let position = match after {
            Some(index) if index + 1 < self.items.len() => index + 1,
            Some(index) => {
                return Err(DerivationError::InvalidIndex {
                    index,
                    len: self.items.len(),
                });
            }
            None => 0,
        };
        let removed = self.items.remove(position);
        self.changed(Change::Removed);
        Ok(Some(removed))
    }

    /// Merge a derivation into the list.
    ///
    /// - no entry for its file: appended, `Added`
    /// - the very same `Rc` is already present: `None`
    /// - an entry held only by this list: lines merged in place
    /// - an entry shared with other owners: merged into a private copy,
    ///   which replaces the entry only if the merge added something
    pub fn merge_derivation(&mut self, drv: Rc<Derivation>) -> DerivationResult<Change> {
        if !drv.is_valid() {
            return Err(DerivationError::missing_file());
        }

        let Some(index) = self.find_index(drv.file()) else {
            self.items.push(drv);
            return Ok(self.changed(Change::Added));
        };

        let existing = &mut self.items[index];
        if Rc::ptr_eq(existing, &drv) {
            return Ok(Change::None);
        }

        let change = match Rc::get_mut(existing) {
            Some(owned) => owned.merge_lines(&drv),
            None => {
                let mut copy = Derivation::clone(existing);
                let change = copy.merge_lines(&drv);
                if change.is_changed() {
                    tracing::trace!(file = drv.file(), "copy-on-write derivation merge");
                    *existing = Rc::new(copy);
                }
                change
            }
        };
        Ok(self.changed(change))
    }

    /// Record that `file` (and, if given, `line`) contributed to the value.
    ///
    /// Follows the same copy-on-write rules as
    /// [`merge_derivation`](Self::merge_derivation).
    pub fn merge_file_line(&mut self, file: &str, line: Option<u32>) -> DerivationResult<Change> {
        let Some(index) = self.find_index(file) else {
            let mut drv = Derivation::for_file(file)?;
            if let Some(line) = line {
                drv.add_line(line);
            }
            self.items.push(Rc::new(drv));
            return Ok(self.changed(Change::Added));
        };

        let Some(line) = line else {
            return Ok(Change::None);
        };

        let existing = &mut self.items[index];
        let added = match Rc::get_mut(existing) {
            Some(owned) => owned.add_line(line),
            None => {
                let mut copy = Derivation::clone(existing);
                let added = copy.add_line(line);
                if added.is_changed() {
                    tracing::trace!(file, line, "copy-on-write derivation line");
                    *existing = Rc::new(copy);
                }
                added
            }
        };

        let change = if added.is_changed() {
            Change::Modified
        } else {
            Change::None
        };
        Ok(self.changed(change))
    }

    /// Merge every derivation of `other`; entries new to this list are
    /// shared with `other`, not copied.
    pub fn merge_list(&mut self, other: &DerivationList) -> DerivationResult<Change> {
        let mut change = Change::None;
        for drv in &other.items {
            change = change.merge(self.merge_derivation(Rc::clone(drv))?);
        }
        Ok(change)
    }

    /// Parse a derivation list string and merge it in.
    ///
    /// Nothing is merged if the string fails to parse.
    pub fn merge_string_list(&mut self, input: &str) -> DerivationResult<Change> {
        let other = DerivationList::from_string(input)?;
        self.merge_list(&other)
    }

    /// Parse a space-separated derivation list.
    ///
    /// A file named more than once is merged into its first entry.
    ///
    /// # Example
    ///
    /// ```
    /// use lcfg_derivation::DerivationList;
    ///
    /// let list = DerivationList::from_string("foo.rpms:1,5 bar.h:7 foo.rpms:9").unwrap();
    /// assert_eq!(list.to_string(), "foo.rpms:1,5,9 bar.h:7");
    /// ```
    pub fn from_string(input: &str) -> DerivationResult<DerivationList> {
        let mut list = DerivationList::new();
        for token in split_separated(input) {
            let drv = Derivation::from_string(token)?;
            list.merge_derivation(Rc::new(drv))?;
        }
        Ok(list)
    }

    /// Sort the lines of every entry, copying shared entries first.
    ///
    /// Returns `Change::Modified` if any entry was reordered, which also
    /// clears the map id.
    pub fn sort_lines(&mut self) -> Change {
        let mut change = Change::None;
        for drv in &mut self.items {
            if !drv.lines_sorted() {
                Rc::make_mut(drv).sort_lines();
                change = Change::Modified;
            }
        }
        self.changed(change)
    }

    /// Serialise as space-separated derivations into `buf`, reusing its
    /// allocation. Lines are written in their current order. Returns the
    /// number of bytes written.
    pub fn to_string_buf(&self, options: WriteOptions, buf: &mut String) -> usize {
        let length: usize = self.items.iter().map(|drv| drv.get_length()).sum::<usize>()
            + self.items.len().saturating_sub(1);

        buf.clear();
        buf.reserve(length + options.suffix_len());
        for (i, drv) in self.items.iter().enumerate() {
            if i > 0 {
                buf.push(' ');
            }
            drv.append_to(buf);
        }
        options.finish(buf);
        buf.len()
    }
}

impl PartialEq for DerivationList {
    /// Same derivations in the same order; ids are ignored.
    fn eq(&self, other: &Self) -> bool {
        self.items.len() == other.items.len()
            && self
                .items
                .iter()
                .zip(&other.items)
                .all(|(a, b)| Rc::ptr_eq(a, b) || a == b)
    }
}

impl Eq for DerivationList {}

impl fmt::Display for DerivationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        self.to_string_buf(WriteOptions::default(), &mut buf);
        f.write_str(&buf)
    }
}

impl FromStr for DerivationList {
    type Err = DerivationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DerivationList::from_string(s)
    }
}

impl<'a> IntoIterator for &'a DerivationList {
    type Item = &'a Rc<Derivation>;
    type IntoIter = std::slice::Iter<'a, Rc<Derivation>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
