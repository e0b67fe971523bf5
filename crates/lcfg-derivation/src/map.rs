/*
 * map.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Interning table for derivation lists.
//!
//! Many resources share the same provenance, so derivation lists are kept
//! in an open-addressing hash table keyed by the content hash of their
//! string form. Looking a string up returns the resident list when there is
//! one, which both saves parsing and lets equal lists be shared as a single
//! `Rc`.
//!
//! Collisions are resolved by linear probing starting at `id % capacity`
//! and wrapping around once. The table grows when its load factor reaches
//! [`MapConfig::max_load`].

use std::rc::Rc;

use lcfg_util::{Change, content_hash};

use crate::config::MapConfig;
use crate::error::{DerivationError, DerivationResult};
use crate::list::DerivationList;

type Bucket = Option<Rc<DerivationList>>;

/// Result of probing for an id.
#[derive(Debug, Clone, Copy)]
enum Probe<'a> {
    /// First empty slot on the probe path.
    Vacant(usize),
    /// Slot holding a list with the same id, and that list.
    Occupied(usize, &'a Rc<DerivationList>),
}

#[cfg(test)]
impl Probe<'_> {
    fn slot(self) -> usize {
        match self {
            Probe::Vacant(slot) | Probe::Occupied(slot, _) => slot,
        }
    }
}

fn probe(buckets: &[Bucket], id: u64) -> Option<Probe<'_>> {
    let capacity = buckets.len();
    if capacity == 0 {
        return None;
    }
    let start = (id % capacity as u64) as usize;
    (start..capacity)
        .chain(0..start)
        .find_map(|slot| match &buckets[slot] {
            None => Some(Probe::Vacant(slot)),
            Some(list) if list.id() == Some(id) => Some(Probe::Occupied(slot, list)),
            Some(_) => None,
        })
}

/// The list's id, computing and storing it from the string form if unset.
fn list_id(list: &DerivationList) -> u64 {
    match list.id() {
        Some(id) => id,
        None => {
            let id = content_hash(&list.to_string());
            list.set_id(id);
            id
        }
    }
}

/// Put `list` into `buckets` without ever resizing.
fn place(buckets: &mut [Bucket], list: Rc<DerivationList>, id: u64) -> DerivationResult<Change> {
    match probe(buckets, id) {
        Some(Probe::Vacant(slot)) => {
            tracing::trace!(id, slot, "derivation list placed in empty slot");
            buckets[slot] = Some(list);
            Ok(Change::Added)
        }
        Some(Probe::Occupied(slot, _)) => {
            tracing::trace!(id, slot, "derivation list replaced");
            buckets[slot] = Some(list);
            Ok(Change::Replaced)
        }
        None => {
            tracing::warn!(id, capacity = buckets.len(), "no free slot in derivation map");
            Err(DerivationError::NoFreeSlot {
                id,
                capacity: buckets.len(),
            })
        }
    }
}

/// Open-addressing map from content hash to shared derivation list.
#[derive(Debug)]
pub struct DerivationMap {
    buckets: Vec<Bucket>,
    entries: usize,
    config: MapConfig,
}

impl Default for DerivationMap {
    fn default() -> Self {
        Self::new()
    }
}

impl DerivationMap {
    /// An empty map with the default [`MapConfig`].
    pub fn new() -> Self {
        let config = MapConfig::default();
        Self {
            buckets: vec![None; config.initial_capacity],
            entries: 0,
            config,
        }
    }

    /// An empty map with a caller-supplied sizing policy.
    pub fn with_config(config: MapConfig) -> DerivationResult<Self> {
        config.validate()?;
        Ok(Self {
            buckets: vec![None; config.initial_capacity],
            entries: 0,
            config,
        })
    }

    /// Number of resident lists.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Number of buckets.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.entries as f64 / self.buckets.len() as f64
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Resident lists in slot order.
    pub fn iter(&self) -> impl Iterator<Item = &Rc<DerivationList>> {
        self.buckets.iter().flatten()
    }

    /// The resident list with this id.
    pub fn find_list(&self, id: u64) -> Option<&Rc<DerivationList>> {
        match probe(&self.buckets, id)? {
            Probe::Occupied(_, list) => Some(list),
            Probe::Vacant(_) => None,
        }
    }

    /// Store `list` under its id.
    ///
    /// A list without an id is given the hash of its string form first.
    /// Returns `Change::Added` for a new id and `Change::Replaced` when a
    /// list with the same id was already resident.
    pub fn insert_list(&mut self, list: Rc<DerivationList>) -> DerivationResult<Change> {
        let id = list_id(&list);
        let change = place(&mut self.buckets, list, id)?;
        if change == Change::Added {
            self.entries += 1;
            self.grow_if_needed()?;
        }
        Ok(change)
    }

    /// The list for a derivation list string, parsing and storing it only
    /// if no list with the same hash is resident.
    ///
    /// # Example
    ///
    /// ```
    /// use std::rc::Rc;
    /// use lcfg_derivation::DerivationMap;
    ///
    /// let mut map = DerivationMap::new();
    /// let a = map.find_or_insert_string("foo.rpms:1,5 bar.h:7").unwrap();
    /// let b = map.find_or_insert_string("foo.rpms:1,5 bar.h:7").unwrap();
    /// assert!(Rc::ptr_eq(&a, &b));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn find_or_insert_string(&mut self, input: &str) -> DerivationResult<Rc<DerivationList>> {
        let id = content_hash(input);
        let slot = match probe(&self.buckets, id) {
            Some(Probe::Vacant(slot)) => slot,
            Some(Probe::Occupied(slot, list)) => {
                tracing::trace!(id, slot, "derivation list found");
                return Ok(Rc::clone(list));
            }
            None => {
                tracing::warn!(id, capacity = self.capacity(), "no free slot in derivation map");
                return Err(DerivationError::NoFreeSlot {
                    id,
                    capacity: self.capacity(),
                });
            }
        };

        let list = DerivationList::from_string(input)?;
        list.set_id(id);
        let list = Rc::new(list);
        self.buckets[slot] = Some(Rc::clone(&list));
        self.entries += 1;
        self.grow_if_needed()?;
        Ok(list)
    }

    fn grow_if_needed(&mut self) -> DerivationResult<()> {
        if self.load_factor() < self.config.max_load {
            return Ok(());
        }
        let wanted = (self.entries as f64 / self.config.target_load).ceil() as usize;
        self.resize(wanted.max(self.capacity() + 1))
    }

    /// Rehash every resident list into a table of `capacity` buckets.
    ///
    /// The new table is built aside and only swapped in once every list has
    /// been placed.
    fn resize(&mut self, capacity: usize) -> DerivationResult<()> {
        tracing::debug!(
            old_capacity = self.capacity(),
            new_capacity = capacity,
            entries = self.entries,
            "resizing derivation map"
        );
        let mut buckets: Vec<Bucket> = vec![None; capacity];
        for list in self.buckets.iter().flatten() {
            place(&mut buckets, Rc::clone(list), list_id(list))?;
        }
        self.buckets = buckets;
        Ok(())
    }
}
