/*
 * tag_list.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Ordered lists of shared tags.
//!
//! A [`TagList`] is a doubly-linked list whose nodes live in an arena and are
//! addressed by generational [`NodeId`] handles: insert-after and removal
//! given a node are O(1), and a handle to a removed node is rejected with
//! [`TagError::InvalidNode`].
//!
//! Nodes hold `Rc<Tag>`; the list owns only its link structure. Cloning a
//! list, or building a new one with the set operations, shares the tags.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use lcfg_util::{Change, WriteOptions, split_separated};

use crate::error::{TagError, TagResult};
use crate::iter::TagIter;
use crate::tag::Tag;

/// Handle to a node in one particular [`TagList`].
///
/// A handle stays valid until its node is removed. Handles are only
/// meaningful for the list that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Debug)]
struct Node {
    tag: Rc<Tag>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// A doubly-linked, ordered list of tags.
#[derive(Default)]
pub struct TagList {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    /// The node after `id`, or `None` at the tail (or for a stale handle).
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.next)
    }

    /// The node before `id`, or `None` at the head (or for a stale handle).
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.prev)
    }

    /// The tag stored at `id`.
    pub fn tag(&self, id: NodeId) -> Option<&Rc<Tag>> {
        self.node(id).map(|node| &node.tag)
    }

    pub fn first_tag(&self) -> Option<&Rc<Tag>> {
        self.head.and_then(|id| self.tag(id))
    }

    pub fn last_tag(&self) -> Option<&Rc<Tag>> {
        self.tail.and_then(|id| self.tag(id))
    }

    /// Whether `id` refers to a live node of this list.
    pub fn is_valid_node(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    /// Cursor positioned before the head.
    pub fn iter(&self) -> TagIter<'_> {
        TagIter::new(self)
    }

    /// The tag names in list order.
    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|tag| tag.name()).collect()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        let slot = self.slots.get(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_ref()
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.node.as_mut()
    }

    fn set_next(&mut self, id: NodeId, next: Option<NodeId>) {
        if let Some(node) = self.node_mut(id) {
            node.next = next;
        }
    }

    fn set_prev(&mut self, id: NodeId, prev: Option<NodeId>) {
        if let Some(node) = self.node_mut(id) {
            node.prev = prev;
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index];
            slot.node = Some(node);
            NodeId {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len();
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId {
                index,
                generation: 0,
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Option<Node> {
        let slot = self.slots.get_mut(id.index)?;
        if slot.generation != id.generation {
            return None;
        }
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Some(node)
    }

    /// Insert `tag` after `after`, or at the head when `after` is `None`.
    ///
    /// The tag must be valid. The list keeps a shared reference to it.
    pub fn insert_next(&mut self, after: Option<NodeId>, tag: Rc<Tag>) -> TagResult<NodeId> {
        if !tag.is_valid() {
            return Err(TagError::InvalidTag {
                reason: format!("cannot insert invalid tag '{}'", tag.name()),
            });
        }

        let next = match after {
            Some(id) => self.node(id).ok_or(TagError::InvalidNode)?.next,
            None => self.head,
        };
        Ok(self.link(after, next, tag))
    }

    /// Link a new node between `prev` and `next`, which must be adjacent.
    fn link(&mut self, prev: Option<NodeId>, next: Option<NodeId>, tag: Rc<Tag>) -> NodeId {
        let id = self.alloc(Node { tag, prev, next });

        match prev {
            Some(prev) => self.set_next(prev, Some(id)),
            None => self.head = Some(id),
        }
        match next {
            Some(next) => self.set_prev(next, Some(id)),
            None => self.tail = Some(id),
        }

        self.len += 1;
        id
    }

    /// Remove `target`, or the head when `target` is `None`.
    ///
    /// Returns `Ok(None)` when the list is empty, otherwise the detached tag.
    pub fn remove(&mut self, target: Option<NodeId>) -> TagResult<Option<Rc<Tag>>> {
        if self.is_empty() {
            return Ok(None);
        }

        let id = match target {
            Some(id) => id,
            None => self.head.ok_or(TagError::InvalidNode)?,
        };
        let node = self.release(id).ok_or(TagError::InvalidNode)?;

        match node.prev {
            Some(prev) => self.set_next(prev, node.next),
            None => self.head = node.next,
        }
        match node.next {
            Some(next) => self.set_prev(next, node.prev),
            None => self.tail = node.prev,
        }

        self.len -= 1;
        Ok(Some(node.tag))
    }

    /// Append a tag to the end of the list.
    pub fn append(&mut self, tag: Rc<Tag>) -> TagResult<Change> {
        self.insert_next(self.tail, tag)?;
        Ok(Change::Added)
    }

    /// Insert a tag at the start of the list.
    pub fn prepend(&mut self, tag: Rc<Tag>) -> TagResult<Change> {
        self.insert_next(None, tag)?;
        Ok(Change::Added)
    }

    /// Append a tag taken from another list; it was validated on the way in.
    fn push_back(&mut self, tag: &Rc<Tag>) {
        self.link(self.tail, None, Rc::clone(tag));
    }

    /// First node whose tag name equals `name`.
    pub fn find_node(&self, name: &str) -> Option<NodeId> {
        let mut cur = self.head;
        while let Some(id) = cur {
            let node = self.node(id)?;
            if node.tag.matches(name) {
                return Some(id);
            }
            cur = node.next;
        }
        None
    }

    /// First tag whose name equals `name`.
    pub fn find(&self, name: &str) -> Option<&Rc<Tag>> {
        self.find_node(name).and_then(|id| self.tag(id))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find_node(name).is_some()
    }

    /// Parse a whitespace-separated list of tags.
    ///
    /// Any of space, tab, CR or LF separates tags and runs collapse. The first
    /// invalid tag aborts the parse; nothing partially built escapes.
    ///
    /// # Example
    ///
    /// ```
    /// use lcfg_tags::TagList;
    ///
    /// let list = TagList::from_string("web devel\tprod\n").unwrap();
    /// assert_eq!(list.names(), vec!["web", "devel", "prod"]);
    /// ```
    pub fn from_string(input: &str) -> TagResult<TagList> {
        let mut list = TagList::new();
        for token in split_separated(input) {
            let tag = Tag::from_string(token)?;
            list.append(tag)?;
        }
        Ok(list)
    }

    /// Serialize as space-separated names into `buf`, reusing its
    /// allocation. Returns the number of bytes written.
    pub fn to_string_buf(&self, options: WriteOptions, buf: &mut String) -> usize {
        let names_len: usize = self.iter().map(|tag| tag.len()).sum();
        let separators = self.len.saturating_sub(1);

        buf.clear();
        buf.reserve(names_len + separators + options.suffix_len());
        for (i, tag) in self.iter().enumerate() {
            if i > 0 {
                buf.push(' ');
            }
            buf.push_str(tag.name());
        }
        options.finish(buf);
        buf.len()
    }

    /// Sort in place by tag name (byte-wise ascending).
    ///
    /// This is a bubble sort that swaps tags between neighbouring nodes, so
    /// node handles keep their positions.
    pub fn sort(&mut self) {
        let mut swapped = true;
        while swapped {
            swapped = false;
            let mut cur = self.head;
            while let Some(id) = cur {
                let Some(next) = self.next(id) else {
                    break;
                };
                if self.swap_if_greater(id, next) {
                    swapped = true;
                }
                cur = Some(next);
            }
        }
    }

    fn swap_if_greater(&mut self, a: NodeId, b: NodeId) -> bool {
        let (Some(tag_a), Some(tag_b)) = (self.tag(a), self.tag(b)) else {
            return false;
        };
        if tag_a.compare(tag_b) != Ordering::Greater {
            return false;
        }
        let (tag_a, tag_b) = (Rc::clone(tag_a), Rc::clone(tag_b));
        if let Some(node) = self.node_mut(a) {
            node.tag = tag_b;
        }
        if let Some(node) = self.node_mut(b) {
            node.tag = tag_a;
        }
        true
    }

    /// New list keeping the first occurrence of every name.
    pub fn unique(&self) -> TagList {
        let mut result = TagList::new();
        for tag in self.iter() {
            if !result.contains(tag.name()) {
                result.push_back(tag);
            }
        }
        result
    }

    /// `unique(self)` followed by the tags of `other` whose names are new.
    pub fn union(&self, other: &TagList) -> TagList {
        let mut result = self.unique();
        for tag in other.iter() {
            if !result.contains(tag.name()) {
                result.push_back(tag);
            }
        }
        result
    }

    /// Tags of `self`, in order, whose names also occur in `other`.
    pub fn intersection(&self, other: &TagList) -> TagList {
        let mut result = TagList::new();
        for tag in self.iter() {
            if other.contains(tag.name()) && !result.contains(tag.name()) {
                result.push_back(tag);
            }
        }
        result
    }

    /// Tags of `self`, in order, whose names do not occur in `other`.
    pub fn subtract(&self, other: &TagList) -> TagList {
        let mut result = TagList::new();
        for tag in self.iter() {
            if !other.contains(tag.name()) && !result.contains(tag.name()) {
                result.push_back(tag);
            }
        }
        result
    }

    /// Parse `name` and append it.
    pub fn mutate_append(&mut self, name: &str) -> TagResult<Change> {
        let tag = Tag::from_string(name)?;
        self.append(tag)
    }

    /// Parse `name` and insert it at the head.
    pub fn mutate_prepend(&mut self, name: &str) -> TagResult<Change> {
        let tag = Tag::from_string(name)?;
        self.prepend(tag)
    }

    /// Append `name` unless a tag with that name is already present.
    pub fn mutate_add(&mut self, name: &str) -> TagResult<Change> {
        let tag = Tag::from_string(name)?;
        if self.contains(tag.name()) {
            return Ok(Change::None);
        }
        self.append(tag)
    }

    /// Append every tag in a tag-list string.
    ///
    /// The whole string is parsed before the list is touched.
    pub fn mutate_extend(&mut self, input: &str) -> TagResult<Change> {
        let extra = TagList::from_string(input)?;
        if extra.is_empty() {
            return Ok(Change::None);
        }
        for tag in extra.iter() {
            self.push_back(tag);
        }
        Ok(Change::Added)
    }

    /// Rename tags called `old` to `new`.
    ///
    /// Only the first match is replaced unless `global` is set. `new` is
    /// validated before anything changes, and all replaced positions share
    /// the one parsed tag.
    pub fn mutate_replace(&mut self, old: &str, new: &str, global: bool) -> TagResult<Change> {
        let replacement = Tag::from_string(new)?;

        let mut change = Change::None;
        let mut cur = self.head;
        while let Some(id) = cur {
            let Some(node) = self.node_mut(id) else {
                break;
            };
            cur = node.next;
            if node.tag.matches(old) {
                node.tag = Rc::clone(&replacement);
                change = Change::Replaced;
                if !global {
                    break;
                }
            }
        }

        tracing::trace!(old, new, global, %change, "tag list replace");
        Ok(change)
    }

    /// Remove tags called `name`; only the first unless `global` is set.
    pub fn mutate_remove(&mut self, name: &str, global: bool) -> TagResult<Change> {
        let mut change = Change::None;
        let mut cur = self.head;
        while let Some(id) = cur {
            cur = self.next(id);
            let matched = self.tag(id).is_some_and(|tag| tag.matches(name));
            if matched {
                self.remove(Some(id))?;
                change = Change::Removed;
                if !global {
                    break;
                }
            }
        }
        Ok(change)
    }
}

impl Clone for TagList {
    /// A compact copy that shares every tag with the original.
    fn clone(&self) -> Self {
        let mut list = TagList::new();
        for tag in self.iter() {
            list.push_back(tag);
        }
        list
    }
}

impl PartialEq for TagList {
    /// Lists are equal when they hold the same names in the same order.
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.matches(b.name()))
    }
}

impl Eq for TagList {}

impl fmt::Debug for TagList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter().map(|tag| tag.name())).finish()
    }
}

impl fmt::Display for TagList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::new();
        self.to_string_buf(WriteOptions::default(), &mut buf);
        f.write_str(&buf)
    }
}

impl FromStr for TagList {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TagList::from_string(s)
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Rc<Tag>;
    type IntoIter = TagIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
