/*
 * iter.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Bidirectional cursor over a [`TagList`].

use std::rc::Rc;

use crate::tag::Tag;
use crate::tag_list::{NodeId, TagList};

/// A cursor that can walk a tag list in either direction.
///
/// The cursor starts on a sentinel that sits both before the head and after
/// the tail: `next` from the sentinel yields the head, `prev` yields the
/// tail. Walking off either end lands back on the sentinel, so the cursor
/// is not fused; a further `next` starts over from the head.
///
/// The cursor borrows the list, so the list cannot be restructured (sorted,
/// spliced) while a cursor is live.
#[derive(Debug, Clone)]
pub struct TagIter<'a> {
    list: &'a TagList,
    current: Option<NodeId>,
}

impl<'a> TagIter<'a> {
    pub fn new(list: &'a TagList) -> Self {
        Self {
            list,
            current: None,
        }
    }

    /// Return to the sentinel.
    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn has_next(&self) -> bool {
        match self.current {
            None => !self.list.is_empty(),
            Some(id) => self.list.next(id).is_some(),
        }
    }

    pub fn has_prev(&self) -> bool {
        match self.current {
            None => !self.list.is_empty(),
            Some(id) => self.list.prev(id).is_some(),
        }
    }

    /// Tag under the cursor, `None` on the sentinel.
    pub fn current(&self) -> Option<&'a Rc<Tag>> {
        self.current.and_then(|id| self.list.tag(id))
    }

    /// Node under the cursor, `None` on the sentinel.
    pub fn current_node(&self) -> Option<NodeId> {
        self.current
    }

    /// Step backwards and return the tag there.
    pub fn prev(&mut self) -> Option<&'a Rc<Tag>> {
        self.current = match self.current {
            None => self.list.tail(),
            Some(id) => self.list.prev(id),
        };
        self.current()
    }
}

impl<'a> Iterator for TagIter<'a> {
    type Item = &'a Rc<Tag>;

    fn next(&mut self) -> Option<Self::Item> {
        self.current = match self.current {
            None => self.list.head(),
            Some(id) => self.list.next(id),
        };
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward() {
        let list = TagList::from_string("a b c").unwrap();
        let mut iter = list.iter();
        assert!(iter.has_next());
        assert_eq!(iter.next().unwrap().name(), "a");
        assert_eq!(iter.next().unwrap().name(), "b");
        assert_eq!(iter.next().unwrap().name(), "c");
        assert!(!iter.has_next());
        assert!(iter.next().is_none());
        assert!(iter.current().is_none());
    }

    #[test]
    fn test_backward_from_sentinel() {
        let list = TagList::from_string("a b c").unwrap();
        let mut iter = list.iter();
        assert_eq!(iter.prev().unwrap().name(), "c");
        assert_eq!(iter.prev().unwrap().name(), "b");
        assert_eq!(iter.prev().unwrap().name(), "a");
        assert!(!iter.has_prev());
        assert!(iter.prev().is_none());
    }

    #[test]
    fn test_change_direction_and_reset() {
        let list = TagList::from_string("a b c").unwrap();
        let mut iter = list.iter();
        iter.next();
        iter.next();
        assert_eq!(iter.current().unwrap().name(), "b");
        assert_eq!(iter.prev().unwrap().name(), "a");
        assert_eq!(iter.current_node(), list.head());

        iter.reset();
        assert!(iter.current().is_none());
        assert_eq!(iter.next().unwrap().name(), "a");
    }

    #[test]
    fn test_empty_list() {
        let list = TagList::new();
        let mut iter = list.iter();
        assert!(!iter.has_next());
        assert!(!iter.has_prev());
        assert!(iter.next().is_none());
        assert!(iter.prev().is_none());
    }

    #[test]
    fn test_collect_names() {
        let list = TagList::from_string("x y").unwrap();
        let names: Vec<&str> = list.iter().map(|tag| tag.name()).collect();
        assert_eq!(names, vec!["x", "y"]);
    }
}
