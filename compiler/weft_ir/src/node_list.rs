//! Arena-backed owned ordered lists.
//!
//! `NodeList<T>` is the sequence primitive for instruction and declaration
//! lists: an arena of doubly-linked nodes addressed by stable `NodeId`
//! handles instead of pointers. It gives O(1) end-append and O(1)
//! insert/remove at a handle, and each list exclusively owns its elements;
//! moving an element between lists goes through `remove`/`push_back` (or
//! `append` for whole lists), so no element is ever in two lists at once.
//!
//! Handles stay valid across mutation elsewhere in the list. A handle is
//! invalidated only by removing its own node; the slot may then be reused by
//! a later insertion.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Handle to a node in a [`NodeList`].
///
/// Only meaningful together with the list that issued it.
#[derive(Copy, Clone, Eq, PartialEq)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Invalid node ID (sentinel value).
    pub const INVALID: NodeId = NodeId(u32::MAX);

    /// Create a new `NodeId` from a raw slot index.
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Get the slot index.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Check if this is a valid ID.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl Hash for NodeId {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

#[derive(Clone)]
enum Slot<T> {
    Occupied { value: T, prev: NodeId, next: NodeId },
    Free { next_free: NodeId },
}

/// Ordered, owning list with stable handles.
#[derive(Clone)]
pub struct NodeList<T> {
    slots: Vec<Slot<T>>,
    head: NodeId,
    tail: NodeId,
    free: NodeId,
    len: usize,
}

impl<T> NodeList<T> {
    /// Create an empty list.
    pub const fn new() -> Self {
        NodeList {
            slots: Vec::new(),
            head: NodeId::INVALID,
            tail: NodeId::INVALID,
            free: NodeId::INVALID,
            len: 0,
        }
    }

    /// Number of elements.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Handle of the first element, if any.
    #[inline]
    pub fn head_id(&self) -> Option<NodeId> {
        self.head.is_valid().then_some(self.head)
    }

    /// Handle of the last element, if any.
    #[inline]
    pub fn tail_id(&self) -> Option<NodeId> {
        self.tail.is_valid().then_some(self.tail)
    }

    /// Handle of the element after `id`, if any.
    pub fn next_id(&self, id: NodeId) -> Option<NodeId> {
        let (_, next) = self.links(id);
        next.is_valid().then_some(next)
    }

    /// Handle of the element before `id`, if any.
    pub fn prev_id(&self, id: NodeId) -> Option<NodeId> {
        let (prev, _) = self.links(id);
        prev.is_valid().then_some(prev)
    }

    /// Borrow the element at `id`, or `None` if the slot is not live.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// Mutably borrow the element at `id`, or `None` if the slot is not live.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Occupied { value, .. }) => Some(value),
            _ => None,
        }
    }

    /// Borrow the first element.
    pub fn front(&self) -> Option<&T> {
        self.head_id().and_then(|id| self.get(id))
    }

    /// Borrow the last element.
    pub fn back(&self) -> Option<&T> {
        self.tail_id().and_then(|id| self.get(id))
    }

    /// Append at the end. O(1).
    pub fn push_back(&mut self, value: T) -> NodeId {
        let tail = self.tail;
        let id = self.alloc(value, tail, NodeId::INVALID);
        if tail.is_valid() {
            self.set_next(tail, id);
        } else {
            self.head = id;
        }
        self.tail = id;
        self.len += 1;
        id
    }

    /// Prepend at the front. O(1).
    pub fn push_front(&mut self, value: T) -> NodeId {
        let head = self.head;
        let id = self.alloc(value, NodeId::INVALID, head);
        if head.is_valid() {
            self.set_prev(head, id);
        } else {
            self.tail = id;
        }
        self.head = id;
        self.len += 1;
        id
    }

    /// Insert before the node at `at`. O(1).
    ///
    /// # Panics
    /// Panics if `at` is not a live handle of this list.
    pub fn insert_before(&mut self, at: NodeId, value: T) -> NodeId {
        let (prev, _) = self.links(at);
        let id = self.alloc(value, prev, at);
        if prev.is_valid() {
            self.set_next(prev, id);
        } else {
            self.head = id;
        }
        self.set_prev(at, id);
        self.len += 1;
        id
    }

    /// Insert after the node at `at`. O(1).
    ///
    /// # Panics
    /// Panics if `at` is not a live handle of this list.
    pub fn insert_after(&mut self, at: NodeId, value: T) -> NodeId {
        let (_, next) = self.links(at);
        let id = self.alloc(value, at, next);
        if next.is_valid() {
            self.set_prev(next, id);
        } else {
            self.tail = id;
        }
        self.set_next(at, id);
        self.len += 1;
        id
    }

    /// Detach and return the node at `id`. O(1). The handle becomes stale;
    /// all other handles stay valid.
    ///
    /// # Panics
    /// Panics if `id` is not a live handle of this list.
    pub fn remove(&mut self, id: NodeId) -> T {
        let (prev, next) = self.links(id);
        let slot = std::mem::replace(
            &mut self.slots[id.index()],
            Slot::Free {
                next_free: self.free,
            },
        );
        self.free = id;
        let Slot::Occupied { value, .. } = slot else {
            unreachable!("links() already checked the slot is occupied");
        };
        if prev.is_valid() {
            self.set_next(prev, next);
        } else {
            self.head = next;
        }
        if next.is_valid() {
            self.set_prev(next, prev);
        } else {
            self.tail = prev;
        }
        self.len -= 1;
        value
    }

    /// Detach and return the first element.
    pub fn pop_front(&mut self) -> Option<T> {
        self.head_id().map(|id| self.remove(id))
    }

    /// Detach and return the last element.
    pub fn pop_back(&mut self) -> Option<T> {
        self.tail_id().map(|id| self.remove(id))
    }

    /// Move every element of `other` to the end of `self`, preserving order.
    /// `other` is left empty. Ownership of each element transfers; handles
    /// issued by `other` do not carry over.
    pub fn append(&mut self, other: &mut NodeList<T>) {
        while let Some(value) = other.pop_front() {
            self.push_back(value);
        }
    }

    /// Iterate front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cur: self.head,
            remaining: self.len,
        }
    }

    fn alloc(&mut self, value: T, prev: NodeId, next: NodeId) -> NodeId {
        if self.free.is_valid() {
            let id = self.free;
            match self.slots[id.index()] {
                Slot::Free { next_free } => self.free = next_free,
                Slot::Occupied { .. } => {
                    unreachable!("free list points at an occupied slot")
                }
            }
            self.slots[id.index()] = Slot::Occupied { value, prev, next };
            id
        } else {
            #[expect(clippy::cast_possible_truncation)]
            let id = NodeId::new(self.slots.len() as u32);
            self.slots.push(Slot::Occupied { value, prev, next });
            id
        }
    }

    fn links(&self, id: NodeId) -> (NodeId, NodeId) {
        match self.slots.get(id.index()) {
            Some(Slot::Occupied { prev, next, .. }) => (*prev, *next),
            _ => panic!("stale or foreign node handle: {id:?}"),
        }
    }

    fn set_prev(&mut self, id: NodeId, prev: NodeId) {
        match &mut self.slots[id.index()] {
            Slot::Occupied { prev: slot, .. } => *slot = prev,
            Slot::Free { .. } => unreachable!("linked node is free"),
        }
    }

    fn set_next(&mut self, id: NodeId, next: NodeId) {
        match &mut self.slots[id.index()] {
            Slot::Occupied { next: slot, .. } => *slot = next,
            Slot::Free { .. } => unreachable!("linked node is free"),
        }
    }
}

impl<T> Default for NodeList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq> PartialEq for NodeList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for NodeList<T> {}

impl<T> FromIterator<T> for NodeList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = NodeList::new();
        for value in iter {
            list.push_back(value);
        }
        list
    }
}

impl<'a, T> IntoIterator for &'a NodeList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for NodeList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Forward iterator over a [`NodeList`].
pub struct Iter<'a, T> {
    list: &'a NodeList<T>,
    cur: NodeId,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.cur.is_valid() {
            return None;
        }
        let id = self.cur;
        let (_, next) = self.list.links(id);
        self.cur = next;
        self.remaining -= 1;
        self.list.get(id)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

// Size assertion to prevent accidental regressions
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::NodeId;
    crate::static_assert_size!(NodeId, 4);
}
