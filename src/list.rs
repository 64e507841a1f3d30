//! Arena-backed doubly linked list with stable handles.
//!
//! Nodes live in a slot arena owned by the list and are linked by slot index
//! instead of pointers. Callers keep [`Handle`]s in their own maps to reach a
//! node in O(1) for removal or reordering without walking the list.
//!
//! ```text
//!   slots: Vec<Slot<T>>                         free: Vec<usize>
//!   ┌───┬──────────────────────────────────┐    ┌───┐
//!   │ 0 │ gen 0 { A, prev: -, next: 2 }    │    │ 1 │  (reused by the next add)
//!   │ 1 │ gen 1 (vacant)                   │    └───┘
//!   │ 2 │ gen 0 { B, prev: 0, next: - }    │
//!   └───┴──────────────────────────────────┘
//!
//!   head ─► [0] ◄──► [2] ◄── tail
//! ```
//!
//! Every slot carries a generation that is bumped when the slot is freed, so a
//! handle kept past the removal of its node no longer resolves. Operations on
//! such a stale handle are no-ops.
//!
//! This module is internal infrastructure for the eviction policies. The list
//! never deduplicates values; policies guarantee key uniqueness themselves.

use core::fmt;

/// A stable, non-owning reference to a node in a [`List`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u32,
}

struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// A doubly linked list whose nodes are stored in an internal arena.
///
/// All operations except iteration and [`clear`](Self::clear) are O(1).
pub struct List<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> List<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        List {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty list with room for `capacity` nodes before reallocating.
    #[cfg(test)]
    pub fn with_capacity(capacity: usize) -> Self {
        List {
            slots: Vec::with_capacity(capacity),
            ..List::new()
        }
    }

    /// Returns the number of nodes in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list contains no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if `handle` refers to a node currently in this list.
    #[cfg(test)]
    pub fn contains(&self, handle: Handle) -> bool {
        self.resolve(handle).is_some()
    }

    /// Returns the value stored at `handle`, or `None` for a stale handle.
    #[cfg(test)]
    pub fn get(&self, handle: Handle) -> Option<&T> {
        let index = self.resolve(handle)?;
        self.node(index).map(|node| &node.value)
    }

    /// Returns the value at the front of the list.
    #[cfg(test)]
    pub fn front(&self) -> Option<&T> {
        self.head
            .and_then(|index| self.node(index))
            .map(|node| &node.value)
    }

    /// Returns the value at the back of the list.
    #[cfg(test)]
    pub fn back(&self) -> Option<&T> {
        self.tail
            .and_then(|index| self.node(index))
            .map(|node| &node.value)
    }

    /// Inserts `value` at the front and returns its handle.
    pub fn add_to_front(&mut self, value: T) -> Handle {
        let index = self.alloc(value);
        self.link_front(index);
        self.handle_for(index)
    }

    /// Inserts `value` at the back and returns its handle.
    #[allow(dead_code)]
    pub fn add_to_end(&mut self, value: T) -> Handle {
        let index = self.alloc(value);
        self.link_back(index);
        self.handle_for(index)
    }

    /// Removes the node at `handle` and returns its value.
    ///
    /// A stale or foreign handle is ignored and `None` is returned.
    pub fn remove_node(&mut self, handle: Handle) -> Option<T> {
        let index = self.resolve(handle)?;
        self.unlink(index);
        self.release(index)
    }

    /// Removes and returns the value at the front of the list.
    #[allow(dead_code)]
    pub fn remove_from_front(&mut self) -> Option<T> {
        let index = self.head?;
        self.unlink(index);
        self.release(index)
    }

    /// Removes and returns the value at the back of the list.
    pub fn remove_from_end(&mut self) -> Option<T> {
        let index = self.tail?;
        self.unlink(index);
        self.release(index)
    }

    /// Moves the node at `handle` to the front of the list.
    ///
    /// Returns `false` if the handle is stale. Moving the current front node
    /// leaves the list untouched.
    pub fn move_to_front(&mut self, handle: Handle) -> bool {
        let Some(index) = self.resolve(handle) else {
            return false;
        };
        if self.head != Some(index) {
            self.unlink(index);
            self.link_front(index);
        }
        true
    }

    /// Removes every node in one pass over the arena. Outstanding handles
    /// become stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Returns an iterator over the values from front to back.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
            remaining: self.len,
        }
    }

    fn resolve(&self, handle: Handle) -> Option<usize> {
        let slot = self.slots.get(handle.index)?;
        (slot.generation == handle.generation && slot.node.is_some()).then_some(handle.index)
    }

    fn handle_for(&self, index: usize) -> Handle {
        Handle {
            index,
            generation: self.slots[index].generation,
        }
    }

    fn node(&self, index: usize) -> Option<&Node<T>> {
        self.slots.get(index).and_then(|slot| slot.node.as_ref())
    }

    fn node_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(index).and_then(|slot| slot.node.as_mut())
    }

    /// Stores a detached node and returns its slot index.
    fn alloc(&mut self, value: T) -> usize {
        let node = Node {
            value,
            prev: None,
            next: None,
        };
        self.len += 1;
        match self.free.pop() {
            Some(index) => {
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        }
    }

    /// Frees a detached node's slot and returns its value.
    fn release(&mut self, index: usize) -> Option<T> {
        let slot = self.slots.get_mut(index)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.len -= 1;
        Some(node.value)
    }

    /// Splices a node out of the chain, leaving it allocated but detached.
    fn unlink(&mut self, index: usize) {
        let Some((prev, next)) = self.node(index).map(|node| (node.prev, node.next)) else {
            return;
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.node_mut(p) {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.node_mut(n) {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }

        if let Some(node) = self.node_mut(index) {
            node.prev = None;
            node.next = None;
        }
    }

    fn link_front(&mut self, index: usize) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(index) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(node) = self.node_mut(h) {
                    node.prev = Some(index);
                }
            }
            None => self.tail = Some(index),
        }
        self.head = Some(index);
    }

    fn link_back(&mut self, index: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.node_mut(index) {
            node.prev = old_tail;
            node.next = None;
        }
        match old_tail {
            Some(t) => {
                if let Some(node) = self.node_mut(t) {
                    node.next = Some(index);
                }
            }
            None => self.head = Some(index),
        }
        self.tail = Some(index);
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        List::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Front-to-back iterator over a [`List`].
pub struct Iter<'a, T> {
    list: &'a List<T>,
    current: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.current?)?;
        self.current = node.next;
        self.remaining = self.remaining.saturating_sub(1);
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish()
    }
}
