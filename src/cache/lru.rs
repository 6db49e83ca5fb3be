//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.
//!
//! Keys live in a doubly linked list threaded through a slot arena, with a
//! hash index from key to slot. This gives O(1) move-to-front, removal and
//! eviction of the eldest key, unlike an order-scan over a deque.
//!
//! The tracker itself is single-threaded; the cache engine guards it with
//! one exclusive lock shared across all three operations.

use std::collections::HashMap;
use std::hash::Hash;

// == List Node ==
#[derive(Debug)]
struct Node<K> {
    key: K,
    /// Neighbor towards the most recently used end
    prev: Option<usize>,
    /// Neighbor towards the least recently used end
    next: Option<usize>,
}

// == LRU Tracker ==
/// Tracks key order by last access.
///
/// - Head = most recently used
/// - Tail = least recently used
#[derive(Debug, Default)]
pub struct LruTracker<K> {
    /// Slot arena holding list nodes; vacated slots are recycled
    slots: Vec<Option<Node<K>>>,
    /// Indices of vacated slots available for reuse
    free: Vec<usize>,
    /// Key to slot index
    index: HashMap<K, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K: Eq + Hash + Clone> LruTracker<K> {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            index: HashMap::new(),
            head: None,
            tail: None,
        }
    }

    // == Record Access ==
    /// Marks a key as most recently used.
    ///
    /// Inserts the key if absent, or moves it to the front if present. O(1).
    pub fn record_access(&mut self, key: &K) {
        if let Some(&idx) = self.index.get(key) {
            if self.head != Some(idx) {
                self.unlink(idx);
                self.push_front(idx);
            }
            return;
        }

        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(Node {
                    key: key.clone(),
                    prev: None,
                    next: None,
                });
                idx
            }
            None => {
                self.slots.push(Some(Node {
                    key: key.clone(),
                    prev: None,
                    next: None,
                }));
                self.slots.len() - 1
            }
        };
        self.index.insert(key.clone(), idx);
        self.push_front(idx);
    }

    // == Remove Key ==
    /// Removes a key from the tracker. Absent keys are a no-op.
    pub fn remove_key(&mut self, key: &K) {
        if let Some(idx) = self.index.remove(key) {
            self.unlink(idx);
            self.slots[idx] = None;
            self.free.push(idx);
        }
    }

    // == Evict Eldest ==
    /// Removes and returns the least recently used key.
    ///
    /// Returns None if the tracker is empty.
    pub fn evict_eldest(&mut self) -> Option<K> {
        let idx = self.tail?;
        self.unlink(idx);
        let node = self.slots[idx].take()?;
        self.free.push(idx);
        self.index.remove(&node.key);
        Some(node.key)
    }

    // == Clear ==
    /// Removes all tracked keys.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Peek Eldest ==
    /// Returns the least recently used key without removing it.
    #[allow(dead_code)]
    pub fn peek_eldest(&self) -> Option<&K> {
        self.tail
            .and_then(|idx| self.slots[idx].as_ref())
            .map(|node| &node.key)
    }

    // == Contains ==
    /// Checks whether a key is being tracked.
    #[allow(dead_code)]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    // == List Surgery ==
    /// Detaches the node at `idx` from the list, patching neighbors and the
    /// head/tail pointers. The slot itself is left in place.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match &self.slots[idx] {
            Some(node) => (node.prev, node.next),
            None => return,
        };

        match prev {
            Some(p) => {
                if let Some(node) = self.slots[p].as_mut() {
                    node.next = next;
                }
            }
            None => self.head = next,
        }
        match next {
            Some(n) => {
                if let Some(node) = self.slots[n].as_mut() {
                    node.prev = prev;
                }
            }
            None => self.tail = prev,
        }
    }

    /// Attaches the detached node at `idx` as the new head.
    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        if let Some(node) = self.slots[idx].as_mut() {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => {
                if let Some(node) = self.slots[h].as_mut() {
                    node.prev = Some(idx);
                }
            }
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }
}
