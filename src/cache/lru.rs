//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::HashMap;
use std::hash::Hash;

// == Arena Node ==
#[derive(Debug)]
struct Node<K> {
    key: K,
    /// Neighbour towards the least recently used end
    prev: Option<usize>,
    /// Neighbour towards the most recently used end
    next: Option<usize>,
}

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Keys live in an arena-backed doubly-linked list with a key -> slot index:
/// - Head = Least recently used
/// - Tail = Most recently used
///
/// Every operation is O(1). Slots freed by `remove` are recycled.
#[derive(Debug)]
pub struct LruTracker<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<usize>,
    index: HashMap<K, usize>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<K> Default for LruTracker<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> LruTracker<K>
where
    K: Eq + Hash + Clone,
{
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty tracker with room for `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            index: HashMap::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    // == Insert ==
    /// Starts tracking `key` as the most recently used key.
    ///
    /// A key that is already tracked is simply touched.
    pub fn insert(&mut self, key: K) {
        if let Some(&idx) = self.index.get(&key) {
            self.unlink(idx);
            self.link_back(idx);
            return;
        }

        let node = Node {
            key: key.clone(),
            prev: None,
            next: None,
        };
        let idx = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        };

        self.index.insert(key, idx);
        self.link_back(idx);
    }

    // == Touch ==
    /// Marks a key as most recently used. No-op if the key is not tracked.
    pub fn touch(&mut self, key: &K) {
        if let Some(&idx) = self.index.get(key) {
            self.unlink(idx);
            self.link_back(idx);
        }
    }

    // == Remove ==
    /// Removes a key from the tracker.
    ///
    /// Returns false if the key was not tracked.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.index.remove(key) {
            Some(idx) => {
                self.unlink(idx);
                self.slots[idx] = None;
                self.free.push(idx);
                true
            }
            None => false,
        }
    }

    // == Victim ==
    /// Returns the least recently used key without removing it.
    ///
    /// Returns None if tracker is empty.
    pub fn victim(&self) -> Option<&K> {
        self.head.and_then(|idx| self.node(idx)).map(|node| &node.key)
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    // == Clear ==
    /// Forgets every key.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.index.clear();
        self.head = None;
        self.tail = None;
    }

    // == Iter ==
    /// Iterates keys from least to most recently used.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            tracker: self,
            cursor: self.head,
        }
    }

    // == Internal Linking ==
    fn node(&self, idx: usize) -> Option<&Node<K>> {
        self.slots.get(idx).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, idx: usize) -> Option<&mut Node<K>> {
        self.slots.get_mut(idx).and_then(Option::as_mut)
    }

    /// Detaches a slot from the list, patching its neighbours.
    fn unlink(&mut self, idx: usize) {
        let (prev, next) = match self.node(idx) {
            Some(node) => (node.prev, node.next),
            None => return,
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
    }

    /// Attaches a detached slot at the most recently used end.
    fn link_back(&mut self, idx: usize) {
        let old_tail = self.tail;
        if let Some(node) = self.node_mut(idx) {
            node.prev = old_tail;
            node.next = None;
        }

        match old_tail {
            Some(t) => {
                if let Some(node) = self.node_mut(t) {
                    node.next = Some(idx);
                }
            }
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
    }
}

// == Iterator ==
/// Iterator over tracked keys, least recently used first.
pub struct Iter<'a, K> {
    tracker: &'a LruTracker<K>,
    cursor: Option<usize>,
}

impl<'a, K> Iterator for Iter<'a, K>
where
    K: Eq + Hash + Clone,
{
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.tracker.node(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.key)
    }
}
