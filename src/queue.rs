//! Min-priority queue with decrease-key via lazy tombstoning.
//!
//! [`PriorityQueue`] sits on top of a plain [`BinaryHeap`]. Every insert
//! receives a fresh sequence id; `delete` marks the item's current id as a
//! tombstone instead of restructuring the heap, and `pop` silently discards
//! tombstoned entries. `modify` is `delete` followed by `insert`, which
//! gives decrease-key and increase-key semantics at the cost of stale
//! entries lingering until popped.
//!
//! Ties in priority are broken by insertion order (lower sequence id first).
//!
//! # Complexity
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `insert`  | O(log n) |
//! | `pop`     | O(log n) amortized over discarded tombstones |
//! | `delete`  | O(1) expected |
//! | `modify`  | O(log n) |

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::hash::Hash;

/// Returned by [`PriorityQueue::pop`] when no live item remains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("priority queue is empty")]
pub struct EmptyQueue;

/// Heap entry ordered so that `BinaryHeap` (a max-heap) pops the lowest
/// priority, then the lowest sequence id.
#[derive(Debug)]
struct Entry<T, P> {
    priority: P,
    seq: u64,
    item: T,
}

impl<T, P: Ord> PartialEq for Entry<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq && self.priority == other.priority
    }
}

impl<T, P: Ord> Eq for Entry<T, P> {}

impl<T, P: Ord> PartialOrd for Entry<T, P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T, P: Ord> Ord for Entry<T, P> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Decrease-key capable min-priority queue.
///
/// # Examples
///
/// ```
/// use u_timetable::queue::PriorityQueue;
///
/// let mut queue = PriorityQueue::new();
/// queue.insert("x", 10);
/// queue.insert("y", 5);
/// queue.modify("x", 3);
/// assert_eq!(queue.pop(), Ok(("x", 3)));
/// assert_eq!(queue.pop(), Ok(("y", 5)));
/// assert!(queue.pop().is_err());
/// ```
#[derive(Debug)]
pub struct PriorityQueue<T, P> {
    heap: BinaryHeap<Entry<T, P>>,
    // item -> sequence id of its most recent live entry
    lookup: HashMap<T, u64>,
    tombstones: HashSet<u64>,
    next_seq: u64,
}

impl<T, P> Default for PriorityQueue<T, P>
where
    T: Clone + Eq + Hash,
    P: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P> PriorityQueue<T, P>
where
    T: Clone + Eq + Hash,
    P: Ord,
{
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            lookup: HashMap::new(),
            tombstones: HashSet::new(),
            next_seq: 0,
        }
    }

    /// Inserts `item` with `priority` under a fresh sequence id.
    ///
    /// If `item` already has a live entry, that entry stays live but can
    /// no longer be addressed by `delete`/`modify`.
    pub fn insert(&mut self, item: T, priority: P) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.lookup.insert(item.clone(), seq);
        self.heap.push(Entry {
            priority,
            seq,
            item,
        });
    }

    /// Removes and returns the live item with the lowest priority.
    ///
    /// Tombstoned entries met on the way are discarded for good.
    pub fn pop(&mut self) -> Result<(T, P), EmptyQueue> {
        while let Some(entry) = self.heap.pop() {
            if self.tombstones.remove(&entry.seq) {
                continue;
            }
            if self.lookup.get(&entry.item) == Some(&entry.seq) {
                self.lookup.remove(&entry.item);
            }
            return Ok((entry.item, entry.priority));
        }
        Err(EmptyQueue)
    }

    /// Tombstones the current entry of `item`.
    ///
    /// No-op if the item was never inserted or has already been removed.
    pub fn delete(&mut self, item: &T) {
        if let Some(seq) = self.lookup.remove(item) {
            self.tombstones.insert(seq);
        }
    }

    /// Re-keys `item` to `priority`, inserting it if absent.
    pub fn modify(&mut self, item: T, priority: P) {
        self.delete(&item);
        self.insert(item, priority);
    }

    /// Whether `item` has an addressable live entry.
    pub fn contains(&self, item: &T) -> bool {
        self.lookup.contains_key(item)
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.heap.len() - self.tombstones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
