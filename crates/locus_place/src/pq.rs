//! Criticality priority queue.
//!
//! A fixed-capacity binary max-heap over (module, local cost) entries,
//! rebuilt once per temperature level to steer move selection toward
//! high-cost modules. Priorities are not refreshed as moves land within a
//! level; stale entries are accepted — the queue is a heuristic hint, not
//! a correctness mechanism.

use crate::error::PlaceError;
use locus_netlist::ModuleId;

/// An entry in the criticality queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    /// The module this entry ranks.
    pub module: ModuleId,
    /// The module's local cost at insertion time.
    pub priority: u64,
}

/// Fixed-capacity array-backed binary max-heap keyed by priority.
///
/// Ties are broken arbitrarily by heap shape.
#[derive(Debug, Clone)]
pub struct CriticalityQueue {
    heap: Vec<QueueEntry>,
    capacity: usize,
}

impl CriticalityQueue {
    /// Creates an empty queue holding at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Inserts an entry, sifting it up to its heap position.
    ///
    /// At capacity the insertion is dropped and reported as
    /// [`PlaceError::QueueOverflow`]; the queue never grows and existing
    /// entries are untouched.
    pub fn insert(&mut self, module: ModuleId, priority: u64) -> Result<(), PlaceError> {
        if self.heap.len() >= self.capacity {
            return Err(PlaceError::QueueOverflow {
                capacity: self.capacity,
            });
        }
        self.heap.push(QueueEntry { module, priority });
        self.sift_up(self.heap.len() - 1);
        Ok(())
    }

    /// Removes and returns the highest-priority entry, or `None` when the
    /// queue is empty.
    pub fn extract_max(&mut self) -> Option<QueueEntry> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let top = self.heap.pop();
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        top
    }

    /// Returns the highest-priority entry without removing it.
    pub fn peek(&self) -> Option<&QueueEntry> {
        self.heap.first()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if the queue holds no entries.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Returns the fixed capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Removes all entries, keeping the capacity.
    pub fn clear(&mut self) {
        self.heap.clear();
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.heap[parent].priority >= self.heap[index].priority {
                break;
            }
            self.heap.swap(parent, index);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut largest = index;
            if left < self.heap.len() && self.heap[left].priority > self.heap[largest].priority {
                largest = left;
            }
            if right < self.heap.len() && self.heap[right].priority > self.heap[largest].priority {
                largest = right;
            }
            if largest == index {
                break;
            }
            self.heap.swap(index, largest);
            index = largest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(raw: u32) -> ModuleId {
        ModuleId::from_raw(raw)
    }

    #[test]
    fn extracts_in_nonincreasing_priority_order() {
        let priorities = [4u64, 19, 0, 7, 7, 12, 3, 25, 1];
        let mut queue = CriticalityQueue::with_capacity(priorities.len());
        for (raw, &priority) in priorities.iter().enumerate() {
            queue.insert(m(raw as u32), priority).unwrap();
        }

        let mut extracted = Vec::new();
        while let Some(entry) = queue.extract_max() {
            extracted.push(entry.priority);
        }
        assert_eq!(extracted.len(), priorities.len());
        for pair in extracted.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
        assert_eq!(extracted[0], 25);
    }

    #[test]
    fn extract_from_empty_returns_none() {
        let mut queue = CriticalityQueue::with_capacity(4);
        assert!(queue.extract_max().is_none());
        assert!(queue.extract_max().is_none());
        assert_eq!(queue.len(), 0);
    }

    #[test]
    fn peek_matches_max_without_removal() {
        let mut queue = CriticalityQueue::with_capacity(4);
        queue.insert(m(0), 5).unwrap();
        queue.insert(m(1), 11).unwrap();
        queue.insert(m(2), 2).unwrap();
        assert_eq!(queue.peek().unwrap().module, m(1));
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.extract_max().unwrap().module, m(1));
    }

    #[test]
    fn peek_empty_is_none() {
        let queue = CriticalityQueue::with_capacity(4);
        assert!(queue.peek().is_none());
    }

    #[test]
    fn overflow_reported_without_altering_content() {
        let capacity = 3;
        let mut queue = CriticalityQueue::with_capacity(capacity);
        queue.insert(m(0), 10).unwrap();
        queue.insert(m(1), 30).unwrap();
        queue.insert(m(2), 20).unwrap();

        let before = *queue.peek().unwrap();
        let err = queue.insert(m(3), 99).unwrap_err();
        assert!(matches!(err, PlaceError::QueueOverflow { capacity: 3 }));
        assert_eq!(queue.len(), capacity);
        assert_eq!(*queue.peek().unwrap(), before);

        let mut extracted = Vec::new();
        while let Some(entry) = queue.extract_max() {
            extracted.push(entry.module);
        }
        assert_eq!(extracted, vec![m(1), m(2), m(0)]);
    }

    #[test]
    fn ties_all_extracted() {
        let mut queue = CriticalityQueue::with_capacity(3);
        for raw in 0..3 {
            queue.insert(m(raw), 7).unwrap();
        }
        let mut modules: Vec<u32> = Vec::new();
        while let Some(entry) = queue.extract_max() {
            assert_eq!(entry.priority, 7);
            modules.push(entry.module.as_raw());
        }
        modules.sort_unstable();
        assert_eq!(modules, vec![0, 1, 2]);
    }

    #[test]
    fn clear_keeps_capacity() {
        let mut queue = CriticalityQueue::with_capacity(2);
        queue.insert(m(0), 1).unwrap();
        queue.clear();
        assert!(queue.is_empty());
        assert_eq!(queue.capacity(), 2);
        queue.insert(m(1), 5).unwrap();
        queue.insert(m(2), 6).unwrap();
        assert!(queue.insert(m(3), 7).is_err());
    }

    #[test]
    fn insert_after_extract_reuses_slot() {
        let mut queue = CriticalityQueue::with_capacity(1);
        queue.insert(m(0), 1).unwrap();
        assert!(queue.insert(m(1), 2).is_err());
        queue.extract_max();
        queue.insert(m(1), 2).unwrap();
        assert_eq!(queue.peek().unwrap().module, m(1));
    }

    #[test]
    fn zero_capacity_rejects_all() {
        let mut queue = CriticalityQueue::with_capacity(0);
        assert!(queue.insert(m(0), 1).is_err());
        assert!(queue.extract_max().is_none());
    }
}
