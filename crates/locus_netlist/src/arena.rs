//! Fixed-capacity pool for adjacency records.
//!
//! The [`AdjacencyArena`] owns the flat neighbor-id storage backing a
//! [`NetlistGraph`](crate::NetlistGraph). Records are bump-allocated during
//! graph construction and referenced by [`AdjSpan`] index ranges. There is
//! no per-record release; the whole pool drops as one unit with the graph.

use crate::error::NetlistError;
use crate::ids::ModuleId;
use serde::{Deserialize, Serialize};

/// A contiguous range of records in an [`AdjacencyArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjSpan {
    /// Index of the first record in the span.
    pub start: u32,
    /// One past the index of the last record in the span.
    pub end: u32,
}

impl AdjSpan {
    /// Returns the number of records in the span.
    pub fn len(self) -> usize {
        (self.end - self.start) as usize
    }

    /// Returns `true` if the span covers no records.
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }
}

/// A fixed-capacity bump allocator for adjacency records.
///
/// Capacity is set at construction and never grows. Sizing is the caller's
/// responsibility: a hyperedge of degree k contributes `k * (k - 1)`
/// directed records, so the pool is estimated from the expected hyperedge
/// mix. [`alloc`](Self::alloc) fails on exactly the allocation that would
/// exceed the capacity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjacencyArena {
    records: Vec<ModuleId>,
    capacity: usize,
}

impl AdjacencyArena {
    /// Creates an empty pool that can hold up to `capacity` records.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Bump-allocates one record holding `neighbor`, returning its index.
    ///
    /// Fails with [`NetlistError::ArenaExhausted`] once `capacity` records
    /// exist.
    pub fn alloc(&mut self, neighbor: ModuleId) -> Result<u32, NetlistError> {
        if self.records.len() >= self.capacity {
            return Err(NetlistError::ArenaExhausted {
                capacity: self.capacity,
            });
        }
        let index = self.records.len() as u32;
        self.records.push(neighbor);
        Ok(index)
    }

    /// Returns the records covered by `span`.
    ///
    /// # Panics
    ///
    /// Panics if the span reaches past the allocated records.
    pub fn slice(&self, span: AdjSpan) -> &[ModuleId] {
        &self.records[span.start as usize..span.end as usize]
    }

    /// Returns the number of allocated records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if no records have been allocated.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the fixed record capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
