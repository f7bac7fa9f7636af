//! Pooled-adjacency netlist graph built by clique-expanding hyperedges.
//!
//! [`NetlistBuilder`] accumulates hyperedges, expanding each into pairwise
//! directed edges (both directions per unordered pair), and
//! [`build`](NetlistBuilder::build) flattens the per-module neighbor lists
//! into one contiguous [`AdjacencyArena`] span per module. The resulting
//! [`NetlistGraph`] is immutable: edges are never removed, and the graph
//! outlives the whole annealing run.

use crate::arena::{AdjSpan, AdjacencyArena};
use crate::error::NetlistError;
use crate::ids::ModuleId;
use serde::{Deserialize, Serialize};

/// An immutable module-adjacency graph.
///
/// Every undirected connection is stored as two directed records (a→b and
/// b→a). Cost computations that must count each connection once rely on
/// that symmetry convention and do not re-verify it. Neighbor order is
/// insertion order; duplicates and self-loops present in the input are kept
/// as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetlistGraph {
    module_count: u32,
    arena: AdjacencyArena,
    spans: Vec<AdjSpan>,
}

impl NetlistGraph {
    /// Returns the number of modules in the graph.
    pub fn module_count(&self) -> u32 {
        self.module_count
    }

    /// Returns the neighbors of `module` in insertion order.
    ///
    /// # Panics
    ///
    /// Panics if `module` is out of range.
    pub fn neighbors(&self, module: ModuleId) -> &[ModuleId] {
        self.arena.slice(self.spans[module.as_raw() as usize])
    }

    /// Returns the number of directed adjacency records for `module`.
    ///
    /// # Panics
    ///
    /// Panics if `module` is out of range.
    pub fn degree(&self, module: ModuleId) -> usize {
        self.spans[module.as_raw() as usize].len()
    }

    /// Returns the number of undirected edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.arena.len() / 2
    }

    /// Iterates over all module ids in the graph.
    pub fn modules(&self) -> impl Iterator<Item = ModuleId> {
        (0..self.module_count).map(ModuleId::from_raw)
    }
}

/// Accumulates hyperedges and produces an immutable [`NetlistGraph`].
///
/// The builder owns the arena for the lifetime of construction; capacity is
/// enforced per directed record at insertion time, so the hyperedge whose
/// expansion would exceed the pool fails immediately.
#[derive(Debug)]
pub struct NetlistBuilder {
    module_count: u32,
    arena: AdjacencyArena,
    adjacency: Vec<Vec<ModuleId>>,
    allocated: usize,
}

impl NetlistBuilder {
    /// Creates a builder for `module_count` modules backed by `arena`.
    pub fn new(module_count: u32, arena: AdjacencyArena) -> Self {
        Self {
            module_count,
            arena,
            adjacency: vec![Vec::new(); module_count as usize],
            allocated: 0,
        }
    }

    /// Clique-expands a hyperedge into pairwise directed edges.
    ///
    /// For every unordered pair within `modules`, both directed edges are
    /// inserted. Duplicate ids in the input produce duplicate edges and
    /// self-loops; the builder does not correct them. A hyperedge of one
    /// module is legal and contributes no edges.
    pub fn add_hyperedge(&mut self, modules: &[ModuleId]) -> Result<(), NetlistError> {
        if modules.is_empty() {
            return Err(NetlistError::EmptyHyperedge);
        }
        for &module in modules {
            self.check_module(module)?;
        }
        for i in 0..modules.len() {
            for j in (i + 1)..modules.len() {
                self.push_directed(modules[i], modules[j])?;
                self.push_directed(modules[j], modules[i])?;
            }
        }
        Ok(())
    }

    /// Returns the number of directed records reserved so far.
    pub fn record_count(&self) -> usize {
        self.allocated
    }

    /// Flattens the accumulated adjacency into the arena, one contiguous
    /// span per module in module order, and returns the finished graph.
    pub fn build(mut self) -> Result<NetlistGraph, NetlistError> {
        let mut spans = Vec::with_capacity(self.module_count as usize);
        for neighbors in &self.adjacency {
            let start = self.arena.len() as u32;
            for &neighbor in neighbors {
                self.arena.alloc(neighbor)?;
            }
            spans.push(AdjSpan {
                start,
                end: self.arena.len() as u32,
            });
        }
        Ok(NetlistGraph {
            module_count: self.module_count,
            arena: self.arena,
            spans,
        })
    }

    fn check_module(&self, module: ModuleId) -> Result<(), NetlistError> {
        if module.as_raw() >= self.module_count {
            return Err(NetlistError::InvalidModule {
                module,
                module_count: self.module_count,
            });
        }
        Ok(())
    }

    fn push_directed(&mut self, from: ModuleId, to: ModuleId) -> Result<(), NetlistError> {
        if self.allocated >= self.arena.capacity() {
            return Err(NetlistError::ArenaExhausted {
                capacity: self.arena.capacity(),
            });
        }
        self.allocated += 1;
        self.adjacency[from.as_raw() as usize].push(to);
        Ok(())
    }
}
