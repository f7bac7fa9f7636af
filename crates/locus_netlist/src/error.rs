//! Error types for netlist graph construction.

use crate::ids::ModuleId;

/// Errors that can occur while building a netlist graph.
///
/// All of these are construction-time failures: once a graph is built it is
/// immutable and its read operations cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// The adjacency record pool ran out of capacity.
    ///
    /// Construction cannot safely continue; the caller must rebuild with a
    /// larger pool. A hyperedge of degree k needs `k * (k - 1)` records.
    #[error("adjacency arena exhausted ({capacity} records)")]
    ArenaExhausted {
        /// The fixed capacity of the exhausted pool.
        capacity: usize,
    },

    /// A hyperedge referenced a module id outside `[0, module_count)`.
    #[error("module {module} out of range (module count {module_count})")]
    InvalidModule {
        /// The offending module id.
        module: ModuleId,
        /// The number of modules in the graph under construction.
        module_count: u32,
    },

    /// A hyperedge contained no modules.
    #[error("hyperedge has no modules")]
    EmptyHyperedge,
}
