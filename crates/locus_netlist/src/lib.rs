//! Netlist graph construction for the Locus placement engine.
//!
//! A netlist is an ordered sequence of hyperedges (nets) over integer
//! module ids. Each hyperedge is clique-expanded into pairwise directed
//! edges held in a fixed-capacity [`AdjacencyArena`]: a single flat array
//! of neighbor ids, sliced per module by integer ranges. The finished
//! [`NetlistGraph`] is immutable and backs every cost computation of the
//! annealing run.
//!
//! # Usage
//!
//! ```ignore
//! use locus_netlist::{AdjacencyArena, ModuleId, NetlistBuilder};
//!
//! let arena = AdjacencyArena::with_capacity(1_000_000);
//! let mut builder = NetlistBuilder::new(module_count, arena);
//! for net in &nets {
//!     builder.add_hyperedge(net)?;
//! }
//! let graph = builder.build()?;
//! ```

#![warn(missing_docs)]

pub mod arena;
pub mod error;
pub mod graph;
pub mod ids;

pub use arena::{AdjSpan, AdjacencyArena};
pub use error::NetlistError;
pub use graph::{NetlistBuilder, NetlistGraph};
pub use ids::ModuleId;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reexports_available() {
        let _ = AdjacencyArena::with_capacity(0);
        let _ = ModuleId::from_raw(0);
        let _ = NetlistBuilder::new(0, AdjacencyArena::with_capacity(0));
    }
}
