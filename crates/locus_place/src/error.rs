//! Error types for placement and annealing.

use crate::grid::Coord;
use locus_netlist::ModuleId;

/// Errors that can occur during placement state manipulation and annealing.
///
/// Placement runs fail fast: every variant except [`QueueOverflow`]
/// (reported and survivable) aborts the operation that produced it before
/// any annealing work starts or continues.
///
/// [`QueueOverflow`]: PlaceError::QueueOverflow
#[derive(Debug, thiserror::Error)]
pub enum PlaceError {
    /// The grid has zero area.
    #[error("invalid grid dimensions {rows}x{cols}")]
    InvalidGrid {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        cols: u32,
    },

    /// The grid has fewer cells than there are modules to place.
    #[error("grid too small: {modules} modules, {cells} cells")]
    GridTooSmall {
        /// Number of modules to place.
        modules: u32,
        /// Number of cells in the grid.
        cells: usize,
    },

    /// The netlist has no modules to place.
    #[error("netlist has no modules")]
    EmptyNetlist,

    /// An operation referenced a module id outside the placement.
    #[error("module {module} out of range (module count {module_count})")]
    InvalidModule {
        /// The offending module id.
        module: ModuleId,
        /// The number of placed modules.
        module_count: u32,
    },

    /// An operation targeted a coordinate outside the grid.
    #[error("coordinate {at} outside {rows}x{cols} grid")]
    OutOfBounds {
        /// The offending coordinate.
        at: Coord,
        /// Grid row count.
        rows: u32,
        /// Grid column count.
        cols: u32,
    },

    /// A relocation targeted a cell already held by another module.
    #[error("cell {at} already occupied by module {occupant}")]
    CellOccupied {
        /// The target cell.
        at: Coord,
        /// The module currently occupying it.
        occupant: ModuleId,
    },

    /// Two modules mapped to the same cell while building a placement.
    #[error("modules {first} and {second} both map to cell {at}")]
    DuplicateCell {
        /// The contested cell.
        at: Coord,
        /// The module already holding the cell.
        first: ModuleId,
        /// The module that also claimed it.
        second: ModuleId,
    },

    /// A snapshot was restored into a placement of a different size.
    #[error("snapshot holds {actual} modules, placement holds {expected}")]
    SnapshotMismatch {
        /// Module count of the placement.
        expected: usize,
        /// Module count of the snapshot.
        actual: usize,
    },

    /// The criticality queue was full and dropped an insertion.
    ///
    /// Non-fatal: move guidance degrades for the dropped module and the
    /// run continues.
    #[error("criticality queue full ({capacity} entries)")]
    QueueOverflow {
        /// The fixed capacity of the queue.
        capacity: usize,
    },

    /// Cooling-schedule parameters out of range.
    #[error("invalid annealing schedule: {reason}")]
    InvalidSchedule {
        /// Description of the offending parameter.
        reason: String,
    },
}
