//! Simulated-annealing module placement for Locus.
//!
//! Takes a clique-expanded [`NetlistGraph`](locus_netlist::NetlistGraph),
//! assigns every module a cell on a 2D grid, and minimizes total Manhattan
//! wirelength. A random initial placement is refined by simulated
//! annealing with an incremental cost model and criticality-guided move
//! selection.
//!
//! # Pipeline
//!
//! 1. **Validate** — fail fast on an empty netlist, an undersized grid, or
//!    an out-of-range cooling schedule
//! 2. **Seed** — random bijection of modules onto cells (Fisher–Yates)
//! 3. **Anneal** — Metropolis-accepted swaps over a geometric cooling
//!    schedule, tracking the best solution observed
//! 4. **Restore** — the best snapshot becomes the final placement
//!
//! The engine is single-threaded and fully synchronous; the caller owns
//! the random generator, so a seeded [`StdRng`](rand::rngs::StdRng) makes
//! whole runs reproducible.
//!
//! # Usage
//!
//! ```ignore
//! use locus_place::{place, AnnealSchedule};
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let outcome = place(&graph, 80, 80, &AnnealSchedule::default(), &mut rng)?;
//! println!("{}", outcome.placement.grid());
//! println!("best cost: {}", outcome.stats.best_cost);
//! ```

#![warn(missing_docs)]

pub mod anneal;
pub mod cost;
pub mod error;
pub mod grid;
pub mod pq;
pub mod random;

pub use anneal::{anneal, AnnealSchedule, AnnealStats, LevelStats};
pub use cost::{local_cost, manhattan, move_delta, swap_delta, total_cost};
pub use error::PlaceError;
pub use grid::{Coord, Grid, Placement};
pub use pq::{CriticalityQueue, QueueEntry};
pub use random::random_initial;

use locus_netlist::NetlistGraph;
use rand::Rng;

/// The result of a placement run.
#[derive(Debug, Clone)]
pub struct PlaceOutcome {
    /// Final placement: grid occupancy plus per-module coordinates.
    pub placement: Placement,
    /// Cost trajectory and totals for the run.
    pub stats: AnnealStats,
}

/// Places every module of `graph` onto a `rows` x `cols` grid.
///
/// Fails fast before any annealing work if the graph has no modules, the
/// grid has fewer cells than modules, or the schedule is out of range.
/// Otherwise the run executes the entire cooling schedule and reports
/// final and best cost.
pub fn place(
    graph: &NetlistGraph,
    rows: u32,
    cols: u32,
    schedule: &AnnealSchedule,
    rng: &mut impl Rng,
) -> Result<PlaceOutcome, PlaceError> {
    if graph.module_count() == 0 {
        return Err(PlaceError::EmptyNetlist);
    }
    schedule.validate()?;

    let mut placement = random::random_initial(rows, cols, graph.module_count(), rng)?;
    let stats = anneal::anneal(graph, &mut placement, schedule, rng)?;
    Ok(PlaceOutcome { placement, stats })
}
