//! Wirelength cost model.
//!
//! The optimization objective is total Manhattan wirelength: the sum of
//! `|Δrow| + |Δcol|` over every undirected edge of the clique-expanded
//! netlist. Trial moves are evaluated incrementally by scanning only the
//! neighbor lists of the modules involved, never the whole graph.

use crate::grid::{Coord, Placement};
use locus_netlist::{ModuleId, NetlistGraph};

/// Manhattan distance between two cells.
pub fn manhattan(a: Coord, b: Coord) -> u64 {
    let dr = (a.row as i64 - b.row as i64).unsigned_abs();
    let dc = (a.col as i64 - b.col as i64).unsigned_abs();
    dr + dc
}

/// Computes the total wirelength of a placement.
///
/// Each undirected edge is counted exactly once via the "neighbor id >
/// module id" rule, which relies on the graph's both-directions symmetry
/// convention.
pub fn total_cost(graph: &NetlistGraph, placement: &Placement) -> u64 {
    let mut total = 0u64;
    for module in graph.modules() {
        let here = placement.coord(module);
        for &neighbor in graph.neighbors(module) {
            if neighbor.as_raw() > module.as_raw() {
                total += manhattan(here, placement.coord(neighbor));
            }
        }
    }
    total
}

/// Computes the cost change of exchanging the positions of `m1` and `m2`.
///
/// Scans only the two modules' neighbor lists. A direct m1↔m2 edge is
/// unaffected by a position swap (distance is symmetric) and is skipped in
/// both scans, so it is neither counted nor double-counted.
pub fn swap_delta(
    graph: &NetlistGraph,
    placement: &Placement,
    m1: ModuleId,
    m2: ModuleId,
) -> i64 {
    let p1 = placement.coord(m1);
    let p2 = placement.coord(m2);
    let mut delta = 0i64;

    for &neighbor in graph.neighbors(m1) {
        if neighbor == m2 {
            continue;
        }
        let at = placement.coord(neighbor);
        delta += manhattan(p2, at) as i64 - manhattan(p1, at) as i64;
    }
    for &neighbor in graph.neighbors(m2) {
        if neighbor == m1 {
            continue;
        }
        let at = placement.coord(neighbor);
        delta += manhattan(p1, at) as i64 - manhattan(p2, at) as i64;
    }
    delta
}

/// Computes the cost change of relocating `module` to the vacant cell
/// `dest`.
pub fn move_delta(
    graph: &NetlistGraph,
    placement: &Placement,
    module: ModuleId,
    dest: Coord,
) -> i64 {
    let src = placement.coord(module);
    let mut delta = 0i64;
    for &neighbor in graph.neighbors(module) {
        let at = placement.coord(neighbor);
        delta += manhattan(dest, at) as i64 - manhattan(src, at) as i64;
    }
    delta
}

/// Sums the distance from `module` to each of its neighbors.
///
/// A criticality score for move selection, not a normalized cost: an edge
/// shared by two modules is counted from both endpoints across a full
/// queue rebuild.
pub fn local_cost(graph: &NetlistGraph, placement: &Placement, module: ModuleId) -> u64 {
    let here = placement.coord(module);
    graph
        .neighbors(module)
        .iter()
        .map(|&neighbor| manhattan(here, placement.coord(neighbor)))
        .sum()
}
