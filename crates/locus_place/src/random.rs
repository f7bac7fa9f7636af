//! Random initial placement.
//!
//! Produces the starting bijection from modules to grid cells: the
//! row-major cell-index list is Fisher–Yates shuffled and module m takes
//! the m-th shuffled cell. Annealing refines from there.

use crate::error::PlaceError;
use crate::grid::{Coord, Grid, Placement};
use rand::seq::SliceRandom;
use rand::Rng;

/// Places `module_count` modules uniformly at random onto a fresh
/// `rows` x `cols` grid.
///
/// Fails fast if the grid has fewer cells than modules.
pub fn random_initial(
    rows: u32,
    cols: u32,
    module_count: u32,
    rng: &mut impl Rng,
) -> Result<Placement, PlaceError> {
    let grid = Grid::new(rows, cols)?;
    let cells = grid.cell_count();
    if module_count as usize > cells {
        return Err(PlaceError::GridTooSmall {
            modules: module_count,
            cells,
        });
    }

    let mut indices: Vec<u32> = (0..cells as u32).collect();
    indices.shuffle(rng);

    let coords = indices[..module_count as usize]
        .iter()
        .map(|&index| Coord::new(index / cols, index % cols))
        .collect();
    Placement::from_coords(grid, coords)
}
