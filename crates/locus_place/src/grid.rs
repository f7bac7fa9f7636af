//! Grid occupancy and placement state.
//!
//! A [`Grid`] is a row-major array of cells, each holding at most one
//! module. A [`Placement`] pairs the grid with the inverse mapping from
//! module id to coordinates and keeps the two representations consistent
//! through every mutation; the annealing scheduler only ever touches
//! placements, never raw grids.

use crate::error::PlaceError;
use locus_netlist::ModuleId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A grid position (row, column), both zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    /// Row index.
    pub row: u32,
    /// Column index.
    pub col: u32,
}

impl Coord {
    /// Creates a coordinate.
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Row-major cell array holding module occupancy.
///
/// The grid alone knows nothing about where modules believe they are; it is
/// the storage half of a [`Placement`]. Its mutating primitives are raw
/// cell writes and deliberately do not maintain any inverse mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grid {
    rows: u32,
    cols: u32,
    cells: Vec<Option<ModuleId>>,
}

impl Grid {
    /// Creates an all-empty grid. Zero-area grids are rejected.
    pub fn new(rows: u32, cols: u32) -> Result<Self, PlaceError> {
        if rows == 0 || cols == 0 {
            return Err(PlaceError::InvalidGrid { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            cells: vec![None; rows as usize * cols as usize],
        })
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Returns the number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Returns the total number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if `at` lies within the grid.
    pub fn contains(&self, at: Coord) -> bool {
        at.row < self.rows && at.col < self.cols
    }

    fn index(&self, at: Coord) -> usize {
        at.row as usize * self.cols as usize + at.col as usize
    }

    fn check_bounds(&self, at: Coord) -> Result<(), PlaceError> {
        if !self.contains(at) {
            return Err(PlaceError::OutOfBounds {
                at,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(())
    }

    /// Returns the module occupying `at`, or `None` for an empty cell.
    ///
    /// # Panics
    ///
    /// Panics if `at` is outside the grid.
    pub fn module_at(&self, at: Coord) -> Option<ModuleId> {
        assert!(
            self.contains(at),
            "coordinate {at} outside {}x{} grid",
            self.rows,
            self.cols
        );
        self.cells[self.index(at)]
    }

    /// Returns `true` if the cell at `at` is occupied.
    ///
    /// # Panics
    ///
    /// Panics if `at` is outside the grid.
    pub fn is_occupied(&self, at: Coord) -> bool {
        self.module_at(at).is_some()
    }

    /// Writes `module` into the cell at `at`, overwriting any occupant.
    ///
    /// This is the raw cell write: no inverse mapping is touched, and any
    /// previous occupant is simply gone from the grid.
    pub fn place(&mut self, module: ModuleId, at: Coord) -> Result<(), PlaceError> {
        self.check_bounds(at)?;
        let index = self.index(at);
        self.cells[index] = Some(module);
        Ok(())
    }

    /// Empties the cell at `at`.
    pub fn clear_cell(&mut self, at: Coord) -> Result<(), PlaceError> {
        self.check_bounds(at)?;
        let index = self.index(at);
        self.cells[index] = None;
        Ok(())
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Returns the number of empty cells (linear scan).
    pub fn empty_cell_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_none()).count()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                if col > 0 {
                    write!(f, " ")?;
                }
                match self.module_at(Coord::new(row, col)) {
                    Some(module) => write!(f, "{:>3}", module.as_raw())?,
                    None => write!(f, "  .")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Placement state: grid occupancy plus the module → coordinate map.
///
/// Invariant: for every module m, the grid cell at `coord(m)` holds m, and
/// no two modules share a cell. Every mutating operation either preserves
/// the invariant or fails without mutating.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Placement {
    grid: Grid,
    coords: Vec<Coord>,
}

impl Placement {
    /// Builds a placement from explicit per-module coordinates.
    ///
    /// `coords[m]` becomes the cell of module m; the grid's prior contents
    /// are discarded. Fails if a coordinate falls outside the grid or two
    /// modules map to the same cell.
    pub fn from_coords(mut grid: Grid, coords: Vec<Coord>) -> Result<Self, PlaceError> {
        grid.clear();
        for (raw, &at) in coords.iter().enumerate() {
            let module = ModuleId::from_raw(raw as u32);
            grid.check_bounds(at)?;
            if let Some(occupant) = grid.module_at(at) {
                return Err(PlaceError::DuplicateCell {
                    at,
                    first: occupant,
                    second: module,
                });
            }
            grid.place(module, at)?;
        }
        Ok(Self { grid, coords })
    }

    /// Returns the number of placed modules.
    pub fn module_count(&self) -> u32 {
        self.coords.len() as u32
    }

    /// Returns the grid occupancy.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the coordinates of `module`.
    ///
    /// # Panics
    ///
    /// Panics if `module` is out of range.
    pub fn coord(&self, module: ModuleId) -> Coord {
        self.coords[module.as_raw() as usize]
    }

    /// Returns the full module → coordinate map, indexed by raw module id.
    pub fn coords(&self) -> &[Coord] {
        &self.coords
    }

    fn check_module(&self, module: ModuleId) -> Result<(), PlaceError> {
        if module.as_raw() as usize >= self.coords.len() {
            return Err(PlaceError::InvalidModule {
                module,
                module_count: self.module_count(),
            });
        }
        Ok(())
    }

    /// Exchanges the positions of two modules in both representations.
    ///
    /// Swapping a module with itself is a no-op.
    pub fn swap(&mut self, m1: ModuleId, m2: ModuleId) -> Result<(), PlaceError> {
        self.check_module(m1)?;
        self.check_module(m2)?;
        if m1 == m2 {
            return Ok(());
        }
        let p1 = self.coord(m1);
        let p2 = self.coord(m2);
        self.grid.place(m1, p2)?;
        self.grid.place(m2, p1)?;
        self.coords[m1.as_raw() as usize] = p2;
        self.coords[m2.as_raw() as usize] = p1;
        Ok(())
    }

    /// Relocates `module` to the empty cell at `dest`.
    ///
    /// Moving onto an occupied cell is an error: displacement is expressed
    /// as [`swap`](Self::swap), and an overwrite would orphan the
    /// occupant's coordinates. Moving a module onto its own cell is a
    /// no-op.
    pub fn move_to(&mut self, module: ModuleId, dest: Coord) -> Result<(), PlaceError> {
        self.check_module(module)?;
        self.grid.check_bounds(dest)?;
        let src = self.coord(module);
        if dest == src {
            return Ok(());
        }
        if let Some(occupant) = self.grid.module_at(dest) {
            return Err(PlaceError::CellOccupied { at: dest, occupant });
        }
        self.grid.place(module, dest)?;
        // Clear the source only if it still holds this module.
        if self.grid.module_at(src) == Some(module) {
            self.grid.clear_cell(src)?;
        }
        self.coords[module.as_raw() as usize] = dest;
        Ok(())
    }

    /// Returns the number of empty cells (linear scan).
    pub fn empty_cell_count(&self) -> usize {
        self.grid.empty_cell_count()
    }

    /// Picks a uniformly random empty cell, or `None` if the grid is full.
    ///
    /// Draws a rank in `[0, empty_count)` and scans to the rank-th empty
    /// cell: O(cells) per call.
    pub fn random_empty_cell(&self, rng: &mut impl Rng) -> Option<Coord> {
        let empty = self.empty_cell_count();
        if empty == 0 {
            return None;
        }
        let target = rng.gen_range(0..empty);
        let mut seen = 0;
        for row in 0..self.grid.rows() {
            for col in 0..self.grid.cols() {
                let at = Coord::new(row, col);
                if !self.grid.is_occupied(at) {
                    if seen == target {
                        return Some(at);
                    }
                    seen += 1;
                }
            }
        }
        None
    }

    /// Copies the per-module coordinates (a best-solution snapshot).
    pub fn snapshot(&self) -> Vec<Coord> {
        self.coords.clone()
    }

    /// Restores a snapshot, rebuilding grid occupancy from scratch.
    ///
    /// The grid may hold occupancy left over from moves accepted after the
    /// snapshot was taken, so every cell is cleared and re-placed from the
    /// snapshot coordinates.
    pub fn restore(&mut self, coords: &[Coord]) -> Result<(), PlaceError> {
        if coords.len() != self.coords.len() {
            return Err(PlaceError::SnapshotMismatch {
                expected: self.coords.len(),
                actual: coords.len(),
            });
        }
        self.grid.clear();
        for (raw, &at) in coords.iter().enumerate() {
            self.grid.place(ModuleId::from_raw(raw as u32), at)?;
        }
        self.coords.copy_from_slice(coords);
        Ok(())
    }
}
