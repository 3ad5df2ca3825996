//! Fixed integer grid and free-cell sampling

use std::ops::Range;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::MAX_SPAWN_ATTEMPTS;
use crate::error::SimError;

/// Grid cell, 0-indexed, y grows downward
pub type Cell = IVec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub cols: i32,
    pub rows: i32,
}

impl Grid {
    pub fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    #[inline]
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.cols && cell.y >= 0 && cell.y < self.rows
    }

    /// Wrap a cell onto the torus formed by the grid edges
    #[inline]
    pub fn wrap(&self, cell: Cell) -> Cell {
        IVec2::new(cell.x.rem_euclid(self.cols), cell.y.rem_euclid(self.rows))
    }

    /// Pick a uniformly random cell with x in `columns` that `blocked` rejects.
    ///
    /// Tries random draws first, then falls back to scanning every cell of the
    /// region so a nearly full region still finds its last free cell.
    pub fn sample_free_cell<R, F>(
        &self,
        rng: &mut R,
        columns: Range<i32>,
        what: &'static str,
        blocked: F,
    ) -> Result<Cell, SimError>
    where
        R: Rng,
        F: Fn(Cell) -> bool,
    {
        let columns = columns.start.max(0)..columns.end.min(self.cols);
        if columns.is_empty() || self.rows <= 0 {
            return Err(SimError::SpawnExhausted { what, attempts: 0 });
        }

        for _ in 0..MAX_SPAWN_ATTEMPTS {
            let cell = IVec2::new(
                rng.random_range(columns.clone()),
                rng.random_range(0..self.rows),
            );
            if !blocked(cell) {
                return Ok(cell);
            }
        }

        let free: Vec<Cell> = columns
            .flat_map(|x| (0..self.rows).map(move |y| IVec2::new(x, y)))
            .filter(|&cell| !blocked(cell))
            .collect();
        if free.is_empty() {
            return Err(SimError::SpawnExhausted {
                what,
                attempts: MAX_SPAWN_ATTEMPTS,
            });
        }
        Ok(free[rng.random_range(0..free.len())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_in_bounds_edges() {
        let grid = Grid::new(40, 30);
        assert!(grid.in_bounds(IVec2::new(0, 0)));
        assert!(grid.in_bounds(IVec2::new(39, 29)));
        assert!(!grid.in_bounds(IVec2::new(40, 0)));
        assert!(!grid.in_bounds(IVec2::new(0, 30)));
        assert!(!grid.in_bounds(IVec2::new(-1, 5)));
        assert!(!grid.in_bounds(IVec2::new(5, -1)));
    }

    #[test]
    fn test_wrap_all_edges() {
        let grid = Grid::new(40, 30);
        assert_eq!(grid.wrap(IVec2::new(-1, 3)), IVec2::new(39, 3));
        assert_eq!(grid.wrap(IVec2::new(40, 3)), IVec2::new(0, 3));
        assert_eq!(grid.wrap(IVec2::new(7, -1)), IVec2::new(7, 29));
        assert_eq!(grid.wrap(IVec2::new(7, 30)), IVec2::new(7, 0));
    }

    #[test]
    fn test_sample_finds_last_free_cell() {
        let grid = Grid::new(4, 4);
        let mut rng = Pcg32::seed_from_u64(7);
        let only = IVec2::new(2, 3);
        let cell = grid
            .sample_free_cell(&mut rng, 0..4, "test", |c| c != only)
            .unwrap();
        assert_eq!(cell, only);
    }

    #[test]
    fn test_sample_exhausted_region() {
        let grid = Grid::new(4, 4);
        let mut rng = Pcg32::seed_from_u64(7);
        let result = grid.sample_free_cell(&mut rng, 0..2, "test", |_| true);
        assert!(matches!(result, Err(SimError::SpawnExhausted { .. })));

        let empty = grid.sample_free_cell(&mut rng, 3..3, "test", |_| false);
        assert!(matches!(empty, Err(SimError::SpawnExhausted { attempts: 0, .. })));
    }
}
