//! The 3×3 symbol grid
//!
//! Cells are stored row-major: `index = row * REELS + col`.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::symbols::SymbolId;

/// Number of reels (columns)
pub const REELS: usize = 3;
/// Visible rows per reel
pub const ROWS: usize = 3;
/// Total cells
pub const GRID_SIZE: usize = REELS * ROWS;
/// The only row that pays
pub const PAYLINE_ROW: usize = 1;

/// Nine symbol ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Grid([SymbolId; GRID_SIZE]);

impl Grid {
    pub fn new(cells: [SymbolId; GRID_SIZE]) -> Self {
        Self(cells)
    }

    /// Every cell showing the same symbol
    pub fn filled(id: SymbolId) -> Self {
        Self([id; GRID_SIZE])
    }

    /// Build from three rows, top to bottom
    pub fn from_rows(rows: [[SymbolId; REELS]; ROWS]) -> Self {
        let mut cells = [0; GRID_SIZE];
        for (row, values) in rows.iter().enumerate() {
            cells[row * REELS..(row + 1) * REELS].copy_from_slice(values);
        }
        Self(cells)
    }

    #[inline]
    pub fn index_of(row: usize, col: usize) -> usize {
        row * REELS + col
    }

    pub fn get(&self, row: usize, col: usize) -> SymbolId {
        self.0[Self::index_of(row, col)]
    }

    pub fn set(&mut self, row: usize, col: usize, id: SymbolId) {
        self.0[Self::index_of(row, col)] = id;
    }

    pub fn cells(&self) -> &[SymbolId; GRID_SIZE] {
        &self.0
    }

    pub fn row(&self, row: usize) -> [SymbolId; REELS] {
        std::array::from_fn(|col| self.get(row, col))
    }

    /// One reel, top to bottom
    pub fn column(&self, col: usize) -> [SymbolId; ROWS] {
        std::array::from_fn(|row| self.get(row, col))
    }

    pub fn set_column(&mut self, col: usize, values: [SymbolId; ROWS]) {
        for (row, id) in values.into_iter().enumerate() {
            self.set(row, col, id);
        }
    }

    /// Cells 3, 4, 5
    pub fn payline(&self) -> [SymbolId; REELS] {
        self.row(PAYLINE_ROW)
    }

    pub fn to_vec(&self) -> Vec<SymbolId> {
        self.0.to_vec()
    }
}

impl Index<usize> for Grid {
    type Output = SymbolId;

    fn index(&self, index: usize) -> &SymbolId {
        &self.0[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_layout() {
        let grid = Grid::new([1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(grid.get(1, 0), 4);
        assert_eq!(grid[5], 6);
        assert_eq!(grid.payline(), [4, 5, 6]);
        assert_eq!(grid.column(2), [3, 6, 9]);
        assert_eq!(Grid::index_of(2, 1), 7);
    }

    #[test]
    fn test_from_rows() {
        let grid = Grid::from_rows([[1, 1, 1], [2, 3, 4], [5, 5, 5]]);
        assert_eq!(grid.cells(), &[1, 1, 1, 2, 3, 4, 5, 5, 5]);
    }

    #[test]
    fn test_set_column() {
        let mut grid = Grid::filled(1);
        grid.set_column(1, [7, 8, 9]);
        assert_eq!(grid.row(0), [1, 7, 1]);
        assert_eq!(grid.row(2), [1, 9, 1]);
    }
}
