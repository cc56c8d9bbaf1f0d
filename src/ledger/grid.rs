use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::errors::LedgerError;

/// A cell of the category grid. Ordering is row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const ORIGIN: Position = Position { row: 0, col: 0 };

    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn is_origin(self) -> bool {
        self == Self::ORIGIN
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl FromStr for Position {
    type Err = LedgerError;

    /// Accepts `row,col` and `(row, col)`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidPosition(s.to_string());
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);
        let (row, col) = inner.split_once(',').ok_or_else(invalid)?;
        let row = row.trim().parse::<usize>().map_err(|_| invalid())?;
        let col = col.trim().parse::<usize>().map_err(|_| invalid())?;
        Ok(Position::new(row, col))
    }
}

impl From<(usize, usize)> for Position {
    fn from((row, col): (usize, usize)) -> Self {
        Position::new(row, col)
    }
}

/// Largest number of rows or columns a grid may have.
pub const MAX_GRID_SIDE: usize = 32;

/// Fixed dimensions of a month's category grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    pub rows: usize,
    pub cols: usize,
}

impl Default for GridShape {
    fn default() -> Self {
        Self { rows: 6, cols: 4 }
    }
}

impl GridShape {
    pub fn new(rows: usize, cols: usize) -> Result<Self, LedgerError> {
        if !(1..=MAX_GRID_SIDE).contains(&rows) || !(1..=MAX_GRID_SIDE).contains(&cols) {
            return Err(LedgerError::InvalidShape { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn capacity(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, position: Position) -> bool {
        position.row < self.rows && position.col < self.cols
    }

    /// Row-major index of `position`.
    pub fn index_of(&self, position: Position) -> usize {
        position.row * self.cols + position.col
    }

    pub fn position_at(&self, index: usize) -> Position {
        Position::new(index / self.cols, index % self.cols)
    }

    /// One row-major step forward, wrapping the column into the next row.
    pub fn step_forward(&self, position: Position) -> Position {
        let wraps = position.col == self.cols - 1;
        Position::new(position.row + usize::from(wraps), (position.col + 1) % self.cols)
    }

    /// Exact inverse of [`GridShape::step_forward`]; `None` at the origin.
    pub fn step_back(&self, position: Position) -> Option<Position> {
        if position.is_origin() {
            return None;
        }
        if position.col == 0 {
            Some(Position::new(position.row - 1, self.cols - 1))
        } else {
            Some(Position::new(position.row, position.col - 1))
        }
    }

    /// Every cell of the grid in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.capacity()).map(move |index| self.position_at(index))
    }
}

impl fmt::Display for GridShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// Hands out grid cells in row-major order and takes them back from the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPositionAllocator {
    shape: GridShape,
    next_free: Position,
}

impl GridPositionAllocator {
    pub fn new(shape: GridShape) -> Self {
        Self {
            shape,
            next_free: Position::ORIGIN,
        }
    }

    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// First unoccupied cell; `(rows, 0)` once the grid is full.
    pub fn next_free(&self) -> Position {
        self.next_free
    }

    pub fn occupied(&self) -> usize {
        self.shape.index_of(self.next_free)
    }

    pub fn is_full(&self) -> bool {
        self.occupied() >= self.shape.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.next_free.is_origin()
    }

    pub fn allocate(&mut self) -> Result<Position, LedgerError> {
        if self.is_full() {
            return Err(LedgerError::GridFull {
                rows: self.shape.rows,
                cols: self.shape.cols,
            });
        }
        let position = self.next_free;
        self.next_free = self.shape.step_forward(position);
        Ok(position)
    }

    /// Gives back the last occupied cell and returns it as the new `next_free`.
    pub fn release(&mut self) -> Option<Position> {
        let previous = self.shape.step_back(self.next_free)?;
        self.next_free = previous;
        Some(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_forward_wraps_columns() {
        let shape = GridShape::new(6, 4).unwrap();
        assert_eq!(shape.step_forward(Position::new(0, 2)), Position::new(0, 3));
        assert_eq!(shape.step_forward(Position::new(0, 3)), Position::new(1, 0));
        assert_eq!(shape.step_forward(Position::new(5, 3)), Position::new(6, 0));
    }

    #[test]
    fn step_back_inverts_step_forward() {
        let shape = GridShape::new(3, 5).unwrap();
        for position in shape.positions() {
            let next = shape.step_forward(position);
            assert_eq!(shape.step_back(next), Some(position));
        }
        assert_eq!(shape.step_back(Position::ORIGIN), None);
    }

    #[test]
    fn zero_sized_shape_rejected() {
        assert_eq!(
            GridShape::new(0, 4),
            Err(LedgerError::InvalidShape { rows: 0, cols: 4 })
        );
    }

    #[test]
    fn oversized_shape_rejected() {
        assert!(GridShape::new(MAX_GRID_SIDE, MAX_GRID_SIDE).is_ok());
        assert_eq!(
            GridShape::new(MAX_GRID_SIDE + 1, 4),
            Err(LedgerError::InvalidShape {
                rows: MAX_GRID_SIDE + 1,
                cols: 4
            })
        );
        assert!(GridShape::new(4, usize::MAX).is_err());
    }

    #[test]
    fn allocator_fills_in_row_major_order() {
        let mut allocator = GridPositionAllocator::new(GridShape::new(2, 2).unwrap());
        let cells: Vec<_> = (0..4).map(|_| allocator.allocate().unwrap()).collect();
        assert_eq!(
            cells,
            vec![
                Position::new(0, 0),
                Position::new(0, 1),
                Position::new(1, 0),
                Position::new(1, 1)
            ]
        );
        assert!(allocator.is_full());
        assert_eq!(allocator.next_free(), Position::new(2, 0));
    }

    #[test]
    fn allocate_on_full_grid_leaves_state_untouched() {
        let mut allocator = GridPositionAllocator::new(GridShape::new(1, 2).unwrap());
        allocator.allocate().unwrap();
        allocator.allocate().unwrap();
        let before = allocator.clone();
        let err = allocator.allocate().unwrap_err();
        assert_eq!(err, LedgerError::GridFull { rows: 1, cols: 2 });
        assert_eq!(allocator, before);
    }

    #[test]
    fn release_retreats_one_step() {
        let mut allocator = GridPositionAllocator::new(GridShape::default());
        for _ in 0..5 {
            allocator.allocate().unwrap();
        }
        assert_eq!(allocator.next_free(), Position::new(1, 1));
        assert_eq!(allocator.release(), Some(Position::new(1, 0)));
        assert_eq!(allocator.release(), Some(Position::new(0, 3)));
        assert_eq!(allocator.occupied(), 3);
    }

    #[test]
    fn release_on_empty_grid_is_noop() {
        let mut allocator = GridPositionAllocator::new(GridShape::default());
        assert_eq!(allocator.release(), None);
        assert!(allocator.is_empty());
    }

    #[test]
    fn position_parses_both_forms() {
        assert_eq!("1,2".parse::<Position>().unwrap(), Position::new(1, 2));
        assert_eq!("(3, 0)".parse::<Position>().unwrap(), Position::new(3, 0));
        assert!("x,1".parse::<Position>().is_err());
        assert!("12".parse::<Position>().is_err());
    }

    #[test]
    fn position_ordering_is_row_major() {
        assert!(Position::new(0, 3) < Position::new(1, 0));
        assert!(Position::new(1, 0) < Position::new(1, 1));
    }
}
