use alloc::vec::Vec;
use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// A tile moved down by gravity, for replaying the drop.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fall {
    pub column: Coord,
    pub from_row: Coord,
    pub to_row: Coord,
}

/// Grid of cells indexed by `(column, row)`, row 0 at the top.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Array2<Cell>,
}

impl Board {
    /// A board where every cell is [`Cell::Empty`].
    pub fn empty(size: Coord2) -> Self {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }

    /// Builds a full board from row-major symbol literals, top row first.
    pub fn from_rows<const W: usize>(rows: &[[Symbol; W]]) -> Result<Self> {
        let height = Coord::try_from(rows.len()).map_err(|_| GameError::InvalidBoardShape)?;
        let width = Coord::try_from(W).map_err(|_| GameError::InvalidBoardShape)?;
        Self::from_symbols((width, height), rows.as_flattened())
    }

    /// Builds a full board from a row-major symbol slice of exactly `size.0 * size.1` entries.
    pub fn from_symbols(size: Coord2, symbols: &[Symbol]) -> Result<Self> {
        if symbols.len() != usize::from(mult(size.0, size.1)) {
            return Err(GameError::InvalidBoardShape);
        }

        let mut board = Self::empty(size);
        let width = usize::from(size.0).max(1);
        for (i, &symbol) in symbols.iter().enumerate() {
            board.cells[[i % width, i / width]] = Cell::Tile(symbol);
        }
        Ok(board)
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn width(&self) -> Coord {
        self.size().0
    }

    pub fn height(&self) -> Coord {
        self.size().1
    }

    pub fn total_cells(&self) -> CellCount {
        let (size_x, size_y) = self.size();
        mult(size_x, size_y)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size.0 && coords.1 < size.1
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfRange)
        }
    }

    pub fn get(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub fn set(&mut self, coords: Coord2, cell: Cell) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self[coords] = cell;
        Ok(())
    }

    /// Symbol at `coords`, `None` for empty cells and positions off the board.
    pub fn symbol_at(&self, coords: Coord2) -> Option<Symbol> {
        if self.contains(coords) {
            self[coords].symbol()
        } else {
            None
        }
    }

    /// Exchanges two orthogonally adjacent cells. Nothing is mutated on error.
    pub fn swap(&mut self, a: Coord2, b: Coord2) -> Result<()> {
        let a = self.validate_coords(a)?;
        let b = self.validate_coords(b)?;
        if !is_adjacent(a, b) {
            return Err(GameError::InvalidAdjacency);
        }
        self.swap_unchecked(a, b);
        Ok(())
    }

    pub(crate) fn swap_unchecked(&mut self, a: Coord2, b: Coord2) {
        self.cells.swap(a.to_nd_index(), b.to_nd_index());
    }

    /// No cell is empty.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(|cell| !cell.is_empty())
    }

    pub fn empty_count(&self) -> CellCount {
        self.cells
            .iter()
            .filter(|cell| cell.is_empty())
            .count()
            .try_into()
            .unwrap()
    }

    /// All coordinates, column by column, each column top to bottom.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord2> + use<> {
        let (size_x, size_y) = self.size();
        (0..size_x).flat_map(move |x| (0..size_y).map(move |y| (x, y)))
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    /// Number of empty cells at the top of `column` before the first tile.
    pub fn column_gaps(&self, column: Coord) -> Coord {
        let mut gaps = 0;
        while gaps < self.height() && self[(column, gaps)].is_empty() {
            gaps += 1;
        }
        gaps
    }

    /// Every column has its empty cells above all of its tiles.
    pub fn is_compacted(&self) -> bool {
        (0..self.width()).all(|x| {
            let gaps = self.column_gaps(x);
            (gaps..self.height()).all(|y| !self[(x, y)].is_empty())
        })
    }

    /// Drops every tile as far down its column as it goes, keeping the column order.
    pub fn apply_gravity(&mut self) -> Vec<Fall> {
        let (size_x, size_y) = self.size();
        let mut falls = Vec::new();

        for x in 0..size_x {
            let mut landing = size_y;
            for y in (0..size_y).rev() {
                let cell = self[(x, y)];
                if cell.is_empty() {
                    continue;
                }
                landing -= 1;
                if landing != y {
                    self[(x, landing)] = cell;
                    self[(x, y)] = Cell::Empty;
                    falls.push(Fall {
                        column: x,
                        from_row: y,
                        to_row: landing,
                    });
                }
            }
        }

        falls
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_is_row_major() {
        let board = Board::from_rows(&[[0, 1, 2], [3, 4, 5]]).unwrap();

        assert_eq!(board.size(), (3, 2));
        assert_eq!(board[(2, 0)], Cell::Tile(2));
        assert_eq!(board[(0, 1)], Cell::Tile(3));
        assert!(board.is_complete());
    }

    #[test]
    fn from_symbols_rejects_wrong_length() {
        assert_eq!(
            Board::from_symbols((3, 2), &[0, 1, 2, 0, 1]),
            Err(GameError::InvalidBoardShape)
        );
        assert_eq!(
            Board::from_symbols((2, 2), &[0, 1, 2, 3]).unwrap(),
            Board::from_rows(&[[0, 1], [2, 3]]).unwrap()
        );
    }

    #[test]
    fn get_and_set_check_bounds() {
        let mut board = Board::empty((2, 3));

        assert_eq!(board.get((1, 2)), Ok(Cell::Empty));
        assert_eq!(board.get((2, 0)), Err(GameError::OutOfRange));
        assert_eq!(board.get((0, 3)), Err(GameError::OutOfRange));
        assert_eq!(board.set((5, 5), Cell::Tile(1)), Err(GameError::OutOfRange));

        board.set((1, 2), Cell::Tile(1)).unwrap();
        assert_eq!(board.symbol_at((1, 2)), Some(1));
        assert_eq!(board.symbol_at((9, 9)), None);
    }

    #[test]
    fn swap_rejects_non_adjacent_cells_without_mutation() {
        let mut board = Board::from_rows(&[[0, 1, 2], [3, 4, 5]]).unwrap();
        let before = board.clone();

        assert_eq!(board.swap((0, 0), (1, 1)), Err(GameError::InvalidAdjacency));
        assert_eq!(board.swap((0, 0), (0, 0)), Err(GameError::InvalidAdjacency));
        assert_eq!(board.swap((0, 0), (2, 0)), Err(GameError::InvalidAdjacency));
        assert_eq!(board.swap((2, 1), (3, 1)), Err(GameError::OutOfRange));
        assert_eq!(board, before);

        board.swap((0, 0), (0, 1)).unwrap();
        assert_eq!(board[(0, 0)], Cell::Tile(3));
        assert_eq!(board[(0, 1)], Cell::Tile(0));
    }

    #[test]
    fn gravity_compacts_columns_and_reports_falls() {
        let mut board = Board::from_rows(&[[0, 1], [2, 3], [4, 5], [6, 7]]).unwrap();
        board[(0, 1)] = Cell::Empty;
        board[(0, 3)] = Cell::Empty;
        board[(1, 0)] = Cell::Empty;

        let falls = board.apply_gravity();

        assert_eq!(board[(0, 0)], Cell::Empty);
        assert_eq!(board[(0, 1)], Cell::Empty);
        assert_eq!(board[(0, 2)], Cell::Tile(0));
        assert_eq!(board[(0, 3)], Cell::Tile(4));
        assert_eq!(board[(1, 0)], Cell::Empty);
        assert_eq!(board[(1, 3)], Cell::Tile(7));
        assert_eq!(board.column_gaps(0), 2);
        assert_eq!(board.column_gaps(1), 1);
        assert!(board.is_compacted());
        assert_eq!(
            falls,
            [
                Fall {
                    column: 0,
                    from_row: 2,
                    to_row: 3
                },
                Fall {
                    column: 0,
                    from_row: 0,
                    to_row: 2
                },
            ]
        );
    }

    #[test]
    fn gravity_on_full_board_is_noop() {
        let mut board = Board::from_rows(&[[0, 1], [2, 3]]).unwrap();
        let before = board.clone();

        assert!(board.apply_gravity().is_empty());
        assert_eq!(board, before);
    }
}
