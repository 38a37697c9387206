use alloc::collections::BTreeSet;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Shortest run that counts as a match.
pub const MIN_RUN: usize = 3;

/// Line along which a run is read. Every direction points rightwards or downwards so each line
/// has exactly one starting cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatchDirection {
    Horizontal,
    Vertical,
    /// Top-left to bottom-right.
    DiagonalDown,
    /// Bottom-left to top-right.
    DiagonalUp,
}

impl MatchDirection {
    pub const ORTHOGONAL: [Self; 2] = [Self::Horizontal, Self::Vertical];
    pub const ALL: [Self; 4] = [
        Self::Horizontal,
        Self::Vertical,
        Self::DiagonalDown,
        Self::DiagonalUp,
    ];

    /// Directions checked for a board with or without diagonal matching.
    pub const fn enabled(diagonals: bool) -> &'static [Self] {
        if diagonals {
            &Self::ALL
        } else {
            &Self::ORTHOGONAL
        }
    }

    pub const fn delta(self) -> (isize, isize) {
        match self {
            Self::Horizontal => (1, 0),
            Self::Vertical => (0, 1),
            Self::DiagonalDown => (1, 1),
            Self::DiagonalUp => (1, -1),
        }
    }

    pub const fn is_diagonal(self) -> bool {
        matches!(self, Self::DiagonalDown | Self::DiagonalUp)
    }
}

pub type GroupCells = SmallVec<[Coord2; 5]>;

/// A maximal straight run of at least [`MIN_RUN`] equal symbols, in line order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    pub direction: MatchDirection,
    pub symbol: Symbol,
    pub cells: GroupCells,
}

impl MatchGroup {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Points awarded for clearing this group, one per tile.
    pub fn points(&self) -> CellCount {
        self.cells.len().try_into().unwrap_or(CellCount::MAX)
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.cells.contains(&coords)
    }
}

/// Every maximal run on the board, direction by direction. Groups of different directions may
/// share cells.
pub fn find_matches(board: &Board, diagonals: bool) -> Vec<MatchGroup> {
    let mut groups = Vec::new();
    for &direction in MatchDirection::enabled(diagonals) {
        scan_direction(board, direction, &mut groups);
    }
    groups
}

pub fn has_matches(board: &Board, diagonals: bool) -> bool {
    !find_matches(board, diagonals).is_empty()
}

/// Union of the cells of all groups, each cell once.
pub fn matched_cells(groups: &[MatchGroup]) -> BTreeSet<Coord2> {
    groups
        .iter()
        .flat_map(|group| group.cells.iter().copied())
        .collect()
}

fn scan_direction(board: &Board, direction: MatchDirection, groups: &mut Vec<MatchGroup>) {
    let size = board.size();
    let (dx, dy) = direction.delta();

    for start in board.iter_coords() {
        // only walk from the first cell of each line
        if apply_delta(start, (-dx, -dy), size).is_some() {
            continue;
        }

        let mut run = GroupCells::new();
        let mut run_symbol = None;
        let mut cursor = Some(start);

        while let Some(coords) = cursor {
            let symbol = board[coords].symbol();
            if symbol.is_none() || symbol != run_symbol {
                flush_run(direction, run_symbol, &mut run, groups);
                run_symbol = symbol;
            }
            if symbol.is_some() {
                run.push(coords);
            }
            cursor = apply_delta(coords, (dx, dy), size);
        }

        flush_run(direction, run_symbol, &mut run, groups);
    }
}

fn flush_run(
    direction: MatchDirection,
    symbol: Option<Symbol>,
    run: &mut GroupCells,
    groups: &mut Vec<MatchGroup>,
) {
    match symbol {
        Some(symbol) if run.len() >= MIN_RUN => {
            log::trace!("{:?} run of {} x{} at {:?}", direction, symbol, run.len(), run[0]);
            groups.push(MatchGroup {
                direction,
                symbol,
                cells: core::mem::take(run),
            });
        }
        _ => run.clear(),
    }
}
