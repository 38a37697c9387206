use alloc::vec;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;
pub use random::*;

mod random;

/// Injected source of randomness for spawned tiles.
pub trait SymbolPicker {
    /// Uniform index in `0..bound`. `bound` is never zero.
    fn pick_index(&mut self, bound: usize) -> usize;
}

impl<P: SymbolPicker + ?Sized> SymbolPicker for &mut P {
    fn pick_index(&mut self, bound: usize) -> usize {
        (**self).pick_index(bound)
    }
}

pub trait BoardGenerator {
    fn generate(self, config: &EngineConfig) -> Result<Board>;
}

/// A tile entering the board from above.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub coords: Coord2,
    pub symbol: Symbol,
    /// Drawn from the full palette because every symbol clashed with a neighbor.
    pub relaxed: bool,
}

/// New symbols for the gaps at the top of each column.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefillPlan {
    /// Per column, top to bottom: entry `i` lands on row `i`.
    columns: Vec<Vec<Symbol>>,
    /// Slots where the neighbor constraint had to be dropped.
    relaxed: Vec<Coord2>,
}

impl RefillPlan {
    /// Plans symbols for every gap of a compacted board.
    ///
    /// Slots are resolved column by column from the left, each column bottom-up, and a new symbol
    /// avoids every orthogonal neighbor that already holds a tile or was planned earlier.
    pub fn new<P: SymbolPicker + ?Sized>(board: &Board, palette: Symbol, picker: &mut P) -> Self {
        debug_assert!(board.is_compacted(), "refill planned on a board with floating tiles");
        if palette == 0 {
            log::warn!("Refill requested with an empty palette, leaving gaps in place");
            return Self::default();
        }

        let width = board.width();
        let mut columns: Vec<Vec<Symbol>> = Vec::with_capacity(width.into());
        let mut relaxed = Vec::new();

        for x in 0..width {
            let gaps = board.column_gaps(x);
            let mut column = vec![0; gaps.into()];

            for y in (0..gaps).rev() {
                let coords = (x, y);
                let excluded: SmallVec<[Symbol; 4]> = board
                    .iter_neighbors(coords)
                    .filter_map(|neighbor| resolved_symbol(board, &columns, &column, coords, neighbor))
                    .collect();
                let candidates: SmallVec<[Symbol; 16]> = (0..palette)
                    .filter(|symbol| !excluded.contains(symbol))
                    .collect();

                column[usize::from(y)] = if candidates.is_empty() {
                    log::debug!(
                        "No symbol fits {:?} next to {:?}, drawing from the full palette",
                        coords,
                        excluded
                    );
                    relaxed.push(coords);
                    pick(picker, palette)
                } else {
                    candidates[picker.pick_index(candidates.len())]
                };
            }

            columns.push(column);
        }

        Self { columns, relaxed }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.iter().all(Vec::is_empty)
    }

    pub fn column(&self, x: Coord) -> &[Symbol] {
        self.columns
            .get(usize::from(x))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn relaxed(&self) -> &[Coord2] {
        &self.relaxed
    }

    pub fn spawn_count(&self) -> usize {
        self.columns.iter().map(Vec::len).sum()
    }

    /// Spawned tiles column by column, each column top to bottom.
    pub fn spawns(&self) -> impl Iterator<Item = Spawn> + '_ {
        self.columns.iter().enumerate().flat_map(move |(x, column)| {
            column.iter().enumerate().map(move |(y, &symbol)| {
                let coords = (x as Coord, y as Coord);
                Spawn {
                    coords,
                    symbol,
                    relaxed: self.relaxed.contains(&coords),
                }
            })
        })
    }

    /// Writes the planned symbols into the gaps they were planned for.
    pub fn apply_to(&self, board: &mut Board) {
        for spawn in self.spawns() {
            debug_assert!(board[spawn.coords].is_empty(), "refill over a tile at {:?}", spawn.coords);
            board[spawn.coords] = Cell::Tile(spawn.symbol);
        }
    }
}

fn pick<P: SymbolPicker + ?Sized>(picker: &mut P, palette: Symbol) -> Symbol {
    let index = picker.pick_index(palette.into());
    // pickers are trusted to stay in range, anything else is clamped into the palette
    index.min(usize::from(palette) - 1) as Symbol
}

/// Symbol a neighbor will hold by the time `current` is filled, if it is already decided.
fn resolved_symbol(
    board: &Board,
    planned: &[Vec<Symbol>],
    current_column: &[Symbol],
    current: Coord2,
    neighbor: Coord2,
) -> Option<Symbol> {
    if let Some(symbol) = board[neighbor].symbol() {
        return Some(symbol);
    }
    let (x, y) = neighbor;
    if x < current.0 {
        planned[usize::from(x)].get(usize::from(y)).copied()
    } else if x == current.0 && y > current.1 {
        current_column.get(usize::from(y)).copied()
    } else {
        None
    }
}
