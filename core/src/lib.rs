#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cascade::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use matcher::*;
pub use moves::*;
pub use tile::*;
pub use types::*;

mod board;
mod cascade;
mod engine;
mod error;
mod generator;
mod matcher;
mod moves;
mod tile;
mod types;

/// Smallest palette that can fill an orthogonal board without free matches.
pub const MIN_PALETTE: Symbol = 2;

/// Smallest palette accepted when diagonal runs also count.
pub const MIN_DIAGONAL_PALETTE: Symbol = 3;

pub const DEFAULT_GENERATION_ATTEMPTS: u16 = 64;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// `(width, height)` in cells.
    pub size: Coord2,
    /// Number of distinct symbols, tiles take values in `[0, palette)`.
    pub palette: Symbol,
    /// Whether the two diagonal directions form matches too.
    pub diagonals: bool,
    /// Blank-board regenerations allowed when building the starting board.
    pub generation_attempts: u16,
}

impl EngineConfig {
    pub const fn new_unchecked(size: Coord2, palette: Symbol, diagonals: bool) -> Self {
        Self {
            size,
            palette,
            diagonals,
            generation_attempts: DEFAULT_GENERATION_ATTEMPTS,
        }
    }

    pub fn new((size_x, size_y): Coord2, palette: Symbol, diagonals: bool) -> Self {
        let size_x = size_x.clamp(1, Coord::MAX);
        let size_y = size_y.clamp(1, Coord::MAX);
        let palette = palette.clamp(min_palette(diagonals), Symbol::MAX);
        Self::new_unchecked((size_x, size_y), palette, diagonals)
    }

    /// 8x8 board, four symbols, rows and columns only.
    pub const fn classic() -> Self {
        Self::new_unchecked((8, 8), 4, false)
    }

    /// 8x8 board, four symbols, diagonals included.
    pub const fn diagonal() -> Self {
        Self::new_unchecked((8, 8), 4, true)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn min_palette(&self) -> Symbol {
        min_palette(self.diagonals)
    }

    pub fn validate(&self) -> Result<()> {
        let (size_x, size_y) = self.size;
        if size_x == 0 || size_y == 0 {
            return Err(GameError::InvalidConfig);
        }
        if self.palette < self.min_palette() {
            return Err(GameError::InvalidConfig);
        }
        if self.generation_attempts == 0 {
            return Err(GameError::InvalidConfig);
        }
        Ok(())
    }

    /// Parses a JSON config, missing fields take the classic defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|err| {
            log::debug!("Rejected engine config: {}", err);
            GameError::InvalidConfig
        })?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::classic()
    }
}

const fn min_palette(diagonals: bool) -> Symbol {
    if diagonals {
        MIN_DIAGONAL_PALETTE
    } else {
        MIN_PALETTE
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapOutcome {
    /// No match formed, the swap was undone.
    Reverted,
    /// Matches were cleared and more moves remain.
    Scored,
    /// Matches were cleared and no legal move is left.
    GameOver,
}

impl SwapOutcome {
    pub const fn has_update(self) -> bool {
        use SwapOutcome::*;
        match self {
            Reverted => false,
            Scored => true,
            GameOver => true,
        }
    }

    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::GameOver)
    }
}
