use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Content of a single board position.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Transient gap left by a removal, only observable inside a cascade step.
    Empty,
    Tile(Symbol),
}

impl Cell {
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    pub const fn symbol(self) -> Option<Symbol> {
        match self {
            Self::Empty => None,
            Self::Tile(symbol) => Some(symbol),
        }
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::Empty
    }
}

impl From<Symbol> for Cell {
    fn from(symbol: Symbol) -> Self {
        Self::Tile(symbol)
    }
}
