use alloc::vec::Vec;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    Active,
    GameOver,
}

impl EngineState {
    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::GameOver)
    }
}

/// What a single swap request did to the session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub outcome: SwapOutcome,
    /// Points gained by this turn alone.
    pub score: Score,
    /// Every intermediate board in order, empty for a reverted swap.
    pub steps: Vec<CascadeStep>,
}

impl TurnResult {
    const fn reverted() -> Self {
        Self {
            outcome: SwapOutcome::Reverted,
            score: 0,
            steps: Vec::new(),
        }
    }
}

/// A running match-3 session: the board, its rules, the random source for new tiles and the
/// score so far.
#[derive(Clone, Debug)]
pub struct GameEngine<P = SmallRng> {
    config: EngineConfig,
    board: Board,
    picker: P,
    score: Score,
    turns: u32,
    state: EngineState,
}

impl GameEngine<SmallRng> {
    pub fn with_seed(config: EngineConfig, seed: u64) -> Result<Self> {
        use rand::prelude::*;

        Self::new_session(config, SmallRng::seed_from_u64(seed))
    }
}

impl<P: SymbolPicker> GameEngine<P> {
    /// Starts a session on a freshly generated board without free matches.
    pub fn new_session(config: EngineConfig, mut picker: P) -> Result<Self> {
        config.validate()?;
        let board = StableBoardGenerator::new(&mut picker).generate(&config)?;
        Ok(Self::start(config, board, picker))
    }

    /// Resumes a session on a given board. The board must match the configured size, hold only
    /// palette symbols and contain no pending match.
    pub fn from_board(config: EngineConfig, board: Board, picker: P) -> Result<Self> {
        config.validate()?;
        if board.size() != config.size
            || !board.iter_coords().all(|coords| {
                board
                    .symbol_at(coords)
                    .is_some_and(|symbol| symbol < config.palette)
            })
            || has_matches(&board, config.diagonals)
        {
            return Err(GameError::InvalidBoardShape);
        }
        Ok(Self::start(config, board, picker))
    }

    fn start(config: EngineConfig, board: Board, picker: P) -> Self {
        let mut engine = Self {
            config,
            board,
            picker,
            score: 0,
            turns: 0,
            state: EngineState::Active,
        };
        engine.refresh_state();
        log::debug!(
            "New {:?} session with {} symbols, state {:?}",
            engine.config.size,
            engine.config.palette,
            engine.state
        );
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> Score {
        self.score
    }

    /// Swaps that scored. Reverted swaps are not counted.
    pub fn turns(&self) -> u32 {
        self.turns
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_game_over(&self) -> bool {
        !has_legal_move(&self.board, self.config.diagonals)
    }

    /// A swap that would score, if any is left.
    pub fn hint(&self) -> Option<(Coord2, Coord2)> {
        find_legal_swap(&self.board, self.config.diagonals)
    }

    pub fn request_swap(&mut self, a: Coord2, b: Coord2) -> Result<TurnResult> {
        self.check_active()?;
        self.board.swap(a, b)?;

        if !has_matches(&self.board, self.config.diagonals) {
            self.board.swap_unchecked(a, b);
            log::debug!("Swap {:?} <-> {:?} made no match, reverted", a, b);
            return Ok(TurnResult::reverted());
        }

        let cascade = CascadeResolver::new(&mut self.board, &self.config, &mut self.picker).resolve();
        self.score = self.score.saturating_add(cascade.score);
        self.turns += 1;
        self.refresh_state();

        let outcome = if self.state.is_game_over() {
            SwapOutcome::GameOver
        } else {
            SwapOutcome::Scored
        };
        log::debug!(
            "Turn {}: {:?} <-> {:?} scored {} in {} rounds, total {}, {:?}",
            self.turns,
            a,
            b,
            cascade.score,
            cascade.rounds,
            self.score,
            outcome
        );

        Ok(TurnResult {
            outcome,
            score: cascade.score,
            steps: cascade.steps,
        })
    }

    /// Deals a new board with the same rules and random source.
    pub fn restart(&mut self) -> Result<()> {
        self.board = StableBoardGenerator::new(&mut self.picker).generate(&self.config)?;
        self.score = 0;
        self.turns = 0;
        self.refresh_state();
        log::debug!("Session restarted, state {:?}", self.state);
        Ok(())
    }

    fn refresh_state(&mut self) {
        self.state = if self.is_game_over() {
            EngineState::GameOver
        } else {
            EngineState::Active
        };
    }

    fn check_active(&self) -> Result<()> {
        if self.state.is_game_over() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}
