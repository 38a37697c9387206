use rand::rngs::SmallRng;

use super::*;

impl SymbolPicker for SmallRng {
    fn pick_index(&mut self, bound: usize) -> usize {
        use rand::prelude::*;

        self.random_range(0..bound)
    }
}

/// Generation strategy that fills a blank board with the refill planner, then clears and refills
/// whatever free matches are left until the board is stable. A fill that keeps matching for
/// `width * height` rounds is thrown away and regenerated from blank.
#[derive(Debug)]
pub struct StableBoardGenerator<'a, P: ?Sized> {
    picker: &'a mut P,
}

impl<'a, P: SymbolPicker + ?Sized> StableBoardGenerator<'a, P> {
    pub fn new(picker: &'a mut P) -> Self {
        Self { picker }
    }
}

impl<P: SymbolPicker + ?Sized> BoardGenerator for StableBoardGenerator<'_, P> {
    fn generate(self, config: &EngineConfig) -> Result<Board> {
        let picker = self.picker;
        let rounds = config.total_cells().max(1);

        for attempt in 1..=config.generation_attempts {
            let mut board = Board::empty(config.size);
            RefillPlan::new(&board, config.palette, &mut *picker).apply_to(&mut board);

            for _ in 0..rounds {
                let groups = find_matches(&board, config.diagonals);
                if groups.is_empty() {
                    log::debug!("Generated {:?} board on attempt {}", config.size, attempt);
                    return Ok(board);
                }

                for coords in matched_cells(&groups) {
                    board[coords] = Cell::Empty;
                }
                board.apply_gravity();
                RefillPlan::new(&board, config.palette, &mut *picker).apply_to(&mut board);
            }

            log::debug!("Board did not settle after {} rounds, regenerating", rounds);
        }

        log::warn!(
            "No stable {:?} board with {} symbols after {} attempts",
            config.size,
            config.palette,
            config.generation_attempts
        );
        Err(GameError::GenerationExhausted)
    }
}
