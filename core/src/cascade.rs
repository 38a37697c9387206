use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Matched tiles cleared in one resolution round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Removal {
    pub groups: Vec<MatchGroup>,
    /// Union of the group cells, each once.
    pub cleared: Vec<Coord2>,
    /// Sum of the group lengths, shared cells count once per group.
    pub points: CellCount,
    /// Board after clearing, gaps still in place.
    pub board: Board,
}

/// Gravity and new tiles that close the gaps of the preceding removal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refill {
    pub falls: Vec<Fall>,
    pub spawned: Vec<Spawn>,
    /// Board after the refill, complete again.
    pub board: Board,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CascadeStep {
    Removed(Removal),
    Refilled(Refill),
}

impl CascadeStep {
    pub fn board(&self) -> &Board {
        match self {
            Self::Removed(removal) => &removal.board,
            Self::Refilled(refill) => &refill.board,
        }
    }
}

/// Everything a fully resolved cascade did.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cascade {
    pub score: Score,
    /// Number of removal rounds, chain reactions included.
    pub rounds: usize,
    pub steps: Vec<CascadeStep>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CascadeState {
    Scanning,
    Refilling,
    Done,
}

/// Alternates removals and refills until the board has no match left. Yields every step so the
/// caller can replay the cascade at its own pace.
#[derive(Debug)]
pub struct CascadeResolver<'a, P: ?Sized> {
    board: &'a mut Board,
    picker: &'a mut P,
    palette: Symbol,
    diagonals: bool,
    state: CascadeState,
    score: Score,
    rounds: usize,
}

impl<'a, P: SymbolPicker + ?Sized> CascadeResolver<'a, P> {
    pub fn new(board: &'a mut Board, config: &EngineConfig, picker: &'a mut P) -> Self {
        Self {
            board,
            picker,
            palette: config.palette,
            diagonals: config.diagonals,
            state: CascadeState::Scanning,
            score: 0,
            rounds: 0,
        }
    }

    pub fn state(&self) -> CascadeState {
        self.state
    }

    /// Score gathered by the steps taken so far.
    pub fn score(&self) -> Score {
        self.score
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Runs the cascade to the end.
    pub fn resolve(mut self) -> Cascade {
        let steps: Vec<_> = self.by_ref().collect();
        log::debug!(
            "Cascade settled after {} rounds for {} points",
            self.rounds,
            self.score
        );
        Cascade {
            score: self.score,
            rounds: self.rounds,
            steps,
        }
    }

    fn remove_matches(&mut self) -> Option<Removal> {
        let groups = find_matches(self.board, self.diagonals);
        if groups.is_empty() {
            return None;
        }

        let cleared: Vec<_> = matched_cells(&groups).into_iter().collect();
        for &coords in &cleared {
            self.board[coords] = Cell::Empty;
        }

        let points = groups
            .iter()
            .fold(0, |sum: CellCount, group| sum.saturating_add(group.points()));
        self.score = self.score.saturating_add(points.into());
        self.rounds += 1;
        log::trace!(
            "Round {}: {} groups, {} cells, {} points",
            self.rounds,
            groups.len(),
            cleared.len(),
            points
        );

        Some(Removal {
            groups,
            cleared,
            points,
            board: self.board.clone(),
        })
    }

    fn refill(&mut self) -> Refill {
        let falls = self.board.apply_gravity();
        let plan = RefillPlan::new(self.board, self.palette, &mut *self.picker);
        plan.apply_to(self.board);
        debug_assert!(self.board.is_complete());
        log::trace!(
            "Round {}: {} tiles fell, {} spawned",
            self.rounds,
            falls.len(),
            plan.spawn_count()
        );

        Refill {
            falls,
            spawned: plan.spawns().collect(),
            board: self.board.clone(),
        }
    }
}

impl<P: SymbolPicker + ?Sized> Iterator for CascadeResolver<'_, P> {
    type Item = CascadeStep;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            CascadeState::Scanning => match self.remove_matches() {
                Some(removal) => {
                    self.state = CascadeState::Refilling;
                    Some(CascadeStep::Removed(removal))
                }
                None => {
                    self.state = CascadeState::Done;
                    None
                }
            },
            CascadeState::Refilling => {
                self.state = CascadeState::Scanning;
                Some(CascadeStep::Refilled(self.refill()))
            }
            CascadeState::Done => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use rand::prelude::*;

    /// Replays a fixed list of indices, then keeps returning zero.
    struct ScriptedPicker(vec::IntoIter<usize>);

    impl ScriptedPicker {
        fn new(indices: &[usize]) -> Self {
            Self(indices.to_vec().into_iter())
        }
    }

    impl SymbolPicker for ScriptedPicker {
        fn pick_index(&mut self, bound: usize) -> usize {
            self.0.next().unwrap_or(0) % bound
        }
    }

    /// Every spawn differs from its neighbors, unless that neighbor was itself a relaxed spawn.
    fn assert_spawns_avoid_neighbors(refill: &Refill) {
        let relaxed: Vec<_> = refill
            .spawned
            .iter()
            .filter(|spawn| spawn.relaxed)
            .map(|spawn| spawn.coords)
            .collect();

        for spawn in refill.spawned.iter().filter(|spawn| !spawn.relaxed) {
            assert_eq!(refill.board.symbol_at(spawn.coords), Some(spawn.symbol));
            for neighbor in refill.board.iter_neighbors(spawn.coords) {
                if relaxed.contains(&neighbor) {
                    continue;
                }
                assert_ne!(
                    refill.board.symbol_at(neighbor),
                    Some(spawn.symbol),
                    "{:?} next to {:?}",
                    spawn,
                    neighbor
                );
            }
        }
    }

    #[test]
    fn stable_board_resolves_to_nothing() {
        let mut board = Board::from_rows(&[
            [0, 1, 0], //
            [1, 0, 1],
            [0, 1, 0],
        ])
        .unwrap();
        let before = board.clone();

        let cascade =
            CascadeResolver::new(&mut board, &EngineConfig::classic(), &mut ScriptedPicker::new(&[]))
                .resolve();

        assert_eq!(cascade, Cascade::default());
        assert_eq!(board, before);
    }

    #[test]
    fn crossing_groups_score_each_group() {
        let mut board = Board::from_rows(&[
            [0, 2, 1, 3], //
            [2, 2, 2, 0],
            [3, 2, 0, 1],
            [1, 0, 3, 2],
        ])
        .unwrap();
        let config = EngineConfig::new((4, 4), 4, false);
        let mut picker = ScriptedPicker::new(&[]);
        let mut resolver = CascadeResolver::new(&mut board, &config, &mut picker);

        let Some(CascadeStep::Removed(removal)) = resolver.next() else {
            panic!("expected a removal first");
        };

        assert_eq!(removal.groups.len(), 2);
        assert_eq!(removal.cleared.len(), 5);
        // a 3-run and a 3-run sharing (1, 1): 6 points for 5 tiles
        assert_eq!(removal.points, 6);
        assert_eq!(removal.board.empty_count(), 5);
        assert_eq!(resolver.score(), 6);
        assert_eq!(resolver.state(), CascadeState::Refilling);

        let Some(CascadeStep::Refilled(refill)) = resolver.next() else {
            panic!("expected a refill after the removal");
        };
        assert!(refill.board.is_complete());
        assert_eq!(refill.spawned.len(), 5);
    }

    #[test]
    fn refill_chain_reaction_is_scored() {
        // clearing the middle row drops 1 1 next to the 1 on the right
        let mut board = Board::from_rows(&[
            [2, 1, 1, 3], //
            [0, 0, 0, 1],
            [1, 2, 3, 0],
        ])
        .unwrap();
        let config = EngineConfig::new((4, 3), 4, false);
        let mut picker = ScriptedPicker::new(&[]);

        let cascade = CascadeResolver::new(&mut board, &config, &mut picker).resolve();

        assert_eq!(cascade.rounds, 2);
        assert_eq!(cascade.score, 6);
        assert_eq!(cascade.steps.len(), 4);
        assert!(matches!(cascade.steps[0], CascadeStep::Removed(_)));
        assert!(matches!(cascade.steps[3], CascadeStep::Refilled(_)));
        assert!(find_matches(&board, false).is_empty());
        assert!(board.is_complete());
    }

    #[test]
    fn random_cascades_settle_within_board_area() {
        let config = EngineConfig::classic();
        let mut rng = SmallRng::seed_from_u64(3);

        for _ in 0..64 {
            let mut board = Board::empty(config.size);
            // an unconstrained random board is full of matches
            for coords in board.iter_coords() {
                board[coords] = Cell::Tile(rng.random_range(0..config.palette));
            }
            let area = usize::from(config.total_cells());

            let cascade = CascadeResolver::new(&mut board, &config, &mut rng).resolve();

            assert!(cascade.rounds <= area);
            assert_eq!(cascade.steps.len(), cascade.rounds * 2);
            assert!(board.is_complete());
            assert!(find_matches(&board, false).is_empty());

            let step_points: Score = cascade
                .steps
                .iter()
                .filter_map(|step| match step {
                    CascadeStep::Removed(removal) => Some(Score::from(removal.points)),
                    CascadeStep::Refilled(_) => None,
                })
                .sum();
            assert_eq!(step_points, cascade.score);

            for step in &cascade.steps {
                match step {
                    CascadeStep::Removed(removal) => {
                        let lengths: usize = removal.groups.iter().map(MatchGroup::len).sum();
                        assert_eq!(usize::from(removal.points), lengths);
                    }
                    CascadeStep::Refilled(refill) => assert_spawns_avoid_neighbors(refill),
                }
            }
        }
    }
}
