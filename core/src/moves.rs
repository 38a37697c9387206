use alloc::vec::Vec;

use crate::*;

/// Three cells, relative to an anchor, that hold equal symbols exactly when a single swap completes
/// a run through them. The first six span three columns with one tile a row off the line, the last
/// two leave a one-cell gap in a column. Each is also read with the axes transposed.
const ONE_OFF_PATTERNS: [[(Coord, Coord); 3]; 8] = [
    [(0, 1), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 0)],
    [(0, 0), (1, 1), (2, 0)],
    [(0, 1), (1, 0), (2, 1)],
    [(0, 0), (1, 0), (2, 1)],
    [(0, 0), (1, 1), (2, 1)],
    [(0, 0), (0, 2), (0, 3)],
    [(0, 0), (0, 1), (0, 3)],
];

/// Whether some legal swap creates a match. Expects a complete board with no pending matches.
pub fn has_legal_move(board: &Board, diagonals: bool) -> bool {
    if diagonals {
        // diagonal runs are not covered by the pattern table
        find_legal_swap(board, true).is_some()
    } else {
        has_pattern_move(board)
    }
}

/// Pattern-table check for row and column runs.
pub fn has_pattern_move(board: &Board) -> bool {
    board.iter_coords().any(|anchor| {
        ONE_OFF_PATTERNS.iter().any(|pattern| {
            probe_pattern(board, anchor, pattern, false) || probe_pattern(board, anchor, pattern, true)
        })
    })
}

fn probe_pattern(
    board: &Board,
    anchor: Coord2,
    pattern: &[(Coord, Coord); 3],
    transposed: bool,
) -> bool {
    let [a, b, c] = pattern.map(|(dx, dy)| {
        let (dx, dy) = if transposed { (dy, dx) } else { (dx, dy) };
        let x = anchor.0.checked_add(dx)?;
        let y = anchor.1.checked_add(dy)?;
        board.symbol_at((x, y))
    });
    matches!((a, b, c), (Some(a), Some(b), Some(c)) if a == b && b == c)
}

/// Whether swapping `a` and `b` would complete a run through either of them, evaluated without
/// touching the board. Runs elsewhere are not considered.
pub fn would_swap_match(board: &Board, a: Coord2, b: Coord2, diagonals: bool) -> bool {
    if !board.contains(a) || !board.contains(b) || !is_adjacent(a, b) {
        return false;
    }

    let swapped = |coords: Coord2| {
        let source = if coords == a {
            b
        } else if coords == b {
            a
        } else {
            coords
        };
        board.symbol_at(source)
    };
    let size = board.size();

    [a, b].into_iter().any(|pos| {
        let Some(symbol) = swapped(pos) else {
            return false;
        };
        MatchDirection::enabled(diagonals).iter().any(|direction| {
            let (dx, dy) = direction.delta();
            let forward = run_from(pos, (dx, dy), symbol, size, &swapped);
            let backward = run_from(pos, (-dx, -dy), symbol, size, &swapped);
            1 + forward + backward >= MIN_RUN
        })
    })
}

/// Cells after `start` along `delta` that hold `symbol`.
fn run_from(
    start: Coord2,
    delta: (isize, isize),
    symbol: Symbol,
    size: Coord2,
    lookup: &impl Fn(Coord2) -> Option<Symbol>,
) -> usize {
    let mut count = 0;
    let mut cursor = apply_delta(start, delta, size);
    while let Some(coords) = cursor {
        if lookup(coords) != Some(symbol) {
            break;
        }
        count += 1;
        cursor = apply_delta(coords, delta, size);
    }
    count
}

/// Every swap that would create a match, each pair once with the left or upper cell first.
pub fn legal_swaps(board: &Board, diagonals: bool) -> Vec<(Coord2, Coord2)> {
    swap_candidates(board)
        .filter(|&(a, b)| would_swap_match(board, a, b, diagonals))
        .collect()
}

/// First legal swap in scan order, usable as a hint.
pub fn find_legal_swap(board: &Board, diagonals: bool) -> Option<(Coord2, Coord2)> {
    swap_candidates(board).find(|&(a, b)| would_swap_match(board, a, b, diagonals))
}

fn swap_candidates(board: &Board) -> impl Iterator<Item = (Coord2, Coord2)> + '_ {
    let size = board.size();
    board.iter_coords().flat_map(move |coords| {
        [(1, 0), (0, 1)]
            .into_iter()
            .filter_map(move |delta| apply_delta(coords, delta, size).map(|other| (coords, other)))
    })
}
