/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for cell counts and per-step points.
pub type CellCount = u16;

/// Two-dimensional coordinates `(column, row)`, row 0 at the top.
pub type Coord2 = (Coord, Coord);

/// Identity of a tile, always in `[0, palette)`.
pub type Symbol = u8;

/// Session score accumulator.
pub type Score = u32;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Whether two cells are exactly one step apart along a single axis.
pub const fn is_adjacent(a: Coord2, b: Coord2) -> bool {
    (a.0.abs_diff(b.0) as u16) + (a.1.abs_diff(b.1) as u16) == 1
}

/// Up, right, down, left.
pub(crate) const ORTHOGONAL: [(isize, isize); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
pub(crate) fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

/// In-bounds orthogonal neighbors of a cell, in up, right, down, left order.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub(crate) fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= ORTHOGONAL.len() {
                return None;
            }

            let next_item = apply_delta(self.center, ORTHOGONAL[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}
