pub use self::{board::*, piece::*};

pub(crate) mod board;
pub(crate) mod piece;

/// Total board height in rows.
pub const BOARD_HEIGHT: usize = 15;
/// Total board width in columns.
pub const BOARD_WIDTH: usize = 11;

/// Rectangle of cells, rows and columns as half-open ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Area {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl Area {
    #[must_use]
    #[expect(clippy::cast_possible_wrap)]
    pub const fn contains(&self, row: isize, col: isize) -> bool {
        row >= self.top as isize
            && row < self.bottom as isize
            && col >= self.left as isize
            && col < self.right as isize
    }
}

/// Cells pieces may occupy. Covers the whole grid.
pub const PLAYABLE_AREA: Area = Area {
    top: 0,
    bottom: BOARD_HEIGHT,
    left: 0,
    right: BOARD_WIDTH,
};

/// Cells hidden from view while a board is blind.
pub const BLIND_AREA: Area = Area {
    top: 2,
    bottom: 12,
    left: 2,
    right: 9,
};
