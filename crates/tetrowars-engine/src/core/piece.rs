use arrayvec::ArrayVec;

/// Identifies one of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PlayerId {
    #[display("Player 1")]
    One,
    #[display("Player 2")]
    Two,
}

impl PlayerId {
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::One => 0,
            Self::Two => 1,
        }
    }

    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::One => Self::Two,
            Self::Two => Self::One,
        }
    }
}

/// Board coordinate. Signed so that candidate positions may lie off the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: isize,
    pub col: isize,
}

impl Position {
    #[must_use]
    pub const fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    #[must_use]
    pub const fn left(self) -> Self {
        Self::new(self.row, self.col - 1)
    }

    #[must_use]
    pub const fn right(self) -> Self {
        Self::new(self.row, self.col + 1)
    }

    #[must_use]
    pub const fn down(self) -> Self {
        Self::new(self.row + 1, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    Counterclockwise,
}

/// A piece on (or about to enter) a board.
///
/// Pieces are plain values: [`Piece::moved`] and [`Piece::rotated`] return a
/// candidate and leave the original untouched. Whether a candidate fits is
/// decided by the [`Board`](super::board::Board).
///
/// # Coordinate System
///
/// - Row 0 is the top of the board, columns grow rightward
/// - The anchor is the bottom-left corner of the piece's bounding box
/// - Rotation keeps the anchor fixed
///
/// # Example
///
/// ```
/// use tetrowars_engine::{Direction, Piece, PieceKind, PlayerId, Rotation};
///
/// let piece = Piece::spawn(PieceKind::T, 0, PlayerId::One);
/// let moved = piece.moved(Direction::Right).rotated(Rotation::Clockwise);
/// assert_eq!(moved.anchor(), piece.anchor().right());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    orientation: u8,
    anchor: Position,
    level: u8,
    owner: PlayerId,
}

impl Piece {
    /// Anchor of newly spawned pieces: the bottom of the reserve rows, left edge.
    pub const SPAWN_ANCHOR: Position = Position::new(3, 0);

    /// Creates a piece in its spawn orientation at the spawn anchor.
    #[must_use]
    pub const fn spawn(kind: PieceKind, level: u8, owner: PlayerId) -> Self {
        Self::at(kind, Self::SPAWN_ANCHOR, level, owner)
    }

    #[must_use]
    pub const fn at(kind: PieceKind, anchor: Position, level: u8, owner: PlayerId) -> Self {
        Self {
            kind,
            orientation: 0,
            anchor,
            level,
            owner,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn orientation(&self) -> u8 {
        self.orientation
    }

    #[must_use]
    pub const fn anchor(&self) -> Position {
        self.anchor
    }

    /// Level of the owning player when the piece was created.
    #[must_use]
    pub const fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub const fn owner(&self) -> PlayerId {
        self.owner
    }

    #[must_use]
    pub const fn symbol(&self) -> char {
        self.kind.as_char()
    }

    fn shape(&self) -> &'static Shape {
        &SHAPES[self.kind as usize][usize::from(self.orientation)]
    }

    /// Cells relative to the top-left of the bounding box, as `(row, col)`.
    pub fn relative_cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.shape()
            .cells()
            .iter()
            .map(|&(r, c)| (usize::from(r), usize::from(c)))
    }

    /// Absolute board cells covered by this piece.
    #[must_use]
    pub fn cells(&self) -> ArrayVec<Position, 4> {
        let shape = self.shape();
        #[expect(clippy::cast_possible_wrap)]
        let top = self.anchor.row - (shape.height() as isize - 1);
        shape
            .cells()
            .iter()
            .map(|&(r, c)| Position::new(top + isize::from(r), self.anchor.col + isize::from(c)))
            .collect()
    }

    #[must_use]
    pub const fn moved(&self, direction: Direction) -> Self {
        let anchor = match direction {
            Direction::Left => self.anchor.left(),
            Direction::Right => self.anchor.right(),
            Direction::Down => self.anchor.down(),
        };
        Self { anchor, ..*self }
    }

    #[must_use]
    pub const fn rotated(&self, rotation: Rotation) -> Self {
        let count = self.kind.orientation_count();
        let orientation = match rotation {
            Rotation::Clockwise => (self.orientation + 1) % count,
            Rotation::Counterclockwise => (self.orientation + count - 1) % count,
        };
        Self {
            orientation,
            ..*self
        }
    }
}

/// Kind of piece: the seven tetrominoes plus the single-cell penalty piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    I = 0,
    J = 1,
    L = 2,
    O = 3,
    S = 4,
    Z = 5,
    T = 6,
    /// 1x1 block dropped as a level-4 penalty.
    Penalty = 7,
}

impl PieceKind {
    /// Number of kinds including the penalty piece.
    pub const LEN: usize = 8;

    /// Kinds produced by block supply and accepted as commands.
    pub const TETROMINOES: [Self; 7] = [
        Self::I,
        Self::J,
        Self::L,
        Self::O,
        Self::S,
        Self::Z,
        Self::T,
    ];

    /// Number of distinct orientations reachable by rotation.
    #[must_use]
    pub const fn orientation_count(self) -> u8 {
        match self {
            Self::O | Self::Penalty => 1,
            Self::I | Self::S | Self::Z => 2,
            Self::J | Self::L | Self::T => 4,
        }
    }

    /// Returns the single character representation of this piece kind.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrowars_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::I.as_char(), 'I');
    /// assert_eq!(PieceKind::Penalty.as_char(), '*');
    /// ```
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            Self::I => 'I',
            Self::J => 'J',
            Self::L => 'L',
            Self::O => 'O',
            Self::S => 'S',
            Self::Z => 'Z',
            Self::T => 'T',
            Self::Penalty => '*',
        }
    }

    /// Parses one of the seven tetromino letters. The penalty piece has no letter form.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetrowars_engine::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_char('Z'), Some(PieceKind::Z));
    /// assert_eq!(PieceKind::from_char('*'), None);
    /// assert_eq!(PieceKind::from_char('z'), None);
    /// ```
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            'I' => Some(Self::I),
            'J' => Some(Self::J),
            'L' => Some(Self::L),
            'O' => Some(Self::O),
            'S' => Some(Self::S),
            'Z' => Some(Self::Z),
            'T' => Some(Self::T),
            _ => None,
        }
    }

    /// Parses a whole token such as `"T"`.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        let mut chars = token.chars();
        let c = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::from_char(c)
    }
}

/// Occupied cells of one orientation, `(row, col)` within the bounding box.
#[derive(Debug, Clone, Copy)]
struct Shape {
    cells: [(u8, u8); 4],
    len: usize,
}

impl Shape {
    fn cells(&self) -> &[(u8, u8)] {
        &self.cells[..self.len]
    }

    const fn height(&self) -> usize {
        let mut height = 0;
        let mut i = 0;
        while i < self.len {
            let r = self.cells[i].0 as usize + 1;
            if r > height {
                height = r;
            }
            i += 1;
        }
        height
    }
}

/// Rotates a shape 90° clockwise within its bounding box.
///
/// `(r, c)` maps to `(c, height - 1 - r)`, which keeps the result aligned to
/// the top-left of the new box.
const fn rotated_clockwise(shape: Shape) -> Shape {
    #[expect(clippy::cast_possible_truncation)]
    let height = shape.height() as u8;
    let mut cells = shape.cells;
    let mut i = 0;
    while i < shape.len {
        let (r, c) = shape.cells[i];
        cells[i] = (c, height - 1 - r);
        i += 1;
    }
    Shape {
        cells,
        len: shape.len,
    }
}

/// Generates all 4 rotation states of a shape by rotating 90° clockwise.
///
/// Kinds with fewer distinct orientations only use a prefix of the table.
const fn shape_rotations(shape: Shape) -> [Shape; 4] {
    let mut rotations = [shape; 4];
    let mut i = 1;
    while i < 4 {
        rotations[i] = rotated_clockwise(rotations[i - 1]);
        i += 1;
    }
    rotations
}

const SHAPES: [[Shape; 4]; PieceKind::LEN] = {
    const fn s(cells: [(u8, u8); 4]) -> Shape {
        Shape { cells, len: 4 }
    }
    [
        // I-piece: IIII
        shape_rotations(s([(0, 0), (0, 1), (0, 2), (0, 3)])),
        // J-piece: J.. / JJJ
        shape_rotations(s([(0, 0), (1, 0), (1, 1), (1, 2)])),
        // L-piece: ..L / LLL
        shape_rotations(s([(0, 2), (1, 0), (1, 1), (1, 2)])),
        // O-piece: OO / OO
        shape_rotations(s([(0, 0), (0, 1), (1, 0), (1, 1)])),
        // S-piece: .SS / SS.
        shape_rotations(s([(0, 1), (0, 2), (1, 0), (1, 1)])),
        // Z-piece: ZZ. / .ZZ
        shape_rotations(s([(0, 0), (0, 1), (1, 1), (1, 2)])),
        // T-piece: TTT / .T.
        shape_rotations(s([(0, 0), (0, 1), (0, 2), (1, 1)])),
        // Penalty piece: *
        [Shape {
            cells: [(0, 0); 4],
            len: 1,
        }; 4],
    ]
};

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted_cells(piece: &Piece) -> Vec<(isize, isize)> {
        let mut cells: Vec<_> = piece.cells().iter().map(|p| (p.row, p.col)).collect();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_spawn_cells_sit_on_reserve_row() {
        for kind in PieceKind::TETROMINOES {
            let piece = Piece::spawn(kind, 0, PlayerId::One);
            let cells = piece.cells();
            let bottom = cells.iter().map(|p| p.row).max().unwrap();
            let left = cells.iter().map(|p| p.col).min().unwrap();
            assert_eq!(bottom, 3, "{kind:?} should rest on row 3");
            assert_eq!(left, 0, "{kind:?} should touch column 0");
        }
    }

    #[test]
    fn test_i_piece_orientations() {
        let piece = Piece::spawn(PieceKind::I, 0, PlayerId::One);
        assert_eq!(sorted_cells(&piece), vec![(3, 0), (3, 1), (3, 2), (3, 3)]);

        let vertical = piece.rotated(Rotation::Clockwise);
        assert_eq!(sorted_cells(&vertical), vec![(0, 0), (1, 0), (2, 0), (3, 0)]);

        let back = vertical.rotated(Rotation::Clockwise);
        assert_eq!(sorted_cells(&back), sorted_cells(&piece));
    }

    #[test]
    fn test_j_piece_clockwise_cycle() {
        let piece = Piece::spawn(PieceKind::J, 0, PlayerId::One);
        // J.. / JJJ
        assert_eq!(sorted_cells(&piece), vec![(2, 0), (3, 0), (3, 1), (3, 2)]);
        // JJ / J. / J.
        let r1 = piece.rotated(Rotation::Clockwise);
        assert_eq!(sorted_cells(&r1), vec![(1, 0), (1, 1), (2, 0), (3, 0)]);
        // JJJ / ..J
        let r2 = r1.rotated(Rotation::Clockwise);
        assert_eq!(sorted_cells(&r2), vec![(2, 0), (2, 1), (2, 2), (3, 2)]);
        // .J / .J / JJ
        let r3 = r2.rotated(Rotation::Clockwise);
        assert_eq!(sorted_cells(&r3), vec![(1, 1), (2, 1), (3, 0), (3, 1)]);
        assert_eq!(r3.rotated(Rotation::Clockwise), piece);
    }

    #[test]
    fn test_counterclockwise_undoes_clockwise() {
        for kind in PieceKind::TETROMINOES {
            let piece = Piece::spawn(kind, 2, PlayerId::Two);
            let rotated = piece.rotated(Rotation::Clockwise);
            assert_eq!(rotated.rotated(Rotation::Counterclockwise), piece);
        }
    }

    #[test]
    fn test_o_piece_is_rotation_invariant() {
        let piece = Piece::spawn(PieceKind::O, 0, PlayerId::One);
        assert_eq!(
            sorted_cells(&piece.rotated(Rotation::Clockwise)),
            sorted_cells(&piece)
        );
        assert_eq!(
            sorted_cells(&piece.rotated(Rotation::Counterclockwise)),
            sorted_cells(&piece)
        );
    }

    #[test]
    fn test_s_piece_has_two_orientations() {
        let piece = Piece::spawn(PieceKind::S, 0, PlayerId::One);
        let r1 = piece.rotated(Rotation::Clockwise);
        // S. / SS / .S
        assert_eq!(sorted_cells(&r1), vec![(1, 0), (2, 0), (2, 1), (3, 1)]);
        assert_eq!(r1.rotated(Rotation::Clockwise), piece);
    }

    #[test]
    fn test_moved_translates_without_bounds_check() {
        let piece = Piece::spawn(PieceKind::O, 0, PlayerId::One);
        let left = piece.moved(Direction::Left);
        assert!(left.cells().iter().any(|p| p.col < 0));
        let down = piece.moved(Direction::Down);
        assert_eq!(down.anchor(), Position::new(4, 0));
    }

    #[test]
    fn test_penalty_piece_single_cell() {
        let piece = Piece::at(PieceKind::Penalty, Position::new(14, 5), 4, PlayerId::One);
        assert_eq!(sorted_cells(&piece), vec![(14, 5)]);
        assert_eq!(piece.rotated(Rotation::Clockwise), piece);
        assert_eq!(piece.symbol(), '*');
    }

    #[test]
    fn test_piece_kind_char_conversion() {
        for kind in PieceKind::TETROMINOES {
            assert_eq!(PieceKind::from_char(kind.as_char()), Some(kind));
        }
        assert_eq!(PieceKind::from_token("T"), Some(PieceKind::T));
        assert_eq!(PieceKind::from_token("TT"), None);
        assert_eq!(PieceKind::from_token(""), None);
        assert_eq!(PieceKind::from_char('X'), None);
    }
}
