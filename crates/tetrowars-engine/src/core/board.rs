use super::{
    BOARD_HEIGHT, BOARD_WIDTH, PLAYABLE_AREA,
    piece::{Direction, Piece, PieceKind, PlayerId, Position, Rotation},
};

/// A single cell of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Occupied by a cell of a piece of the given kind.
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_occupied(self) -> bool {
        self != Cell::Empty
    }

    /// Label shown for this cell, `' '` when empty.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Filled(kind) => kind.as_char(),
        }
    }
}

type Row = [Cell; BOARD_WIDTH];

const EMPTY_ROW: Row = [Cell::Empty; BOARD_WIDTH];

/// Column penalty pieces are dropped into.
pub const PENALTY_COLUMN: usize = BOARD_WIDTH / 2;

/// One player's grid together with the falling piece and the next-piece preview.
///
/// The current piece's cells are written into the grid like any other cell;
/// legality checks treat them as free so the piece never collides with
/// itself. Once a piece is locked the board forgets it and its cells are
/// plain occupied cells.
///
/// Movement follows a query/commit split: `try_*` answers whether a move
/// fits, and `move_current`/`rotate_current` require that it does.
///
/// # Example
///
/// ```
/// use tetrowars_engine::{Board, Direction, Piece, PieceKind, PlayerId};
///
/// let mut board = Board::new();
/// assert!(board.spawn(Piece::spawn(PieceKind::O, 0, PlayerId::One)));
/// if board.try_move(Direction::Right) {
///     board.move_current(Direction::Right);
/// }
/// board.drop_to_bottom();
/// assert_eq!(board.symbol_at(14, 1), 'O');
/// ```
#[derive(Debug, Clone)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
    current: Option<Piece>,
    next: Option<Piece>,
    blind: bool,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub const HEIGHT: usize = BOARD_HEIGHT;
    pub const WIDTH: usize = BOARD_WIDTH;

    #[must_use]
    pub const fn new() -> Self {
        Self {
            rows: [EMPTY_ROW; BOARD_HEIGHT],
            current: None,
            next: None,
            blind: false,
        }
    }

    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.rows[row][col]
    }

    #[must_use]
    pub fn symbol_at(&self, row: usize, col: usize) -> char {
        self.cell(row, col).symbol()
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell; BOARD_WIDTH]> {
        self.rows.iter()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn next(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    pub fn set_next(&mut self, piece: Piece) {
        self.next = Some(piece);
    }

    pub fn take_next(&mut self) -> Option<Piece> {
        self.next.take()
    }

    #[must_use]
    pub fn is_blind(&self) -> bool {
        self.blind
    }

    pub fn set_blind(&mut self, blind: bool) {
        self.blind = blind;
    }

    /// Overwrites a single cell, bypassing the current piece.
    pub fn fill_cell(&mut self, row: usize, col: usize, cell: Cell) {
        self.rows[row][col] = cell;
    }

    fn grid_index(position: Position) -> Option<(usize, usize)> {
        if !PLAYABLE_AREA.contains(position.row, position.col) {
            return None;
        }
        Some((
            usize::try_from(position.row).ok()?,
            usize::try_from(position.col).ok()?,
        ))
    }

    fn is_current_cell(&self, position: Position) -> bool {
        self.current
            .is_some_and(|piece| piece.cells().contains(&position))
    }

    /// Whether every cell of `piece` is inside the playable area and free.
    ///
    /// Cells held by the current falling piece count as free.
    #[must_use]
    pub fn placement_is_legal(&self, piece: &Piece) -> bool {
        piece.cells().iter().all(|&position| {
            Self::grid_index(position).is_some_and(|(row, col)| {
                !self.rows[row][col].is_occupied() || self.is_current_cell(position)
            })
        })
    }

    /// Writes the piece's cells into the grid.
    ///
    /// The caller must have checked [`Self::placement_is_legal`].
    pub fn commit_piece(&mut self, piece: &Piece) {
        debug_assert!(self.placement_is_legal(piece), "illegal placement: {piece:?}");
        for position in piece.cells() {
            if let Some((row, col)) = Self::grid_index(position) {
                self.rows[row][col] = Cell::Filled(piece.kind());
            }
        }
    }

    /// Resets the piece's cells to empty.
    pub fn clear_piece(&mut self, piece: &Piece) {
        for position in piece.cells() {
            if let Some((row, col)) = Self::grid_index(position) {
                self.rows[row][col] = Cell::Empty;
            }
        }
    }

    #[must_use]
    pub fn compute_moved(piece: &Piece, direction: Direction) -> Piece {
        piece.moved(direction)
    }

    #[must_use]
    pub fn compute_rotated(piece: &Piece, rotation: Rotation) -> Piece {
        piece.rotated(rotation)
    }

    /// Whether `piece` could move one step in `direction`.
    #[must_use]
    pub fn try_move_piece(&self, piece: &Piece, direction: Direction) -> bool {
        self.placement_is_legal(&Self::compute_moved(piece, direction))
    }

    /// Whether the current piece could move one step in `direction`.
    ///
    /// Always false when there is no current piece.
    #[must_use]
    pub fn try_move(&self, direction: Direction) -> bool {
        self.current
            .is_some_and(|piece| self.try_move_piece(&piece, direction))
    }

    #[must_use]
    pub fn try_rotate(&self, rotation: Rotation) -> bool {
        self.current.is_some_and(|piece| {
            self.placement_is_legal(&Self::compute_rotated(&piece, rotation))
        })
    }

    fn replace_current_cells(&mut self, candidate: Piece) {
        debug_assert!(
            self.placement_is_legal(&candidate),
            "illegal candidate: {candidate:?}"
        );
        if let Some(piece) = self.current.take() {
            self.clear_piece(&piece);
        }
        self.commit_piece(&candidate);
        self.current = Some(candidate);
    }

    /// Moves the current piece one step. Requires [`Self::try_move`].
    pub fn move_current(&mut self, direction: Direction) {
        if let Some(piece) = self.current {
            self.replace_current_cells(Self::compute_moved(&piece, direction));
        }
    }

    /// Rotates the current piece. Requires [`Self::try_rotate`].
    pub fn rotate_current(&mut self, rotation: Rotation) {
        if let Some(piece) = self.current {
            self.replace_current_cells(Self::compute_rotated(&piece, rotation));
        }
    }

    /// Makes `piece` the current piece and commits it if it fits.
    ///
    /// Returns whether the piece could be placed. An unplaceable piece leaves
    /// the board without a current piece.
    pub fn spawn(&mut self, piece: Piece) -> bool {
        if let Some(previous) = self.current.take() {
            self.clear_piece(&previous);
        }
        if !self.placement_is_legal(&piece) {
            return false;
        }
        self.commit_piece(&piece);
        self.current = Some(piece);
        true
    }

    /// Removes the current piece from the grid and spawns `piece` in its place.
    ///
    /// Returns the removed piece and whether the new one could be placed.
    pub fn replace_current(&mut self, piece: Piece) -> (Option<Piece>, bool) {
        let removed = self.current.take();
        if let Some(previous) = &removed {
            self.clear_piece(previous);
        }
        let placed = self.spawn(piece);
        (removed, placed)
    }

    /// Locks the current piece in place. Its cells stay on the board.
    pub fn lock_current(&mut self) -> Option<Piece> {
        self.current.take()
    }

    /// Moves the current piece down as far as it goes and locks it.
    pub fn drop_to_bottom(&mut self) -> Option<Piece> {
        while self.try_move(Direction::Down) {
            self.move_current(Direction::Down);
        }
        self.lock_current()
    }

    fn is_row_full(&self, row: usize) -> bool {
        self.rows[row].iter().enumerate().all(|(col, cell)| {
            #[expect(clippy::cast_possible_wrap)]
            let position = Position::new(row as isize, col as isize);
            cell.is_occupied() && !self.is_current_cell(position)
        })
    }

    /// Clears full rows and returns the number of rows cleared.
    ///
    /// A row is full when every cell is occupied by a locked piece. Cleared
    /// rows are removed, rows above shift down and the top is refilled with
    /// empty rows.
    pub fn clear_full_rows(&mut self) -> usize {
        let full: Vec<bool> = (0..BOARD_HEIGHT).map(|row| self.is_row_full(row)).collect();
        let mut count = 0;
        for row in (0..BOARD_HEIGHT).rev() {
            if full[row] {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[row + count] = self.rows[row];
            }
        }
        self.rows[..count].fill(EMPTY_ROW);
        count
    }

    /// Drops a 1x1 penalty piece into the middle column.
    ///
    /// Returns false, leaving the board untouched, when the top cell of that
    /// column is already occupied.
    pub fn drop_penalty_piece(&mut self, owner: PlayerId, level: u8) -> bool {
        if self.rows[0][PENALTY_COLUMN].is_occupied() {
            return false;
        }
        let landing = (0..BOARD_HEIGHT)
            .take_while(|&row| !self.rows[row][PENALTY_COLUMN].is_occupied())
            .last()
            .unwrap_or(0);
        #[expect(clippy::cast_possible_wrap)]
        let anchor = Position::new(landing as isize, PENALTY_COLUMN as isize);
        let piece = Piece::at(PieceKind::Penalty, anchor, level, owner);
        self.commit_piece(&piece);
        true
    }

    /// Number of occupied cells, for tests and diagnostics.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| cell.is_occupied())
            .count()
    }
}
