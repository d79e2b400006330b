use crate::{BLIND_AREA, Board, Piece, Player, PlayerId};

/// Receiver of game state changes.
///
/// Observers are notified in registration order after every visible change.
pub trait Observer {
    fn notify(&mut self, view: &GameView<'_>);

    /// Called once when a game ends; [`GameView::winner`] is set.
    fn notify_win(&mut self, view: &GameView<'_>);

    /// User-facing message that is not part of the board state.
    fn notice(&mut self, notice: &Notice) {
        let _ = notice;
    }
}

/// Read-only snapshot of the game handed to observers.
#[derive(Debug, Clone, Copy)]
pub struct GameView<'a> {
    pub(crate) players: &'a [Player; 2],
    pub(crate) boards: &'a [Board; 2],
    pub(crate) high_score: u32,
    pub(crate) current: PlayerId,
    pub(crate) winner: Option<PlayerId>,
    pub(crate) bonus: bool,
}

impl GameView<'_> {
    #[must_use]
    pub fn board(&self, player: PlayerId) -> &Board {
        &self.boards[player.index()]
    }

    /// Symbol at `(row, col)` of `player`'s board, ignoring blindness.
    #[must_use]
    pub fn cell_symbol_at(&self, player: PlayerId, row: usize, col: usize) -> char {
        self.board(player).symbol_at(row, col)
    }

    /// Whether `(row, col)` should be hidden when drawing `player`'s board.
    #[must_use]
    pub fn is_cell_fogged(&self, player: PlayerId, row: usize, col: usize) -> bool {
        #[expect(clippy::cast_possible_wrap)]
        let in_area = BLIND_AREA.contains(row as isize, col as isize);
        self.is_board_fogged(player) && in_area
    }

    #[must_use]
    pub fn is_board_fogged(&self, player: PlayerId) -> bool {
        self.board(player).is_blind()
    }

    #[must_use]
    pub fn score_of(&self, player: PlayerId) -> u32 {
        self.players[player.index()].score()
    }

    #[must_use]
    pub fn level_of(&self, player: PlayerId) -> u8 {
        self.players[player.index()].level()
    }

    #[must_use]
    pub fn next_piece_of(&self, player: PlayerId) -> Option<&Piece> {
        self.board(player).next()
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn bonus_enabled(&self) -> bool {
        self.bonus
    }
}

/// Messages for the players that accompany the board display.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum Notice {
    #[display("Enhancements {}.", if *enabled { "enabled" } else { "disabled" })]
    BonusToggled { enabled: bool },
    #[display("Sequence file completed.")]
    ScriptCompleted,
    #[display("Could not use `{name}`: {reason}")]
    ScriptUnavailable { name: String, reason: String },
    #[display("{player} cleared multiple rows and may choose {count} special action(s): blind, heavy or force <block>.")]
    SpecialActionsEarned { player: PlayerId, count: usize },
    #[display("Invalid special action `{input}`.")]
    InvalidSpecialAction { input: String },
    #[display("Duplicate special action ignored.")]
    DuplicateSpecialAction,
    #[display("Type `restart` to play again or `no` to quit.")]
    RestartPrompt,
    #[display("End of input detected. Exiting...")]
    EndOfInput,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BlockTable, Cell, PieceKind};

    #[test]
    fn test_fogged_cells() {
        let players =
            PlayerId::ALL.map(|id| Player::new(id, 0, vec![], BlockTable::default(), 0));
        let mut boards = [Board::new(), Board::new()];
        boards[1].fill_cell(5, 5, Cell::Filled(PieceKind::T));
        boards[1].set_blind(true);
        let view = GameView {
            players: &players,
            boards: &boards,
            high_score: 0,
            current: PlayerId::One,
            winner: None,
            bonus: false,
        };

        assert!(view.is_board_fogged(PlayerId::Two));
        assert!(!view.is_board_fogged(PlayerId::One));
        assert_eq!(view.cell_symbol_at(PlayerId::Two, 5, 5), 'T');
        assert!(view.is_cell_fogged(PlayerId::Two, 5, 5));
        assert!(view.is_cell_fogged(PlayerId::Two, 2, 2));
        assert!(view.is_cell_fogged(PlayerId::Two, 11, 8));
        assert!(!view.is_cell_fogged(PlayerId::Two, 1, 5));
        assert!(!view.is_cell_fogged(PlayerId::Two, 12, 5));
        assert!(!view.is_cell_fogged(PlayerId::Two, 5, 9));
        assert!(!view.is_cell_fogged(PlayerId::One, 5, 5));
    }

    #[test]
    fn test_notice_display() {
        assert_eq!(
            Notice::BonusToggled { enabled: true }.to_string(),
            "Enhancements enabled."
        );
        assert_eq!(
            Notice::BonusToggled { enabled: false }.to_string(),
            "Enhancements disabled."
        );
        assert_eq!(
            Notice::SpecialActionsEarned {
                player: PlayerId::Two,
                count: 1
            }
            .to_string(),
            "Player 2 cleared multiple rows and may choose 1 special action(s): blind, heavy or force <block>."
        );
    }
}
