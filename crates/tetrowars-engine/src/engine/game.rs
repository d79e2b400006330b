use std::{collections::VecDeque, fmt, mem};

use crate::{
    BlockTable, Board, Command, CommandSource, Direction, GameView, Instruction, Keyword, Notice,
    Observer, Piece, PieceKind, Player, PlayerId, Rotation, SpecialAction, parse_line,
    parse_sequence, split_multiplier,
};

/// Level from which every move or rotation is followed by a forced descent.
pub const HEAVY_LEVEL: u8 = 3;
const HEAVY_LEVEL_DESCENT: u32 = 1;
const HEAVY_ACTION_DESCENT: u32 = 2;
/// Rows that must be cleared at once before special actions are earned.
const SPECIAL_ACTION_THRESHOLD: usize = 2;
const MAX_SPECIAL_ACTIONS: usize = 3;

/// Settings for a new [`Game`].
#[derive(Debug, Clone, Default)]
pub struct GameConfig {
    pub seed: u64,
    pub start_level: u8,
    pub bonus: bool,
    /// Level-0 block sequences, one per player. Empty means the built-in cycle.
    pub sequences: [Vec<PieceKind>; 2],
    pub block_table: BlockTable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum TurnPhase {
    AwaitingCommand,
    ConsecutiveAutoDrop,
    TurnEndPending,
    AwaitingRestartDecision,
    Finished,
}

/// Why [`Game::play`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionEnd {
    EndOfInput,
    /// A game was lost and the players chose not to restart.
    Declined,
}

/// State that lives for the current player's turn only.
#[derive(Debug, Default)]
struct TurnContext {
    heavy: bool,
    pending_actions: Vec<SpecialAction>,
}

#[derive(Debug)]
enum TurnOutcome {
    Completed { rows_cleared: usize, lost: bool },
    Restarted,
    EndOfInput,
}

#[derive(Debug)]
enum Flow {
    Continue,
    Ignored,
    EndTurn { rows_cleared: usize, lost: bool },
    Restarted,
}

#[derive(Debug, Clone, Copy)]
enum Movement {
    Shift(Direction),
    Turn(Rotation),
}

/// Two-player game driven by textual commands.
pub struct Game {
    players: [Player; 2],
    boards: [Board; 2],
    current: PlayerId,
    high_score: u32,
    bonus: bool,
    context: TurnContext,
    consecutive_drops: [u32; 2],
    observers: Vec<Box<dyn Observer>>,
    script: Option<VecDeque<String>>,
    phase: TurnPhase,
    winner: Option<PlayerId>,
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("players", &self.players)
            .field("boards", &self.boards)
            .field("current", &self.current)
            .field("high_score", &self.high_score)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Game {
    /// Creates a game and deals both players their first pieces.
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let GameConfig {
            seed,
            start_level,
            bonus,
            sequences: [first, second],
            block_table,
        } = config;
        let players = [
            Player::new(
                PlayerId::One,
                start_level,
                first,
                block_table.clone(),
                seed,
            ),
            Player::new(
                PlayerId::Two,
                start_level,
                second,
                block_table,
                seed.wrapping_add(1),
            ),
        ];
        let mut game = Self {
            players,
            boards: [Board::new(), Board::new()],
            current: PlayerId::One,
            high_score: 0,
            bonus,
            context: TurnContext::default(),
            consecutive_drops: [0; 2],
            observers: vec![],
            script: None,
            phase: TurnPhase::AwaitingCommand,
            winner: None,
        };
        game.deal();
        game
    }

    /// Registers an observer. Observers are notified in registration order.
    pub fn attach(&mut self, observer: Box<dyn Observer>) {
        self.observers.push(observer);
    }

    #[must_use]
    pub fn board(&self, player: PlayerId) -> &Board {
        &self.boards[player.index()]
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player.index()]
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    #[must_use]
    pub fn bonus_enabled(&self) -> bool {
        self.bonus
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Winner of the last finished game, until the next restart.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    #[must_use]
    pub fn consecutive_drops(&self, player: PlayerId) -> u32 {
        self.consecutive_drops[player.index()]
    }

    #[must_use]
    pub fn view(&self) -> GameView<'_> {
        GameView {
            players: &self.players,
            boards: &self.boards,
            high_score: self.high_score,
            current: self.current,
            winner: self.winner,
            bonus: self.bonus,
        }
    }

    /// Number of special actions earned for clearing `rows` rows at once.
    #[must_use]
    pub fn special_action_count(&self, rows: usize) -> usize {
        let count = if self.bonus {
            rows.saturating_sub(SPECIAL_ACTION_THRESHOLD)
        } else {
            usize::from(rows >= SPECIAL_ACTION_THRESHOLD)
        };
        count.min(MAX_SPECIAL_ACTIONS)
    }

    /// Plays turns until the input ends or the players decline a restart.
    pub fn play(&mut self, source: &mut dyn CommandSource) -> SessionEnd {
        let end = self.run(source);
        self.phase = TurnPhase::Finished;
        if end.is_end_of_input() {
            self.emit(&Notice::EndOfInput);
        }
        end
    }

    fn run(&mut self, source: &mut dyn CommandSource) -> SessionEnd {
        loop {
            let player = self.current;
            let (rows_cleared, lost) = match self.play_turn(source) {
                TurnOutcome::EndOfInput => return SessionEnd::EndOfInput,
                TurnOutcome::Restarted => continue,
                TurnOutcome::Completed { rows_cleared, lost } => (rows_cleared, lost),
            };

            self.phase = TurnPhase::TurnEndPending;
            let penalty_failed = self.finish_turn(rows_cleared);
            let spawn_failed = !self.switch_turn();

            if lost || penalty_failed || spawn_failed {
                self.winner = Some(player.opponent());
                self.phase = TurnPhase::AwaitingRestartDecision;
                self.notify_win();
                self.emit(&Notice::RestartPrompt);
                match self.await_restart_decision(source) {
                    Some(true) => {
                        self.restart();
                        continue;
                    }
                    Some(false) => return SessionEnd::Declined,
                    None => return SessionEnd::EndOfInput,
                }
            }

            match self.collect_special_actions(player, rows_cleared, source) {
                Some(actions) => self.context.pending_actions = actions,
                None => return SessionEnd::EndOfInput,
            }
        }
    }

    fn play_turn(&mut self, source: &mut dyn CommandSource) -> TurnOutcome {
        let index = self.current.index();
        let placed = self.apply_special_actions();
        self.notify();
        if !placed {
            return TurnOutcome::Completed {
                rows_cleared: 0,
                lost: true,
            };
        }

        if self.consecutive_drops[index] > 0 {
            self.phase = TurnPhase::ConsecutiveAutoDrop;
            self.consecutive_drops[index] -= 1;
            return TurnOutcome::Completed {
                rows_cleared: self.drop_current(),
                lost: false,
            };
        }

        self.phase = TurnPhase::AwaitingCommand;
        loop {
            let Some(line) = self.next_line(source) else {
                return TurnOutcome::EndOfInput;
            };
            for instruction in parse_line(&line) {
                match self.execute(instruction, source) {
                    Flow::Continue => self.notify(),
                    Flow::Ignored => {}
                    Flow::EndTurn { rows_cleared, lost } => {
                        return TurnOutcome::Completed { rows_cleared, lost };
                    }
                    Flow::Restarted => return TurnOutcome::Restarted,
                }
            }
        }
    }

    fn execute(&mut self, instruction: Instruction, source: &mut dyn CommandSource) -> Flow {
        let Instruction {
            multiplier,
            command,
        } = instruction;
        let index = self.current.index();
        match command {
            Command::Move(direction) => {
                self.execute_movement(Movement::Shift(direction), multiplier)
            }
            Command::Rotate(rotation) => {
                self.execute_movement(Movement::Turn(rotation), multiplier)
            }
            Command::Drop => {
                if multiplier == 0 {
                    return Flow::Ignored;
                }
                self.consecutive_drops[index] = multiplier - 1;
                Flow::EndTurn {
                    rows_cleared: self.drop_current(),
                    lost: false,
                }
            }
            Command::Piece(kind) => {
                if multiplier == 0 {
                    return Flow::Ignored;
                }
                let piece = self.new_piece(self.current, kind);
                let (_, placed) = self.boards[index].replace_current(piece);
                if placed {
                    Flow::Continue
                } else {
                    self.notify();
                    Flow::EndTurn {
                        rows_cleared: 0,
                        lost: true,
                    }
                }
            }
            Command::LevelUp => {
                for _ in 0..multiplier {
                    if !self.players[index].level_up() {
                        break;
                    }
                }
                Flow::Continue
            }
            Command::LevelDown => {
                for _ in 0..multiplier {
                    if !self.players[index].level_down() {
                        break;
                    }
                }
                Flow::Continue
            }
            Command::NoRandom(name) => {
                self.load_override(&name, source);
                Flow::Continue
            }
            Command::Random => {
                self.players[index].clear_override();
                Flow::Continue
            }
            Command::Sequence(name) => {
                self.load_script(&name, source);
                Flow::Ignored
            }
            Command::Restart => {
                self.restart();
                Flow::Restarted
            }
            Command::Bonus => {
                self.bonus = !self.bonus;
                self.emit(&Notice::BonusToggled {
                    enabled: self.bonus,
                });
                Flow::Continue
            }
            Command::Help | Command::Unknown(_) => Flow::Ignored,
        }
    }

    fn execute_movement(&mut self, movement: Movement, multiplier: u32) -> Flow {
        if multiplier == 0 {
            return Flow::Ignored;
        }
        let index = self.current.index();
        let board = &mut self.boards[index];
        for _ in 0..multiplier {
            match movement {
                Movement::Shift(direction) => {
                    if !board.try_move(direction) {
                        break;
                    }
                    board.move_current(direction);
                }
                Movement::Turn(rotation) => {
                    if !board.try_rotate(rotation) {
                        break;
                    }
                    board.rotate_current(rotation);
                }
            }
        }

        let mut descent = 0;
        if self.players[index].level() >= HEAVY_LEVEL {
            descent += HEAVY_LEVEL_DESCENT;
        }
        let horizontal = matches!(
            movement,
            Movement::Shift(Direction::Left | Direction::Right)
        );
        if self.context.heavy && horizontal {
            descent += HEAVY_ACTION_DESCENT;
        }
        for _ in 0..descent {
            if !board.try_move(Direction::Down) {
                board.lock_current();
                return Flow::EndTurn {
                    rows_cleared: board.clear_full_rows(),
                    lost: false,
                };
            }
            board.move_current(Direction::Down);
        }
        Flow::Continue
    }

    fn drop_current(&mut self) -> usize {
        let board = &mut self.boards[self.current.index()];
        board.drop_to_bottom();
        board.clear_full_rows()
    }

    /// Applies the actions chosen by the opponent at the end of their turn.
    ///
    /// Returns `false` if a forced piece could not be placed.
    fn apply_special_actions(&mut self) -> bool {
        let index = self.current.index();
        for action in mem::take(&mut self.context.pending_actions) {
            match action {
                SpecialAction::Blind => self.boards[index].set_blind(true),
                SpecialAction::Heavy => self.context.heavy = true,
                SpecialAction::Force(kind) => {
                    let level = self.players[index].level();
                    let piece = Piece::spawn(kind, level, self.current);
                    let (removed, placed) = self.boards[index].replace_current(piece);
                    if let Some(removed) = removed {
                        self.players[removed.owner().index()].score_block(removed.level());
                        self.update_high_score();
                    }
                    if !placed {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Scores the finished turn and drops a penalty piece when due.
    ///
    /// Returns `true` if the penalty piece could not be placed.
    fn finish_turn(&mut self, rows_cleared: usize) -> bool {
        let id = self.current;
        let index = id.index();
        let penalty_due = self.players[index].turn_end(rows_cleared);
        self.update_high_score();
        self.notify();
        if !penalty_due {
            return false;
        }

        let level = self.players[index].level();
        let placed = self.boards[index].drop_penalty_piece(id, level);
        self.notify();
        if !placed {
            return true;
        }
        let rows = self.boards[index].clear_full_rows();
        if rows > 0 {
            self.players[index].score_row(rows);
            self.update_high_score();
            self.notify();
        }
        false
    }

    /// Hands the turn to the opponent.
    ///
    /// Returns `false` if the finishing player's next piece could not spawn.
    fn switch_turn(&mut self) -> bool {
        let id = self.current;
        self.boards[id.index()].set_blind(false);
        self.context.heavy = false;
        let spawned = self.advance_piece(id);
        self.current = id.opponent();
        spawned
    }

    fn advance_piece(&mut self, id: PlayerId) -> bool {
        let next = match self.boards[id.index()].take_next() {
            Some(piece) => piece,
            None => self.draw_piece(id),
        };
        let following = self.draw_piece(id);
        let board = &mut self.boards[id.index()];
        board.set_next(following);
        board.spawn(next)
    }

    fn deal(&mut self) {
        for id in PlayerId::ALL {
            let current = self.draw_piece(id);
            let next = self.draw_piece(id);
            let board = &mut self.boards[id.index()];
            board.spawn(current);
            board.set_next(next);
        }
    }

    fn draw_piece(&mut self, id: PlayerId) -> Piece {
        let kind = self.players[id.index()].get_block();
        self.new_piece(id, kind)
    }

    fn new_piece(&self, id: PlayerId, kind: PieceKind) -> Piece {
        let player = &self.players[id.index()];
        Piece::spawn(kind, player.level(), player.id())
    }

    fn collect_special_actions(
        &mut self,
        player: PlayerId,
        rows_cleared: usize,
        source: &mut dyn CommandSource,
    ) -> Option<Vec<SpecialAction>> {
        let count = self.special_action_count(rows_cleared);
        let mut actions = Vec::with_capacity(count);
        if count == 0 {
            return Some(actions);
        }
        self.emit(&Notice::SpecialActionsEarned { player, count });
        while actions.len() < count {
            let line = self.next_line(source)?;
            if line.trim().is_empty() {
                continue;
            }
            let Some(action) = SpecialAction::parse(&line) else {
                self.emit(&Notice::InvalidSpecialAction {
                    input: line.trim().to_owned(),
                });
                continue;
            };
            if actions.iter().any(|chosen| action.conflicts_with(*chosen)) {
                self.emit(&Notice::DuplicateSpecialAction);
                continue;
            }
            actions.push(action);
        }
        Some(actions)
    }

    /// Reads lines until the players choose. `None` means end of input.
    fn await_restart_decision(&mut self, source: &mut dyn CommandSource) -> Option<bool> {
        loop {
            let line = self.next_line(source)?;
            let Some(token) = line.split_whitespace().next() else {
                continue;
            };
            let (_, word) = split_multiplier(token);
            match word {
                "yes" | "y" => return Some(true),
                "no" | "n" => return Some(false),
                _ if Keyword::resolve(word) == Some(Keyword::Restart) => return Some(true),
                _ => {}
            }
        }
    }

    fn restart(&mut self) {
        self.boards = [Board::new(), Board::new()];
        for player in &mut self.players {
            player.restart();
        }
        self.current = PlayerId::One;
        self.context = TurnContext::default();
        self.consecutive_drops = [0; 2];
        self.winner = None;
        self.phase = TurnPhase::AwaitingCommand;
        self.deal();
    }

    fn next_line(&mut self, source: &mut dyn CommandSource) -> Option<String> {
        if let Some(script) = &mut self.script {
            if let Some(line) = script.pop_front() {
                return Some(line);
            }
            self.script = None;
            self.emit(&Notice::ScriptCompleted);
        }
        source.next_line()
    }

    fn load_script(&mut self, name: &str, source: &mut dyn CommandSource) {
        match source.read_script(name) {
            Ok(text) => {
                let mut lines: VecDeque<String> = text.lines().map(str::to_owned).collect();
                if let Some(rest) = self.script.take() {
                    lines.extend(rest);
                }
                self.script = Some(lines);
            }
            Err(err) => self.emit(&Notice::ScriptUnavailable {
                name: name.to_owned(),
                reason: err.to_string(),
            }),
        }
    }

    fn load_override(&mut self, name: &str, source: &mut dyn CommandSource) {
        let sequence = source
            .read_script(name)
            .map_err(|err| err.to_string())
            .and_then(|text| parse_sequence(&text).map_err(|err| err.to_string()));
        match sequence {
            Ok(sequence) => self.players[self.current.index()].set_override(sequence),
            Err(reason) => self.emit(&Notice::ScriptUnavailable {
                name: name.to_owned(),
                reason,
            }),
        }
    }

    fn update_high_score(&mut self) {
        let best = self.players.iter().map(Player::score).max().unwrap_or(0);
        self.high_score = self.high_score.max(best);
    }

    fn view_and_observers(&mut self) -> (GameView<'_>, &mut [Box<dyn Observer>]) {
        let view = GameView {
            players: &self.players,
            boards: &self.boards,
            high_score: self.high_score,
            current: self.current,
            winner: self.winner,
            bonus: self.bonus,
        };
        (view, &mut self.observers)
    }

    fn notify(&mut self) {
        let (view, observers) = self.view_and_observers();
        for observer in observers {
            observer.notify(&view);
        }
    }

    fn notify_win(&mut self) {
        let (view, observers) = self.view_and_observers();
        for observer in observers {
            observer.notify_win(&view);
        }
    }

    fn emit(&mut self, notice: &Notice) {
        for observer in &mut self.observers {
            observer.notice(notice);
        }
    }
}
