use std::collections::VecDeque;

use rand::SeedableRng as _;
use rand_pcg::Pcg32;

use crate::{BlockPolicy, BlockTable, PieceKind, PlayerId};

/// Highest level a player can reach.
pub const MAX_LEVEL: u8 = 4;
/// Level from which turns without a clear are penalised.
pub const PENALTY_LEVEL: u8 = 4;
/// Number of clear-less turns between penalty pieces.
pub const PENALTY_TURNS: u32 = 5;

/// One side of the game: score, level and block supply.
#[derive(Debug, Clone)]
pub struct Player {
    id: PlayerId,
    score: u32,
    level: u8,
    sequence: Vec<PieceKind>,
    table: BlockTable,
    policy: BlockPolicy,
    override_sequence: Option<VecDeque<PieceKind>>,
    turns_without_clear: u32,
    rng: Pcg32,
}

impl Player {
    /// Creates a player at `level` (clamped to [`MAX_LEVEL`]).
    ///
    /// `sequence` is the level-0 supply; `seed` drives the weighted levels.
    #[must_use]
    pub fn new(
        id: PlayerId,
        level: u8,
        sequence: Vec<PieceKind>,
        table: BlockTable,
        seed: u64,
    ) -> Self {
        let level = level.min(MAX_LEVEL);
        let policy = BlockPolicy::for_level(level, &sequence, &table);
        Self {
            id,
            score: 0,
            level,
            sequence,
            table,
            policy,
            override_sequence: None,
            turns_without_clear: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    #[must_use]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub fn turns_without_clear(&self) -> u32 {
        self.turns_without_clear
    }

    #[must_use]
    pub fn has_override(&self) -> bool {
        self.override_sequence.is_some()
    }

    /// Next block kind for this player.
    ///
    /// An override sequence is consumed first, one entry per call; once
    /// exhausted the level policy takes over again.
    pub fn get_block(&mut self) -> PieceKind {
        if let Some(queue) = &mut self.override_sequence {
            if let Some(kind) = queue.pop_front() {
                return kind;
            }
            self.override_sequence = None;
        }
        self.policy.next_block(&mut self.rng)
    }

    /// Changes the level and re-derives the block policy.
    ///
    /// Returns `false` without changing anything when `level` is out of range.
    pub fn set_level(&mut self, level: u8) -> bool {
        if level > MAX_LEVEL {
            return false;
        }
        self.level = level;
        self.policy = BlockPolicy::for_level(level, &self.sequence, &self.table);
        true
    }

    pub fn level_up(&mut self) -> bool {
        self.set_level(self.level + 1)
    }

    pub fn level_down(&mut self) -> bool {
        match self.level.checked_sub(1) {
            Some(level) => self.set_level(level),
            None => false,
        }
    }

    /// Awards `(level + rows)^2` for clearing `rows` rows at once.
    pub fn score_row(&mut self, rows: usize) {
        if rows == 0 {
            return;
        }
        let base = u32::try_from(rows)
            .unwrap_or(u32::MAX)
            .saturating_add(u32::from(self.level));
        self.score = self.score.saturating_add(base.saturating_mul(base));
    }

    /// Awards `(orig_level + 1)^2` for a piece of this player's that left the board.
    pub fn score_block(&mut self, orig_level: u8) {
        let base = u32::from(orig_level) + 1;
        self.score = self.score.saturating_add(base * base);
    }

    /// Scores the turn and advances the penalty counter.
    ///
    /// Returns `true` when a penalty piece must be dropped on this player's
    /// board.
    pub fn turn_end(&mut self, rows: usize) -> bool {
        self.score_row(rows);
        if self.level < PENALTY_LEVEL {
            return false;
        }
        if rows > 0 {
            self.turns_without_clear = 0;
            return false;
        }
        self.turns_without_clear += 1;
        self.turns_without_clear % PENALTY_TURNS == 0
    }

    pub fn set_override(&mut self, sequence: Vec<PieceKind>) {
        self.override_sequence = Some(sequence.into());
    }

    pub fn clear_override(&mut self) {
        self.override_sequence = None;
    }

    /// Resets the player for a new game, keeping level and sequence.
    pub fn restart(&mut self) {
        self.score = 0;
        self.policy = BlockPolicy::for_level(self.level, &self.sequence, &self.table);
        self.override_sequence = None;
        self.turns_without_clear = 0;
    }
}
