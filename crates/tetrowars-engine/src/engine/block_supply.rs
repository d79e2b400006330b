use rand::{
    Rng,
    distr::{Distribution, weighted::WeightedIndex},
};
use serde::{Deserialize, Serialize};

use crate::{BlockTableError, ParsePieceError, PieceKind};

/// Level-0 supply used when a player has no sequence of their own.
pub const DEFAULT_SEQUENCE: [PieceKind; 7] = PieceKind::TETROMINOES;

/// Relative weights of the seven tetrominoes for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct LevelWeights {
    pub i: u32,
    pub j: u32,
    pub l: u32,
    pub o: u32,
    pub s: u32,
    pub z: u32,
    pub t: u32,
}

impl LevelWeights {
    /// Weight `sz` for S and Z, `other` for the rest.
    #[must_use]
    pub const fn skewed(sz: u32, other: u32) -> Self {
        Self {
            i: other,
            j: other,
            l: other,
            o: other,
            s: sz,
            z: sz,
            t: other,
        }
    }

    /// Weights in [`PieceKind::TETROMINOES`] order.
    #[must_use]
    pub const fn as_array(&self) -> [u32; 7] {
        [self.i, self.j, self.l, self.o, self.s, self.z, self.t]
    }
}

/// Block weights for levels 1 to 4, as loaded from configuration.
///
/// The default table makes S and Z rarer at level 1, uniform at level 2 and
/// twice as common as any other piece at levels 3 and 4.
///
/// # Example
///
/// ```
/// use tetrowars_engine::{BlockTable, BlockWeights};
///
/// let weights = BlockWeights::default();
/// assert_eq!(weights.levels[0].s, 1);
/// assert_eq!(weights.levels[0].i, 2);
/// let table = BlockTable::try_from(&weights).unwrap();
/// # let _ = table;
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BlockWeights {
    pub levels: [LevelWeights; 4],
}

impl Default for BlockWeights {
    fn default() -> Self {
        Self {
            levels: [
                LevelWeights::skewed(1, 2),
                LevelWeights::skewed(1, 1),
                LevelWeights::skewed(2, 1),
                LevelWeights::skewed(2, 1),
            ],
        }
    }
}

/// Validated sampling distributions for levels 1 to 4.
#[derive(Debug, Clone)]
pub struct BlockTable {
    distributions: [WeightedIndex<u32>; 4],
}

impl TryFrom<&BlockWeights> for BlockTable {
    type Error = BlockTableError;

    fn try_from(weights: &BlockWeights) -> Result<Self, Self::Error> {
        let build = |index: usize| {
            #[expect(clippy::cast_possible_truncation)]
            let level = index as u8 + 1;
            WeightedIndex::new(weights.levels[index].as_array())
                .map_err(|source| BlockTableError { level, source })
        };
        Ok(Self {
            distributions: [build(0)?, build(1)?, build(2)?, build(3)?],
        })
    }
}

impl Default for BlockTable {
    /// # Panics
    ///
    /// Never in practice: the default weights are all positive.
    fn default() -> Self {
        Self::try_from(&BlockWeights::default()).expect("default block weights should be valid")
    }
}

impl BlockTable {
    /// Distribution for `level` (1 to 4).
    #[must_use]
    pub fn distribution(&self, level: u8) -> Option<&WeightedIndex<u32>> {
        let index = usize::from(level).checked_sub(1)?;
        self.distributions.get(index)
    }
}

/// Level-0 supply: a non-empty sequence cycled from the start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSequence {
    sequence: Vec<PieceKind>,
    cursor: usize,
}

impl FixedSequence {
    /// Cycles `sequence`, or [`DEFAULT_SEQUENCE`] when it is empty.
    #[must_use]
    pub fn new(sequence: &[PieceKind]) -> Self {
        let sequence = if sequence.is_empty() {
            DEFAULT_SEQUENCE.to_vec()
        } else {
            sequence.to_vec()
        };
        Self {
            sequence,
            cursor: 0,
        }
    }

    #[must_use]
    pub fn sequence(&self) -> &[PieceKind] {
        &self.sequence
    }

    fn next_block(&mut self) -> PieceKind {
        let kind = self.sequence[self.cursor];
        self.cursor = (self.cursor + 1) % self.sequence.len();
        kind
    }
}

/// How a player's next block is chosen at the current level.
#[derive(Debug, Clone)]
pub enum BlockPolicy {
    /// Cycles through a fixed sequence (level 0).
    Fixed(FixedSequence),
    /// Weighted random choice (levels 1 to 4).
    Weighted(WeightedIndex<u32>),
}

impl BlockPolicy {
    /// Builds the policy for `level`.
    ///
    /// Level 0 cycles `sequence`, or [`DEFAULT_SEQUENCE`] when it is empty.
    /// Higher levels sample from `table`.
    #[must_use]
    pub fn for_level(level: u8, sequence: &[PieceKind], table: &BlockTable) -> Self {
        match table.distribution(level) {
            Some(distribution) => Self::Weighted(distribution.clone()),
            None => Self::Fixed(FixedSequence::new(sequence)),
        }
    }

    pub fn next_block<R>(&mut self, rng: &mut R) -> PieceKind
    where
        R: Rng + ?Sized,
    {
        match self {
            Self::Fixed(fixed) => fixed.next_block(),
            Self::Weighted(distribution) => PieceKind::TETROMINOES[distribution.sample(rng)],
        }
    }
}

/// Parses a whitespace-separated list of piece letters such as `"I J L\nO"`.
pub fn parse_sequence(text: &str) -> Result<Vec<PieceKind>, ParsePieceError> {
    text.split_whitespace()
        .map(|token| {
            PieceKind::from_token(token).ok_or_else(|| ParsePieceError {
                token: token.to_owned(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_fixed_policy_cycles() {
        let table = BlockTable::default();
        let mut rng = Pcg32::seed_from_u64(0);
        let mut policy = BlockPolicy::for_level(0, &[PieceKind::S, PieceKind::T], &table);
        let drawn: Vec<_> = (0..5).map(|_| policy.next_block(&mut rng)).collect();
        assert_eq!(
            drawn,
            [
                PieceKind::S,
                PieceKind::T,
                PieceKind::S,
                PieceKind::T,
                PieceKind::S
            ]
        );
    }

    #[test]
    fn test_fixed_policy_default_sequence() {
        let table = BlockTable::default();
        let mut rng = Pcg32::seed_from_u64(0);
        let mut policy = BlockPolicy::for_level(0, &[], &table);
        let drawn: Vec<_> = (0..7).map(|_| policy.next_block(&mut rng)).collect();
        assert_eq!(drawn, DEFAULT_SEQUENCE);
    }

    #[test]
    fn test_fixed_sequence_never_empty() {
        let mut rng = Pcg32::seed_from_u64(0);
        let fixed = FixedSequence::new(&[]);
        assert_eq!(fixed.sequence(), DEFAULT_SEQUENCE);
        let mut policy = BlockPolicy::Fixed(fixed);
        for expected in DEFAULT_SEQUENCE.iter().chain(&DEFAULT_SEQUENCE) {
            assert_eq!(policy.next_block(&mut rng), *expected);
        }
    }

    #[test]
    fn test_weighted_policy_is_deterministic_per_seed() {
        let table = BlockTable::default();
        let mut a = BlockPolicy::for_level(3, &[], &table);
        let mut b = BlockPolicy::for_level(3, &[], &table);
        let mut rng_a = Pcg32::seed_from_u64(42);
        let mut rng_b = Pcg32::seed_from_u64(42);
        for _ in 0..50 {
            assert_eq!(a.next_block(&mut rng_a), b.next_block(&mut rng_b));
        }
    }

    #[test]
    fn test_weighted_policy_respects_zero_weights() {
        let mut weights = BlockWeights::default();
        weights.levels[1] = LevelWeights {
            i: 0,
            j: 0,
            l: 0,
            o: 1,
            s: 0,
            z: 0,
            t: 0,
        };
        let table = BlockTable::try_from(&weights).unwrap();
        let mut policy = BlockPolicy::for_level(2, &[], &table);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..20 {
            assert_eq!(policy.next_block(&mut rng), PieceKind::O);
        }
    }

    #[test]
    fn test_level_three_favours_s_and_z() {
        let table = BlockTable::default();
        let mut policy = BlockPolicy::for_level(3, &[], &table);
        let mut rng = Pcg32::seed_from_u64(1);
        let mut counts = [0usize; 7];
        for _ in 0..9000 {
            let kind = policy.next_block(&mut rng);
            counts[kind as usize] += 1;
        }
        let sz = counts[PieceKind::S as usize] + counts[PieceKind::Z as usize];
        let others: usize = counts.iter().sum::<usize>() - sz;
        // Expected 4000 S/Z against 5000 others
        assert!((3600..4400).contains(&sz), "S/Z drawn {sz} times");
        assert!((4600..5400).contains(&others));
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let mut weights = BlockWeights::default();
        weights.levels[2] = LevelWeights::skewed(0, 0);
        let err = BlockTable::try_from(&weights).unwrap_err();
        assert_eq!(err.level, 3);
    }

    #[test]
    fn test_weights_from_json() {
        let json = r#"{"levels": [
            {"I": 1, "J": 1, "L": 1, "O": 1, "S": 1, "Z": 1, "T": 1},
            {"I": 1, "J": 1, "L": 1, "O": 1, "S": 1, "Z": 1, "T": 1},
            {"I": 1, "J": 1, "L": 1, "O": 1, "S": 3, "Z": 3, "T": 1},
            {"I": 0, "J": 0, "L": 0, "O": 0, "S": 1, "Z": 1, "T": 0}
        ]}"#;
        let weights: BlockWeights = serde_json::from_str(json).unwrap();
        assert_eq!(weights.levels[2], LevelWeights::skewed(3, 1));
        assert!(BlockTable::try_from(&weights).is_ok());

        let missing_level = r#"{"levels": []}"#;
        assert!(serde_json::from_str::<BlockWeights>(missing_level).is_err());
    }

    #[test]
    fn test_parse_sequence() {
        assert_eq!(
            parse_sequence("I J\n  Z\tT\n").unwrap(),
            [PieceKind::I, PieceKind::J, PieceKind::Z, PieceKind::T]
        );
        assert_eq!(parse_sequence("").unwrap(), []);
        let err = parse_sequence("I X O").unwrap_err();
        assert_eq!(err.token, "X");
    }
}
