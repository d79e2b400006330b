use crate::{Direction, PieceKind, Rotation};

/// Command names recognised in input, by exact name or unambiguous prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Left,
    Right,
    Down,
    Clockwise,
    Counterclockwise,
    Drop,
    LevelUp,
    LevelDown,
    NoRandom,
    Random,
    Sequence,
    Restart,
    Bonus,
    Help,
}

impl Keyword {
    const NAMES: [(&'static str, Self); 14] = [
        ("left", Self::Left),
        ("right", Self::Right),
        ("down", Self::Down),
        ("clockwise", Self::Clockwise),
        ("counterclockwise", Self::Counterclockwise),
        ("drop", Self::Drop),
        ("levelup", Self::LevelUp),
        ("leveldown", Self::LevelDown),
        ("norandom", Self::NoRandom),
        ("random", Self::Random),
        ("sequence", Self::Sequence),
        ("restart", Self::Restart),
        ("bonus", Self::Bonus),
        ("help", Self::Help),
    ];

    /// Resolves `word` to a keyword.
    ///
    /// An exact name wins; otherwise `word` must be a prefix of exactly one
    /// name.
    ///
    /// ```
    /// use tetrowars_engine::Keyword;
    ///
    /// assert_eq!(Keyword::resolve("lef"), Some(Keyword::Left));
    /// assert_eq!(Keyword::resolve("levelu"), Some(Keyword::LevelUp));
    /// assert_eq!(Keyword::resolve("le"), None);
    /// ```
    #[must_use]
    pub fn resolve(word: &str) -> Option<Self> {
        if word.is_empty() {
            return None;
        }
        if let Some((_, keyword)) = Self::NAMES.iter().find(|(name, _)| *name == word) {
            return Some(*keyword);
        }
        let mut matches = Self::NAMES
            .iter()
            .filter(|(name, _)| name.starts_with(word))
            .map(|(_, keyword)| *keyword);
        match (matches.next(), matches.next()) {
            (Some(keyword), None) => Some(keyword),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, keyword)| *keyword == self)
            .map_or("", |(name, _)| name)
    }

    /// Whether the keyword takes a file name as its next token.
    #[must_use]
    pub fn takes_file(self) -> bool {
        matches!(self, Self::NoRandom | Self::Sequence)
    }
}

/// One parsed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Rotate(Rotation),
    Drop,
    /// Replace the current piece with a piece of this kind.
    Piece(PieceKind),
    LevelUp,
    LevelDown,
    /// Take blocks from the named file instead of the level policy.
    NoRandom(String),
    Random,
    /// Read further commands from the named file.
    Sequence(String),
    Restart,
    Bonus,
    Help,
    Unknown(String),
}

/// A command with its repeat count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub multiplier: u32,
    pub command: Command,
}

/// Splits a token into its leading decimal multiplier and the rest.
///
/// Multipliers too large for `u32` saturate.
#[must_use]
pub fn split_multiplier(token: &str) -> (Option<u32>, &str) {
    let digits = token.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return (None, token);
    }
    let (number, rest) = token.split_at(digits);
    (Some(number.parse().unwrap_or(u32::MAX)), rest)
}

/// Parses a line of input into instructions, in order.
///
/// File-taking commands consume the following token as their argument.
/// Tokens consisting of a bare multiplier are skipped.
#[must_use]
pub fn parse_line(line: &str) -> Vec<Instruction> {
    let mut tokens = line.split_whitespace();
    let mut instructions = vec![];
    while let Some(token) = tokens.next() {
        let (multiplier, word) = split_multiplier(token);
        if word.is_empty() {
            continue;
        }
        let command = if let Some(kind) = PieceKind::from_token(word) {
            Command::Piece(kind)
        } else {
            match Keyword::resolve(word) {
                Some(keyword) if keyword.takes_file() => match tokens.next() {
                    Some(file) if keyword == Keyword::NoRandom => {
                        Command::NoRandom(file.to_owned())
                    }
                    Some(file) => Command::Sequence(file.to_owned()),
                    None => Command::Unknown(token.to_owned()),
                },
                Some(keyword) => keyword_command(keyword),
                None => Command::Unknown(token.to_owned()),
            }
        };
        instructions.push(Instruction {
            multiplier: multiplier.unwrap_or(1),
            command,
        });
    }
    instructions
}

fn keyword_command(keyword: Keyword) -> Command {
    match keyword {
        Keyword::Left => Command::Move(Direction::Left),
        Keyword::Right => Command::Move(Direction::Right),
        Keyword::Down => Command::Move(Direction::Down),
        Keyword::Clockwise => Command::Rotate(Rotation::Clockwise),
        Keyword::Counterclockwise => Command::Rotate(Rotation::Counterclockwise),
        Keyword::Drop => Command::Drop,
        Keyword::LevelUp => Command::LevelUp,
        Keyword::LevelDown => Command::LevelDown,
        Keyword::Random => Command::Random,
        Keyword::Restart => Command::Restart,
        Keyword::Bonus => Command::Bonus,
        Keyword::Help => Command::Help,
        Keyword::NoRandom | Keyword::Sequence => Command::Unknown(keyword.name().to_owned()),
    }
}

/// Action the player who cleared several rows inflicts on the opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum SpecialAction {
    #[display("blind")]
    Blind,
    #[display("heavy")]
    Heavy,
    #[display("force {}", _0.as_char())]
    Force(PieceKind),
}

impl SpecialAction {
    const NAMES: [&'static str; 3] = ["blind", "heavy", "force"];

    /// Parses `blind`, `heavy`, `force <letter>` or a bare piece letter.
    ///
    /// Action names accept unambiguous prefixes.
    ///
    /// ```
    /// use tetrowars_engine::{PieceKind, SpecialAction};
    ///
    /// assert_eq!(SpecialAction::parse("heavy"), Some(SpecialAction::Heavy));
    /// assert_eq!(SpecialAction::parse("force Z"), Some(SpecialAction::Force(PieceKind::Z)));
    /// assert_eq!(SpecialAction::parse("T"), Some(SpecialAction::Force(PieceKind::T)));
    /// assert_eq!(SpecialAction::parse("jump"), None);
    /// ```
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let mut tokens = line.split_whitespace();
        let first = tokens.next()?;
        if let Some(kind) = PieceKind::from_token(first) {
            return Some(Self::Force(kind));
        }
        let name = Self::NAMES
            .iter()
            .find(|name| name.starts_with(first))?;
        match *name {
            "blind" => Some(Self::Blind),
            "heavy" => Some(Self::Heavy),
            _ => tokens
                .next()
                .and_then(PieceKind::from_token)
                .map(Self::Force),
        }
    }

    /// Whether `self` and `other` may not both be chosen in one round.
    ///
    /// At most one force is allowed, and no action twice.
    #[must_use]
    pub fn conflicts_with(self, other: Self) -> bool {
        matches!((self, other), (Self::Force(_), Self::Force(_))) || self == other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commands(line: &str) -> Vec<(u32, Command)> {
        parse_line(line)
            .into_iter()
            .map(|i| (i.multiplier, i.command))
            .collect()
    }

    #[test]
    fn test_exact_and_prefix_keywords() {
        assert_eq!(Keyword::resolve("drop"), Some(Keyword::Drop));
        assert_eq!(Keyword::resolve("dr"), Some(Keyword::Drop));
        assert_eq!(Keyword::resolve("cl"), Some(Keyword::Clockwise));
        assert_eq!(Keyword::resolve("co"), Some(Keyword::Counterclockwise));
        assert_eq!(Keyword::resolve("ri"), Some(Keyword::Right));
        assert_eq!(Keyword::resolve("ra"), Some(Keyword::Random));
        assert_eq!(Keyword::resolve("res"), Some(Keyword::Restart));
        assert_eq!(Keyword::resolve("n"), Some(Keyword::NoRandom));
        assert_eq!(Keyword::resolve("s"), Some(Keyword::Sequence));
    }

    #[test]
    fn test_ambiguous_or_unknown_keywords() {
        assert_eq!(Keyword::resolve("r"), None);
        assert_eq!(Keyword::resolve("d"), None);
        assert_eq!(Keyword::resolve("level"), None);
        assert_eq!(Keyword::resolve("c"), None);
        assert_eq!(Keyword::resolve("dropx"), None);
        assert_eq!(Keyword::resolve(""), None);
    }

    #[test]
    fn test_keyword_names_round_trip() {
        for (name, keyword) in Keyword::NAMES {
            assert_eq!(keyword.name(), name);
        }
    }

    #[test]
    fn test_multiplier() {
        assert_eq!(split_multiplier("3drop"), (Some(3), "drop"));
        assert_eq!(split_multiplier("drop"), (None, "drop"));
        assert_eq!(split_multiplier("0left"), (Some(0), "left"));
        assert_eq!(split_multiplier("12"), (Some(12), ""));
        assert_eq!(
            split_multiplier("99999999999999999999lef"),
            (Some(u32::MAX), "lef")
        );
    }

    #[test]
    fn test_parse_line() {
        assert_eq!(
            commands("2lef  ri 3cl drop"),
            [
                (2, Command::Move(Direction::Left)),
                (1, Command::Move(Direction::Right)),
                (3, Command::Rotate(Rotation::Clockwise)),
                (1, Command::Drop),
            ]
        );
    }

    #[test]
    fn test_piece_letters_are_exact() {
        assert_eq!(
            commands("Z 2T s"),
            [
                (1, Command::Piece(PieceKind::Z)),
                (2, Command::Piece(PieceKind::T)),
                (1, Command::Unknown("s".to_owned())),
            ]
        );
    }

    #[test]
    fn test_file_arguments() {
        assert_eq!(
            commands("norandom blocks.txt seq moves.txt random"),
            [
                (1, Command::NoRandom("blocks.txt".to_owned())),
                (1, Command::Sequence("moves.txt".to_owned())),
                (1, Command::Random),
            ]
        );
        assert_eq!(
            commands("sequence"),
            [(1, Command::Unknown("sequence".to_owned()))]
        );
    }

    #[test]
    fn test_unknown_and_bare_numbers() {
        assert_eq!(
            commands("jump 5 help"),
            [(1, Command::Unknown("jump".to_owned())), (1, Command::Help)]
        );
        assert!(commands("   ").is_empty());
    }

    #[test]
    fn test_special_action_parse() {
        assert_eq!(SpecialAction::parse("blind"), Some(SpecialAction::Blind));
        assert_eq!(SpecialAction::parse("  bl "), Some(SpecialAction::Blind));
        assert_eq!(SpecialAction::parse("h"), Some(SpecialAction::Heavy));
        assert_eq!(
            SpecialAction::parse("f L"),
            Some(SpecialAction::Force(PieceKind::L))
        );
        assert_eq!(SpecialAction::parse("force"), None);
        assert_eq!(SpecialAction::parse("force x"), None);
        assert_eq!(SpecialAction::parse(""), None);
    }

    #[test]
    fn test_special_action_conflicts() {
        let force_s = SpecialAction::Force(PieceKind::S);
        let force_z = SpecialAction::Force(PieceKind::Z);
        assert!(force_s.conflicts_with(force_z));
        assert!(SpecialAction::Blind.conflicts_with(SpecialAction::Blind));
        assert!(!SpecialAction::Blind.conflicts_with(SpecialAction::Heavy));
        assert!(!SpecialAction::Heavy.conflicts_with(force_s));
    }

    #[test]
    fn test_special_action_display() {
        assert_eq!(SpecialAction::Force(PieceKind::O).to_string(), "force O");
        assert_eq!(SpecialAction::Blind.to_string(), "blind");
    }
}
