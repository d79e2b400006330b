pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A command script (sequence file, level-0 sequence, `norandom` file) could not be read.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ScriptError {
    #[display("script `{name}` not found")]
    NotFound { name: String },
    #[display("failed to read script `{name}`")]
    Io {
        name: String,
        source: std::io::Error,
    },
}

/// A token in a piece sequence was not one of `I J L O S Z T`.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid piece `{token}` in sequence")]
pub struct ParsePieceError {
    pub token: String,
}

/// A level's block weights cannot form a distribution.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid block weights for level {level}")]
pub struct BlockTableError {
    pub level: u8,
    pub source: rand::distr::weighted::Error,
}
