//! Turn engine and everything that feeds it.
//!
//! This module builds the two-player game on top of the [`core`](crate::core)
//! board and piece types:
//!
//! - [`Player`] - Score, level, block supply and penalty counter for one side
//! - [`BlockPolicy`] / [`BlockTable`] - Level-dependent block generation
//! - [`Command`] / [`SpecialAction`] - Parsed forms of textual input
//! - [`CommandSource`] - Where input lines come from
//! - [`Observer`] / [`GameView`] - Notification of state changes
//! - [`Game`] - The turn state machine
//!
//! # Game Flow
//!
//! 1. Both players receive a current and a next piece
//! 2. The current player issues commands until the piece is dropped
//! 3. Rows are cleared and scored, penalties are applied at level 4
//! 4. Clearing several rows at once earns special actions against the opponent
//! 5. The turn passes; a piece that cannot spawn loses the game
//!
//! # Example
//!
//! ```
//! use tetrowars_engine::{Game, GameConfig, PlayerId, ScriptedCommands};
//!
//! let mut game = Game::new(GameConfig::default());
//! let mut input = ScriptedCommands::new(["2right drop", "drop"]);
//! let end = game.play(&mut input);
//!
//! assert!(end.is_end_of_input());
//! assert_eq!(game.current_player(), PlayerId::One);
//! ```

pub use self::{block_supply::*, command::*, game::*, observer::*, player::*, source::*};

mod block_supply;
mod command;
mod game;
mod observer;
mod player;
mod source;
