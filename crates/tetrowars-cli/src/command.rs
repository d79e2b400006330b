use std::{
    io,
    path::{Path, PathBuf},
};

use clap::Parser;
use tetrowars_engine::{BlockTable, Game, GameConfig, MAX_LEVEL, PieceKind};

use crate::{display::TextDisplay, source::ReaderCommands, util};

const DEFAULT_SEQUENCE_FILES: [&str; 2] = ["sequence1.txt", "sequence2.txt"];

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Text-only display (the only display available)
    #[arg(long)]
    text: bool,
    /// Seed for the random block generators
    #[arg(long)]
    seed: Option<u64>,
    /// Level-0 block sequence for player 1 [default: sequence1.txt if present]
    #[arg(long)]
    scriptfile1: Option<PathBuf>,
    /// Level-0 block sequence for player 2 [default: sequence2.txt if present]
    #[arg(long)]
    scriptfile2: Option<PathBuf>,
    /// Level both players start at
    #[arg(
        long,
        default_value_t = 0,
        value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_LEVEL))
    )]
    startlevel: u8,
    /// Enable the enhanced special-action rules
    #[arg(long)]
    enablebonus: bool,
    /// JSON file with per-level block weights
    #[arg(long)]
    block_table: Option<PathBuf>,
}

impl CommandArgs {
    fn game_config(&self) -> anyhow::Result<GameConfig> {
        let Self {
            text: _,
            seed,
            scriptfile1,
            scriptfile2,
            startlevel,
            enablebonus,
            block_table,
        } = self;

        let block_table = match block_table {
            Some(path) => util::read_block_table_file(path)?,
            None => BlockTable::default(),
        };
        let sequences = [
            load_sequence(scriptfile1.as_deref(), DEFAULT_SEQUENCE_FILES[0])?,
            load_sequence(scriptfile2.as_deref(), DEFAULT_SEQUENCE_FILES[1])?,
        ];

        Ok(GameConfig {
            seed: seed.unwrap_or_else(rand::random),
            start_level: *startlevel,
            bonus: *enablebonus,
            sequences,
            block_table,
        })
    }
}

fn load_sequence(path: Option<&Path>, fallback: &str) -> anyhow::Result<Vec<PieceKind>> {
    if let Some(path) = path {
        return util::read_sequence_file(path);
    }
    let fallback = Path::new(fallback);
    if fallback.exists() {
        return util::read_sequence_file(fallback);
    }
    eprintln!(
        "{} not found, using the built-in level-0 sequence",
        fallback.display()
    );
    Ok(vec![])
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    if !args.text {
        eprintln!("No graphical display available, using text display");
    }
    let config = args.game_config()?;

    let mut game = Game::new(config);
    game.attach(Box::new(TextDisplay::new(io::stdout())));
    let mut input = ReaderCommands::new(io::stdin().lock());
    game.play(&mut input);
    Ok(())
}
