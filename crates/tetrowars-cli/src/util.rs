use std::{
    fs::{self, File},
    io,
    path::Path,
};

use anyhow::Context;
use tetrowars_engine::{BlockTable, BlockWeights, PieceKind};

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read a level-0 block sequence (whitespace-separated piece letters)
///
/// # Errors
///
/// Returns error if the file cannot be read or contains an unknown letter
pub fn read_sequence_file<P>(path: P) -> anyhow::Result<Vec<PieceKind>>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read sequence file: {}", path.display()))?;
    let sequence = tetrowars_engine::parse_sequence(&text)
        .with_context(|| format!("Failed to parse sequence file: {}", path.display()))?;
    Ok(sequence)
}

pub fn read_block_table_file<P>(path: P) -> anyhow::Result<BlockTable>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let weights: BlockWeights = read_json_file("block table", path)?;
    let table = BlockTable::try_from(&weights)
        .with_context(|| format!("Invalid block table: {}", path.display()))?;
    Ok(table)
}
