use std::{
    fs,
    io::{self, BufRead},
};

use tetrowars_engine::{CommandSource, ScriptError};

/// Commands read line by line from a reader, scripts from the file system.
#[derive(Debug)]
pub struct ReaderCommands<R> {
    reader: R,
}

impl<R> ReaderCommands<R>
where
    R: BufRead,
{
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R> CommandSource for ReaderCommands<R>
where
    R: BufRead,
{
    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                let len = line.trim_end_matches(['\n', '\r']).len();
                line.truncate(len);
                Some(line)
            }
            Err(err) => {
                eprintln!("Failed to read input: {err}");
                None
            }
        }
    }

    fn read_script(&mut self, name: &str) -> Result<String, ScriptError> {
        fs::read_to_string(name).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ScriptError::NotFound {
                name: name.to_owned(),
            },
            _ => ScriptError::Io {
                name: name.to_owned(),
                source,
            },
        })
    }
}
