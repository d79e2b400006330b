use std::collections::{HashMap, VecDeque};

use crate::ScriptError;

/// Supplier of input lines and named scripts.
///
/// `next_line` returning `None` means end of input; the engine ends the
/// session at that point.
pub trait CommandSource {
    fn next_line(&mut self) -> Option<String>;

    /// Reads the whole contents of the script called `name`.
    fn read_script(&mut self, name: &str) -> Result<String, ScriptError>;
}

/// In-memory command source, mainly for tests and embedding.
///
/// # Example
///
/// ```
/// use tetrowars_engine::{CommandSource, ScriptedCommands};
///
/// let mut source = ScriptedCommands::new(["left", "drop"]).with_script("seq.txt", "I O");
/// assert_eq!(source.next_line().as_deref(), Some("left"));
/// assert_eq!(source.read_script("seq.txt").unwrap(), "I O");
/// assert!(source.read_script("missing.txt").is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScriptedCommands {
    lines: VecDeque<String>,
    scripts: HashMap<String, String>,
}

impl ScriptedCommands {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            scripts: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_script(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.scripts.insert(name.into(), contents.into());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push_back(line.into());
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.lines.len()
    }
}

impl CommandSource for ScriptedCommands {
    fn next_line(&mut self) -> Option<String> {
        self.lines.pop_front()
    }

    fn read_script(&mut self, name: &str) -> Result<String, ScriptError> {
        self.scripts
            .get(name)
            .cloned()
            .ok_or_else(|| ScriptError::NotFound {
                name: name.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_in_order_then_end() {
        let mut source = ScriptedCommands::new(["a", "b"]);
        source.push_line("c");
        assert_eq!(source.remaining(), 3);
        assert_eq!(source.next_line().as_deref(), Some("a"));
        assert_eq!(source.next_line().as_deref(), Some("b"));
        assert_eq!(source.next_line().as_deref(), Some("c"));
        assert_eq!(source.next_line(), None);
        assert_eq!(source.next_line(), None);
    }

    #[test]
    fn test_missing_script() {
        let mut source = ScriptedCommands::default();
        let err = source.read_script("nope.txt").unwrap_err();
        assert!(matches!(err, ScriptError::NotFound { ref name } if name == "nope.txt"));
        assert_eq!(err.to_string(), "script `nope.txt` not found");
    }
}
