//! Scripted input that replays a fixed queue of values.

use super::{InputError, InputProvider, Prompt};
use std::collections::VecDeque;
use std::path::Path;

/// Replays queued values in order without validating or re-prompting.
///
/// A `None` entry is replayed as a cancellation.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    values: VecDeque<Option<f64>>,
    asked: Vec<String>,
}

impl ScriptedInput {
    /// Create from a sequence of optional values.
    pub fn new(values: impl IntoIterator<Item = Option<f64>>) -> Self {
        Self {
            values: values.into_iter().collect(),
            asked: Vec::new(),
        }
    }

    /// Create from plain values with no cancellations.
    pub fn from_values(values: &[f64]) -> Self {
        Self::new(values.iter().copied().map(Some))
    }

    /// Parse a script: one value per line, `cancel` for a cancellation.
    ///
    /// Blank lines and lines starting with `#` are ignored.
    pub fn parse(script: &str) -> Result<Self, InputError> {
        let mut values = Vec::new();

        for (idx, raw) in script.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.eq_ignore_ascii_case("cancel") {
                values.push(None);
                continue;
            }

            let value = line.parse::<f64>().map_err(|e| InputError::Parse {
                line: idx + 1,
                message: format!("{:?}: {}", line, e),
            })?;
            values.push(Some(value));
        }

        Ok(Self::new(values))
    }

    /// Load a script from a file.
    pub fn from_path(path: &Path) -> Result<Self, InputError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Number of values not yet consumed.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }

    /// Prompt texts requested so far, in order.
    pub fn asked(&self) -> &[String] {
        &self.asked
    }
}

impl InputProvider for ScriptedInput {
    fn request(&mut self, prompt: &Prompt) -> Result<Option<f64>, InputError> {
        self.asked.push(prompt.text.clone());
        let value = self
            .values
            .pop_front()
            .ok_or_else(|| InputError::Exhausted(prompt.text.clone()))?;

        tracing::debug!("Scripted value for '{}': {:?}", prompt.text, value);
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::types::Axis;

    #[test]
    fn test_replays_in_order() {
        let mut input = ScriptedInput::new(vec![Some(3.0), None, Some(7.0)]);
        let prompt = Prompt::window(Axis::Height);

        assert_eq!(input.request(&prompt).unwrap(), Some(3.0));
        assert_eq!(input.request(&prompt).unwrap(), None);
        assert_eq!(input.request(&prompt).unwrap(), Some(7.0));
        assert!(matches!(input.request(&prompt), Err(InputError::Exhausted(_))));
        assert_eq!(input.asked().len(), 4);
    }

    #[test]
    fn test_does_not_validate() {
        let mut input = ScriptedInput::from_values(&[600.0]);
        assert_eq!(input.request(&Prompt::window(Axis::Depth)).unwrap(), Some(600.0));
    }

    #[test]
    fn test_parse_script() {
        let input = ScriptedInput::parse("# laser windows\n5\n\n3\ncancel\n10.5\n").unwrap();
        assert_eq!(input.remaining(), 4);
    }

    #[test]
    fn test_parse_reports_line() {
        let err = ScriptedInput::parse("5\nfive\n").unwrap_err();
        assert!(matches!(err, InputError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_from_path() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "4\n2\n1").unwrap();

        let input = ScriptedInput::from_path(file.path()).unwrap();
        assert_eq!(input.remaining(), 3);
    }
}
