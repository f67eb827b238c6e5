//! Line-oriented console input with a bounded re-prompt loop.

use super::{InputError, InputProvider, Prompt};
use std::io::{BufRead, Stdin, StdinLock, Stdout, Write};

/// Default number of attempts before giving up on a prompt.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Reads values from a line-oriented reader, writing prompts to a writer.
///
/// Bad input is answered with a fresh prompt, up to `max_attempts` times.
/// An empty line, `q`, `quit`, or end of input cancels the request.
pub struct ConsoleInput<R, W> {
    reader: R,
    writer: W,
    max_attempts: u32,
}

impl ConsoleInput<StdinLock<'static>, Stdout> {
    /// Console input bound to the process stdin/stdout.
    pub fn stdio(max_attempts: u32) -> Self {
        let stdin: Stdin = std::io::stdin();
        Self::new(stdin.lock(), std::io::stdout(), max_attempts)
    }
}

impl<R: BufRead, W: Write> ConsoleInput<R, W> {
    /// Create console input over arbitrary reader/writer.
    pub fn new(reader: R, writer: W, max_attempts: u32) -> Self {
        Self {
            reader,
            writer,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Consume the input and return the writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn is_cancel(line: &str) -> bool {
        line.is_empty() || line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit")
    }
}

impl<R: BufRead, W: Write> InputProvider for ConsoleInput<R, W> {
    fn request(&mut self, prompt: &Prompt) -> Result<Option<f64>, InputError> {
        for attempt in 1..=self.max_attempts {
            write!(self.writer, "{}: ", prompt.text)?;
            self.writer.flush()?;

            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let line = line.trim();
            if Self::is_cancel(line) {
                return Ok(None);
            }

            match line.parse::<f64>() {
                Ok(value) if prompt.accepts(value) => return Ok(Some(value)),
                Ok(value) => {
                    tracing::warn!(
                        "Rejected {} for '{}' (attempt {}/{})",
                        value,
                        prompt.text,
                        attempt,
                        self.max_attempts
                    );
                    if prompt.whole && prompt.max.is_finite() {
                        writeln!(
                            self.writer,
                            "Value must be a whole number between {} and {}.",
                            prompt.min, prompt.max
                        )?;
                    } else if prompt.max.is_finite() {
                        writeln!(
                            self.writer,
                            "Value must be between {} and {}.",
                            prompt.min, prompt.max
                        )?;
                    } else if prompt.whole {
                        writeln!(
                            self.writer,
                            "Value must be a whole number of at least {}.",
                            prompt.min
                        )?;
                    } else {
                        writeln!(self.writer, "Value must be at least {}.", prompt.min)?;
                    }
                }
                Err(_) => {
                    tracing::warn!("Unparsable input for '{}': {:?}", prompt.text, line);
                    writeln!(self.writer, "Please enter numbers only.")?;
                }
            }
        }

        Err(InputError::AttemptsExhausted {
            prompt: prompt.text.clone(),
            attempts: self.max_attempts,
        })
    }
}
