//! User-facing console channel: status lines out, one-line acknowledgments in.
//!
//! Generic over reader and writer so the launcher can be driven from tests
//! with a `Cursor` and a `Vec<u8>`.
use std::io::{BufRead, Write};

pub struct Console<R, W> {
    input: R,
    output: W,
    interactive: bool,
}

impl Console<std::io::StdinLock<'static>, std::io::Stdout> {
    /// Console bound to the process stdin/stdout.
    pub fn stdio(interactive: bool) -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout(), interactive)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, interactive: bool) -> Self {
        Self {
            input,
            output,
            interactive,
        }
    }

    /// Print one status line.
    pub fn say(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{line}").and_then(|_| self.output.flush()) {
            tracing::warn!(error = %e, "failed to write to console");
        }
    }

    /// Print `prompt` and block until the user enters a line.
    ///
    /// No-op when the console is non-interactive. EOF counts as an acknowledgment.
    pub fn acknowledge(&mut self, prompt: &str) {
        if !self.interactive {
            return;
        }
        self.say(prompt);
        let mut line = String::new();
        if let Err(e) = self.input.read_line(&mut line) {
            tracing::warn!(error = %e, "failed to read acknowledgment");
        }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}
