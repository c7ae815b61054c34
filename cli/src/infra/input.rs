//! Operator input from standard input.

use std::io::Write as _;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use crate::application::ports::LineSource;

/// Reads prompt-delimited lines from stdin.
pub struct StdinLines {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinLines {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinLines {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for StdinLines {
    async fn next_line(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{prompt}").context("writing prompt")?;
        stdout.flush().context("flushing prompt")?;
        drop(stdout);
        self.lines.next_line().await.context("reading operator input")
    }
}
