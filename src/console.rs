use colored::*;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};

use crate::errors::RenameError;

/// User-facing surface of the rename flow.
#[allow(async_fn_in_trait)]
pub trait Ui {
    fn print_model_info(&mut self, model: &str);
    fn print_detected_type(&mut self, mime_type: &str);
    fn print_analyzing(&mut self, file_name: &str);
    fn print_proposal(&mut self, old_name: &str, new_name: &str, reasoning: &str);
    fn print_dry_run(&mut self);
    fn print_success(&mut self, new_name: &str);
    fn print_cancelled(&mut self);
    /// Reads one line; only `y` (any case) confirms.
    async fn confirm(&mut self, question: &str) -> Result<bool, RenameError>;
}

pub struct ConsoleUi<R, W> {
    reader: R,
    writer: W,
}

impl ConsoleUi<BufReader<Stdin>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), io::stdout())
    }
}

impl<R: AsyncBufRead + Unpin, W: Write> ConsoleUi<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

// Output is best-effort: a closed stdout must not abort a rename.
impl<R: AsyncBufRead + Unpin, W: Write> Ui for ConsoleUi<R, W> {
    fn print_model_info(&mut self, model: &str) {
        let _ = writeln!(self.writer, "{} {}", "> Using model:".dimmed(), model.cyan());
    }

    fn print_detected_type(&mut self, mime_type: &str) {
        let _ = writeln!(self.writer, "{} {}", "> Detected type:".dimmed(), mime_type.cyan());
    }

    fn print_analyzing(&mut self, file_name: &str) {
        let _ = writeln!(
            self.writer,
            "{} '{}' {}",
            "> Analyzing".dimmed(),
            file_name.bold(),
            "with Gemini...".dimmed()
        );
    }

    fn print_proposal(&mut self, old_name: &str, new_name: &str, reasoning: &str) {
        let _ = writeln!(self.writer, "\n{}", "Proposal".purple().bold());
        let _ = writeln!(self.writer, "{}\n  {}\n", "Reasoning:".bold(), reasoning);
        let _ = writeln!(
            self.writer,
            "{}\n  {} -> {}\n",
            "Rename:".bold(),
            old_name.red(),
            new_name.green()
        );
    }

    fn print_dry_run(&mut self) {
        let _ = writeln!(self.writer, "{}", "> Dry-run enabled. Skipping rename.".yellow());
    }

    fn print_success(&mut self, new_name: &str) {
        let _ = writeln!(
            self.writer,
            "{} {}",
            "> Success! Renamed to".green(),
            new_name.green().bold()
        );
    }

    fn print_cancelled(&mut self) {
        let _ = writeln!(self.writer, "{}", "> Cancelled.".red());
    }

    async fn confirm(&mut self, question: &str) -> Result<bool, RenameError> {
        let _ = write!(self.writer, "{} ", format!("{question} [y/N]:").bold());
        let _ = self.writer.flush();

        let mut response = String::new();
        let read = self
            .reader
            .read_line(&mut response)
            .await
            .map_err(RenameError::Input)?;
        if read == 0 {
            return Err(RenameError::Input(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no input received",
            )));
        }

        Ok(response.trim().eq_ignore_ascii_case("y"))
    }
}
