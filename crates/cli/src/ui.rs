//! # Terminal Output
//!
//! Spinners shown while waiting on OCR or the completion provider, the manual
//! review step for extracted text, and answer/error printing.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal, Write};
use std::time::Duration;
use studytutor::TutorError;

/// Starts a spinner on stderr with `message`.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"])
        .template("{spinner:.cyan} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Shows the OCR suggestion and reads an optional replacement.
///
/// An empty line keeps the suggestion. Reads from `input` so it can be driven
/// by something other than stdin.
pub fn review_extracted_text<R: BufRead, W: Write>(
    suggestion: &str,
    input: &mut R,
    output: &mut W,
) -> io::Result<String> {
    writeln!(output, "Extracted text (you can edit it):")?;
    writeln!(output, "---")?;
    writeln!(output, "{suggestion}")?;
    writeln!(output, "---")?;
    write!(output, "Press Enter to keep it, or type a replacement: ")?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    let replacement = line.trim();
    if replacement.is_empty() {
        Ok(suggestion.to_string())
    } else {
        Ok(replacement.to_string())
    }
}

/// Reviews `suggestion` interactively when stdin is a terminal.
pub fn review_on_terminal(suggestion: &str) -> io::Result<String> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Ok(suggestion.to_string());
    }
    review_extracted_text(suggestion, &mut stdin.lock(), &mut io::stderr())
}

pub fn print_answer(answer: &str) {
    println!("📘 Answer\n");
    println!("{answer}");
}

/// Prints the student-facing message, then the cause for diagnostics.
pub fn print_error(err: &TutorError) {
    eprintln!("❌ {}", err.user_message());
    eprintln!("   {err}");
}
