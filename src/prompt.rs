//! Interactive confirmation.

use crate::config::CONFIRM_TOKEN;
use std::io::{self, BufRead, Write};

/// Print `question` without a newline and read one line of answer.
///
/// Only the exact confirm token, surrounded by optional whitespace, counts as
/// yes; end of input is a no.
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, out: &mut W) -> io::Result<bool> {
    write!(out, "{question}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        log::info!("No answer, input closed");
        return Ok(false);
    }
    let answer = line.trim();
    log::debug!("Prompt answer: {answer:?}");
    Ok(answer == CONFIRM_TOKEN)
}
