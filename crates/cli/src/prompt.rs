//! Execution confirmation prompt

use anyhow::Result;
use std::io::{BufRead, Write};

/// Ask whether to run the plan. Deliberately strict: only an exact `Y`
/// proceeds, anything else declines, end of input included.
pub fn confirm(out: &mut dyn Write) -> Result<bool> {
    write!(out, "\nProceed? Y[n] ")?;
    out.flush()?;

    let mut answer = String::new();
    let read = std::io::stdin().lock().read_line(&mut answer)?;
    if read == 0 {
        return Ok(false);
    }
    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    answer.trim_end_matches(['\r', '\n']) == "Y"
}
