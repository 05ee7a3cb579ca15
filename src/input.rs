//! Operator input collection.
//!
//! Prompts for one line of six comma-separated sales figures and keeps
//! asking until the line validates. There is no retry cap: the operator
//! is expected to correct the input, and tests feed a finite reader.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::types::{SandwichError, ValidationError, ITEM_COUNT};

const PROMPT: &str = "Please enter sales data from the last market.\n\
Data should be six numbers, separated by commas.\n\
Example: 10,20,30,40,50,60\n";

/// Check a split input line.
///
/// Every token must parse as an integer (surrounding whitespace is
/// ignored), then the count must be exactly [`ITEM_COUNT`]. Conversion
/// failures are reported before count failures.
pub fn check<S: AsRef<str>>(values: &[S]) -> Result<(), ValidationError> {
    for value in values {
        let value = value.as_ref();
        if value.trim().parse::<i64>().is_err() {
            return Err(ValidationError::NotAnInteger {
                token: value.to_string(),
            });
        }
    }
    if values.len() != ITEM_COUNT {
        return Err(ValidationError::WrongCount {
            expected: ITEM_COUNT,
            actual: values.len(),
        });
    }
    Ok(())
}

/// Validate a split input line, printing a diagnostic to `out` on failure.
pub fn validate<S: AsRef<str>, W: Write>(values: &[S], out: &mut W) -> Result<bool> {
    match check(values) {
        Ok(()) => Ok(true),
        Err(e) => {
            warn!(error = %e, "Rejected sales input");
            writeln!(out, "Invalid data: {e}, please try again.\n")?;
            Ok(false)
        }
    }
}

/// Prompt until a valid line arrives and return its raw tokens.
///
/// Conversion to integers is left to the caller. Reaching end of input
/// before a valid line is fatal.
pub fn collect_sales_row<R: BufRead, W: Write>(input: &mut R, out: &mut W) -> Result<Vec<String>> {
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        writeln!(out, "{PROMPT}")?;
        writeln!(out, "Enter your data here:")?;
        out.flush()?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("Failed to read sales data from input")?;
        if read == 0 {
            return Err(SandwichError::InputClosed.into());
        }

        let line = line.trim_end_matches(['\r', '\n']);
        writeln!(out, "The data provided is {line}")?;

        let tokens: Vec<String> = line.split(',').map(str::to_string).collect();
        if validate(&tokens, out)? {
            writeln!(out, "Data is valid!")?;
            debug!(attempts, "Sales input accepted");
            return Ok(tokens);
        }
    }
}
