use std::io::{self, BufRead, Write};

use crate::ports::{Confirm, PortError};

/// Ask a yes/no question on `output` and read the answer from `input`.
///
/// An empty answer or end of input selects `default`. Anything other than
/// y/yes/n/no (case-insensitive) asks again.
pub fn ask_yes_no<R: BufRead, W: Write>(input: &mut R, output: &mut W, prompt: &str, default: bool) -> io::Result<bool> {
    let hint = if default { "y" } else { "n" };
    loop {
        write!(output, "{} (y/n) [{}]: ", prompt, hint)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(default);
        }

        match line.trim().to_lowercase().as_str() {
            "" => return Ok(default),
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => continue,
        }
    }
}

/// Confirmation on the controlling terminal (stdin/stderr)
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool, PortError> {
        let stdin = io::stdin();
        let stderr = io::stderr();
        Ok(ask_yes_no(&mut stdin.lock(), &mut stderr.lock(), prompt, default)?)
    }
}
