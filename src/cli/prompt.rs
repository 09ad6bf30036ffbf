use std::io::BufRead;
use std::io::Write;

use anyhow::Result;

use crate::tracker::Error;
use crate::tracker::Resolution;

/// Asks the user to pick one of several matching projects by number. A
/// number out of range asks again; unreadable input or end of input aborts
/// the operation rather than guessing.
pub fn choose(
    query: &str,
    candidates: &[Resolution<'_>],
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<usize> {
    loop {
        writeln!(output, "multiple projects found with suffix \"{query}\":")?;
        for (index, candidate) in candidates.iter().enumerate() {
            writeln!(output, "({}) {}", index + 1, candidate.path)?;
        }
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(Error::Ambiguous(query.to_string()).into());
        }

        match line.trim().parse::<usize>() {
            Ok(selection) if (1..=candidates.len()).contains(&selection) => {
                return Ok(selection - 1);
            }
            Ok(_) => continue,
            Err(_) => return Err(Error::Ambiguous(query.to_string()).into()),
        }
    }
}
