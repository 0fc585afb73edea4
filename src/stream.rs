//! Line-oriented message processing.
//!
//! Input is a sequence of lines. A line containing `*` is a settings
//! directive and reconfigures the machine; every other line is a message,
//! converted and written out in groups of five symbols. Each input line
//! produces at most one output line.

use std::io::{BufRead, Write};

use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::settings::Settings;
use crate::trace::StepObserver;

/// Symbols per output group.
pub const GROUP_SIZE: usize = 5;

/// Counters gathered while processing a stream.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessStats {
    /// Settings directives applied.
    pub settings: usize,
    /// Message lines converted.
    pub messages: usize,
    /// Symbols converted.
    pub symbols: usize,
}

/// Split `msg` into space-separated groups of five symbols.
///
/// The last group may be shorter.
///
/// ```rust
/// use libenigma::stream::group_five;
///
/// assert_eq!(group_five("QVPQSOKOILPUB"), "QVPQS OKOIL PUB");
/// assert_eq!(group_five(""), "");
/// ```
pub fn group_five(msg: &str) -> String {
    let mut out = String::with_capacity(msg.len() + msg.len() / GROUP_SIZE);
    for (i, ch) in msg.chars().enumerate() {
        if i > 0 && i % GROUP_SIZE == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

/// Drive `machine` over every line of `reader`, writing results to `writer`.
///
/// Blank lines are echoed as blank lines, even before the first settings
/// line.
///
/// # Errors
///
/// - [`EnigmaError::MissingSettings`] for a message before any settings line
/// - any settings or conversion error, which stops processing
/// - [`EnigmaError::Io`] if reading or writing fails
pub fn process<R, W, O>(machine: &mut Machine, reader: R, mut writer: W, mut observer: O) -> Result<ProcessStats>
where
    R: BufRead,
    W: Write,
    O: StepObserver,
{
    let mut stats = ProcessStats::default();

    for line in reader.lines() {
        let line = line?;

        if Settings::is_directive(&line) {
            Settings::parse(&line, machine.num_rotors())?.apply(machine)?;
            stats.settings += 1;
            continue;
        }

        if line.trim().is_empty() {
            writeln!(writer)?;
            continue;
        }

        if stats.settings == 0 {
            return Err(EnigmaError::MissingSettings);
        }

        let converted = machine.convert_with(&line, &mut observer)?;
        stats.messages += 1;
        stats.symbols += converted.chars().count();
        writeln!(writer, "{}", group_five(&converted))?;
    }

    writer.flush()?;
    Ok(stats)
}
