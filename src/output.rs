//! Output formatting for name search results

use crate::query::SearchOutcome;
use serde::Serialize;
use std::io::{self, Write};
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Machine-readable form of a search, printed by `--json`
#[derive(Debug, Serialize)]
pub struct JsonResults<'a> {
    pub query: &'a str,
    pub total: usize,
    pub truncated: bool,
    pub names: &'a [&'a str],
}

/// Print matching names one per line, highlighting the query inside each
pub fn print_names(names: &[&str], query: &str, choice: ColorChoice) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(choice);
    write_names(&mut stdout, names, query)
}

pub fn write_names<W: WriteColor>(out: &mut W, names: &[&str], query: &str) -> io::Result<()> {
    for name in names {
        write_name(out, name, query)?;
    }
    Ok(())
}

/// Write one name with its first occurrence of `query` highlighted
fn write_name<W: WriteColor>(out: &mut W, name: &str, query: &str) -> io::Result<()> {
    let Some(start) = (!query.is_empty()).then(|| name.find(query)).flatten() else {
        return writeln!(out, "{}", name);
    };
    let end = start + query.len();

    // Text before match
    if start > 0 {
        write!(out, "{}", &name[..start])?;
    }

    out.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(out, "{}", &name[start..end])?;
    out.reset()?;

    // Text after match
    if end < name.len() {
        write!(out, "{}", &name[end..])?;
    }

    writeln!(out)
}

/// Print a search as a single JSON object
pub fn print_json(query: &str, outcome: &SearchOutcome<'_>) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_json(&mut stdout, query, outcome)
}

pub fn write_json<W: Write>(out: &mut W, query: &str, outcome: &SearchOutcome<'_>) -> io::Result<()> {
    let results = JsonResults {
        query,
        total: outcome.total,
        truncated: outcome.is_truncated(),
        names: &outcome.names,
    };
    serde_json::to_writer_pretty(&mut *out, &results)?;
    writeln!(out)
}

/// Print the match count (for --count)
pub fn print_count(count: usize) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", count)
}

/// Tell the user on stderr that results were cut off by `--limit`
pub fn print_truncation_note(shown: usize, total: usize, choice: ColorChoice) -> io::Result<()> {
    let mut stderr = StandardStream::stderr(choice);
    stderr.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
    writeln!(stderr, "showing {} of {} matches", shown, total)?;
    stderr.reset()
}
