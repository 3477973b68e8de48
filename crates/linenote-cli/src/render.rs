//! Text rendering of notes for the terminal.

use std::io::{self, Write};

use linenote_core::{body_lines, ListedNote};

/// Writes `N) <timestamp>` followed by each body line indented with a tab.
pub fn write_note(out: &mut impl Write, note: &ListedNote) -> io::Result<()> {
    writeln!(out, "{}) {}", note.index, note.timestamp)?;
    for line in body_lines(&note.body) {
        writeln!(out, "\t{line}")?;
    }
    Ok(())
}

/// Writes every note, or `empty_message` when there are none.
pub fn write_notes(
    out: &mut impl Write,
    notes: &[ListedNote],
    empty_message: &str,
) -> io::Result<()> {
    if notes.is_empty() {
        return writeln!(out, "{empty_message}");
    }
    for note in notes {
        write_note(out, note)?;
    }
    Ok(())
}

pub fn write_json(out: &mut impl Write, notes: &[ListedNote]) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, notes)?;
    writeln!(out)
}
