//! The interactive menu. A [Session] owns its input and output so it can be driven
//! by a terminal or, in tests, by in-memory buffers.

use std::io::{self, BufRead, Write};

use linenote_core::{ListedNote, NoteStore, Outcome, StoreError};

use crate::render;

const MENU: &str = "\nChoose:
1) Add note (multi-line, finish with an empty line)
2) List all notes
3) Delete note (by number)
4) Edit note (by number)
5) Search notes (keyword)
6) Clear all notes
0) Exit";

pub struct Session<R, W> {
    input: R,
    out: W,
    store: NoteStore,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, out: W, store: NoteStore) -> Self {
        Self { input, out, store }
    }

    /// Runs the menu until the user picks 0 or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.out, "=== linenote ({}) ===", self.store.path().display())?;
        loop {
            writeln!(self.out, "{MENU}")?;
            self.prompt("Enter choice: ")?;
            let Some(choice) = self.read_line()? else {
                writeln!(self.out)?;
                return Ok(());
            };
            match choice.trim() {
                "1" => self.add()?,
                "2" => self.list()?,
                "3" => self.delete()?,
                "4" => self.edit()?,
                "5" => self.search()?,
                "6" => self.clear()?,
                "0" => {
                    writeln!(self.out, "Exiting. Bye!")?;
                    return Ok(());
                }
                _ => writeln!(self.out, "Invalid choice, try again.")?,
            }
        }
    }

    /// One line of input without its terminator; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    fn prompt(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{text}")?;
        self.out.flush()
    }

    /// Reads lines until an empty one (or end of input) and joins them with `\n`.
    pub fn read_body(&mut self) -> io::Result<String> {
        let mut lines = Vec::new();
        while let Some(line) = self.read_line()? {
            if line.is_empty() {
                break;
            }
            lines.push(line);
        }
        Ok(lines.join("\n"))
    }

    /// Prompts for a note number. `None` after printing `not_a_number` for non-numeric input.
    /// Negative numbers come back as 0 so the caller's range check rejects them.
    fn read_index(&mut self, prompt: &str, not_a_number: &str) -> io::Result<Option<usize>> {
        self.prompt(prompt)?;
        let Some(text) = self.read_line()? else {
            return Ok(None);
        };
        match text.trim().parse::<i64>() {
            Ok(n) => Ok(Some(usize::try_from(n).unwrap_or(0))),
            Err(_) => {
                writeln!(self.out, "{not_a_number}")?;
                Ok(None)
            }
        }
    }

    /// `y`/`Y` confirms a delete; anything else aborts.
    pub fn confirm_delete(&mut self, index: usize) -> io::Result<bool> {
        self.prompt(&format!("Confirm delete note {index} ? (y/n): "))?;
        let answer = self.read_line()?.unwrap_or_default();
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }

    /// Only the exact text `YES` confirms clearing.
    pub fn confirm_clear(&mut self) -> io::Result<bool> {
        self.prompt("Are you sure? This will delete ALL notes. Type 'YES' to confirm: ")?;
        let answer = self.read_line()?.unwrap_or_default();
        Ok(answer.trim() == "YES")
    }

    fn report(&mut self, action: &str, err: StoreError) -> io::Result<()> {
        log::debug!("{action} failed: {err:?}");
        writeln!(self.out, "Error {action}: {err}")
    }

    /// Loads the notes, reporting a read failure. `None` when there is nothing to work with.
    fn load_for(&mut self, action: &str) -> io::Result<Option<Vec<ListedNote>>> {
        match self.store.list() {
            Ok(notes) => Ok(Some(notes)),
            Err(e) => {
                self.report(action, e)?;
                Ok(None)
            }
        }
    }

    fn add(&mut self) -> io::Result<()> {
        writeln!(self.out, "Type your note. Press an empty line to finish:")?;
        let body = self.read_body()?;
        match self.store.add(&body) {
            Ok(Outcome::Done(_)) => writeln!(self.out, "Note saved."),
            Ok(_) => writeln!(self.out, "No note entered. Aborting."),
            Err(e) => self.report("saving note", e),
        }
    }

    fn list(&mut self) -> io::Result<()> {
        let Some(notes) = self.load_for("reading notes")? else {
            return Ok(());
        };
        self.show(&notes)
    }

    fn show(&mut self, notes: &[ListedNote]) -> io::Result<()> {
        if !notes.is_empty() {
            writeln!(self.out, "\nSaved notes:")?;
        }
        render::write_notes(&mut self.out, notes, "(No notes found)")
    }

    fn delete(&mut self) -> io::Result<()> {
        let Some(notes) = self.load_for("deleting note")? else {
            return Ok(());
        };
        if notes.is_empty() {
            return writeln!(self.out, "(No notes to delete)");
        }
        self.show(&notes)?;
        let Some(index) =
            self.read_index("Enter note number to delete: ", "Please enter a valid number.")?
        else {
            return Ok(());
        };
        if index < 1 || index > notes.len() {
            return writeln!(self.out, "Invalid number.");
        }
        if !self.confirm_delete(index)? {
            return writeln!(self.out, "Aborted.");
        }
        match self.store.delete(index) {
            Ok(Outcome::Done(_)) => writeln!(self.out, "Deleted."),
            Ok(_) => writeln!(self.out, "Invalid number."),
            Err(e) => self.report("deleting note", e),
        }
    }

    fn edit(&mut self) -> io::Result<()> {
        let Some(notes) = self.load_for("editing note")? else {
            return Ok(());
        };
        if notes.is_empty() {
            return writeln!(self.out, "(No notes to edit)");
        }
        self.show(&notes)?;
        let Some(index) =
            self.read_index("Enter note number to edit: ", "Enter a valid number.")?
        else {
            return Ok(());
        };
        let Some(old) = index.checked_sub(1).and_then(|i| notes.get(i)) else {
            return writeln!(self.out, "Invalid number.");
        };
        writeln!(self.out, "Old:")?;
        render::write_note(&mut self.out, old)?;

        writeln!(self.out, "Type new note content (finish with empty line):")?;
        let body = self.read_body()?;
        match self.store.edit(index, &body) {
            Ok(Outcome::Done(_)) => writeln!(self.out, "Note updated."),
            Ok(Outcome::EmptyBody) => writeln!(self.out, "No change made."),
            Ok(Outcome::OutOfRange { .. }) => writeln!(self.out, "Invalid number."),
            Err(e) => self.report("editing note", e),
        }
    }

    fn search(&mut self) -> io::Result<()> {
        match self.store.is_empty() {
            Ok(true) => return writeln!(self.out, "(No notes to search)"),
            Ok(false) => {}
            Err(e) => return self.report("searching notes", e),
        }
        self.prompt("Enter search keyword: ")?;
        let keyword = self.read_line()?.unwrap_or_default();
        match self.store.search_listed(&keyword) {
            Ok(hits) => render::write_notes(&mut self.out, &hits, "(No matches found)"),
            Err(e) => self.report("searching notes", e),
        }
    }

    fn clear(&mut self) -> io::Result<()> {
        if !self.confirm_clear()? {
            return writeln!(self.out, "Aborted.");
        }
        match self.store.clear() {
            Ok(()) => writeln!(self.out, "All notes cleared."),
            Err(e) => self.report("clearing notes", e),
        }
    }
}
