//! Converts a note (timestamp + multi-line body) to and from its one-line record form.
//!
//! A record looks like `2024-01-01 10:00:00 :: Buy milk \n Call Bob`: the timestamp,
//! the field separator, then the body with every newline replaced by [NEWLINE_TOKEN].
//! Pure functions only; the store does the I/O.
//!
//! Known limitation: a body that already contains the literal text ` \n ` decodes with
//! a real line break in its place, and a body containing ` :: ` is only safe because the
//! split happens on the first separator. Neither case is detected.

use chrono::{Local, NaiveDateTime};

/// Timestamp layout of every record, second precision.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Separates the timestamp from the encoded body.
pub const FIELD_SEPARATOR: &str = " :: ";

/// Stands in for a newline inside an encoded body: space, backslash, `n`, space.
pub const NEWLINE_TOKEN: &str = " \\n ";

/// A note as the user sees it. Lives only in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub timestamp: NaiveDateTime,
    /// Free text, may contain line breaks.
    pub body: String,
}

impl Note {
    pub fn new(body: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            body: body.into(),
            timestamp,
        }
    }

    /// A note stamped with the local wall clock.
    pub fn now(body: impl Into<String>) -> Self {
        Self::new(body, Local::now().naive_local())
    }
}

/// The two fields of a record line, with the body's line breaks restored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    /// Timestamp text exactly as stored; not validated.
    pub timestamp: String,
    pub body: String,
}

impl DecodedRecord {
    /// Parses the stored timestamp. `None` when the line was written by hand or is damaged.
    pub fn parsed_timestamp(&self) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(&self.timestamp, TIMESTAMP_FORMAT).ok()
    }

    /// The body split into display lines, see [body_lines].
    pub fn body_lines(&self) -> impl Iterator<Item = &str> {
        body_lines(&self.body)
    }
}

/// Renders a timestamp the way records store it.
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Display lines of a decoded body. Splits on every `\n`, so a trailing break shows
/// as a final empty line and an empty body is one empty line.
pub fn body_lines(body: &str) -> impl Iterator<Item = &str> {
    body.split('\n')
}

/// True when there is nothing but whitespace in `body`.
pub fn is_blank(body: &str) -> bool {
    body.trim().is_empty()
}

/// Encodes a note as one record line. The result never contains `\n` or `\r`.
pub fn encode(note: &Note) -> String {
    let body = note.body.replace('\r', "").replace('\n', NEWLINE_TOKEN);
    format!(
        "{}{}{}",
        format_timestamp(&note.timestamp),
        FIELD_SEPARATOR,
        body
    )
}

/// Splits a record line on the first separator and restores line breaks in the body.
/// A line without a separator is all timestamp and an empty body.
pub fn decode(line: &str) -> DecodedRecord {
    match line.split_once(FIELD_SEPARATOR) {
        Some((timestamp, body)) => DecodedRecord {
            timestamp: timestamp.to_string(),
            body: body.replace(NEWLINE_TOKEN, "\n"),
        },
        None => DecodedRecord {
            timestamp: line.to_string(),
            body: String::new(),
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap()
    }

    #[test]
    fn encode_multi_line_body() {
        let note = Note::new("Buy milk\nCall Bob", at(10, 0, 0));
        assert_eq!(encode(&note), "2024-01-01 10:00:00 :: Buy milk \\n Call Bob");
    }

    #[test]
    fn encode_strips_carriage_returns() {
        let note = Note::new("one\r\ntwo\r", at(9, 30, 5));
        let line = encode(&note);
        assert_eq!(line, "2024-01-01 09:30:05 :: one \\n two");
        assert!(!line.contains('\r'));
        assert!(!line.contains('\n'));
    }

    #[test]
    fn decode_restores_line_breaks() {
        let rec = decode("2024-01-01 10:00:00 :: Buy milk \\n Call Bob");
        assert_eq!(rec.timestamp, "2024-01-01 10:00:00");
        assert_eq!(rec.body, "Buy milk\nCall Bob");
        assert_eq!(rec.body_lines().collect::<Vec<_>>(), vec!["Buy milk", "Call Bob"]);
        assert_eq!(rec.parsed_timestamp(), Some(at(10, 0, 0)));
    }

    #[test]
    fn decode_without_separator_is_all_timestamp() {
        let rec = decode("just some text");
        assert_eq!(rec.timestamp, "just some text");
        assert_eq!(rec.body, "");
        assert_eq!(rec.parsed_timestamp(), None);
    }

    #[test]
    fn decode_splits_on_first_separator_only() {
        let rec = decode("2024-01-01 10:00:00 :: a :: b");
        assert_eq!(rec.body, "a :: b");
    }

    #[test]
    fn round_trip_preserves_body() {
        let bodies = [
            "single line",
            "first\nsecond\nthird",
            "blank\n\nline in between",
            "trailing space \nnext",
            "  indented\n\ttabbed",
            "back\\slash and x\\ny without spaces",
            "ünïcödé ✓\nzweite Zeile",
        ];
        for body in bodies {
            let note = Note::new(body, at(23, 59, 59));
            let rec = decode(&encode(&note));
            assert_eq!(rec.timestamp, "2024-01-01 23:59:59");
            assert_eq!(rec.body, body, "body {body:?}");
        }
    }

    #[test]
    fn literal_token_in_body_is_a_known_collision() {
        let note = Note::new("a \\n b", at(0, 0, 0));
        assert_eq!(decode(&encode(&note)).body, "a\nb");
    }

    #[test]
    fn body_lines_keep_trailing_break() {
        let rec = decode("2024-01-01 10:00:00 :: one \\n two \\n ");
        assert_eq!(rec.body_lines().collect::<Vec<_>>(), vec!["one", "two", ""]);
        assert_eq!(body_lines("").collect::<Vec<_>>(), vec![""]);
    }

    #[test]
    fn blank_bodies() {
        assert!(is_blank(""));
        assert!(is_blank("  \n\t "));
        assert!(!is_blank(" x "));
    }
}
