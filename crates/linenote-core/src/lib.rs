//! All note logic independent of how the app is driven (interactive shell or one-shot CLI).
//!
//! Notes live in one flat file, one record per line (see [codec] for the line format
//! and [store] for the operations). linenote keeps only its config in its own app data
//! directory (see [app_data]).

pub mod app_data;
pub mod codec;
pub mod config;
pub mod store;

pub use app_data::app_data_dir;
pub use codec::{body_lines, decode, encode, DecodedRecord, Note, TIMESTAMP_FORMAT};
pub use config::{
    load_config, resolve_notes_file, set_notes_file, Config, ConfigError, DEFAULT_NOTES_FILE,
};
pub use store::{ListedNote, NoteStore, Outcome, StoreError};
