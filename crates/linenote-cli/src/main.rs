//! CLI entry point for linenote: an interactive menu plus one-shot subcommands.

mod render;
mod session;

use std::io::{self, StdinLock, Stdout};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use linenote_core::config::config_path;
use linenote_core::{
    app_data_dir, load_config, resolve_notes_file, set_notes_file, ConfigError, NoteStore,
    Outcome, StoreError,
};

use session::Session;

#[derive(Parser)]
#[command(name = "linenote")]
#[command(about = "linenote: timestamped notes, one per line in a plain text file")]
struct Cli {
    /// Notes file to use instead of the configured one.
    #[arg(short, long, global = true, env = "LINENOTE_FILE", value_name = "PATH")]
    file: Option<PathBuf>,
    /// Show debug logs on stderr (RUST_LOG still wins when set).
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Interactive menu (the default when no command is given).
    Shell,
    /// Add a note. Each TEXT becomes one line; without TEXT, lines are read from stdin up to an empty one.
    Add {
        #[arg(value_name = "TEXT")]
        lines: Vec<String>,
    },
    /// List all notes.
    List {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Delete note N.
    Delete {
        #[arg(value_name = "N")]
        number: usize,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Replace note N. Without TEXT, the new content is read from stdin.
    Edit {
        #[arg(value_name = "N")]
        number: usize,
        #[arg(value_name = "TEXT")]
        lines: Vec<String>,
    },
    /// Show notes containing KEYWORD (case-insensitive).
    Search {
        #[arg(value_name = "KEYWORD")]
        keyword: String,
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Delete all notes.
    Clear {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Show where linenote stores its config.
    DataDir,
    /// Show or change the persisted config.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommand {
    /// Print the config location and the notes file in use.
    Show,
    /// Remember PATH as the notes file.
    SetFile {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let notes_file = resolve_notes_file(cli.file.as_deref(), &load_config());
    let command = cli.command.unwrap_or(Commands::Shell);

    let result = match command {
        Commands::DataDir => data_dir(),
        Commands::Config { action } => run_config(action, &notes_file),
        command => {
            // The store cannot work without its file; failing here ends the process.
            let store = match NoteStore::open(&notes_file) {
                Ok(store) => store,
                Err(e) => {
                    eprintln!("{e}");
                    return ExitCode::FAILURE;
                }
            };
            run(command, store)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn terminal(store: &NoteStore) -> Session<StdinLock<'static>, Stdout> {
    Session::new(io::stdin().lock(), io::stdout(), store.clone())
}

fn run(command: Commands, store: NoteStore) -> Result<ExitCode, CliError> {
    let mut stdout = io::stdout();
    match command {
        Commands::Shell => {
            terminal(&store).run()?;
        }
        Commands::Add { lines } => {
            let body = if lines.is_empty() {
                eprintln!("Type your note. Press an empty line to finish:");
                terminal(&store).read_body()?
            } else {
                lines.join("\n")
            };
            return Ok(match store.add(&body)? {
                Outcome::Done(_) => {
                    println!("Note saved.");
                    ExitCode::SUCCESS
                }
                _ => rejected("No note entered. Aborting."),
            });
        }
        Commands::List { json } => {
            let notes = store.list()?;
            if json {
                render::write_json(&mut stdout, &notes)?;
            } else {
                render::write_notes(&mut stdout, &notes, "(No notes found)")?;
            }
        }
        Commands::Delete { number, yes } => {
            let len = store.len()?;
            if !(1..=len).contains(&number) {
                return Ok(out_of_range(number, len));
            }
            if !yes && !terminal(&store).confirm_delete(number)? {
                println!("Aborted.");
                return Ok(ExitCode::SUCCESS);
            }
            return Ok(match store.delete(number)? {
                Outcome::Done(_) => {
                    println!("Deleted.");
                    ExitCode::SUCCESS
                }
                Outcome::OutOfRange { index, len } => out_of_range(index, len),
                Outcome::EmptyBody => ExitCode::FAILURE,
            });
        }
        Commands::Edit { number, lines } => {
            let body = if lines.is_empty() {
                let old = match store.get(number)? {
                    Outcome::Done(old) => old,
                    Outcome::OutOfRange { index, len } => return Ok(out_of_range(index, len)),
                    Outcome::EmptyBody => return Ok(ExitCode::FAILURE),
                };
                eprintln!("Old ({}):", old.timestamp);
                for line in old.body_lines() {
                    eprintln!("\t{line}");
                }
                eprintln!("Type new note content (finish with empty line):");
                terminal(&store).read_body()?
            } else {
                lines.join("\n")
            };
            return Ok(match store.edit(number, &body)? {
                Outcome::Done(_) => {
                    println!("Note updated.");
                    ExitCode::SUCCESS
                }
                Outcome::EmptyBody => rejected("No change made."),
                Outcome::OutOfRange { index, len } => out_of_range(index, len),
            });
        }
        Commands::Search { keyword, json } => {
            let hits = store.search_listed(&keyword)?;
            if json {
                render::write_json(&mut stdout, &hits)?;
            } else {
                render::write_notes(&mut stdout, &hits, "(No matches found)")?;
            }
        }
        Commands::Clear { yes } => {
            if !yes && !terminal(&store).confirm_clear()? {
                println!("Aborted.");
                return Ok(ExitCode::SUCCESS);
            }
            store.clear()?;
            println!("All notes cleared.");
        }
        Commands::DataDir => return data_dir(),
        Commands::Config { action } => return run_config(action, store.path()),
    }
    Ok(ExitCode::SUCCESS)
}

fn rejected(message: &str) -> ExitCode {
    eprintln!("{message}");
    ExitCode::FAILURE
}

fn out_of_range(index: usize, len: usize) -> ExitCode {
    eprintln!("Invalid number {index}: there are {len} note(s).");
    ExitCode::FAILURE
}

fn data_dir() -> Result<ExitCode, CliError> {
    match app_data_dir() {
        Some(p) => {
            println!("{}", p.display());
            Ok(ExitCode::SUCCESS)
        }
        None => Err(ConfigError::NoDataDir.into()),
    }
}

fn run_config(action: ConfigCommand, notes_file: &Path) -> Result<ExitCode, CliError> {
    match action {
        ConfigCommand::Show => {
            match config_path() {
                Some(p) => println!("config:     {}", p.display()),
                None => println!("config:     (no app data directory)"),
            }
            println!("notes file: {}", notes_file.display());
        }
        ConfigCommand::SetFile { path } => {
            let stored = set_notes_file(&path)?;
            println!("Notes file set to {}", stored.display());
        }
    }
    Ok(ExitCode::SUCCESS)
}
