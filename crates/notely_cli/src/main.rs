//! Command-line front end over `notely_core`.
//!
//! # Responsibility
//! - Drive the note store, PIN gate and export adapter from a terminal.
//! - Keep output plain (or JSON with `--json`) for scripting.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use notely_core::service::note_access::{
    list_summaries, open_note, unlock_note, NoteAccess, UnlockOutcome,
};
use notely_core::text::{relative_time_label, word_count};
use notely_core::{
    find_template, init_logging_from_config, CoreConfig, ExportAdapter, ExportFormat,
    KeyringSecretStore, NoShareSurface, Note, NoteDraft, NoteId, NoteStore, PinGate, TEMPLATES,
};
use std::io::{self, Read};
use std::path::PathBuf;

const KEYRING_SERVICE: &str = "notely";

#[derive(Parser)]
#[command(name = "notely", about = "Notely local notes", version)]
struct Cli {
    /// Database file (defaults to NOTELY_DB_PATH or the temp dir)
    #[arg(long, global = true, env = "NOTELY_DB_PATH")]
    db: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List notes, newest first
    List,
    Search {
        query: String,
    },
    /// Print one note; locked notes need --pin
    Show {
        id: NoteId,
        #[arg(long)]
        pin: Option<String>,
    },
    New {
        #[arg(short, long, default_value = "")]
        title: String,
        /// Note body; `-` reads stdin
        #[arg(short, long)]
        content: Option<String>,
        /// Start from a built-in template
        #[arg(long, conflicts_with = "content")]
        template: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    Delete {
        id: NoteId,
    },
    Duplicate {
        id: NoteId,
    },
    /// Distinct tags in use
    Tags,
    /// Write a note as txt, md or html into the export directory
    Export {
        id: NoteId,
        #[arg(short, long, default_value = "md")]
        format: String,
        #[arg(long)]
        pin: Option<String>,
    },
    Templates,
    Pin {
        #[command(subcommand)]
        action: PinAction,
    },
    /// Delete every note
    Reset {
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum PinAction {
    Set { pin: String },
    Verify { pin: String },
    Clear,
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = CoreConfig::from_env();
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }
    if let Err(err) = init_logging_from_config(&config) {
        eprintln!("logging disabled: {err}");
    }

    let mut store = NoteStore::from_config(&config);
    if !store.initialize() {
        bail!("could not open database at {}", config.db_path.display());
    }
    let gate = PinGate::new(KeyringSecretStore::new(KEYRING_SERVICE));

    match cli.command {
        Commands::List => print_summaries(&mut store, "", cli.json),
        Commands::Search { query } => print_summaries(&mut store, &query, cli.json),
        Commands::Show { id, pin } => {
            let note = reveal(&mut store, &gate, id, pin.as_deref())?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&note)?);
            } else {
                println!("# {}", note.title);
                if !note.tags.is_empty() {
                    println!("tags: {}", note.tags.join(", "));
                }
                println!("words: {}\n", word_count(&note.content));
                println!("{}", note.content);
            }
            Ok(())
        }
        Commands::New {
            title,
            content,
            template,
            tags,
        } => {
            let draft = match template {
                Some(name) => {
                    let template = find_template(&name)
                        .ok_or_else(|| anyhow!("unknown template `{name}`"))?;
                    NoteDraft::new(template.name, template.content)
                }
                None => NoteDraft::new(title, read_content(content)?),
            }
            .with_tags(tags);
            let id = store
                .create(&draft)
                .ok_or_else(|| anyhow!("Failed to save"))?;
            println!("{id}");
            Ok(())
        }
        Commands::Delete { id } => {
            if !store.delete(id) {
                bail!("failed to delete note {id}");
            }
            Ok(())
        }
        Commands::Duplicate { id } => {
            let copy = store
                .duplicate(id)
                .ok_or_else(|| anyhow!("failed to duplicate note {id}"))?;
            println!("{copy}");
            Ok(())
        }
        Commands::Tags => {
            let tags = store.list_tags();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&tags)?);
            } else {
                tags.iter().for_each(|tag| println!("{tag}"));
            }
            Ok(())
        }
        Commands::Export { id, format, pin } => {
            let format = ExportFormat::from_name(&format)
                .ok_or_else(|| anyhow!("unknown export format `{format}`"))?;
            let note = reveal(&mut store, &gate, id, pin.as_deref())?;
            let adapter = ExportAdapter::new(config.export_dir.clone(), NoShareSurface);
            let outcome = adapter.export(&note.title, &note.content, format);
            if !outcome.is_success() {
                bail!(outcome.message());
            }
            println!("{}", outcome.message());
            Ok(())
        }
        Commands::Templates => {
            for template in TEMPLATES {
                println!("{} {}", template.icon, template.name);
            }
            Ok(())
        }
        Commands::Pin { action } => run_pin(&gate, action),
        Commands::Reset { yes } => {
            if !yes {
                bail!("refusing to delete all notes without --yes");
            }
            if !store.reset() {
                bail!("failed to reset database");
            }
            Ok(())
        }
    }
}

fn run_pin(gate: &PinGate<KeyringSecretStore>, action: PinAction) -> Result<()> {
    match action {
        PinAction::Set { pin } => {
            if !gate.set_pin(&pin) {
                bail!("Failed to set PIN");
            }
            println!("PIN set");
        }
        PinAction::Verify { pin } => {
            if !gate.verify_pin(&pin) {
                bail!("Incorrect PIN");
            }
            println!("PIN ok");
        }
        PinAction::Clear => {
            if !gate.clear_pin() {
                bail!("failed to clear PIN");
            }
            println!("PIN cleared");
        }
        PinAction::Status => {
            let status = if gate.is_pin_configured() {
                "configured"
            } else {
                "not set"
            };
            println!("{status}");
        }
    }
    Ok(())
}

fn reveal(
    store: &mut NoteStore,
    gate: &PinGate<KeyringSecretStore>,
    id: NoteId,
    pin: Option<&str>,
) -> Result<Note> {
    match open_note(store, id) {
        NoteAccess::Open(note) => Ok(note),
        NoteAccess::Missing => bail!("note {id} not found"),
        NoteAccess::Locked(_) => {
            let pin = pin.context("note is locked; pass --pin")?;
            match unlock_note(store, gate, id, pin) {
                UnlockOutcome::Revealed(note) => Ok(note),
                UnlockOutcome::IncorrectPin => bail!("Incorrect PIN"),
                UnlockOutcome::Missing => bail!("note {id} not found"),
                UnlockOutcome::Failed => bail!("Failed to save"),
            }
        }
    }
}

fn read_content(content: Option<String>) -> Result<String> {
    match content {
        Some(text) if text == "-" => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            Ok(buffer)
        }
        Some(text) => Ok(text),
        None => Ok(String::new()),
    }
}

fn print_summaries(store: &mut NoteStore, query: &str, json: bool) -> Result<()> {
    let summaries = list_summaries(store, query);
    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }
    if summaries.is_empty() {
        println!(
            "{}",
            if query.trim().is_empty() {
                "No notes yet"
            } else {
                "No notes found"
            }
        );
        return Ok(());
    }
    let now = notely_core::repo::note_repo::now_epoch_ms();
    for summary in summaries {
        let lock = if summary.is_locked { " [locked]" } else { "" };
        println!(
            "{:>5}  {}{}  ({})",
            summary.id,
            summary.display_title,
            lock,
            relative_time_label(summary.updated_at, now)
        );
    }
    Ok(())
}
