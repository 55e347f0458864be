//! Command-line shell over the application state

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;

use crate::app::{AddOutcome, ImportOutcome, JsonListApp};
use crate::core::store;

const EMPTY_FILE_NOTICE: &str = "The selected file is empty.";

#[derive(Parser, Debug)]
#[command(name = "jsonlist", version, about = "Pick entries from a JSON array file and append new ones")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of the platform default
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn level_filter(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

/// File argument shared by every command that imports a document.
#[derive(Args, Clone, Debug, Default)]
pub struct FileArgs {
    /// JSON file to import (defaults to the last imported file)
    #[arg(long, short)]
    pub file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the entries of a JSON array file
    Show {
        #[command(flatten)]
        file: FileArgs,
    },

    /// Print the selected entries as a JSON array of strings
    Print {
        #[command(flatten)]
        file: FileArgs,

        /// Indices of the entries to print (comma-separated)
        #[arg(long, short, value_delimiter = ',')]
        check: Vec<usize>,
    },

    /// Append a value to the file
    Add {
        #[command(flatten)]
        file: FileArgs,

        /// Value to add; parsed as JSON unless --raw is given
        #[arg(allow_hyphen_values = true)]
        value: String,

        /// Add the value as a plain string without JSON validation
        #[arg(long)]
        raw: bool,

        /// Add the value as a plain string if it is not valid JSON
        #[arg(long, short)]
        yes: bool,
    },

    /// Report whether a value would be accepted as JSON, without writing
    Probe {
        #[command(flatten)]
        file: FileArgs,

        /// Value to validate
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// List recently imported files
    Recent,
}

/// Run a command against the application, writing user-facing output to `out`
pub fn run(command: Command, app: &mut JsonListApp, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Show { file } => {
            let path = resolve_file(app, file)?;
            if app.import(path)? == ImportOutcome::Empty {
                writeln!(out, "{}", EMPTY_FILE_NOTICE)?;
                return Ok(());
            }

            let document = app.require_document()?;
            for (index, item) in document.items.iter().enumerate() {
                writeln!(out, "[{}] {}", index, item.label)?;
            }
        }
        Command::Print { file, check } => {
            let path = resolve_file(app, file)?;
            if app.import(path)? == ImportOutcome::Empty {
                writeln!(out, "{}", EMPTY_FILE_NOTICE)?;
                return Ok(());
            }

            app.check(&check)?;
            let labels = app.print_checked()?;
            writeln!(out, "{}", serde_json::to_string(&labels)?)?;
        }
        Command::Add {
            file,
            value,
            raw,
            yes,
        } => {
            let path = resolve_file(app, file)?;
            if app.import(path.clone())? == ImportOutcome::Empty {
                bail!("{}: {}", EMPTY_FILE_NOTICE, path.display());
            }

            let mut outcome = if raw {
                app.add_raw(&value)?
            } else {
                app.add(&value)?
            };

            if outcome == AddOutcome::InvalidFormat {
                if !yes {
                    bail!(
                        "value is not valid JSON: {}\n  hint: pass --yes to add it as a plain string",
                        value
                    );
                }
                outcome = app.add_raw(&value)?;
            }

            match outcome {
                AddOutcome::Added { index } => writeln!(out, "[{}] {}", index, value)?,
                AddOutcome::Ignored => writeln!(out, "Nothing to add")?,
                AddOutcome::InvalidFormat => {}
            }
        }
        Command::Probe { file, value } => {
            let path = resolve_file(app, file)?;
            let valid = store::try_parse_as_json(&path, &value)
                .with_context(|| format!("Failed to probe {}", path.display()))?;
            if valid {
                writeln!(out, "valid JSON")?;
            } else {
                writeln!(out, "invalid format: would be added as a plain string")?;
            }
        }
        Command::Recent => {
            for path in &app.config.recent_files {
                writeln!(out, "{}", path.display())?;
            }
        }
    }

    Ok(())
}

fn resolve_file(app: &JsonListApp, args: FileArgs) -> Result<PathBuf> {
    args.file
        .or_else(|| app.config.last_file.clone())
        .ok_or_else(|| anyhow!("no file given and none imported before\n  hint: pass --file <PATH>"))
}
