use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::info;
use std::io::{Write, stdout};
use std::path::{Path, PathBuf};

use sarkaz_core::{
    BannedOperator, BossOperation, BossOperationRecord, Collectible, Counter, EmergencyOperation,
    EmergencyOperationRecord, HiddenOperation, HiddenOperationRecord, KingsCollectible,
    Scorekeeper, ScoreRules, SessionAction, Squad, StorageError,
};
use sarkaz_desk::report::{summary_json, write_breakdown, write_catalog, write_session};
use sarkaz_desk::{FileStorage, read_json};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RecordList {
    /// Emergency operation records
    Emergency,
    /// Hidden operation records
    Hidden,
    /// Boss operation records
    Boss,
}

#[derive(Debug, Parser)]
#[command(name = "sarkaz-desk", version)]
#[command(about = "Score sheet for Sarkaz roguelike runs, kept in a JSON save file")]
struct Args {
    /// Session save file
    #[arg(long, global = true, default_value = sarkaz_core::DEFAULT_FILE_NAME)]
    file: PathBuf,

    /// Scoring rules override (JSON; missing fields use the standard values)
    #[arg(long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start a fresh session, overwriting the save file
    #[command(alias = "init")]
    New,
    /// Print the run and its settlement
    #[command(alias = "score")]
    Show {
        /// Print a JSON summary instead
        #[arg(long)]
        json: bool,
    },
    /// List every selectable catalog entry
    Catalog,
    /// Set the starting squad (omit to clear)
    Squad { squad: Option<Squad> },
    /// Set the starting collectible (omit to clear)
    Collectible { collectible: Option<Collectible> },
    /// Record a cleared emergency operation
    AddEmergency {
        operation: EmergencyOperation,
        #[arg(long)]
        perfect: bool,
        #[arg(long)]
        refresh: bool,
    },
    /// Replace an emergency record
    UpdateEmergency {
        index: usize,
        operation: EmergencyOperation,
        #[arg(long)]
        perfect: bool,
        #[arg(long)]
        refresh: bool,
    },
    /// Record a cleared hidden operation
    AddHidden {
        operation: HiddenOperation,
        #[arg(long)]
        emergency: bool,
        #[arg(long)]
        perfect: bool,
    },
    /// Replace a hidden record
    UpdateHidden {
        index: usize,
        operation: HiddenOperation,
        #[arg(long)]
        emergency: bool,
        #[arg(long)]
        perfect: bool,
    },
    /// Record a cleared boss operation
    AddBoss {
        operation: BossOperation,
        #[arg(long)]
        chaos: bool,
    },
    /// Remove a record by its index in `show`
    Remove {
        #[arg(value_enum)]
        list: RecordList,
        index: usize,
    },
    /// Flip the banned flag of an operator
    ToggleBan { operator: BannedOperator },
    /// Flip the owned flag of a kings collectible
    ToggleKing { collectible: KingsCollectible },
    /// Set a settlement counter from raw text
    Set { counter: Counter, text: String },
    /// Clear the session back to its defaults
    Reset,
}

impl Command {
    /// Refuse hidden records whose normal/emergency variant does not exist.
    fn check_hidden_variant(&self) -> Result<()> {
        let (operation, emergency) = match self {
            Self::AddHidden {
                operation,
                emergency,
                ..
            }
            | Self::UpdateHidden {
                operation,
                emergency,
                ..
            } => (*operation, *emergency),
            _ => return Ok(()),
        };
        if !operation.can_record(emergency) {
            let variant = if emergency { "emergency" } else { "normal" };
            bail!("{operation} has no {variant} variant");
        }
        Ok(())
    }

    fn into_action(self) -> Option<SessionAction> {
        let action = match self {
            Self::New | Self::Show { .. } | Self::Catalog => return None,
            Self::Squad { squad } => SessionAction::SetSquad { squad },
            Self::Collectible { collectible } => SessionAction::SetCollectible { collectible },
            Self::AddEmergency {
                operation,
                perfect,
                refresh,
            } => SessionAction::AddEmergencyRecord {
                record: EmergencyOperationRecord {
                    operation,
                    refresh,
                    perfect,
                },
            },
            Self::UpdateEmergency {
                index,
                operation,
                perfect,
                refresh,
            } => SessionAction::UpdateEmergencyRecord {
                index,
                record: EmergencyOperationRecord {
                    operation,
                    refresh,
                    perfect,
                },
            },
            Self::AddHidden {
                operation,
                emergency,
                perfect,
            } => SessionAction::AddHiddenRecord {
                record: HiddenOperationRecord {
                    operation,
                    emergency,
                    perfect,
                },
            },
            Self::UpdateHidden {
                index,
                operation,
                emergency,
                perfect,
            } => SessionAction::UpdateHiddenRecord {
                index,
                record: HiddenOperationRecord {
                    operation,
                    emergency,
                    perfect,
                },
            },
            Self::AddBoss { operation, chaos } => SessionAction::AddBossRecord {
                record: BossOperationRecord::new(operation, chaos),
            },
            Self::Remove { list, index } => match list {
                RecordList::Emergency => SessionAction::RemoveEmergencyRecord { index },
                RecordList::Hidden => SessionAction::RemoveHiddenRecord { index },
                RecordList::Boss => SessionAction::RemoveBossRecord { index },
            },
            Self::ToggleBan { operator } => SessionAction::ToggleBannedOperator { operator },
            Self::ToggleKing { collectible } => {
                SessionAction::ToggleKingsCollectible { collectible }
            }
            Self::Set { counter, text } => SessionAction::SetCounter { counter, text },
            Self::Reset => SessionAction::Reset,
        };
        Some(action)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let rules = load_rules(args.rules.as_deref()).await?;
    let mut keeper = Scorekeeper::with_rules(FileStorage::new(&args.file), rules);
    let file = keeper.storage().path().display().to_string();
    let mut out = stdout().lock();

    match args.command {
        Command::Catalog => {
            write_catalog(&mut out)?;
        }
        Command::New => {
            keeper
                .save()
                .await
                .with_context(|| format!("failed to write {file}"))?;
            writeln!(out, "{} {file}", "new session saved to".green())?;
        }
        Command::Show { json } => {
            load_existing(&mut keeper, &file).await?;
            if json {
                let summary = summary_json(keeper.session(), keeper.rules());
                writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
            } else {
                write_session(&mut out, keeper.session(), keeper.rules())?;
                write_breakdown(&mut out, keeper.session(), keeper.rules())?;
            }
        }
        command => {
            command.check_hidden_variant()?;
            let Some(action) = command.into_action() else {
                bail!("command does not change the session");
            };
            load_existing(&mut keeper, &file).await?;
            if keeper.apply(action) {
                keeper
                    .save()
                    .await
                    .with_context(|| format!("failed to write {file}"))?;
                writeln!(out, "{} {file}", "saved".green())?;
            } else {
                writeln!(out, "{}", "nothing changed".yellow())?;
            }
            write_breakdown(&mut out, keeper.session(), keeper.rules())?;
        }
    }
    out.flush()?;
    Ok(())
}

async fn load_rules(path: Option<&Path>) -> Result<ScoreRules> {
    let Some(path) = path else {
        return Ok(ScoreRules::default());
    };
    let content = read_json(path)
        .await
        .with_context(|| format!("failed to read rules from {}", path.display()))?;
    let rules = ScoreRules::from_json(&content)
        .with_context(|| format!("invalid rules in {}", path.display()))?;
    info!("scoring rules loaded from {}", path.display());
    Ok(rules)
}

/// Load the save file; a missing file leaves the fresh session in place.
async fn load_existing(keeper: &mut Scorekeeper<FileStorage>, file: &str) -> Result<()> {
    match keeper.load().await {
        Ok(()) => Ok(()),
        Err(StorageError::Unavailable(reason)) => {
            info!("starting a fresh session: {reason}");
            Ok(())
        }
        Err(err) => Err(err).with_context(|| format!("failed to load {file}")),
    }
}
