#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a match over the referee's text protocol.
//!
//! The layout block is read once, then every turn block is folded into a
//! snapshot, decided by the turn engine and answered with exactly one move.
//! Diagnostics go to standard error so standard output stays reserved for
//! commands.

mod protocol;

use std::{
    fs::{File, OpenOptions},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use royale_core::Move;
use royale_system_turn_engine::TurnEngine;
use royale_world::MatchContext;
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::protocol::ProtocolReader;

/// Command-line options for the bot.
#[derive(Debug, Parser)]
#[command(name = "royale", version, about = "Queen decision engine for the royale arena")]
struct CliArgs {
    /// Reads a recorded match from this file instead of standard input.
    #[arg(long, value_name = "PATH")]
    input: Option<PathBuf>,
    /// Appends one JSON line per decided move to this file.
    #[arg(long, value_name = "PATH")]
    journal: Option<PathBuf>,
    /// Tracing filter directive. Falls back to `RUST_LOG`, then `info`.
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

/// One decided turn as recorded in the journal.
#[derive(Debug, Serialize)]
struct JournalEntry<'a> {
    turn: u32,
    gold: u32,
    income: u32,
    enemy_gold: u32,
    enemy_income: u32,
    decided: &'a Move,
}

/// Entry point for the royale command-line interface.
fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log.as_deref())?;

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open match input {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(io::stdin().lock()),
    };
    let journal = args
        .journal
        .as_ref()
        .map(|path| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map(BufWriter::new)
                .with_context(|| format!("failed to open journal {}", path.display()))
        })
        .transpose()?;

    play(input, io::stdout().lock(), journal)
}

fn init_tracing(directive: Option<&str>) -> Result<()> {
    let filter = match directive {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter {directive:?}"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .try_init()
        .context("failed to install tracing subscriber")
}

/// Runs the turn loop until the referee closes the input stream.
fn play<R, W, J>(input: R, mut output: W, mut journal: Option<J>) -> Result<()>
where
    R: BufRead,
    W: Write,
    J: Write,
{
    let mut reader = ProtocolReader::new(input);
    let layout = reader.read_sites().context("failed to read site layout")?;
    let mut context = MatchContext::new(layout);
    let site_count = context.site_count();
    let engine = TurnEngine::new();
    info!(sites = site_count, "match started");

    let mut turn: u32 = 0;
    loop {
        let Some(input) = reader
            .read_turn(site_count)
            .with_context(|| format!("failed to read turn {}", turn + 1))?
        else {
            info!(turns = turn, "referee closed the input");
            return Ok(());
        };
        turn += 1;

        let snapshot = context
            .begin_turn(input)
            .with_context(|| format!("turn {turn} is inconsistent with the layout"))?;
        let decided = engine.decide(&snapshot);
        debug!(turn, ?decided, "move decided");

        writeln!(output, "{}", protocol::encode(&decided)).context("failed to write move")?;
        output.flush().context("failed to flush move")?;

        if let Some(journal) = journal.as_mut() {
            let entry = JournalEntry {
                turn,
                gold: snapshot.gold(),
                income: snapshot.income(),
                enemy_gold: snapshot.enemy_gold(),
                enemy_income: snapshot.enemy_income(),
                decided: &decided,
            };
            serde_json::to_writer(&mut *journal, &entry).context("failed to encode journal entry")?;
            writeln!(journal).context("failed to write journal entry")?;
            journal.flush().context("failed to flush journal")?;
        }
    }
}
