//! Match-log summarizer for checkers engine self-play output.
//!
//! The engine emits one flat `path = value` line per fact: the run
//! configuration under `config.*` and each finished game's outcome and
//! search counters under `game.<id>.*`. This crate rebuilds that stream into
//! a nested record, reduces it to per-player win/draw/loss tallies and
//! per-game counter averages, and renders the fixed textual report used to
//! compare runs.
//!
//! Data flows strictly forward through the pipeline: raw lines → nested
//! record → accumulated totals → averaged summary → text. Any failure along
//! the way aborts the run before a single report byte is written.

pub mod record;
pub mod report;
pub mod summary;

pub use record::{ParseError, Record, Value, parse_log};
pub use report::{ConfigEcho, write_report};
pub use summary::{
    MatchSummary, MatchTotals, PlayerAverages, PlayerTotals, STAT_FIELDS, Side, TallyError,
};

use std::io::{BufRead, Write};
use thiserror::Error;

/// Any failure the pipeline can abort with.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Tally(#[from] TallyError),
    #[error("failed to write report: {0}")]
    Write(#[from] std::io::Error),
}

/// Run the whole pipeline: read a log to end of stream and write the report.
///
/// Tallying and averaging complete before the configuration echo is
/// extracted, so an empty log fails with [`TallyError::NoGames`] rather than
/// a complaint about missing config sections; nothing is written to `out`
/// unless every stage succeeded.
///
/// # Errors
///
/// Returns the first fatal error from any stage; partial reports are never
/// produced.
pub fn summarize<R: BufRead, W: Write>(input: R, out: W) -> Result<(), SummarizeError> {
    let root = parse_log(input)?;
    let summary = MatchTotals::tally(&root)?.into_averages()?;
    let echo = ConfigEcho::from_record(&root)?;
    write_report(out, &echo, &summary)?;
    Ok(())
}
