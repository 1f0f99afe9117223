//! Validate command - resolve every row of a feed file.

use std::io::{self, Write};
use std::path::PathBuf;

use serde_json::json;
use statguard::ingest::{load_rows, RowShapeError, StatRow};
use statguard::{BatchSummary, IntegrationFacade, StatRecord};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::common::{build_season, choose_season, OutputFormat};
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the validate command.
pub struct ValidateArgs {
    pub input: PathBuf,
    pub season_file: Option<PathBuf>,
    pub season_url: Option<String>,
    pub format: OutputFormat,
}

/// Run the validate command.
pub fn run(args: ValidateArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("validate");
    let config = runner.config();

    let (rows, rejected) = split_rows(load_rows(&args.input)?);
    for error in &rejected {
        warn!(%error, "Rejected feed row");
    }

    let season = build_season(&choose_season(
        args.season_file,
        args.season_url,
        &config.season,
    ))?;
    let facade = IntegrationFacade::new(config.validator.clone(), season)?;

    let cancel = CancellationToken::new();
    install_interrupt(cancel.clone())?;

    let outcome = runner.block_on(facade.validate_batch_until(&rows, cancel))?;
    let summary = facade.summarize(&outcome.records);

    let mut out = io::stdout().lock();
    match args.format {
        OutputFormat::Table => {
            write_table(&mut out, &outcome.records, &summary, &rejected)?;
            if outcome.cancelled {
                writeln!(
                    out,
                    "Cancelled after {} of {} rows",
                    outcome.records.len(),
                    rows.len()
                )
                .map_err(output_err)?;
            }
        }
        OutputFormat::Json => {
            let rejected: Vec<_> = rejected
                .iter()
                .map(|e| json!({"index": e.index(), "error": e.to_string()}))
                .collect();
            let document = json!({
                "records": outcome.records,
                "summary": summary,
                "rejected": rejected,
                "cancelled": outcome.cancelled,
            });
            serde_json::to_writer_pretty(&mut out, &document).map_err(output_err)?;
            writeln!(out).map_err(output_err)?;
        }
    }

    Ok(())
}

/// Cancel `token` on Ctrl-C. Only one handler may be installed per process.
fn install_interrupt(token: CancellationToken) -> Result<(), CliError> {
    ctrlc::set_handler(move || {
        eprintln!("Received interrupt, finishing rows in flight...");
        token.cancel();
    })
    .map_err(|e| CliError::Signal(e.to_string()))
}

/// Separate usable rows from rejected ones, keeping feed order in each.
fn split_rows(results: Vec<Result<StatRow, RowShapeError>>) -> (Vec<StatRow>, Vec<RowShapeError>) {
    let mut rows = Vec::with_capacity(results.len());
    let mut rejected = Vec::new();
    for result in results {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => rejected.push(e),
        }
    }
    (rows, rejected)
}

fn write_table<W: Write>(
    out: &mut W,
    records: &[StatRecord],
    summary: &BatchSummary,
    rejected: &[RowShapeError],
) -> Result<(), CliError> {
    writeln!(
        out,
        "{:<20} {:<10} {:>8} {:>8}  {:<15} {}",
        "KEY", "DATE", "RAW", "RESOLVED", "TIER", "QUALITY"
    )
    .map_err(output_err)?;

    for record in records {
        let raw = record
            .raw_average
            .map(|r| format!("{:.3}", r))
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "{:<20} {:<10} {:>8} {:>8.3}  {:<15} {}",
            record.key.as_str(),
            record.game_date.to_string(),
            raw,
            record.resolved_average,
            record.source_tier.label(),
            record.quality.label()
        )
        .map_err(output_err)?;
    }

    writeln!(out).map_err(output_err)?;
    writeln!(out, "{}", summary).map_err(output_err)?;

    if !rejected.is_empty() {
        writeln!(out, "{} rows rejected:", rejected.len()).map_err(output_err)?;
        for error in rejected {
            writeln!(out, "  {}", error).map_err(output_err)?;
        }
    }
    Ok(())
}

fn output_err(e: impl std::fmt::Display) -> CliError {
    CliError::Output(e.to_string())
}
