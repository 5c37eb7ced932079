use clap::ValueEnum;
use stayops_operations::operations::{ReservationOverview, RunResult};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Machine-readable JSON on stdout
    #[default]
    Json,
    /// Headline plus one line per step
    Text,
}

pub(crate) fn print_run(result: &RunResult, format: OutputFormat) -> Result<()> {
    println!("{}", render_run(result, format)?);
    Ok(())
}

pub(crate) fn print_overview(overview: &ReservationOverview, format: OutputFormat) -> Result<()> {
    println!("{}", render_overview(overview, format)?);
    Ok(())
}

fn render_run(result: &RunResult, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(result)?,
        OutputFormat::Text => result.summary(),
    })
}

fn render_overview(overview: &ReservationOverview, format: OutputFormat) -> Result<String> {
    if format == OutputFormat::Json {
        return Ok(serde_json::to_string_pretty(overview)?);
    }

    let res = &overview.reservation;
    let mut lines = vec![format!(
        "{} {} ({} to {}) paid {}/{}",
        res.id, res.status, res.check_in, res.check_out, res.paid_amount, res.total_amount
    )];
    if !res.notes.is_empty() {
        lines.push(format!("notes: {}", res.notes.replace('\n', " | ")));
    }
    lines.extend(overview.tasks.iter().map(|task| {
        format!(
            "task {} [{:?}] due {} assigned to {}",
            task.key, task.status, task.due_at, task.assignee_id
        )
    }));
    lines.extend(
        overview
            .transactions
            .iter()
            .map(|txn| format!("ledger {} {} ({})", txn.kind, txn.amount, txn.description)),
    );
    lines.extend(overview.audit_log.iter().map(|entry| {
        format!(
            "audit {} by {} at {}",
            entry.action, entry.actor_id, entry.timestamp
        )
    }));
    Ok(lines.join("\n"))
}
