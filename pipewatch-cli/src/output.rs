//! Console output
//!
//! Rendering helpers shared by the commands, and the snapshot sink used
//! while watching.

use colored::*;
use pipewatch_core::classifier::{self, StatusClass};
use pipewatch_core::domain::job::{Job, JobId, JobSnapshot};
use pipewatch_core::domain::report::FirmReport;
use pipewatch_core::domain::status::JobStatus;
use pipewatch_engine::service::SnapshotSink;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Colorize job status for display
pub fn colorize_status(status: &JobStatus) -> ColoredString {
    let status_str = status.to_string();
    match status {
        JobStatus::Pending => status_str.yellow(),
        JobStatus::Running(_) => status_str.cyan(),
        JobStatus::Complete(_) => status_str.green(),
        JobStatus::Failed(_) => status_str.red(),
        JobStatus::Unknown(_) => status_str.dimmed(),
    }
}

/// Short label for how a status is polled
pub fn polling_label(status: &JobStatus) -> ColoredString {
    match classifier::classify(status) {
        StatusClass::Active => "in flight".cyan(),
        StatusClass::TerminalStable => "settled".green(),
        StatusClass::Idle => "not started".yellow(),
    }
}

/// Print a job summary line
pub fn print_job_summary(job: &Job) {
    println!(
        "  {} Job {} {}",
        "▸".cyan(),
        job.id.to_string().bold(),
        job.name.dimmed()
    );
    println!("    Status:   {}", colorize_status(&job.status));
    println!(
        "    Created:  {}",
        job.created_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}

/// Print detailed snapshot information
pub fn print_snapshot(snapshot: &JobSnapshot) {
    println!("{}", "Job Status:".bold());
    println!("  ID:       {}", snapshot.job_id.to_string().cyan());
    println!(
        "  Status:   {} ({})",
        colorize_status(&snapshot.status),
        polling_label(&snapshot.status)
    );
    println!(
        "  Fetched:  {}",
        snapshot.fetched_at.format("%Y-%m-%d %H:%M:%S")
    );

    if let Some(stage) = snapshot.status.startable_stage() {
        let hint = format!("pipewatch start {} {}", snapshot.job_id, stage);
        println!("  Next:     {}", hint.dimmed());
    }

    if !snapshot.payload.is_null() {
        println!("\n{}", "Details:".bold());
        match serde_json::to_string_pretty(&snapshot.payload) {
            Ok(pretty) => println!("{}", pretty),
            Err(_) => println!("{:?}", snapshot.payload),
        }
    }
}

/// Format a dollar amount rounded to whole dollars: `$1,234,568`
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{}${}", sign, group_thousands(rounded.unsigned_abs()))
}

/// Format a count with thousands separators: `12,500`
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Print a firm's insurance cost report
pub fn print_firm_report(report: &FirmReport) {
    let summary = &report.summary;

    println!("{}", report.firm_name.bold());
    if let Some(timestamp) = &report.timestamp {
        println!("  Researched: {}", timestamp.dimmed());
    }
    println!(
        "  Companies:  {} ({} with cost data)",
        summary.total_companies, summary.companies_with_data
    );
    println!("  Year:       {}", summary.most_recent_year);
    println!();

    for company in &report.companies {
        let year = match (company.has_data, company.data_year) {
            (true, Some(year)) => year.to_string().cyan(),
            _ => "No Data".dimmed(),
        };
        println!("  {} {} [{}]", "▸".cyan(), company.company_name.bold(), year);

        if !company.has_data {
            continue;
        }

        println!(
            "    Premiums: {}   Brokerage: {}   Covered: {}   Participants: {}",
            format_currency(company.total_premiums).green(),
            format_currency(company.total_brokerage_fees),
            group_thousands(company.total_people_covered),
            group_thousands(company.total_participants)
        );
        for plan in &company.plans {
            println!(
                "      {} - {}: {} premiums, {} brokerage, {} covered",
                plan.benefit_type,
                plan.carrier_name,
                format_currency(plan.premiums),
                format_currency(plan.brokerage_fees),
                group_thousands(plan.people_covered)
            );
        }
    }
}

/// Snapshot sink printing one line per status change
///
/// Repeated snapshots with an unchanged status are not printed again.
#[derive(Default)]
pub struct ConsoleSink {
    rendered: Mutex<HashMap<JobId, JobStatus>>,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotSink for ConsoleSink {
    fn apply_snapshot(&self, snapshot: &JobSnapshot) {
        let mut rendered = self.rendered.lock().unwrap_or_else(PoisonError::into_inner);
        if rendered.get(&snapshot.job_id) == Some(&snapshot.status) {
            return;
        }
        rendered.insert(snapshot.job_id, snapshot.status.clone());

        println!(
            "{} Job {} {}",
            snapshot
                .fetched_at
                .format("%H:%M:%S")
                .to_string()
                .dimmed(),
            snapshot.job_id.to_string().bold(),
            colorize_status(&snapshot.status)
        );
    }
}
