use comfy_table::{presets::UTF8_FULL, Cell, Table};

use crate::merger::{AccountOutcome, MergeOutcome};
use crate::models::{Account, ParsedReport};

pub fn accounts_table(accounts: &[Account]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "Account Name", "Account ID", "Customer ID", "Account Number"]);
    for (idx, a) in accounts.iter().enumerate() {
        table.add_row(vec![
            Cell::new(idx + 1),
            Cell::new(&a.account_name),
            Cell::new(a.account_id),
            Cell::new(a.parent_customer_id.map(|id| id.to_string()).unwrap_or_default()),
            Cell::new(a.number.as_deref().unwrap_or("")),
        ]);
    }
    table
}

pub fn report_table(report: &ParsedReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(&report.header);
    for row in &report.rows {
        table.add_row(row);
    }
    table
}

pub fn merge_summary(outcome: &MergeOutcome) -> String {
    let mut lines = Vec::with_capacity(outcome.accounts.len() + 1);
    for a in &outcome.accounts {
        match &a.outcome {
            AccountOutcome::Merged { rows } => {
                lines.push(format!("  - {rows} rows added from {} ({})", a.account_name, a.account_id))
            }
            AccountOutcome::Skipped(reason) => lines.push(format!(
                "  x - {} ({}) skipped: {reason}",
                a.account_name, a.account_id
            )),
        }
    }
    lines.push(format!(
        "{} of {} account(s) merged, {} skipped, {} rows",
        outcome.merged_count(),
        outcome.accounts.len(),
        outcome.skipped().count(),
        outcome.rows_written
    ));
    lines.join("\n")
}
