use crate::extract::HEADER_SENTINEL;
use crate::models::ParsedReport;

pub const CAMPAIGN_NAME_COLUMN: &str = "CampaignName";
pub const MAC_COLUMN: &str = "MAC";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeriveOptions {
    /// Append a `MAC` column parsed from `CampaignName`.
    pub extract_mac: bool,
    /// Columns to remove from the cleaned output, matched by exact name.
    pub drop_columns: Vec<String>,
}

/// Marketing-attribution code: the trimmed text after the last colon.
pub fn extract_mac(campaign_name: &str) -> String {
    campaign_name
        .rsplit_once(':')
        .map(|(_, tail)| tail.trim().to_string())
        .unwrap_or_default()
}

/// Build the cleaned dataset. Inputs are never modified; derived columns
/// are always appended after the kept source columns.
pub fn derive(report: &ParsedReport, options: &DeriveOptions) -> ParsedReport {
    let mac_idx = if options.extract_mac {
        report.column_index(CAMPAIGN_NAME_COLUMN)
    } else {
        None
    };

    // The time-period column is never dropped, and a MAC column left by an
    // earlier pass is replaced rather than repeated.
    let keep: Vec<usize> = (0..report.header.len())
        .filter(|&i| {
            let name = &report.header[i];
            name == HEADER_SENTINEL || !options.drop_columns.contains(name)
        })
        .filter(|&i| mac_idx.is_none() || report.header[i] != MAC_COLUMN)
        .collect();

    let mut header: Vec<String> = keep.iter().map(|&i| report.header[i].clone()).collect();
    if mac_idx.is_some() {
        header.push(MAC_COLUMN.to_string());
    }

    let rows = report
        .rows
        .iter()
        .map(|row| {
            let mut out: Vec<String> = keep.iter().map(|&i| row[i].clone()).collect();
            if let Some(idx) = mac_idx {
                out.push(extract_mac(&row[idx]));
            }
            out
        })
        .collect();

    ParsedReport { header, rows }
}
