use std::collections::HashSet;
use std::path::Path;

use crate::error::Result;
use crate::models::ParsedReport;

/// Leading token of the header row's first field.
pub const HEADER_SENTINEL: &str = "TimePeriod";

/// Copyright boilerplate that marks the end of the data section.
pub const FOOTER_SENTINEL: &str = "Microsoft Corporation";

// Mis-decoded byte sequences seen in downloaded extracts, with their repairs.
const ENCODING_ARTIFACTS: &[(&str, &str)] = &[
    ("\u{feff}", ""),
    // UTF-8 BOM read as Mac Roman
    ("\u{d4}\u{aa}\u{f8}", ""),
    // UTF-8 BOM read as Windows-1252
    ("\u{ef}\u{bb}\u{bf}", ""),
    // UTF-8 euro sign read as Windows-1252
    ("\u{e2}\u{201a}\u{ac}", "\u{20ac}"),
];

pub fn repair_encoding(content: &str) -> String {
    ENCODING_ARTIFACTS
        .iter()
        .fold(content.to_string(), |acc, (bad, good)| acc.replace(bad, good))
}

fn is_blank(fields: &[String]) -> bool {
    fields.iter().all(|f| f.is_empty())
}

fn is_footer(fields: &[String]) -> bool {
    fields.join(" ").contains(FOOTER_SENTINEL)
}

fn is_header(fields: &[String]) -> bool {
    fields
        .first()
        .is_some_and(|f| f.starts_with(HEADER_SENTINEL))
}

fn has_unique_names(header: &[String]) -> bool {
    let mut seen = HashSet::new();
    header.iter().all(|h| seen.insert(h.as_str()))
}

/// Parse one raw extract file. Only I/O failures are errors; content that
/// is not a recognizable report yields an empty `ParsedReport`.
pub fn parse_extract(file_path: &Path) -> Result<ParsedReport> {
    let bytes = std::fs::read(file_path)?;
    Ok(parse_extract_str(&String::from_utf8_lossy(&bytes)))
}

pub fn parse_extract_str(content: &str) -> ParsedReport {
    let content = repair_encoding(content);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for result in rdr.records() {
        let Ok(record) = result else { continue };
        let fields: Vec<String> = record.iter().map(|f| f.trim().to_string()).collect();
        if is_blank(&fields) {
            continue;
        }
        match &header {
            None => {
                if is_header(&fields) {
                    header = Some(fields);
                }
            }
            Some(h) => {
                if is_footer(&fields) {
                    break;
                }
                // Rows that do not line up with the header are dropped, not padded.
                if fields.len() == h.len() {
                    rows.push(fields);
                }
            }
        }
    }

    match header {
        Some(header) if has_unique_names(&header) => ParsedReport { header, rows },
        _ => ParsedReport::default(),
    }
}
