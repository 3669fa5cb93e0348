use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Result;
use crate::extract::parse_extract;
use crate::fetch::ReportFetcher;
use crate::models::{Account, ParsedReport};
use crate::request::{ReportRequest, RequestParams};

// ---------------------------------------------------------------------------
// Per-account outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    FetchFailed(String),
    MissingExtract,
    Unreadable(String),
    Unrecognized,
    NoActivity,
    HeaderMismatch,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FetchFailed(e) => write!(f, "download failed: {e}"),
            Self::MissingExtract => write!(f, "no file created"),
            Self::Unreadable(e) => write!(f, "extract unreadable: {e}"),
            Self::Unrecognized => write!(f, "invalid header, report format not recognized"),
            Self::NoActivity => write!(f, "no data rows"),
            Self::HeaderMismatch => write!(f, "header mismatch with earlier accounts"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AccountOutcome {
    Merged { rows: usize },
    Skipped(SkipReason),
}

#[derive(Debug, Clone)]
pub struct AccountResult {
    pub account_id: i64,
    pub account_name: String,
    pub outcome: AccountOutcome,
}

pub struct MergeOutcome {
    /// `None` when no account contributed data; no file is created then.
    pub path: Option<PathBuf>,
    pub rows_written: usize,
    pub accounts: Vec<AccountResult>,
}

impl MergeOutcome {
    pub fn merged_count(&self) -> usize {
        self.accounts
            .iter()
            .filter(|a| matches!(a.outcome, AccountOutcome::Merged { .. }))
            .count()
    }

    pub fn skipped(&self) -> impl Iterator<Item = &AccountResult> {
        self.accounts
            .iter()
            .filter(|a| matches!(a.outcome, AccountOutcome::Skipped(_)))
    }
}

// ---------------------------------------------------------------------------
// BatchMerger
// ---------------------------------------------------------------------------

/// Fetches each account in turn and appends its rows to one merged CSV.
///
/// Accounts are processed sequentially. Temp files are keyed by account id
/// inside `work_dir`, so only one run may use a given directory at a time.
pub struct BatchMerger<'a, F: ReportFetcher> {
    fetcher: &'a F,
    work_dir: PathBuf,
}

impl<'a, F: ReportFetcher> BatchMerger<'a, F> {
    pub fn new(fetcher: &'a F, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            work_dir: work_dir.into(),
        }
    }

    pub fn temp_path(&self, account_id: i64) -> PathBuf {
        self.work_dir.join(format!("temp_{account_id}.csv"))
    }

    pub fn assemble(
        &self,
        accounts: &[Account],
        params: &RequestParams,
        merged_path: &Path,
    ) -> Result<MergeOutcome> {
        std::fs::create_dir_all(&self.work_dir)?;

        let mut wtr: Option<csv::Writer<File>> = None;
        let mut header: Option<Vec<String>> = None;
        let mut rows_written = 0usize;
        let mut results = Vec::with_capacity(accounts.len());

        for account in accounts {
            let request = ReportRequest::for_account(account.account_id, params);
            info!(
                account_id = account.account_id,
                account_name = %account.account_name,
                "running report"
            );
            debug!(request = %request.describe(), "report request");
            let tmp_path = self.temp_path(account.account_id);

            let fetched = self.fetch_and_parse(&request, &tmp_path);
            remove_temp(&tmp_path);

            let outcome = match fetched {
                Err(reason) => AccountOutcome::Skipped(reason),
                Ok(report) => {
                    let mismatched = header.as_ref().is_some_and(|h| *h != report.header);
                    if mismatched {
                        AccountOutcome::Skipped(SkipReason::HeaderMismatch)
                    } else {
                        if wtr.is_none() {
                            let mut w = csv::Writer::from_path(merged_path)?;
                            w.write_record(&report.header)?;
                            wtr = Some(w);
                            header = Some(report.header.clone());
                        }
                        if let Some(w) = wtr.as_mut() {
                            for row in &report.rows {
                                w.write_record(row)?;
                            }
                            // Leaves a valid prefix on disk if the run stops here.
                            w.flush()?;
                        }
                        rows_written += report.rows.len();
                        AccountOutcome::Merged {
                            rows: report.rows.len(),
                        }
                    }
                }
            };

            match &outcome {
                AccountOutcome::Merged { rows } => info!(
                    account_id = account.account_id,
                    account_name = %account.account_name,
                    rows,
                    "rows added"
                ),
                AccountOutcome::Skipped(reason) => warn!(
                    account_id = account.account_id,
                    account_name = %account.account_name,
                    reason = %reason,
                    "skipping account"
                ),
            }

            results.push(AccountResult {
                account_id: account.account_id,
                account_name: account.account_name.clone(),
                outcome,
            });
        }

        let path = match wtr {
            Some(mut w) => {
                w.flush()?;
                Some(merged_path.to_path_buf())
            }
            None => None,
        };

        Ok(MergeOutcome {
            path,
            rows_written,
            accounts: results,
        })
    }

    fn fetch_and_parse(
        &self,
        request: &ReportRequest,
        tmp_path: &Path,
    ) -> std::result::Result<ParsedReport, SkipReason> {
        self.fetcher
            .fetch(request, tmp_path)
            .map_err(|e| SkipReason::FetchFailed(e.to_string()))?;

        let non_empty = std::fs::metadata(tmp_path).is_ok_and(|m| m.len() > 0);
        if !non_empty {
            return Err(SkipReason::MissingExtract);
        }

        let report =
            parse_extract(tmp_path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
        if !report.is_recognized() {
            return Err(SkipReason::Unrecognized);
        }
        if !report.has_rows() {
            return Err(SkipReason::NoActivity);
        }
        Ok(report)
    }
}

fn remove_temp(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!(path = %path.display(), "removed temp extract"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "could not remove temp extract"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use chrono::NaiveDate;

    use crate::error::MsarError;
    use crate::extract::parse_extract_str;
    use crate::models::Aggregation;

    /// Serves canned extract content per account; accounts without an entry fail.
    struct CannedFetcher {
        extracts: HashMap<i64, String>,
    }

    impl CannedFetcher {
        fn new(entries: &[(i64, &str)]) -> Self {
            Self {
                extracts: entries.iter().map(|(id, c)| (*id, c.to_string())).collect(),
            }
        }
    }

    impl ReportFetcher for CannedFetcher {
        fn fetch(&self, request: &ReportRequest, dest: &Path) -> Result<()> {
            match self.extracts.get(&request.account_id) {
                Some(content) => {
                    std::fs::write(dest, content)?;
                    Ok(())
                }
                None => Err(MsarError::Fetch("service unavailable".into())),
            }
        }
    }

    fn account(id: i64, name: &str) -> Account {
        Account {
            account_id: id,
            account_name: name.to_string(),
            parent_customer_id: None,
            number: None,
        }
    }

    fn params() -> RequestParams {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        RequestParams::new(d, d, Aggregation::Day, true).unwrap()
    }

    fn extract(id: i64, days: &[&str]) -> String {
        let mut s = String::from("\"Report Name: MSAR\"\n\nTimePeriod,AccountId,Clicks\n");
        for day in days {
            s.push_str(&format!("{day},{id},1\n"));
        }
        s.push_str("\u{a9}2024 Microsoft Corporation. All rights reserved.\n");
        s
    }

    #[test]
    fn test_partial_failure_is_contained() {
        let dir = tempfile::tempdir().unwrap();
        let a = extract(1, &["2024-01-01", "2024-01-02", "2024-01-03"]);
        let c = extract(3, &["2024-01-01", "2024-01-02"]);
        let fetcher = CannedFetcher::new(&[(1, a.as_str()), (3, c.as_str())]);
        let merger = BatchMerger::new(&fetcher, dir.path());
        let merged = dir.path().join("merged.csv");

        let accounts = [account(1, "A"), account(2, "B"), account(3, "C")];
        let outcome = merger.assemble(&accounts, &params(), &merged).unwrap();

        assert_eq!(outcome.path.as_deref(), Some(merged.as_path()));
        assert_eq!(outcome.rows_written, 5);
        assert_eq!(outcome.merged_count(), 2);
        let skipped: Vec<_> = outcome.skipped().collect();
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].account_id, 2);
        assert!(matches!(
            skipped[0].outcome,
            AccountOutcome::Skipped(SkipReason::FetchFailed(_))
        ));

        let report = parse_extract_str(&std::fs::read_to_string(&merged).unwrap());
        assert_eq!(report.rows.len(), 5);
    }

    #[test]
    fn test_rows_keep_account_then_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = extract(10, &["2024-01-02", "2024-01-01"]);
        let b = extract(20, &["2024-01-05"]);
        let fetcher = CannedFetcher::new(&[(10, a.as_str()), (20, b.as_str())]);
        let merger = BatchMerger::new(&fetcher, dir.path());
        let merged = dir.path().join("merged.csv");

        merger
            .assemble(&[account(20, "B"), account(10, "A")], &params(), &merged)
            .unwrap();

        let content = std::fs::read_to_string(&merged).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "TimePeriod,AccountId,Clicks",
                "2024-01-05,20,1",
                "2024-01-02,10,1",
                "2024-01-01,10,1",
            ]
        );
    }

    #[test]
    fn test_no_successful_accounts_creates_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = CannedFetcher::new(&[(1, "garbage,without,sentinel\n")]);
        let merger = BatchMerger::new(&fetcher, dir.path());
        let merged = dir.path().join("merged.csv");

        let outcome = merger
            .assemble(&[account(1, "A"), account(2, "B")], &params(), &merged)
            .unwrap();

        assert!(outcome.path.is_none());
        assert_eq!(outcome.rows_written, 0);
        assert!(!merged.exists());
    }

    #[test]
    fn test_skip_reasons_are_distinguished() {
        let dir = tempfile::tempdir().unwrap();
        let no_activity = extract(2, &[]);
        let fetcher = CannedFetcher::new(&[(1, ""), (2, no_activity.as_str()), (3, "Date,Clicks\n")]);
        let merger = BatchMerger::new(&fetcher, dir.path());
        let merged = dir.path().join("merged.csv");

        let outcome = merger
            .assemble(
                &[account(1, "Empty"), account(2, "Idle"), account(3, "Changed")],
                &params(),
                &merged,
            )
            .unwrap();

        let reasons: Vec<_> = outcome.accounts.iter().map(|a| a.outcome.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                AccountOutcome::Skipped(SkipReason::MissingExtract),
                AccountOutcome::Skipped(SkipReason::NoActivity),
                AccountOutcome::Skipped(SkipReason::Unrecognized),
            ]
        );
    }

    #[test]
    fn test_mismatched_header_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let a = extract(1, &["2024-01-01"]);
        let b = "TimePeriod,AccountId,Clicks,Spend\n2024-01-01,2,1,0.50\n";
        let fetcher = CannedFetcher::new(&[(1, a.as_str()), (2, b)]);
        let merger = BatchMerger::new(&fetcher, dir.path());
        let merged = dir.path().join("merged.csv");

        let outcome = merger
            .assemble(&[account(1, "A"), account(2, "B")], &params(), &merged)
            .unwrap();

        assert_eq!(outcome.rows_written, 1);
        assert_eq!(
            outcome.accounts[1].outcome,
            AccountOutcome::Skipped(SkipReason::HeaderMismatch)
        );
    }

    #[test]
    fn test_temp_files_always_removed() {
        let dir = tempfile::tempdir().unwrap();
        let a = extract(1, &["2024-01-01"]);
        let fetcher = CannedFetcher::new(&[(1, a.as_str()), (2, "no header here\n")]);
        let merger = BatchMerger::new(&fetcher, dir.path());
        let merged = dir.path().join("merged.csv");

        merger
            .assemble(&[account(1, "A"), account(2, "B"), account(3, "C")], &params(), &merged)
            .unwrap();

        for id in [1, 2, 3] {
            assert!(!merger.temp_path(id).exists());
        }
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("temp_"))
            .collect();
        assert!(leftovers.is_empty());
    }

    /// Reports success but leaves a directory where the extract file should be.
    struct DirectoryInPlaceFetcher {
        inner: CannedFetcher,
        broken: i64,
    }

    impl ReportFetcher for DirectoryInPlaceFetcher {
        fn fetch(&self, request: &ReportRequest, dest: &Path) -> Result<()> {
            if request.account_id == self.broken {
                std::fs::create_dir_all(dest)?;
                std::fs::write(dest.join("report.csv"), "TimePeriod\n")?;
                return Ok(());
            }
            self.inner.fetch(request, dest)
        }
    }

    #[test]
    fn test_unreadable_extract_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let a = extract(1, &["2024-01-01", "2024-01-02"]);
        let c = extract(3, &["2024-01-01"]);
        let fetcher = DirectoryInPlaceFetcher {
            inner: CannedFetcher::new(&[(1, a.as_str()), (3, c.as_str())]),
            broken: 2,
        };
        let merger = BatchMerger::new(&fetcher, dir.path());
        let merged = dir.path().join("merged.csv");

        let accounts = [account(1, "A"), account(2, "B"), account(3, "C")];
        let outcome = merger.assemble(&accounts, &params(), &merged).unwrap();

        assert!(matches!(
            outcome.accounts[1].outcome,
            AccountOutcome::Skipped(SkipReason::Unreadable(_))
        ));
        assert_eq!(outcome.merged_count(), 2);
        assert_eq!(outcome.rows_written, 3);
        let report = parse_extract_str(&std::fs::read_to_string(&merged).unwrap());
        assert_eq!(report.rows.len(), 3);
        std::fs::remove_dir_all(merger.temp_path(2)).unwrap();
    }

    #[test]
    fn test_skip_reason_messages() {
        assert_eq!(SkipReason::NoActivity.to_string(), "no data rows");
        assert!(SkipReason::Unrecognized.to_string().contains("not recognized"));
        assert!(SkipReason::FetchFailed("timeout".into()).to_string().contains("timeout"));
    }
}
