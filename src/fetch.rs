use std::path::{Path, PathBuf};

use crate::error::{MsarError, Result};
use crate::request::ReportRequest;

/// Produces one account's raw report extract at `dest`.
///
/// Implementations block until the extract is on disk or the fetch has
/// failed. Callers treat any `Err` as "this account failed".
pub trait ReportFetcher {
    fn fetch(&self, request: &ReportRequest, dest: &Path) -> Result<()>;
}

/// Serves extracts that were already downloaded into a directory, one
/// `<account_id>.csv` per account.
pub struct DirectoryFetcher {
    source_dir: PathBuf,
}

impl DirectoryFetcher {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    fn source_for(&self, request: &ReportRequest) -> PathBuf {
        self.source_dir.join(format!("{}.csv", request.account_id))
    }
}

impl ReportFetcher for DirectoryFetcher {
    fn fetch(&self, request: &ReportRequest, dest: &Path) -> Result<()> {
        let source = self.source_for(request);
        if !source.is_file() {
            return Err(MsarError::Fetch(format!(
                "no extract for {} at {}",
                request.report_name,
                source.display()
            )));
        }
        std::fs::copy(&source, dest)
            .map_err(|e| MsarError::Fetch(format!("{}: {e}", source.display())))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Aggregation;
    use crate::request::RequestParams;
    use chrono::NaiveDate;

    fn request(account_id: i64) -> ReportRequest {
        let d = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let params = RequestParams::new(d, d, Aggregation::Day, true).unwrap();
        ReportRequest::for_account(account_id, &params)
    }

    #[test]
    fn test_directory_fetcher_copies_extract() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("77.csv"), "TimePeriod,Clicks\n").unwrap();
        let dest = dir.path().join("temp_77.csv");
        DirectoryFetcher::new(dir.path()).fetch(&request(77), &dest).unwrap();
        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "TimePeriod,Clicks\n");
    }

    #[test]
    fn test_directory_fetcher_missing_extract_is_fetch_error() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("temp_5.csv");
        let err = DirectoryFetcher::new(dir.path()).fetch(&request(5), &dest);
        assert!(matches!(err, Err(MsarError::Fetch(_))));
        assert!(!dest.exists());
    }
}
