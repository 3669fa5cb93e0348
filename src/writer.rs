use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::models::ParsedReport;

/// Which artifacts survive a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RetentionMode {
    /// Keep only the merged raw file.
    #[value(name = "exclude", alias = "raw-only")]
    #[serde(alias = "exclude")]
    RawOnly,
    /// Keep only the cleaned file; the raw file is removed.
    #[default]
    #[value(name = "only", alias = "clean-only")]
    #[serde(alias = "only")]
    CleanOnly,
    /// Keep both.
    #[value(name = "both")]
    Both,
}

impl RetentionMode {
    pub fn keeps_raw(&self) -> bool {
        matches!(self, Self::RawOnly | Self::Both)
    }

    pub fn writes_clean(&self) -> bool {
        matches!(self, Self::CleanOnly | Self::Both)
    }
}

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect()
}

/// Artifact paths for one run: `<base>_RAW.csv` and `<base>_CLEAN.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunPaths {
    out_dir: PathBuf,
    base_name: String,
}

impl RunPaths {
    /// Base name is `<prefix>_<YYYYMMDD_HHMMSS>`, with `-N` appended when an
    /// earlier run in the same second already used it.
    pub fn new(out_dir: &Path, prefix: &str, now: NaiveDateTime) -> Self {
        let prefix = sanitize_filename(prefix);
        let stamp = now.format("%Y%m%d_%H%M%S");
        let stem = format!("{prefix}_{stamp}");
        let mut paths = Self {
            out_dir: out_dir.to_path_buf(),
            base_name: stem.clone(),
        };
        let mut n = 2;
        while paths.raw_path().exists() || paths.clean_path().exists() {
            paths.base_name = format!("{stem}-{n}");
            n += 1;
        }
        paths
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    pub fn raw_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}_RAW.csv", self.base_name))
    }

    pub fn clean_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}_CLEAN.csv", self.base_name))
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

pub fn write_report(path: &Path, report: &ParsedReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(&report.header)?;
    for row in &report.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Apply the retention mode to a run whose merged raw file is already on
/// disk at `paths.raw_path()`. Returns the artifacts left behind.
///
/// The raw file is only removed after the cleaned file has been written.
pub fn finalize(paths: &RunPaths, cleaned: &ParsedReport, mode: RetentionMode) -> Result<Vec<PathBuf>> {
    let raw = paths.raw_path();
    let clean = paths.clean_path();
    let mut artifacts = Vec::new();

    if mode.keeps_raw() {
        if !raw.exists() {
            return Err(crate::error::MsarError::Other(format!(
                "merged file missing: {}",
                raw.display()
            )));
        }
        artifacts.push(raw.clone());
    }

    if mode.writes_clean() {
        write_report(&clean, cleaned)?;
        info!(path = %clean.display(), rows = cleaned.rows.len(), "cleaned report written");
        artifacts.push(clean);
    }

    if !mode.keeps_raw() {
        match std::fs::remove_file(&raw) {
            Ok(()) => info!(path = %raw.display(), "raw report removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }

    Ok(artifacts)
}
