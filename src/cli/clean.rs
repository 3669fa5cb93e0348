use std::path::{Path, PathBuf};

use crate::derive::{derive, DeriveOptions};
use crate::error::{MsarError, Result};
use crate::extract::parse_extract;
use crate::settings::shellexpand_path;
use crate::writer::write_report;

pub fn default_clean_path(raw: &Path) -> PathBuf {
    let stem = raw
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "report".to_string());
    let stem = stem.strip_suffix("_RAW").unwrap_or(&stem);
    raw.with_file_name(format!("{stem}_CLEAN.csv"))
}

pub fn run(
    file: &str,
    mac: bool,
    drop_columns: Vec<String>,
    output: Option<String>,
    remove_raw: bool,
) -> Result<()> {
    let raw = PathBuf::from(shellexpand_path(file));
    let report = parse_extract(&raw)?;
    if !report.is_recognized() {
        return Err(MsarError::NoData(format!(
            "{} is not a recognized campaign performance report",
            raw.display()
        )));
    }

    let options = DeriveOptions {
        extract_mac: mac,
        drop_columns,
    };
    let cleaned = derive(&report, &options);

    let clean_path = output
        .map(|p| PathBuf::from(shellexpand_path(&p)))
        .unwrap_or_else(|| default_clean_path(&raw));
    if clean_path == raw {
        return Err(MsarError::Other(
            "output path must differ from the input file".to_string(),
        ));
    }
    write_report(&clean_path, &cleaned)?;

    if remove_raw {
        std::fs::remove_file(&raw)?;
        println!("Removed {}", raw.display());
    }
    println!(
        "Cleaned report saved to {} ({} rows)",
        clean_path.display(),
        cleaned.rows.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clean_path() {
        assert_eq!(
            default_clean_path(Path::new("/out/run_20240101_000000_RAW.csv")),
            PathBuf::from("/out/run_20240101_000000_CLEAN.csv")
        );
        assert_eq!(
            default_clean_path(Path::new("/out/export.csv")),
            PathBuf::from("/out/export_CLEAN.csv")
        );
    }

    #[test]
    fn test_clean_writes_derived_file() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("export.csv");
        std::fs::write(
            &raw,
            "\"Report Name: x\"\nTimePeriod,CampaignName\n2024-01-01,A: B:TAG7\n\u{a9}2024 Microsoft Corporation\n",
        )
        .unwrap();

        run(raw.to_str().unwrap(), true, vec![], None, false).unwrap();

        let content = std::fs::read_to_string(dir.path().join("export_CLEAN.csv")).unwrap();
        assert_eq!(content, "TimePeriod,CampaignName,MAC\n2024-01-01,A: B:TAG7,TAG7\n");
        assert!(raw.exists());
    }

    #[test]
    fn test_clean_remove_raw() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("export.csv");
        std::fs::write(&raw, "TimePeriod,Clicks\n2024-01-01,3\n").unwrap();
        run(raw.to_str().unwrap(), false, vec![], None, true).unwrap();
        assert!(!raw.exists());
        assert!(dir.path().join("export_CLEAN.csv").exists());
    }

    #[test]
    fn test_clean_rejects_unrecognized() {
        let dir = tempfile::tempdir().unwrap();
        let raw = dir.path().join("other.csv");
        std::fs::write(&raw, "Date,Amount\n2024-01-01,3\n").unwrap();
        let err = run(raw.to_str().unwrap(), false, vec![], None, false);
        assert!(matches!(err, Err(MsarError::NoData(_))));
        assert!(!dir.path().join("other_CLEAN.csv").exists());
    }
}
