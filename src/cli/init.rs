use std::path::PathBuf;

use crate::error::Result;
use crate::settings::{load_settings, save_settings, shellexpand_path};

pub fn run(
    output_dir: Option<String>,
    accounts_file: Option<String>,
    extracts_dir: Option<String>,
) -> Result<()> {
    let mut settings = load_settings();
    if let Some(dir) = output_dir {
        settings.output_dir = shellexpand_path(&dir);
    }
    if let Some(path) = accounts_file {
        settings.accounts_file = shellexpand_path(&path);
    }
    if let Some(dir) = extracts_dir {
        settings.extracts_dir = shellexpand_path(&dir);
    }

    let path = save_settings(&settings)?;
    let out = PathBuf::from(&settings.output_dir);
    std::fs::create_dir_all(&out)?;

    println!("Settings saved to {}", path.display());
    println!("Reports will be written to {}", out.display());
    Ok(())
}
