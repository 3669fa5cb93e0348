use std::path::PathBuf;

use crate::accounts::load_accounts;
use crate::cli::display::accounts_table;
use crate::error::Result;
use crate::settings::{load_settings, shellexpand_path};

pub fn list(accounts_file: Option<String>) -> Result<()> {
    let path = accounts_file.unwrap_or_else(|| load_settings().accounts_file);
    let accounts = load_accounts(&PathBuf::from(shellexpand_path(&path)))?;
    println!("\nMicrosoft Ads - Managed Accounts\n{}", accounts_table(&accounts));
    Ok(())
}
