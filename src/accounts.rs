use std::path::Path;

use tracing::warn;

use crate::error::{MsarError, Result};
use crate::models::Account;

/// Read the account list written by the account-enumeration step.
pub fn load_accounts(path: &Path) -> Result<Vec<Account>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        MsarError::Settings(format!("cannot read accounts file {}: {e}", path.display()))
    })?;
    let accounts: Vec<Account> = serde_json::from_str(&content)?;
    if accounts.is_empty() {
        return Err(MsarError::NoAccounts(path.display().to_string()));
    }
    Ok(accounts)
}

/// Resolve an `--account` argument: `all`, or a single account id. Anything
/// that does not name a known account falls back to every account.
pub fn select_accounts(accounts: &[Account], selector: &str) -> Vec<Account> {
    let selector = selector.trim().to_lowercase();
    if selector == "all" {
        return accounts.to_vec();
    }
    match selector.parse::<i64>() {
        Ok(id) => {
            let matched: Vec<Account> = accounts
                .iter()
                .filter(|a| a.account_id == id)
                .cloned()
                .collect();
            if matched.is_empty() {
                warn!(account_id = id, "no account with this id, defaulting to all");
                accounts.to_vec()
            } else {
                matched
            }
        }
        Err(_) => {
            warn!(selector = %selector, "invalid account argument, defaulting to all");
            accounts.to_vec()
        }
    }
}

/// Resolve an interactive answer: `all`/`a`, or a 1-based row number from
/// the accounts table. `None` means the answer should be asked again.
pub fn select_by_answer(accounts: &[Account], answer: &str) -> Option<Vec<Account>> {
    let answer = answer.trim().to_lowercase();
    if answer == "all" || answer == "a" {
        return Some(accounts.to_vec());
    }
    let idx: usize = answer.parse().ok()?;
    if (1..=accounts.len()).contains(&idx) {
        Some(vec![accounts[idx - 1].clone()])
    } else {
        None
    }
}
