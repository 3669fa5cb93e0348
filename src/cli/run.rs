use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use tracing::info;

use crate::accounts::{load_accounts, select_accounts, select_by_answer};
use crate::cli::display::{accounts_table, merge_summary, report_table};
use crate::cli::prompt::{ask, ask_date_range, Input};
use crate::cli::RunArgs;
use crate::derive::{derive, DeriveOptions};
use crate::error::Result;
use crate::extract::parse_extract;
use crate::fetch::DirectoryFetcher;
use crate::merger::BatchMerger;
use crate::models::Account;
use crate::request::{last_30_days, parse_report_date, RequestParams};
use crate::settings::{load_settings, shellexpand_path, Settings};
use crate::writer::{finalize, RunPaths};

/// Settings for one run after CLI flags are layered over the saved file.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub settings: Settings,
    pub drop_columns: Vec<String>,
}

impl RunConfig {
    pub fn resolve(mut settings: Settings, args: &RunArgs) -> Self {
        if let Some(dir) = &args.output_dir {
            settings.output_dir = dir.clone();
        }
        if let Some(path) = &args.accounts_file {
            settings.accounts_file = path.clone();
        }
        if let Some(dir) = &args.extracts_dir {
            settings.extracts_dir = dir.clone();
        }
        if let Some(mode) = args.clean {
            settings.retention = mode;
        }
        if let Some(agg) = args.aggregation {
            settings.aggregation = agg;
        }
        if args.mac {
            settings.extract_mac = true;
        }
        if args.no_campaign_type {
            settings.include_campaign_type = false;
        }
        Self {
            settings,
            drop_columns: args.drop_columns.clone(),
        }
    }

    fn output_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand_path(&self.settings.output_dir))
    }

    fn derive_options(&self) -> DeriveOptions {
        DeriveOptions {
            extract_mac: self.settings.extract_mac,
            drop_columns: self.drop_columns.clone(),
        }
    }
}

fn choose_accounts(accounts: &[Account], selector: Option<&str>) -> Result<Option<Vec<Account>>> {
    if let Some(sel) = selector {
        return Ok(Some(select_accounts(accounts, sel)));
    }
    loop {
        match ask("\nEnter the number of an account to run, or 'all' for all accounts: ")? {
            Input::Exit => return Ok(None),
            Input::Line(answer) => match select_by_answer(accounts, &answer) {
                Some(chosen) => return Ok(Some(chosen)),
                None => println!("Invalid selection. Please try again."),
            },
        }
    }
}

fn choose_dates(args: &RunArgs, today: NaiveDate) -> Result<Option<(NaiveDate, NaiveDate)>> {
    if args.last_30_days {
        return Ok(Some(last_30_days(today)));
    }
    match (&args.start, &args.end) {
        (Some(start), Some(end)) => Ok(Some((parse_report_date(start)?, parse_report_date(end)?))),
        (Some(start), None) => {
            let d = parse_report_date(start)?;
            Ok(Some((d, d)))
        }
        (None, Some(end)) => Ok(Some((today, parse_report_date(end)?))),
        (None, None) => ask_date_range(today),
    }
}

pub fn run(args: RunArgs) -> Result<()> {
    let config = RunConfig::resolve(load_settings(), &args);
    let settings = &config.settings;

    let accounts_path = PathBuf::from(shellexpand_path(&settings.accounts_file));
    let accounts = load_accounts(&accounts_path)?;
    println!("\nMicrosoft Ads - Managed Accounts\n{}", accounts_table(&accounts));

    let Some(selected) = choose_accounts(&accounts, args.account.as_deref())? else {
        println!("Exiting the program.");
        return Ok(());
    };

    let today = Local::now().date_naive();
    let Some((start, end)) = choose_dates(&args, today)? else {
        println!("Exiting the program.");
        return Ok(());
    };
    let params = RequestParams::new(start, end, settings.aggregation, settings.include_campaign_type)?;

    let out_dir = config.output_dir();
    std::fs::create_dir_all(&out_dir)?;
    let paths = RunPaths::new(&out_dir, &settings.file_prefix, Local::now().naive_local());

    println!(
        "\nRunning Campaign Performance report for {} account(s), {} to {}...\n",
        selected.len(),
        params.start_date(),
        params.end_date()
    );
    let fetcher = DirectoryFetcher::new(shellexpand_path(&settings.extracts_dir));
    let merger = BatchMerger::new(&fetcher, &out_dir);
    let outcome = merger.assemble(&selected, &params, &paths.raw_path())?;
    println!("{}", merge_summary(&outcome));

    let Some(raw_path) = outcome.path else {
        println!("No data returned for the selected range.");
        return Ok(());
    };

    let merged = parse_extract(&raw_path)?;
    let cleaned = derive(&merged, &config.derive_options());
    let artifacts = finalize(&paths, &cleaned, settings.retention)?;
    info!(base = paths.base_name(), artifacts = artifacts.len(), "run complete");

    for path in &artifacts {
        println!("Saved {}", path.display());
    }
    if args.auto {
        println!("{}", report_table(&cleaned));
    }

    println!("\nAll requested reports complete.");
    Ok(())
}
