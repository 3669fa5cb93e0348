pub mod accounts;
pub mod clean;
pub mod display;
pub mod init;
pub mod prompt;
pub mod run;

use clap::{Args, Parser, Subcommand};

use crate::models::Aggregation;
use crate::writer::RetentionMode;

#[derive(Parser)]
#[command(
    name = "msar",
    version,
    about = "Merge Microsoft Advertising campaign performance reports across accounts."
)]
pub struct Cli {
    /// Log debug detail to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write settings: output directory, account list and extract locations.
    Init {
        /// Directory for merged and cleaned reports
        #[arg(long = "output-dir")]
        output_dir: Option<String>,
        /// JSON account list produced by account enumeration
        #[arg(long = "accounts-file")]
        accounts_file: Option<String>,
        /// Directory holding downloaded per-account extracts
        #[arg(long = "extracts-dir")]
        extracts_dir: Option<String>,
    },
    /// List the accounts available for reporting.
    Accounts {
        #[arg(long = "accounts-file")]
        accounts_file: Option<String>,
    },
    /// Run the campaign performance report for one or more accounts.
    Run(RunArgs),
    /// Clean an already downloaded extract or merged report.
    Clean {
        /// Path to the raw CSV
        file: String,
        /// Append a MAC column parsed from CampaignName
        #[arg(long)]
        mac: bool,
        /// Remove a column from the cleaned output (repeatable; TimePeriod is always kept)
        #[arg(long = "drop-column")]
        drop_columns: Vec<String>,
        /// Output path (default: <file stem>_CLEAN.csv next to the input)
        #[arg(long)]
        output: Option<String>,
        /// Delete the input file once the cleaned file is written
        #[arg(long = "remove-raw")]
        remove_raw: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Account id or 'all' (prompts when omitted)
    #[arg(long)]
    pub account: Option<String>,
    /// Start date: YYYY-MM-DD or YYYYMMDD
    #[arg(long)]
    pub start: Option<String>,
    /// End date: YYYY-MM-DD or YYYYMMDD
    #[arg(long)]
    pub end: Option<String>,
    /// Report the thirty days ending yesterday
    #[arg(long = "last-30-days", conflicts_with_all = ["start", "end"])]
    pub last_30_days: bool,
    /// Time period granularity
    #[arg(long, value_enum)]
    pub aggregation: Option<Aggregation>,
    /// 'both' keeps raw and cleaned files, 'exclude' keeps only raw, 'only' keeps only cleaned
    #[arg(long, value_enum)]
    pub clean: Option<RetentionMode>,
    /// Append a MAC column parsed from CampaignName
    #[arg(long)]
    pub mac: bool,
    /// Do not request the CampaignType column
    #[arg(long = "no-campaign-type")]
    pub no_campaign_type: bool,
    /// Remove a column from the cleaned output (repeatable; TimePeriod is always kept)
    #[arg(long = "drop-column")]
    pub drop_columns: Vec<String>,
    /// Print the final dataset as a table without prompting
    #[arg(long)]
    pub auto: bool,
    #[arg(long = "output-dir")]
    pub output_dir: Option<String>,
    #[arg(long = "accounts-file")]
    pub accounts_file: Option<String>,
    #[arg(long = "extracts-dir")]
    pub extracts_dir: Option<String>,
}
