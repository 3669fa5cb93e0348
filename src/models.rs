use serde::{Deserialize, Serialize};

/// An advertiser account as reported by the account-enumeration service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub account_id: i64,
    pub account_name: String,
    #[serde(default)]
    pub parent_customer_id: Option<i64>,
    #[serde(default)]
    pub number: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Aggregation {
    #[default]
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Aggregation {
    /// Name the reporting service expects for this granularity.
    pub fn service_name(&self) -> &'static str {
        match self {
            Self::Day => "Daily",
            Self::Week => "Weekly",
            Self::Month => "Monthly",
            Self::Quarter => "Quarterly",
            Self::Year => "Yearly",
        }
    }
}

/// Header plus positionally aligned rows.
///
/// An empty header means the source was not a recognizable report. A
/// non-empty header with no rows is a valid report with no activity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedReport {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ParsedReport {
    pub fn is_recognized(&self) -> bool {
        !self.header.is_empty()
    }

    pub fn has_rows(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }
}
