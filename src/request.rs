use chrono::{Duration, NaiveDate};

use crate::error::{MsarError, Result};
use crate::models::Aggregation;

pub const REPORT_TIME_ZONE: &str = "PacificTimeUSCanadaTijuana";
pub const REPORT_FORMAT: &str = "Csv";

const SUPPORTED_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

pub fn parse_report_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    SUPPORTED_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| MsarError::InvalidDate(raw.to_string()))
}

/// The thirty days ending yesterday.
pub fn last_30_days(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    (today - Duration::days(30), today - Duration::days(1))
}

// ---------------------------------------------------------------------------
// Request parameters shared by every account in a run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct RequestParams {
    start_date: NaiveDate,
    end_date: NaiveDate,
    pub aggregation: Aggregation,
    pub include_campaign_type: bool,
}

impl RequestParams {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        aggregation: Aggregation,
        include_campaign_type: bool,
    ) -> Result<Self> {
        if start_date > end_date {
            return Err(MsarError::InvalidDateRange {
                start: start_date.to_string(),
                end: end_date.to_string(),
            });
        }
        Ok(Self {
            start_date,
            end_date,
            aggregation,
            include_campaign_type,
        })
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn columns(&self) -> Vec<String> {
        let mut cols = vec!["TimePeriod", "AccountId", "AccountName", "CampaignId", "CampaignName"];
        if self.include_campaign_type {
            cols.push("CampaignType");
        }
        cols.extend(["Impressions", "Clicks", "Spend"]);
        cols.into_iter().map(String::from).collect()
    }
}

// ---------------------------------------------------------------------------
// ReportRequest
// ---------------------------------------------------------------------------

/// A campaign performance request scoped to exactly one account.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub account_id: i64,
    pub report_name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub aggregation: Aggregation,
    pub columns: Vec<String>,
    pub time_zone: &'static str,
    pub format: &'static str,
    pub return_only_complete_data: bool,
}

impl ReportRequest {
    pub fn for_account(account_id: i64, params: &RequestParams) -> Self {
        Self {
            account_id,
            report_name: format!("MSAR_{account_id}"),
            start_date: params.start_date,
            end_date: params.end_date,
            aggregation: params.aggregation,
            columns: params.columns(),
            time_zone: REPORT_TIME_ZONE,
            format: REPORT_FORMAT,
            return_only_complete_data: false,
        }
    }

    pub fn describe(&self) -> String {
        format!(
            "{} {}..{} {} {} {} complete_only={} [{}]",
            self.report_name,
            self.start_date,
            self.end_date,
            self.aggregation.service_name(),
            self.time_zone,
            self.format,
            self.return_only_complete_data,
            self.columns.join(",")
        )
    }
}
