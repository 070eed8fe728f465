use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single day in a contribution calendar. Dates are UTC calendar dates
/// with no time component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionDay {
    pub date: NaiveDate,
    pub contribution_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionWeek {
    pub contribution_days: Vec<ContributionDay>,
}

/// A full per-day contribution history. After merging, dates are unique
/// and ascending, and `total_contributions` equals the sum of all day
/// counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionCalendar {
    pub total_contributions: u32,
    pub weeks: Vec<ContributionWeek>,
}

/// A `contributionsCollection` section as returned by the GraphQL API.
/// Every level is optional: organization sections can come back empty or
/// malformed, and the merger tolerates that by skipping them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributionsCollection {
    pub contribution_calendar: Option<SourceCalendar>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCalendar {
    pub total_contributions: Option<u32>,
    pub weeks: Option<Vec<SourceWeek>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceWeek {
    pub contribution_days: Option<Vec<ContributionDay>>,
}
