use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::calendar::ContributionCalendar;
use super::repo::Repository;

/// Current and longest activity streaks with their date ranges.
/// Recomputed on every request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Streaks {
    pub current: u32,
    pub current_start: NaiveDate,
    pub longest: u32,
    pub longest_start: NaiveDate,
    pub longest_end: NaiveDate,
}

/// One entry in the top-5 language breakdown. `percentage` is the share
/// of the grand total byte size, formatted to two decimal places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageStat {
    pub name: String,
    pub color: String,
    pub percentage: String,
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepoStats {
    pub total_stars: u64,
    pub total_forks: u64,
}

/// Everything the badge needs for one user, as returned by the fetcher.
#[derive(Debug, Clone)]
pub struct UserStats {
    pub calendar: ContributionCalendar,
    pub repositories: Vec<Repository>,
    pub created_at: DateTime<Utc>,
}
