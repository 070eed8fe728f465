use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::{BTreeMap, HashMap};

use crate::models::calendar::{
    ContributionCalendar, ContributionDay, ContributionWeek, ContributionsCollection,
};
use crate::models::repo::Repository;
use crate::models::stats::{LanguageStat, RepoStats, Streaks};

/// Fallback swatch for languages the API returns without a color.
pub const DEFAULT_LANGUAGE_COLOR: &str = "#858585";

/// How many trailing days feed the activity curve.
pub const ACTIVITY_WINDOW_DAYS: usize = 90;

/// Merge one or more contribution sources (personal first, then
/// organizations) into a single calendar. Counts for a date appearing in
/// several sources are added, not overwritten. Sources missing their
/// calendar or week structure are skipped, as are weeks missing a day
/// list. The merged days are regrouped into weeks that start on each UTC
/// Sunday, and `total_contributions` is recomputed from the merged sum.
pub fn merge_calendars(sources: &[ContributionsCollection]) -> ContributionCalendar {
    let mut counts_by_date: BTreeMap<NaiveDate, u32> = BTreeMap::new();

    for source in sources {
        let Some(calendar) = &source.contribution_calendar else {
            continue;
        };
        let Some(weeks) = &calendar.weeks else {
            continue;
        };
        for week in weeks {
            let Some(days) = &week.contribution_days else {
                continue;
            };
            for day in days {
                *counts_by_date.entry(day.date).or_insert(0) += day.contribution_count;
            }
        }
    }

    let mut total_contributions = 0;
    let mut weeks: Vec<ContributionWeek> = Vec::new();
    let mut current_week: Vec<ContributionDay> = Vec::new();

    for (date, contribution_count) in counts_by_date {
        if date.weekday() == Weekday::Sun && !current_week.is_empty() {
            weeks.push(ContributionWeek {
                contribution_days: std::mem::take(&mut current_week),
            });
        }
        total_contributions += contribution_count;
        current_week.push(ContributionDay {
            date,
            contribution_count,
        });
    }

    if !current_week.is_empty() {
        weeks.push(ContributionWeek {
            contribution_days: current_week,
        });
    }

    ContributionCalendar {
        total_contributions,
        weeks,
    }
}

/// Compute the current and longest streaks from a merged calendar.
///
/// The longest streak is found in a single forward scan; only a strictly
/// longer run replaces the recorded one, so the earliest of equal-length
/// runs wins. The current streak is scanned backwards from the most
/// recent day and stops at the first zero-count day, with one exception:
/// a zero count on `today` itself is skipped, so a streak earned through
/// yesterday survives until the user has had a chance to contribute.
pub fn calculate_streaks(weeks: &[ContributionWeek], today: NaiveDate) -> Streaks {
    let all_days: Vec<&ContributionDay> = weeks
        .iter()
        .flat_map(|week| &week.contribution_days)
        .collect();

    if all_days.is_empty() {
        return Streaks {
            current: 0,
            current_start: today,
            longest: 0,
            longest_start: today,
            longest_end: today,
        };
    }

    let mut longest = 0;
    let mut longest_start = None;
    let mut longest_end = None;
    let mut run = 0;
    let mut run_start = None;

    for day in &all_days {
        if day.contribution_count > 0 {
            if run == 0 {
                run_start = Some(day.date);
            }
            run += 1;
            if run > longest {
                longest = run;
                longest_start = run_start;
                longest_end = Some(day.date);
            }
        } else {
            run = 0;
            run_start = None;
        }
    }

    let mut current = 0;
    let mut current_start = None;

    for day in all_days.iter().rev() {
        // Future-dated entries should not exist, but never count them.
        if day.date > today {
            continue;
        }
        if day.contribution_count > 0 {
            current += 1;
            current_start = Some(day.date);
        } else if day.date != today {
            break;
        }
    }

    Streaks {
        current,
        current_start: current_start.unwrap_or(today),
        longest,
        longest_start: longest_start.unwrap_or(all_days[0].date),
        longest_end: longest_end.unwrap_or(today),
    }
}

/// Sum language byte sizes across all repositories and return the top 5
/// by size, each with its share of the grand total. The first color seen
/// for a language wins; a missing color falls back to the default gray.
pub fn calculate_language_stats(repositories: &[Repository]) -> Vec<LanguageStat> {
    let mut sizes_by_name: HashMap<String, (u64, String)> = HashMap::new();

    for repo in repositories {
        for edge in &repo.languages.edges {
            let entry = sizes_by_name
                .entry(edge.node.name.clone())
                .or_insert_with(|| {
                    let color = edge
                        .node
                        .color
                        .clone()
                        .unwrap_or_else(|| DEFAULT_LANGUAGE_COLOR.to_string());
                    (0, color)
                });
            entry.0 += edge.size;
        }
    }

    let total_size: u64 = sizes_by_name.values().map(|(size, _)| size).sum();
    if total_size == 0 {
        return Vec::new();
    }

    let mut stats: Vec<LanguageStat> = sizes_by_name
        .into_iter()
        .map(|(name, (size, color))| LanguageStat {
            name,
            color,
            percentage: format!("{:.2}", size as f64 / total_size as f64 * 100.0),
            size,
        })
        .collect();

    stats.sort_by(|a, b| b.size.cmp(&a.size).then_with(|| a.name.cmp(&b.name)));
    stats.truncate(5);
    stats
}

/// Sum star and fork counts across the repository list.
pub fn calculate_repo_stats(repositories: &[Repository]) -> RepoStats {
    RepoStats {
        total_stars: repositories.iter().map(|r| r.stargazer_count).sum(),
        total_forks: repositories.iter().map(|r| r.fork_count).sum(),
    }
}

/// The most recent `ACTIVITY_WINDOW_DAYS` days of a merged calendar,
/// oldest first.
pub fn last_90_days(weeks: &[ContributionWeek]) -> Vec<ContributionDay> {
    let all_days: Vec<ContributionDay> = weeks
        .iter()
        .flat_map(|week| week.contribution_days.iter().cloned())
        .collect();
    let skip = all_days.len().saturating_sub(ACTIVITY_WINDOW_DAYS);
    all_days.into_iter().skip(skip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::calendar::{SourceCalendar, SourceWeek};
    use crate::models::repo::{LanguageConnection, LanguageEdge, LanguageNode};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn day(s: &str, count: u32) -> ContributionDay {
        ContributionDay {
            date: date(s),
            contribution_count: count,
        }
    }

    fn source(days: Vec<ContributionDay>) -> ContributionsCollection {
        ContributionsCollection {
            contribution_calendar: Some(SourceCalendar {
                total_contributions: Some(days.iter().map(|d| d.contribution_count).sum()),
                weeks: Some(vec![SourceWeek {
                    contribution_days: Some(days),
                }]),
            }),
        }
    }

    fn flatten(calendar: &ContributionCalendar) -> Vec<ContributionDay> {
        calendar
            .weeks
            .iter()
            .flat_map(|w| w.contribution_days.iter().cloned())
            .collect()
    }

    fn repo(stars: u64, forks: u64, languages: Vec<(&str, u64, Option<&str>)>) -> Repository {
        Repository {
            stargazer_count: stars,
            fork_count: forks,
            languages: LanguageConnection {
                edges: languages
                    .into_iter()
                    .map(|(name, size, color)| LanguageEdge {
                        size,
                        node: LanguageNode {
                            name: name.to_string(),
                            color: color.map(|c| c.to_string()),
                        },
                    })
                    .collect(),
            },
        }
    }

    #[test]
    fn test_merge_empty_sources() {
        let merged = merge_calendars(&[]);
        assert_eq!(merged.total_contributions, 0);
        assert!(merged.weeks.is_empty());

        let absent = ContributionsCollection {
            contribution_calendar: None,
        };
        let merged = merge_calendars(&[absent]);
        assert_eq!(merged.total_contributions, 0);
        assert!(merged.weeks.is_empty());
    }

    #[test]
    fn test_merge_single_source_is_idempotent() {
        let days = vec![day("2024-03-01", 2), day("2024-03-02", 0), day("2024-03-03", 4)];
        let merged = merge_calendars(&[source(days.clone())]);

        assert_eq!(merged.total_contributions, 6);
        assert_eq!(flatten(&merged), days);
    }

    #[test]
    fn test_merge_adds_overlapping_dates() {
        let personal = source(vec![day("2024-03-01", 2)]);
        let org = source(vec![day("2024-03-01", 3)]);
        let merged = merge_calendars(&[personal, org]);

        assert_eq!(merged.total_contributions, 5);
        assert_eq!(flatten(&merged), vec![day("2024-03-01", 5)]);
    }

    #[test]
    fn test_merge_disjoint_totals_add() {
        let a = source(vec![day("2024-03-01", 2), day("2024-03-02", 1)]);
        let b = source(vec![day("2024-03-04", 7)]);
        let merged = merge_calendars(&[a, b]);

        assert_eq!(merged.total_contributions, 10);
        assert_eq!(
            flatten(&merged),
            vec![day("2024-03-01", 2), day("2024-03-02", 1), day("2024-03-04", 7)]
        );
    }

    #[test]
    fn test_merge_regroups_weeks_on_sunday() {
        // 2024-02-28 is a Wednesday; 2024-03-03 and 2024-03-10 are Sundays.
        let days: Vec<ContributionDay> = (0..12)
            .map(|offset| ContributionDay {
                date: date("2024-02-28") + chrono::Duration::days(offset),
                contribution_count: 1,
            })
            .collect();
        let merged = merge_calendars(&[source(days)]);

        assert_eq!(merged.weeks.len(), 3);
        assert_eq!(
            merged.weeks[0].contribution_days.first().unwrap().date,
            date("2024-02-28")
        );
        assert_eq!(
            merged.weeks[1].contribution_days.first().unwrap().date,
            date("2024-03-03")
        );
        assert_eq!(
            merged.weeks[2].contribution_days.first().unwrap().date,
            date("2024-03-10")
        );
        assert_eq!(merged.total_contributions, 12);
    }

    #[test]
    fn test_merge_skips_malformed_weeks() {
        let malformed = ContributionsCollection {
            contribution_calendar: Some(SourceCalendar {
                total_contributions: None,
                weeks: Some(vec![
                    SourceWeek {
                        contribution_days: None,
                    },
                    SourceWeek {
                        contribution_days: Some(vec![day("2024-03-01", 1)]),
                    },
                ]),
            }),
        };
        let merged = merge_calendars(&[malformed]);

        assert_eq!(merged.total_contributions, 1);
        assert_eq!(flatten(&merged), vec![day("2024-03-01", 1)]);
    }

    fn weeks_from(counts: &[u32], last_date: &str) -> Vec<ContributionWeek> {
        let end = date(last_date);
        let days = counts
            .iter()
            .rev()
            .enumerate()
            .map(|(back, &count)| ContributionDay {
                date: end - chrono::Duration::days(back as i64),
                contribution_count: count,
            })
            .rev()
            .collect();
        vec![ContributionWeek {
            contribution_days: days,
        }]
    }

    #[test]
    fn test_streaks_skip_today_with_zero_count() {
        // Oldest to newest, last entry is today with no contributions yet.
        let today = date("2024-03-10");
        let weeks = weeks_from(&[1, 1, 0, 1, 1, 1, 0], "2024-03-10");
        let streaks = calculate_streaks(&weeks, today);

        assert_eq!(streaks.longest, 3);
        assert_eq!(streaks.longest_start, date("2024-03-07"));
        assert_eq!(streaks.longest_end, date("2024-03-09"));
        assert_eq!(streaks.current, 3);
        assert_eq!(streaks.current_start, date("2024-03-07"));
    }

    #[test]
    fn test_streaks_zero_yesterday_breaks_current() {
        // The skip-zero rule applies only to today's literal date.
        let today = date("2024-03-10");
        let weeks = weeks_from(&[1, 1, 1, 0, 2], "2024-03-10");
        let streaks = calculate_streaks(&weeks, today);

        assert_eq!(streaks.current, 1);
        assert_eq!(streaks.current_start, today);
    }

    #[test]
    fn test_streaks_longest_keeps_first_of_equal_runs() {
        let today = date("2024-03-10");
        let weeks = weeks_from(&[1, 1, 0, 1, 1, 0], "2024-03-10");
        let streaks = calculate_streaks(&weeks, today);

        assert_eq!(streaks.longest, 2);
        assert_eq!(streaks.longest_start, date("2024-03-05"));
        assert_eq!(streaks.longest_end, date("2024-03-06"));
    }

    #[test]
    fn test_streaks_strictly_longer_run_updates() {
        let today = date("2024-03-10");
        let weeks = weeks_from(&[1, 1, 0, 1, 1, 1], "2024-03-10");
        let streaks = calculate_streaks(&weeks, today);

        assert_eq!(streaks.longest, 3);
        assert_eq!(streaks.longest_start, date("2024-03-08"));
        assert_eq!(streaks.longest_end, date("2024-03-10"));
        assert_eq!(streaks.current, 3);
    }

    #[test]
    fn test_streaks_no_contributions_at_all() {
        let today = date("2024-03-10");
        let weeks = weeks_from(&[0, 0, 0], "2024-03-10");
        let streaks = calculate_streaks(&weeks, today);

        assert_eq!(streaks.current, 0);
        assert_eq!(streaks.longest, 0);
        assert_eq!(streaks.current_start, today);
        assert_eq!(streaks.longest_end, today);
    }

    #[test]
    fn test_streaks_empty_calendar() {
        let today = date("2024-03-10");
        let streaks = calculate_streaks(&[], today);

        assert_eq!(streaks.current, 0);
        assert_eq!(streaks.longest, 0);
        assert_eq!(streaks.current_start, today);
        assert_eq!(streaks.longest_start, today);
        assert_eq!(streaks.longest_end, today);
    }

    #[test]
    fn test_language_stats_sums_and_percentages() {
        let repos = vec![
            repo(0, 0, vec![("A", 100, Some("#111111"))]),
            repo(0, 0, vec![("A", 50, Some("#111111")), ("B", 50, Some("#222222"))]),
        ];
        let stats = calculate_language_stats(&repos);

        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].name, "A");
        assert_eq!(stats[0].size, 150);
        assert_eq!(stats[0].percentage, "75.00");
        assert_eq!(stats[1].name, "B");
        assert_eq!(stats[1].percentage, "25.00");
    }

    #[test]
    fn test_language_stats_top_five_only() {
        let languages: Vec<(String, u64)> = (0..10)
            .map(|i| (format!("Lang{}", i), 100 - i as u64))
            .collect();
        let repos = vec![repo(
            0,
            0,
            languages
                .iter()
                .map(|(name, size)| (name.as_str(), *size, None))
                .collect(),
        )];
        let stats = calculate_language_stats(&repos);

        assert_eq!(stats.len(), 5);
        assert_eq!(stats[0].name, "Lang0");
        assert_eq!(stats[4].name, "Lang4");
    }

    #[test]
    fn test_language_stats_default_color() {
        let repos = vec![repo(0, 0, vec![("Plain Text", 10, None)])];
        let stats = calculate_language_stats(&repos);

        assert_eq!(stats[0].color, DEFAULT_LANGUAGE_COLOR);
    }

    #[test]
    fn test_language_stats_empty_input() {
        assert!(calculate_language_stats(&[]).is_empty());

        let no_languages = vec![repo(3, 1, vec![])];
        assert!(calculate_language_stats(&no_languages).is_empty());
    }

    #[test]
    fn test_repo_stats_sums() {
        let repos = vec![repo(10, 2, vec![]), repo(0, 0, vec![]), repo(5, 3, vec![])];
        let stats = calculate_repo_stats(&repos);

        assert_eq!(stats.total_stars, 15);
        assert_eq!(stats.total_forks, 5);
    }

    #[test]
    fn test_repo_stats_empty() {
        let stats = calculate_repo_stats(&[]);
        assert_eq!(stats.total_stars, 0);
        assert_eq!(stats.total_forks, 0);
    }

    #[test]
    fn test_last_90_days_takes_trailing_window() {
        let days: Vec<ContributionDay> = (0..120)
            .map(|offset| ContributionDay {
                date: date("2024-01-01") + chrono::Duration::days(offset),
                contribution_count: offset as u32,
            })
            .collect();
        let weeks = vec![ContributionWeek {
            contribution_days: days.clone(),
        }];

        let window = last_90_days(&weeks);
        assert_eq!(window.len(), 90);
        assert_eq!(window.first().unwrap().date, days[30].date);
        assert_eq!(window.last().unwrap().date, days[119].date);
    }

    #[test]
    fn test_last_90_days_short_history() {
        let weeks = weeks_from(&[1, 2, 3], "2024-03-10");
        let window = last_90_days(&weeks);
        assert_eq!(window.len(), 3);
    }
}
