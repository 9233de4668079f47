//! Twelve-week commit series.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Number of weeks in every activity series
pub const WEEKS: usize = 12;

/// Commits in the week starting at `week_start`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyCommits {
    pub week_start: DateTime<Utc>,
    pub commits: u64,
}

fn week() -> Duration {
    Duration::days(7)
}

/// Start of the oldest week in a series ending at `now`
#[must_use]
pub fn series_start(now: DateTime<Utc>) -> DateTime<Utc> {
    (0..WEEKS).fold(now, |t, _| t - week())
}

/// Twelve empty weeks ending at `now`
#[must_use]
pub fn zero_weeks(now: DateTime<Utc>) -> Vec<WeeklyCommits> {
    core::iter::successors(Some(series_start(now)), |start| Some(*start + week()))
        .take(WEEKS)
        .map(|week_start| WeeklyCommits { week_start, commits: 0 })
        .collect()
}

/// Bucket individual commit timestamps into the twelve weeks ending at `now`.
///
/// Commits older than the window are ignored; commits stamped after `now` count toward the latest week.
#[must_use]
pub fn bucket_commits(timestamps: impl IntoIterator<Item = DateTime<Utc>>, now: DateTime<Utc>) -> Vec<WeeklyCommits> {
    let start = series_start(now);
    let mut weeks = zero_weeks(now);

    for timestamp in timestamps {
        if timestamp < start {
            continue;
        }

        let elapsed = (timestamp - start).num_seconds() / week().num_seconds();
        let index = usize::try_from(elapsed).unwrap_or(WEEKS - 1).min(WEEKS - 1);
        weeks[index].commits += 1;
    }

    weeks
}

/// Build a series from per-week totals that a platform reports, keeping the latest twelve weeks.
///
/// Missing leading weeks are zero-filled.
#[must_use]
pub fn from_weekly_totals(totals: impl IntoIterator<Item = (DateTime<Utc>, u64)>, now: DateTime<Utc>) -> Vec<WeeklyCommits> {
    let mut totals: Vec<_> = totals.into_iter().collect();
    totals.sort_by_key(|(start, _)| *start);

    let latest = &totals[totals.len().saturating_sub(WEEKS)..];
    let Some(&(first_start, _)) = latest.first() else {
        return zero_weeks(now);
    };

    let missing = WEEKS - latest.len();
    let mut weeks: Vec<_> = core::iter::successors(Some(first_start - week()), |start| Some(*start - week()))
        .take(missing)
        .map(|week_start| WeeklyCommits { week_start, commits: 0 })
        .collect();
    weeks.reverse();

    weeks.extend(latest.iter().map(|&(week_start, commits)| WeeklyCommits { week_start, commits }));
    weeks
}
