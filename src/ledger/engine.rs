use chrono::{Datelike, Duration, NaiveDate};
use std::collections::HashMap;
use thiserror::Error;

use crate::models::{Badge, CheckIn, Outcome, Period, Standing, Summary};

/// Points per disciplined / lapsed day. Relative ranking only.
const POINTS_DISCIPLINED: i64 = 10;
const POINTS_LAPSED: i64 = -5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("record set has more than one check-in for {date}")]
    DuplicateDate { date: NaiveDate },
}

/// Reject record sets that violate the one-record-per-day invariant.
/// The store guarantees it with a UNIQUE key, but a merged or hand-built
/// slice can still carry duplicates and must not be silently resolved.
fn ensure_unique_dates(records: &[CheckIn]) -> Result<(), LedgerError> {
    let mut seen: HashMap<NaiveDate, ()> = HashMap::with_capacity(records.len());
    for r in records {
        if seen.insert(r.date, ()).is_some() {
            return Err(LedgerError::DuplicateDate { date: r.date });
        }
    }
    Ok(())
}

/// Consecutive disciplined days walking backward from `as_of`, inclusive.
/// A day with no record, or a lapsed record, stops the walk immediately —
/// so a subject who has not checked in on `as_of` gets 0. Callers wanting
/// yesterday-anchored semantics pass `as_of - 1` (see `anchor_date`).
pub fn current_streak(records: &[CheckIn], as_of: NaiveDate) -> Result<u32, LedgerError> {
    ensure_unique_dates(records)?;

    let by_date: HashMap<NaiveDate, Outcome> =
        records.iter().map(|r| (r.date, r.outcome)).collect();

    let mut streak = 0u32;
    let mut day = as_of;
    loop {
        match by_date.get(&day) {
            Some(Outcome::Disciplined) => {
                streak += 1;
                match day.pred_opt() {
                    Some(prev) => day = prev,
                    None => break, // calendar floor
                }
            }
            _ => break,
        }
    }
    Ok(streak)
}

/// Longest run of consecutive disciplined days anywhere in the set.
/// A lapsed record resets the run, and so does a gap in the calendar —
/// the same break rule `current_streak` applies.
pub fn longest_streak(records: &[CheckIn]) -> Result<u32, LedgerError> {
    ensure_unique_dates(records)?;

    let mut sorted: Vec<(NaiveDate, Outcome)> =
        records.iter().map(|r| (r.date, r.outcome)).collect();
    sorted.sort_by_key(|(d, _)| *d);

    let mut best = 0u32;
    let mut run = 0u32;
    let mut prev_date: Option<NaiveDate> = None;

    for (date, outcome) in sorted {
        match outcome {
            Outcome::Disciplined => {
                let contiguous = prev_date
                    .and_then(|p| p.succ_opt())
                    .map(|next| next == date)
                    .unwrap_or(false);
                run = if contiguous && run > 0 { run + 1 } else { 1 };
                best = best.max(run);
            }
            Outcome::Lapsed => {
                run = 0;
            }
        }
        prev_date = Some(date);
    }
    Ok(best)
}

/// Disciplined share of all recorded days, rounded to the nearest whole
/// percent. Empty input is defined as 0.
pub fn success_rate(records: &[CheckIn]) -> Result<u8, LedgerError> {
    ensure_unique_dates(records)?;

    if records.is_empty() {
        return Ok(0);
    }
    let disciplined = records
        .iter()
        .filter(|r| r.outcome == Outcome::Disciplined)
        .count();
    let rate = disciplined as f64 / records.len() as f64 * 100.0;
    Ok(rate.round() as u8)
}

/// Signed point total: +10 per disciplined day, −5 per lapsed day.
pub fn point_score(records: &[CheckIn]) -> Result<i64, LedgerError> {
    ensure_unique_dates(records)?;

    Ok(records
        .iter()
        .map(|r| match r.outcome {
            Outcome::Disciplined => POINTS_DISCIPLINED,
            Outcome::Lapsed => POINTS_LAPSED,
        })
        .sum())
}

/// Inclusive start of the bucket containing `reference`.
pub fn period_start(period: Period, reference: NaiveDate) -> NaiveDate {
    match period {
        Period::Daily => reference,
        Period::Weekly => {
            reference - Duration::days(reference.weekday().num_days_from_monday() as i64)
        }
        Period::Monthly => reference.with_day(1).unwrap_or(reference),
    }
}

/// Records dated within `[period_start, reference]`, for period-scoped
/// success rates and point scores.
pub fn bucket_by_period(
    records: &[CheckIn],
    period: Period,
    reference: NaiveDate,
) -> Result<Vec<CheckIn>, LedgerError> {
    ensure_unique_dates(records)?;

    let start = period_start(period, reference);
    Ok(records
        .iter()
        .filter(|r| r.date >= start && r.date <= reference)
        .cloned()
        .collect())
}

/// First matching rule wins; streak tiers are checked before the
/// success-rate tier.
pub fn assign_badge(current_streak: u32, success_rate: u8) -> Option<Badge> {
    if current_streak >= 30 {
        Some(Badge::Legend)
    } else if current_streak >= 14 {
        Some(Badge::Warrior)
    } else if current_streak >= 7 {
        Some(Badge::Strong)
    } else if success_rate >= 80 {
        Some(Badge::Consistent)
    } else {
        None
    }
}

/// Sort descending by points and assign 1-based ranks. The sort is stable:
/// equal scores keep their input order, so callers control tie-breaking by
/// the order they supply (join order, by convention).
pub fn rank_subjects(mut standings: Vec<Standing>) -> Vec<Standing> {
    standings.sort_by_key(|s| std::cmp::Reverse(s.points));
    for (i, s) in standings.iter_mut().enumerate() {
        s.rank = (i + 1) as u32;
    }
    standings
}

/// Everything the status screen needs in one pass.
pub fn summarize(records: &[CheckIn], as_of: NaiveDate) -> Result<Summary, LedgerError> {
    let current = current_streak(records, as_of)?;
    let longest = longest_streak(records)?;
    let rate = success_rate(records)?;
    let points = point_score(records)?;
    Ok(Summary {
        current_streak: current,
        longest_streak: longest,
        total_days: records.len() as u32,
        success_rate: rate,
        points,
        badge: assign_badge(current, rate),
    })
}

/// The one place the "does today count yet?" question is answered: anchor
/// streak walks at today when today has a record, otherwise at yesterday,
/// so yesterday's streak holds until the day is actually evaluated.
pub fn anchor_date(records: &[CheckIn], today: NaiveDate) -> NaiveDate {
    if records.iter().any(|r| r.date == today) {
        today
    } else {
        today.pred_opt().unwrap_or(today)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CheckIn;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Consecutive days starting at `start`, one outcome char per day:
    /// 'D' = disciplined, 'L' = lapsed, '.' = no record.
    fn run(start: NaiveDate, pattern: &str) -> Vec<CheckIn> {
        pattern
            .chars()
            .enumerate()
            .filter_map(|(i, c)| {
                let date = start + Duration::days(i as i64);
                match c {
                    'D' => Some(CheckIn::new("me", "", date, Outcome::Disciplined)),
                    'L' => Some(CheckIn::new("me", "", date, Outcome::Lapsed)),
                    _ => None,
                }
            })
            .collect()
    }

    #[test]
    fn current_streak_counts_consecutive_disciplined_days() {
        let start = day(2026, 8, 25);
        let records = run(start, "DDDDD");
        let as_of = day(2026, 8, 29);
        assert_eq!(current_streak(&records, as_of).unwrap(), 5);
    }

    #[test]
    fn current_streak_is_zero_without_record_on_anchor() {
        let records = run(day(2026, 8, 25), "DDDD.");
        assert_eq!(current_streak(&records, day(2026, 8, 29)).unwrap(), 0);
        // Anchoring one day earlier recovers the run.
        assert_eq!(current_streak(&records, day(2026, 8, 28)).unwrap(), 4);
    }

    #[test]
    fn current_streak_stops_on_lapse() {
        let records = run(day(2026, 8, 25), "DLDDD");
        assert_eq!(current_streak(&records, day(2026, 8, 29)).unwrap(), 3);
    }

    #[test]
    fn current_streak_terminates_on_sparse_records() {
        // One ancient record far before the anchor must not loop.
        let records = vec![CheckIn::new(
            "me",
            "",
            day(2020, 1, 1),
            Outcome::Disciplined,
        )];
        assert_eq!(current_streak(&records, day(2026, 8, 29)).unwrap(), 0);
    }

    #[test]
    fn longest_streak_resets_on_lapse() {
        // D D L D D D → 3
        let records = run(day(2026, 8, 1), "DDLDDD");
        assert_eq!(longest_streak(&records).unwrap(), 3);
    }

    #[test]
    fn longest_streak_breaks_on_calendar_gap() {
        // Two disciplined days, a missing day, then two more.
        let records = run(day(2026, 8, 1), "DD.DD");
        assert_eq!(longest_streak(&records).unwrap(), 2);
    }

    #[test]
    fn longest_streak_unordered_input() {
        let mut records = run(day(2026, 8, 1), "DDDD");
        records.reverse();
        assert_eq!(longest_streak(&records).unwrap(), 4);
    }

    #[test]
    fn success_rate_bounds() {
        assert_eq!(success_rate(&[]).unwrap(), 0);
        assert_eq!(success_rate(&run(day(2026, 8, 1), "DDDD")).unwrap(), 100);
        assert_eq!(success_rate(&run(day(2026, 8, 1), "LLLL")).unwrap(), 0);
        // 2/3 rounds to 67.
        assert_eq!(success_rate(&run(day(2026, 8, 1), "DDL")).unwrap(), 67);
    }

    #[test]
    fn point_score_weighs_outcomes() {
        let records = run(day(2026, 8, 1), "DDDL");
        assert_eq!(point_score(&records).unwrap(), 25);
        assert_eq!(point_score(&run(day(2026, 8, 1), "LL")).unwrap(), -10);
    }

    #[test]
    fn bucket_weekly_starts_monday() {
        // 2026-08-29 is a Saturday; its ISO week starts Monday 2026-08-24.
        let reference = day(2026, 8, 29);
        assert_eq!(period_start(Period::Weekly, reference), day(2026, 8, 24));
        assert_eq!(period_start(Period::Monthly, reference), day(2026, 8, 1));
        assert_eq!(period_start(Period::Daily, reference), reference);

        let records = run(day(2026, 8, 20), "DDDDDDDDDD");
        let bucket = bucket_by_period(&records, Period::Weekly, reference).unwrap();
        assert_eq!(bucket.len(), 6); // 24th through 29th
        assert!(bucket.iter().all(|r| r.date >= day(2026, 8, 24)));
    }

    #[test]
    fn badge_priority_streak_before_rate() {
        assert_eq!(assign_badge(30, 50), Some(Badge::Legend));
        assert_eq!(assign_badge(14, 0), Some(Badge::Warrior));
        assert_eq!(assign_badge(7, 0), Some(Badge::Strong));
        assert_eq!(assign_badge(0, 85), Some(Badge::Consistent));
        assert_eq!(assign_badge(6, 79), None);
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let standing = |subject: &str, points: i64| Standing {
            subject: subject.to_string(),
            display_name: subject.to_string(),
            rank: 0,
            points,
            current_streak: 0,
            success_rate: 0,
            badge: None,
        };
        let ranked = rank_subjects(vec![
            standing("amir", 20),
            standing("bilal", 30),
            standing("chafik", 20),
        ]);
        assert_eq!(ranked[0].subject, "bilal");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].subject, "amir");
        assert_eq!(ranked[1].rank, 2);
        assert_eq!(ranked[2].subject, "chafik");
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn duplicate_dates_are_rejected() {
        let date = day(2026, 8, 29);
        let records = vec![
            CheckIn::new("me", "", date, Outcome::Disciplined),
            CheckIn::new("me", "", date, Outcome::Lapsed),
        ];
        assert_eq!(
            current_streak(&records, date),
            Err(LedgerError::DuplicateDate { date })
        );
        assert!(longest_streak(&records).is_err());
        assert!(success_rate(&records).is_err());
        assert!(point_score(&records).is_err());
        assert!(bucket_by_period(&records, Period::Daily, date).is_err());
    }

    #[test]
    fn summarize_is_idempotent() {
        let records = run(day(2026, 8, 1), "DDDDDDDLDD");
        let as_of = day(2026, 8, 10);
        let a = summarize(&records, as_of).unwrap();
        let b = summarize(&records, as_of).unwrap();
        assert_eq!(a.current_streak, b.current_streak);
        assert_eq!(a.longest_streak, b.longest_streak);
        assert_eq!(a.success_rate, b.success_rate);
        assert_eq!(a.points, b.points);
        assert_eq!(a.total_days, 10);
        assert_eq!(a.longest_streak, 7);
        assert_eq!(a.badge, Some(Badge::Consistent)); // rate 90, streak only 2
    }

    #[test]
    fn anchor_falls_back_to_yesterday() {
        let today = day(2026, 8, 29);
        let with_today = run(day(2026, 8, 28), "DD");
        assert_eq!(anchor_date(&with_today, today), today);

        let without_today = run(day(2026, 8, 27), "DD");
        assert_eq!(anchor_date(&without_today, today), day(2026, 8, 28));
        // Anchored streak survives until end of day.
        let anchor = anchor_date(&without_today, today);
        assert_eq!(current_streak(&without_today, anchor).unwrap(), 2);
    }
}
