use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use crate::cli::args::{FastCommands, GoalCommands, GroupCommands, PremiumCommands};
use crate::config::AppConfig;
use crate::db::repository::{CacheRepo, CheckInRepo, FastRepo, GoalRepo, GroupRepo, MetaRepo};
use crate::ledger;
use crate::models::{CheckIn, FastKind, Goal, GoalError, Outcome, Period, Standing, LOCK_THRESHOLD};
use crate::premium::{Feature, PremiumStatus};
use crate::prayer_times::{PrayerCalculator, CALC_METHODS};
use crate::utils::format::{format_duration_secs, format_points, progress_bar};
use crate::utils::hijri::is_ramadan;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn parse_cli_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| anyhow!("Invalid date '{}'. Use YYYY-MM-DD", s))
}

// ─── Setup wizard ────────────────────────────────────────────────────────────

pub fn handle_setup(conn: &Connection, config: &mut AppConfig, reset: bool) -> Result<()> {
    if !reset {
        if let Some(done) = MetaRepo::get(conn, "setup_done")? {
            if done == "1" {
                println!("AkhCheck is already configured. Use --reset to reconfigure.");
                return Ok(());
            }
        }
    }

    println!();
    println_colored!(GOLD, "  AkhCheck setup");
    println_colored!(DIM, "  Press Enter to keep the value in brackets.");
    println!();

    let name = prompt(&format!("  Display name [{}]: ", config.profile.display_name))?;
    if !name.is_empty() {
        config.profile.display_name = name.clone();
        config.profile.subject = name.to_lowercase().replace(' ', "-");
    }

    let group = prompt(&format!(
        "  Default group (blank for none) [{}]: ",
        config.profile.default_group
    ))?;
    if !group.is_empty() {
        config.profile.default_group = group.clone();
        GroupRepo::add_member(conn, &group, &config.profile.subject, &config.profile.display_name)?;
    }

    let location = prompt(&format!(
        "  Location name [{}]: ",
        config.salah.location_name
    ))?;
    if !location.is_empty() {
        config.salah.location_name = location;
    }

    if let Some(lat) = prompt_parse::<f64>(&format!("  Latitude [{}]: ", config.salah.latitude))? {
        config.salah.latitude = lat;
    }
    if let Some(lng) = prompt_parse::<f64>(&format!("  Longitude [{}]: ", config.salah.longitude))? {
        config.salah.longitude = lng;
    }
    if let Some(tz) = prompt_parse::<i32>(&format!(
        "  UTC offset in minutes [{}]: ",
        config.salah.timezone_offset
    ))? {
        config.salah.timezone_offset = tz;
    }

    let method = prompt(&format!(
        "  Calculation method [{}]: ",
        config.salah.calc_method
    ))?;
    if !method.is_empty() {
        if CALC_METHODS.contains(&method.as_str()) {
            config.salah.calc_method = method;
        } else {
            println_colored!(RED, "  Unknown method, keeping {}", config.salah.calc_method);
            println_colored!(DIM, "  Options: {}", CALC_METHODS.join(", "));
        }
    }

    config.save()?;
    MetaRepo::set(conn, "setup_done", "1")?;
    // Location may have changed; cached times are stale.
    CacheRepo::clear_all(conn)?;

    println!();
    println_colored!(GREEN, "  ✓ Setup complete. Run `akhcheck` for the dashboard.");
    println!();
    Ok(())
}

// ─── Check-in ────────────────────────────────────────────────────────────────

pub fn handle_checkin(
    conn: &Connection,
    config: &AppConfig,
    outcome_str: &str,
    group: Option<&str>,
    date_str: Option<&str>,
    amend: bool,
) -> Result<()> {
    let outcome = Outcome::from_str(outcome_str)
        .map_err(|_| anyhow!("Unknown outcome '{}'. Use: disciplined, lapsed", outcome_str))?;
    let date = match date_str {
        Some(s) => parse_cli_date(s)?,
        None => today(),
    };
    if date > today() {
        return Err(anyhow!("Cannot check in for a future date"));
    }
    let scope = group.unwrap_or("");
    let subject = &config.profile.subject;

    let existing = CheckInRepo::get_for_date(conn, subject, scope, date)?;
    if let Some(prior) = &existing {
        if !amend {
            return Err(anyhow!(
                "Already checked in for {} ({}). Use --amend to replace it.",
                date,
                prior.outcome
            ));
        }
    }

    CheckInRepo::upsert(conn, &CheckIn::new(subject, scope, date, outcome))?;
    log::debug!("recorded {} for {} on {}", outcome.as_str(), subject, date);

    match outcome {
        Outcome::Disciplined => {
            println_colored!(GREEN, "  ✓ Disciplined — recorded for {}", date);

            // A day that already counted must not advance goals again on amend.
            let already_counted = existing
                .as_ref()
                .map(|r| r.outcome == Outcome::Disciplined)
                .unwrap_or(false);
            if !already_counted {
                let advanced = GoalRepo::advance_active(conn, subject, date)?;
                for title in &advanced {
                    println_colored!(DIM, "    goal \"{}\" +1 day", title);
                }
            }

            let records = CheckInRepo::get_all(conn, subject, scope)?;
            let anchor = ledger::anchor_date(&records, today());
            let streak = ledger::current_streak(&records, anchor)?;
            println_colored!(BOLD, "  Streak: {} days", streak);
        }
        Outcome::Lapsed => {
            println_colored!(RED, "  ✗ Lapsed — recorded for {}", date);
            println!();
            println_colored!(
                DIM,
                "  \"Do not despair of the mercy of Allah.\" — Qur'an 39:53"
            );
            println_colored!(DIM, "  Tomorrow is a new day. Start again.");
        }
    }
    Ok(())
}

// ─── Status ──────────────────────────────────────────────────────────────────

pub fn handle_status(conn: &Connection, config: &AppConfig) -> Result<()> {
    let subject = &config.profile.subject;
    let records = CheckInRepo::get_all(conn, subject, "")?;
    let today_record = CheckInRepo::get_for_date(conn, subject, "", today())?;
    let anchor = ledger::anchor_date(&records, today());
    let summary = ledger::summarize(&records, anchor)?;

    println!();
    println_colored!(GOLD, "  {} — status", config.profile.display_name);
    println!();

    match &today_record {
        Some(r) if r.outcome == Outcome::Disciplined => {
            println_colored!(GREEN, "  Today: disciplined ✓");
        }
        Some(_) => {
            println_colored!(RED, "  Today: lapsed ✗");
        }
        None => {
            println_colored!(AMBER, "  Today: not checked in yet");
        }
    }

    println!();
    println_colored!(
        BOLD,
        "  Streak:       {} days (best: {})",
        summary.current_streak,
        summary.longest_streak
    );
    println!("  Success rate: {}%", summary.success_rate);
    println!("  Points:       {}", format_points(summary.points));
    if let Some(badge) = summary.badge {
        println_colored!(GOLD, "  Badge:        {}", badge);
    }

    if let Some(goal) = GoalRepo::active_for(conn, subject, today())? {
        println!();
        let bar = progress_bar(goal.progress, goal.target_days, 12);
        let lock = if goal.locked { " 🔒" } else { "" };
        println_colored!(
            DIM,
            "  Goal: {} — {} {}/{} days{}",
            goal.title,
            bar,
            goal.progress,
            goal.target_days,
            lock
        );
    }
    println!();
    Ok(())
}

// ─── Stats ───────────────────────────────────────────────────────────────────

pub fn handle_stats(
    conn: &Connection,
    config: &AppConfig,
    week: bool,
    months: Option<u32>,
) -> Result<()> {
    let subject = &config.profile.subject;
    let records = CheckInRepo::get_all(conn, subject, "")?;
    let anchor = ledger::anchor_date(&records, today());
    let summary = ledger::summarize(&records, anchor)?;

    println!();
    println_colored!(GOLD, "  Statistics");
    println!();
    println_colored!(
        BOLD,
        "  Streak:       {} days current  |  {} days best",
        summary.current_streak,
        summary.longest_streak
    );
    println!("  Check-ins:    {} days total", summary.total_days);
    println!("  Success rate: {}%", summary.success_rate);
    println!("  Points:       {}", format_points(summary.points));
    match summary.badge {
        Some(badge) => println_colored!(GOLD, "  Badge:        {}", badge),
        None => println_colored!(DIM, "  Badge:        none yet — 7 straight days earns Strong"),
    }

    if week {
        println!();
        println_colored!(DIM, "  Last 7 days  (● = disciplined, ✗ = lapsed, · = no record)");
        println!();
        print!("  ");
        for offset in (0..7).rev() {
            let date = today() - chrono::Duration::days(offset);
            let icon = match records.iter().find(|r| r.date == date).map(|r| r.outcome) {
                Some(Outcome::Disciplined) => format!("{}●\x1b[0m ", GREEN),
                Some(Outcome::Lapsed) => format!("{}✗\x1b[0m ", RED),
                None => format!("{}·\x1b[0m ", DIM),
            };
            print!("{}", icon);
        }
        println!();
    }

    if let Some(n) = months {
        let premium = PremiumStatus::load(conn, today())?;
        if !premium.has_feature(Feature::MonthlyTrends) {
            println!();
            println_colored!(AMBER, "  Monthly trends are a premium feature.");
            println_colored!(DIM, "  Run `akhcheck premium activate` to unlock.");
        } else {
            println!();
            println_colored!(DIM, "  Monthly success rate");
            println!();
            for (start, rate) in monthly_rates(conn, subject, n, today())? {
                let bar = progress_bar(rate as u32, 100, 16);
                println!("  {}  {}  {:>3}%", start.format("%b %Y"), bar, rate);
            }
        }
    }

    println!();
    Ok(())
}

/// Success rate per calendar month, oldest first, keyed by month start.
/// Completed months span the whole month; the current month runs to `today`.
fn monthly_rates(
    conn: &Connection,
    subject: &str,
    months: u32,
    today: NaiveDate,
) -> Result<Vec<(NaiveDate, u8)>> {
    let mut rates = Vec::new();
    for i in (0..months).rev() {
        let month_ref = today
            .checked_sub_months(chrono::Months::new(i))
            .unwrap_or(today);
        let start = ledger::period_start(Period::Monthly, month_ref);
        let end = if i == 0 {
            today
        } else {
            start
                .checked_add_months(chrono::Months::new(1))
                .and_then(|d| d.pred_opt())
                .unwrap_or(month_ref)
        };
        let records = CheckInRepo::get_range(conn, subject, "", start, end)?;
        rates.push((start, ledger::success_rate(&records)?));
    }
    Ok(rates)
}

// ─── Leaderboard ─────────────────────────────────────────────────────────────

/// Compute ranked standings for a group. Members are supplied in join order,
/// which is the tie-break for equal scores.
pub fn build_leaderboard(
    conn: &Connection,
    group: &str,
    period: Period,
    reference: NaiveDate,
) -> Result<Vec<Standing>> {
    let members = GroupRepo::members(conn, group)?;
    let mut standings = Vec::with_capacity(members.len());

    for member in members {
        let all_records = CheckInRepo::get_all(conn, &member.subject, group)?;
        let anchor = ledger::anchor_date(&all_records, reference);
        let current_streak = ledger::current_streak(&all_records, anchor)?;

        let bucket = ledger::bucket_by_period(&all_records, period, reference)?;
        let success_rate = ledger::success_rate(&bucket)?;
        let points = ledger::point_score(&bucket)?;

        standings.push(Standing {
            subject: member.subject,
            display_name: member.display_name,
            rank: 0,
            points,
            current_streak,
            success_rate,
            badge: ledger::assign_badge(current_streak, success_rate),
        });
    }

    Ok(ledger::rank_subjects(standings))
}

pub fn handle_leaderboard(conn: &Connection, group: &str, period_str: &str) -> Result<()> {
    let period = Period::from_str(period_str)
        .map_err(|_| anyhow!("Unknown period '{}'. Use: daily, weekly, monthly", period_str))?;
    let standings = build_leaderboard(conn, group, period, today())?;

    println!();
    println_colored!(GOLD, "  Leaderboard — {} ({})", group, period.as_str());
    println!();

    if standings.is_empty() {
        println_colored!(DIM, "  No members yet. Add some with `akhcheck group add`.");
        println!();
        return Ok(());
    }

    for s in &standings {
        let medal = match s.rank {
            1 => "👑",
            2 => "🥈",
            3 => "🥉",
            _ => "  ",
        };
        let badge = s
            .badge
            .map(|b| format!("  {}", b))
            .unwrap_or_default();
        println!(
            "  {} #{:<2} {:<16} {:>5} pts   {:>3} streak   {:>3}%{}",
            medal, s.rank, s.display_name, format_points(s.points), s.current_streak, s.success_rate, badge
        );
    }
    println!();
    Ok(())
}

// ─── Group ───────────────────────────────────────────────────────────────────

pub fn handle_group(conn: &Connection, action: &GroupCommands) -> Result<()> {
    match action {
        GroupCommands::Add {
            group,
            subject,
            name,
        } => {
            let display = name.clone().unwrap_or_else(|| subject.clone());
            GroupRepo::add_member(conn, group, subject, &display)?;
            println_colored!(GREEN, "  ✓ {} joined {}", display, group);
        }
        GroupCommands::List { group } => {
            let members = GroupRepo::members(conn, group)?;
            println!();
            if members.is_empty() {
                println_colored!(DIM, "  No members in {}", group);
            } else {
                println_colored!(GOLD, "  {} — {} members", group, members.len());
                println!();
                for m in &members {
                    println!("  {:<16} ({})", m.display_name, m.subject);
                }
            }
            println!();
        }
    }
    Ok(())
}

// ─── Goals ───────────────────────────────────────────────────────────────────

pub fn handle_goal(conn: &Connection, config: &AppConfig, action: &GoalCommands) -> Result<()> {
    let subject = &config.profile.subject;
    match action {
        GoalCommands::New {
            title,
            days,
            description,
            public,
        } => {
            if *days == 0 {
                return Err(anyhow!("Target days must be positive"));
            }
            let goal = Goal::new(subject, title, description, *days, today(), *public);
            let id = GoalRepo::create(conn, &goal)?;
            println_colored!(
                GREEN,
                "  ✓ Goal #{} created: \"{}\" — {} days, ends {}",
                id,
                title,
                days,
                goal.end_date
            );
        }
        GoalCommands::List => {
            let goals = GoalRepo::list(conn, subject)?;
            println!();
            if goals.is_empty() {
                println_colored!(DIM, "  No goals yet. Create one with `akhcheck goal new`.");
            } else {
                println_colored!(GOLD, "  Goals");
                println!();
                for g in &goals {
                    let bar = progress_bar(g.progress, g.target_days, 12);
                    let marker = if g.locked {
                        "🔒"
                    } else if g.is_active(today()) {
                        "●"
                    } else {
                        "○"
                    };
                    println!(
                        "  #{:<3} {} {:<24} {} {:>3}/{} days",
                        g.id.unwrap_or(0),
                        marker,
                        g.title,
                        bar,
                        g.progress,
                        g.target_days
                    );
                }
            }
            println!();
        }
        GoalCommands::Lock { id } => {
            let mut goal = GoalRepo::get(conn, *id)?
                .ok_or_else(|| anyhow!("No goal with id {}", id))?;
            match goal.lock() {
                Ok(()) => {
                    GoalRepo::persist(conn, &goal)?;
                    println_colored!(
                        GREEN,
                        "  ✓ Goal \"{}\" locked — it cannot be modified until completion",
                        goal.title
                    );
                }
                Err(GoalError::LockTooEarly { progress }) => {
                    return Err(anyhow!(
                        "Goal \"{}\" has {} days of progress; {} are needed before locking",
                        goal.title,
                        progress,
                        LOCK_THRESHOLD
                    ));
                }
                Err(GoalError::AlreadyLocked) => {
                    return Err(anyhow!("Goal \"{}\" is already locked", goal.title));
                }
                Err(e) => {
                    return Err(anyhow!("Locking goal \"{}\": {}", goal.title, e));
                }
            }
        }
    }
    Ok(())
}

// ─── Fasting ─────────────────────────────────────────────────────────────────

pub fn handle_fast(conn: &Connection, config: &AppConfig, action: &FastCommands) -> Result<()> {
    if !config.fasting.enabled {
        return Err(anyhow!("Fasting tracking is disabled in config"));
    }
    match action {
        FastCommands::Log { kind, date, note } => {
            let mut kind = FastKind::from_str(kind)
                .map_err(|_| anyhow!("Unknown kind '{}'. Use: voluntary, ramadan, makeup", kind))?;
            // During Ramadan the default kind is ramadan, not voluntary.
            if kind == FastKind::Voluntary && is_ramadan(config.salah.hijri_offset) {
                kind = FastKind::Ramadan;
            }
            let date = match date {
                Some(s) => parse_cli_date(s)?,
                None => today(),
            };
            FastRepo::log(conn, date, kind, note.as_deref())?;
            println_colored!(GREEN, "  ✓ {} fast logged for {}", kind.display_name(), date);
        }
        FastCommands::Week => {
            let start = today() - chrono::Duration::days(6);
            let days = FastRepo::get_range(conn, start, today())?;
            println!();
            println_colored!(GOLD, "  Fasting — last 7 days");
            println!();
            if days.is_empty() {
                println_colored!(DIM, "  No fasts logged this week");
            } else {
                for d in &days {
                    let note = d.note.as_deref().unwrap_or("");
                    println!("  {}  {:<10} {}", d.date, d.kind.display_name(), note);
                }
                println!();
                println_colored!(DIM, "  Total: {}/7 days", days.len());
            }
            println!();
        }
    }
    Ok(())
}

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(conn: &Connection, config: &AppConfig) -> Result<()> {
    let now = Local::now();
    let today = now.date_naive();
    let now_time = now.time();

    let calc = PrayerCalculator::new(
        config.salah.latitude,
        config.salah.longitude,
        &config.salah.calc_method,
        &config.salah.madhab,
        config.salah.timezone_offset,
    )?;

    let times = calc.times_for_date(conn, today)?;

    println!();
    println_colored!(
        GOLD,
        "  Prayer Times — {} ({})",
        config.salah.location_name,
        today
    );
    println!();

    let schedule = [
        ("Fajr", times.fajr),
        ("Sunrise", times.sunrise),
        ("Zuhr", times.zuhr),
        ("Asr", times.asr),
        ("Maghrib", times.maghrib),
        ("Isha", times.isha),
    ];

    for (name, time) in &schedule {
        let time_str = time.format("%H:%M").to_string();
        if *time < now_time {
            println_colored!(DIM, "  {:<10}  {}", name, time_str);
        } else {
            println_colored!(BOLD, "  {:<10}  {}", name, time_str);
        }
    }

    if let Some((next, secs)) = calc.next_prayer(conn, today, now_time)? {
        println!();
        println_colored!(
            AMBER,
            "  Next: {} in {}",
            next.display_name(),
            format_duration_secs(secs)
        );
    }
    println!();
    Ok(())
}

// ─── Export ──────────────────────────────────────────────────────────────────

#[derive(serde::Serialize)]
struct WeeklyReport {
    generated: String,
    subject: String,
    summary: crate::models::Summary,
    week: Vec<WeeklyReportDay>,
    fasts_this_week: i64,
}

#[derive(serde::Serialize)]
struct WeeklyReportDay {
    date: String,
    outcome: Option<Outcome>,
}

pub fn handle_export(conn: &Connection, config: &AppConfig, json: bool) -> Result<()> {
    let premium = PremiumStatus::load(conn, today())?;
    if !premium.has_feature(Feature::WeeklyReports) {
        println_colored!(AMBER, "  Weekly reports are a premium feature.");
        println_colored!(DIM, "  Run `akhcheck premium activate` to unlock.");
        return Ok(());
    }

    let subject = &config.profile.subject;
    let records = CheckInRepo::get_all(conn, subject, "")?;
    let anchor = ledger::anchor_date(&records, today());
    let summary = ledger::summarize(&records, anchor)?;
    let week_start = today() - chrono::Duration::days(6);
    let fasts = FastRepo::count_range(conn, week_start, today())?;

    let week: Vec<WeeklyReportDay> = (0..7)
        .map(|i| {
            let date = week_start + chrono::Duration::days(i);
            WeeklyReportDay {
                date: date.to_string(),
                outcome: records.iter().find(|r| r.date == date).map(|r| r.outcome),
            }
        })
        .collect();

    if json {
        let report = WeeklyReport {
            generated: today().to_string(),
            subject: subject.clone(),
            summary,
            week,
            fasts_this_week: fasts,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("# AkhCheck — Weekly Summary");
    println!("# {}", today());
    println!();
    println!("Subject: {}", config.profile.display_name);
    println!();
    println!("## Check-ins (last 7 days)");
    for day in &week {
        let mark = match day.outcome {
            Some(Outcome::Disciplined) => "disciplined  ✓",
            Some(Outcome::Lapsed) => "lapsed       ✗",
            None => "no record    ·",
        };
        println!("  {}  {}", day.date, mark);
    }
    println!();
    println!("## Summary");
    println!(
        "  Streak:       {} days (best: {})",
        summary.current_streak, summary.longest_streak
    );
    println!("  Success rate: {}%", summary.success_rate);
    println!("  Points:       {}", format_points(summary.points));
    if let Some(badge) = summary.badge {
        println!("  Badge:        {}", badge);
    }
    println!("  Fasts (7d):   {}", fasts);
    Ok(())
}

// ─── Premium ─────────────────────────────────────────────────────────────────

pub fn handle_premium(conn: &Connection, action: &PremiumCommands) -> Result<()> {
    match action {
        PremiumCommands::Status => {
            let status = PremiumStatus::load(conn, today())?;
            println!();
            if status.active {
                let until = status
                    .expires_at
                    .map(|d| format!(" until {}", d))
                    .unwrap_or_default();
                println_colored!(GOLD, "  Premium: active{}", until);
            } else {
                println_colored!(DIM, "  Premium: inactive");
            }
            println!();
            for feature in Feature::all() {
                let mark = if status.has_feature(feature) {
                    format!("{}✓\x1b[0m", GREEN)
                } else {
                    format!("{}✗\x1b[0m", DIM)
                };
                println!("  {}  {}", mark, feature.display_name());
            }
            println!();
        }
        PremiumCommands::Activate => {
            let status = PremiumStatus::activate(conn, today(), 30)?;
            println_colored!(
                GOLD,
                "  ✓ Premium active until {}",
                status.expires_at.map(|d| d.to_string()).unwrap_or_default()
            );
        }
        PremiumCommands::Deactivate => {
            PremiumStatus::deactivate(conn)?;
            println_colored!(DIM, "  Premium deactivated");
        }
    }
    Ok(())
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    io::stdout().flush()?;
    let mut buf = String::new();
    io::stdin().lock().read_line(&mut buf)?;
    Ok(buf.trim_end_matches('\n').trim_end_matches('\r').trim().to_string())
}

/// Prompt for a value; blank keeps the default (returns None).
fn prompt_parse<T: FromStr>(message: &str) -> Result<Option<T>> {
    loop {
        let input = prompt(message)?;
        if input.is_empty() {
            return Ok(None);
        }
        match input.parse::<T>() {
            Ok(v) => return Ok(Some(v)),
            Err(_) => println_colored!(RED, "  Invalid value, try again"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn open_test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = Connection::open(dir.path().join("test.db")).unwrap();
        run_migrations(&conn).unwrap();
        (dir, conn)
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn amend_does_not_double_count_goal_progress() {
        let (_dir, conn) = open_test_db();
        let config = AppConfig::default();
        let goal = Goal::new("me", "discipline", "", 30, day(2024, 8, 1), false);
        GoalRepo::create(&conn, &goal).unwrap();

        handle_checkin(&conn, &config, "disciplined", None, Some("2024-08-10"), false).unwrap();
        handle_checkin(&conn, &config, "disciplined", None, Some("2024-08-10"), true).unwrap();

        let records = CheckInRepo::get_all(&conn, "me", "").unwrap();
        assert_eq!(records.len(), 1);
        let goal = GoalRepo::list(&conn, "me").unwrap().remove(0);
        assert_eq!(goal.progress, 1);
    }

    #[test]
    fn amend_from_lapsed_still_advances_goal() {
        let (_dir, conn) = open_test_db();
        let config = AppConfig::default();
        let goal = Goal::new("me", "discipline", "", 30, day(2024, 8, 1), false);
        GoalRepo::create(&conn, &goal).unwrap();

        handle_checkin(&conn, &config, "lapsed", None, Some("2024-08-10"), false).unwrap();
        handle_checkin(&conn, &config, "disciplined", None, Some("2024-08-10"), true).unwrap();

        let goal = GoalRepo::list(&conn, "me").unwrap().remove(0);
        assert_eq!(goal.progress, 1);
    }

    #[test]
    fn monthly_trend_covers_whole_past_months() {
        let (_dir, conn) = open_test_db();
        let upsert = |date, outcome| {
            CheckInRepo::upsert(&conn, &CheckIn::new("me", "", date, outcome)).unwrap();
        };
        upsert(day(2024, 7, 1), Outcome::Lapsed);
        upsert(day(2024, 7, 31), Outcome::Disciplined);
        upsert(day(2024, 8, 3), Outcome::Disciplined);

        // Early in the month, July's bar must still cover July 6..=31.
        let rates = monthly_rates(&conn, "me", 2, day(2024, 8, 5)).unwrap();
        assert_eq!(rates, vec![(day(2024, 7, 1), 50), (day(2024, 8, 1), 100)]);
    }
}
