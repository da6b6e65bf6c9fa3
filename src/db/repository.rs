use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use crate::models::{CheckIn, FastDay, FastKind, Goal, Outcome};

const DATE_FMT: &str = "%Y-%m-%d";

fn fmt_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|e| anyhow!("Bad date '{}': {}", s, e))
}

// ─── Check-in ledger ─────────────────────────────────────────────────────────

pub struct CheckInRepo;

impl CheckInRepo {
    /// Append-or-replace: at most one record per (subject, group, date).
    pub fn upsert(conn: &Connection, record: &CheckIn) -> Result<()> {
        conn.execute(
            "INSERT INTO check_ins (subject, group_id, date, outcome)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(subject, group_id, date)
             DO UPDATE SET outcome = ?4, created_at = datetime('now')",
            params![
                record.subject,
                record.group,
                fmt_date(record.date),
                record.outcome.as_str()
            ],
        )?;
        Ok(())
    }

    pub fn get_for_date(
        conn: &Connection,
        subject: &str,
        group: &str,
        date: NaiveDate,
    ) -> Result<Option<CheckIn>> {
        let row = conn
            .query_row(
                "SELECT id, subject, group_id, date, outcome, created_at
                 FROM check_ins WHERE subject = ?1 AND group_id = ?2 AND date = ?3",
                params![subject, group, fmt_date(date)],
                row_to_checkin_tuple,
            )
            .optional()?;
        row.map(tuple_to_checkin).transpose()
    }

    pub fn get_all(conn: &Connection, subject: &str, group: &str) -> Result<Vec<CheckIn>> {
        let mut stmt = conn.prepare(
            "SELECT id, subject, group_id, date, outcome, created_at
             FROM check_ins WHERE subject = ?1 AND group_id = ?2
             ORDER BY date",
        )?;
        let rows = stmt.query_map(params![subject, group], row_to_checkin_tuple)?;
        collect_checkins(rows)
    }

    pub fn get_range(
        conn: &Connection,
        subject: &str,
        group: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<CheckIn>> {
        let mut stmt = conn.prepare(
            "SELECT id, subject, group_id, date, outcome, created_at
             FROM check_ins
             WHERE subject = ?1 AND group_id = ?2 AND date >= ?3 AND date <= ?4
             ORDER BY date",
        )?;
        let rows = stmt.query_map(
            params![subject, group, fmt_date(start), fmt_date(end)],
            row_to_checkin_tuple,
        )?;
        collect_checkins(rows)
    }
}

type CheckInTuple = (i64, String, String, String, String, Option<String>);

fn row_to_checkin_tuple(row: &rusqlite::Row<'_>) -> rusqlite::Result<CheckInTuple> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn tuple_to_checkin(t: CheckInTuple) -> Result<CheckIn> {
    let (id, subject, group, date, outcome, created_at) = t;
    Ok(CheckIn {
        id: Some(id),
        subject,
        group,
        date: parse_date(&date)?,
        outcome: Outcome::from_str(&outcome)?,
        created_at,
    })
}

fn collect_checkins(
    rows: impl Iterator<Item = rusqlite::Result<CheckInTuple>>,
) -> Result<Vec<CheckIn>> {
    let mut result = Vec::new();
    for r in rows {
        result.push(tuple_to_checkin(r?)?);
    }
    Ok(result)
}

// ─── Goals ───────────────────────────────────────────────────────────────────

pub struct GoalRepo;

impl GoalRepo {
    pub fn create(conn: &Connection, goal: &Goal) -> Result<i64> {
        conn.execute(
            "INSERT INTO goals
                (subject, title, description, target_days, start_date, end_date,
                 locked, is_public, progress)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                goal.subject,
                goal.title,
                goal.description,
                goal.target_days,
                fmt_date(goal.start_date),
                fmt_date(goal.end_date),
                goal.locked as i32,
                goal.is_public as i32,
                goal.progress,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn get(conn: &Connection, id: i64) -> Result<Option<Goal>> {
        let row = conn
            .query_row(
                "SELECT id, subject, title, description, target_days, start_date,
                        end_date, locked, is_public, progress
                 FROM goals WHERE id = ?1",
                params![id],
                row_to_goal_tuple,
            )
            .optional()?;
        row.map(tuple_to_goal).transpose()
    }

    pub fn list(conn: &Connection, subject: &str) -> Result<Vec<Goal>> {
        let mut stmt = conn.prepare(
            "SELECT id, subject, title, description, target_days, start_date,
                    end_date, locked, is_public, progress
             FROM goals WHERE subject = ?1 ORDER BY start_date, id",
        )?;
        let rows = stmt.query_map(params![subject], row_to_goal_tuple)?;
        let mut result = Vec::new();
        for r in rows {
            result.push(tuple_to_goal(r?)?);
        }
        Ok(result)
    }

    /// The earliest-started goal whose window contains `today`.
    pub fn active_for(conn: &Connection, subject: &str, today: NaiveDate) -> Result<Option<Goal>> {
        let goals = Self::list(conn, subject)?;
        Ok(goals.into_iter().find(|g| g.is_active(today)))
    }

    pub fn persist(conn: &Connection, goal: &Goal) -> Result<()> {
        let id = goal
            .id
            .ok_or_else(|| anyhow!("Cannot persist a goal without an id"))?;
        conn.execute(
            "UPDATE goals SET locked = ?1, progress = ?2 WHERE id = ?3",
            params![goal.locked as i32, goal.progress, id],
        )?;
        Ok(())
    }

    /// Advance every active, unlocked goal that still has room. Returns the
    /// titles of the goals that moved.
    pub fn advance_active(
        conn: &Connection,
        subject: &str,
        today: NaiveDate,
    ) -> Result<Vec<String>> {
        let mut advanced = Vec::new();
        for mut goal in Self::list(conn, subject)? {
            if goal.is_active(today) && !goal.locked && goal.has_room() {
                // Guarded by the checks above; the model enforces them again.
                if goal.record_progress().is_ok() {
                    Self::persist(conn, &goal)?;
                    advanced.push(goal.title);
                }
            }
        }
        Ok(advanced)
    }
}

type GoalTuple = (
    i64,
    String,
    String,
    String,
    u32,
    String,
    String,
    i32,
    i32,
    u32,
);

fn row_to_goal_tuple(row: &rusqlite::Row<'_>) -> rusqlite::Result<GoalTuple> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
        row.get(9)?,
    ))
}

fn tuple_to_goal(t: GoalTuple) -> Result<Goal> {
    let (id, subject, title, description, target_days, start, end, locked, is_public, progress) = t;
    Ok(Goal {
        id: Some(id),
        subject,
        title,
        description,
        target_days,
        start_date: parse_date(&start)?,
        end_date: parse_date(&end)?,
        locked: locked != 0,
        is_public: is_public != 0,
        progress,
    })
}

// ─── Group membership ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GroupMember {
    pub subject: String,
    pub display_name: String,
}

pub struct GroupRepo;

impl GroupRepo {
    pub fn add_member(
        conn: &Connection,
        group: &str,
        subject: &str,
        display_name: &str,
    ) -> Result<()> {
        conn.execute(
            "INSERT INTO group_members (group_id, subject, display_name)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(group_id, subject) DO UPDATE SET display_name = ?3",
            params![group, subject, display_name],
        )?;
        Ok(())
    }

    /// Members in join order. Leaderboard ranking is a stable sort, so this
    /// order is the tie-break for equal scores.
    pub fn members(conn: &Connection, group: &str) -> Result<Vec<GroupMember>> {
        let mut stmt = conn.prepare(
            "SELECT subject, display_name FROM group_members
             WHERE group_id = ?1 ORDER BY joined_at, id",
        )?;
        let rows = stmt.query_map(params![group], |row| {
            Ok(GroupMember {
                subject: row.get(0)?,
                display_name: row.get(1)?,
            })
        })?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(anyhow::Error::from)
    }
}

// ─── Fasting log ─────────────────────────────────────────────────────────────

pub struct FastRepo;

impl FastRepo {
    pub fn log(conn: &Connection, date: NaiveDate, kind: FastKind, note: Option<&str>) -> Result<()> {
        conn.execute(
            "INSERT INTO fasting_log (date, kind, note) VALUES (?1, ?2, ?3)
             ON CONFLICT(date) DO UPDATE SET kind = ?2, note = ?3",
            params![fmt_date(date), kind.as_str(), note],
        )?;
        Ok(())
    }

    pub fn get_range(conn: &Connection, start: NaiveDate, end: NaiveDate) -> Result<Vec<FastDay>> {
        let mut stmt = conn.prepare(
            "SELECT id, date, kind, note FROM fasting_log
             WHERE date >= ?1 AND date <= ?2 ORDER BY date",
        )?;
        let rows = stmt.query_map(params![fmt_date(start), fmt_date(end)], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (id, date, kind, note) = r?;
            result.push(FastDay {
                id: Some(id),
                date: parse_date(&date)?,
                kind: FastKind::from_str(&kind)?,
                note,
            });
        }
        Ok(result)
    }

    pub fn count_range(conn: &Connection, start: NaiveDate, end: NaiveDate) -> Result<i64> {
        conn.query_row(
            "SELECT COUNT(*) FROM fasting_log WHERE date >= ?1 AND date <= ?2",
            params![fmt_date(start), fmt_date(end)],
            |row| row.get(0),
        )
        .map_err(anyhow::Error::from)
    }
}

// ─── Cached prayer times ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CachedTimes {
    pub fajr: NaiveTime,
    pub sunrise: NaiveTime,
    pub zuhr: NaiveTime,
    pub asr: NaiveTime,
    pub maghrib: NaiveTime,
    pub isha: NaiveTime,
}

fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| anyhow!("Bad time '{}': {}", s, e))
}

pub struct CacheRepo;

impl CacheRepo {
    pub fn get_times_for_date(conn: &Connection, date: NaiveDate) -> Result<Option<CachedTimes>> {
        let row = conn
            .query_row(
                "SELECT fajr, sunrise, zuhr, asr, maghrib, isha
                 FROM prayer_times_cache WHERE date = ?1",
                params![fmt_date(date)],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;

        match row {
            None => Ok(None),
            Some((fajr, sunrise, zuhr, asr, maghrib, isha)) => Ok(Some(CachedTimes {
                fajr: parse_time(&fajr)?,
                sunrise: parse_time(&sunrise)?,
                zuhr: parse_time(&zuhr)?,
                asr: parse_time(&asr)?,
                maghrib: parse_time(&maghrib)?,
                isha: parse_time(&isha)?,
            })),
        }
    }

    pub fn store_times(conn: &Connection, date: NaiveDate, times: &CachedTimes) -> Result<()> {
        conn.execute(
            "INSERT OR REPLACE INTO prayer_times_cache
                (date, fajr, sunrise, zuhr, asr, maghrib, isha)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                fmt_date(date),
                times.fajr.format("%H:%M").to_string(),
                times.sunrise.format("%H:%M").to_string(),
                times.zuhr.format("%H:%M").to_string(),
                times.asr.format("%H:%M").to_string(),
                times.maghrib.format("%H:%M").to_string(),
                times.isha.format("%H:%M").to_string(),
            ],
        )?;
        Ok(())
    }

    pub fn clear_all(conn: &Connection) -> Result<()> {
        conn.execute("DELETE FROM prayer_times_cache", [])?;
        Ok(())
    }
}

// ─── App meta ────────────────────────────────────────────────────────────────

pub struct MetaRepo;

impl MetaRepo {
    pub fn get(conn: &Connection, key: &str) -> Result<Option<String>> {
        conn.query_row(
            "SELECT value FROM app_meta WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(anyhow::Error::from)
    }

    pub fn set(conn: &Connection, key: &str, value: &str) -> Result<()> {
        conn.execute(
            "INSERT INTO app_meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn delete(conn: &Connection, key: &str) -> Result<()> {
        conn.execute("DELETE FROM app_meta WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::models::Outcome;

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
    fn checkin_upsert_replaces_same_day() {
        let (_dir, conn) = open_test_db();
        let date = day(2026, 8, 29);

        let first = CheckIn::new("yusuf", "", date, Outcome::Lapsed);
        CheckInRepo::upsert(&conn, &first).unwrap();
        let second = CheckIn::new("yusuf", "", date, Outcome::Disciplined);
        CheckInRepo::upsert(&conn, &second).unwrap();

        let all = CheckInRepo::get_all(&conn, "yusuf", "").unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].outcome, Outcome::Disciplined);
    }

    #[test]
    fn checkins_are_scoped_per_group() {
        let (_dir, conn) = open_test_db();
        let date = day(2026, 8, 29);

        CheckInRepo::upsert(&conn, &CheckIn::new("yusuf", "", date, Outcome::Disciplined))
            .unwrap();
        CheckInRepo::upsert(
            &conn,
            &CheckIn::new("yusuf", "masjid-crew", date, Outcome::Lapsed),
        )
        .unwrap();

        let personal = CheckInRepo::get_all(&conn, "yusuf", "").unwrap();
        let grouped = CheckInRepo::get_all(&conn, "yusuf", "masjid-crew").unwrap();
        assert_eq!(personal.len(), 1);
        assert_eq!(grouped.len(), 1);
        assert_eq!(personal[0].outcome, Outcome::Disciplined);
        assert_eq!(grouped[0].outcome, Outcome::Lapsed);
    }

    #[test]
    fn checkin_range_is_inclusive() {
        let (_dir, conn) = open_test_db();
        for d in 25..=29 {
            let record = CheckIn::new("yusuf", "", day(2026, 8, d), Outcome::Disciplined);
            CheckInRepo::upsert(&conn, &record).unwrap();
        }
        let range =
            CheckInRepo::get_range(&conn, "yusuf", "", day(2026, 8, 26), day(2026, 8, 28))
                .unwrap();
        assert_eq!(range.len(), 3);
        assert_eq!(range[0].date, day(2026, 8, 26));
        assert_eq!(range[2].date, day(2026, 8, 28));
    }

    #[test]
    fn goal_roundtrip_and_lock() {
        let (_dir, conn) = open_test_db();
        let goal = Goal::new("yusuf", "30 days strong", "no excuses", 30, day(2026, 8, 1), true);
        let id = GoalRepo::create(&conn, &goal).unwrap();

        let mut loaded = GoalRepo::get(&conn, id).unwrap().unwrap();
        assert_eq!(loaded.title, "30 days strong");
        assert!(!loaded.locked);

        loaded.progress = 7;
        loaded.lock().unwrap();
        GoalRepo::persist(&conn, &loaded).unwrap();

        let reloaded = GoalRepo::get(&conn, id).unwrap().unwrap();
        assert!(reloaded.locked);
        assert_eq!(reloaded.progress, 7);
    }

    #[test]
    fn advance_skips_locked_and_full_goals() {
        let (_dir, conn) = open_test_db();
        let start = day(2026, 8, 1);
        let today = day(2026, 8, 10);

        GoalRepo::create(&conn, &Goal::new("yusuf", "open", "", 30, start, false)).unwrap();
        let mut locked = Goal::new("yusuf", "locked", "", 30, start, false);
        locked.progress = 7;
        locked.locked = true;
        let locked_id = GoalRepo::create(&conn, &locked).unwrap();
        let mut full = Goal::new("yusuf", "full", "", 5, start, false);
        full.progress = 5;
        GoalRepo::create(&conn, &full).unwrap();

        let advanced = GoalRepo::advance_active(&conn, "yusuf", today).unwrap();
        assert_eq!(advanced, vec!["open".to_string()]);

        let still_locked = GoalRepo::get(&conn, locked_id).unwrap().unwrap();
        assert_eq!(still_locked.progress, 7);
    }

    #[test]
    fn group_members_keep_join_order() {
        let (_dir, conn) = open_test_db();
        GroupRepo::add_member(&conn, "crew", "amir", "Amir").unwrap();
        GroupRepo::add_member(&conn, "crew", "bilal", "Bilal").unwrap();
        GroupRepo::add_member(&conn, "crew", "amir", "Amir K.").unwrap(); // rename only

        let members = GroupRepo::members(&conn, "crew").unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].subject, "amir");
        assert_eq!(members[0].display_name, "Amir K.");
        assert_eq!(members[1].subject, "bilal");
    }

    #[test]
    fn fast_log_one_row_per_day() {
        let (_dir, conn) = open_test_db();
        let date = day(2026, 8, 27);
        FastRepo::log(&conn, date, FastKind::Voluntary, None).unwrap();
        FastRepo::log(&conn, date, FastKind::Makeup, Some("missed in Ramadan")).unwrap();

        let days = FastRepo::get_range(&conn, date, date).unwrap();
        assert_eq!(days.len(), 1);
        assert_eq!(days[0].kind, FastKind::Makeup);
        assert_eq!(FastRepo::count_range(&conn, date, date).unwrap(), 1);
    }

    #[test]
    fn meta_roundtrip() {
        let (_dir, conn) = open_test_db();
        assert!(MetaRepo::get(&conn, "setup_done").unwrap().is_none());
        MetaRepo::set(&conn, "setup_done", "1").unwrap();
        MetaRepo::set(&conn, "setup_done", "1").unwrap();
        assert_eq!(MetaRepo::get(&conn, "setup_done").unwrap().as_deref(), Some("1"));
        MetaRepo::delete(&conn, "setup_done").unwrap();
        assert!(MetaRepo::get(&conn, "setup_done").unwrap().is_none());
    }
}
