use anyhow::Result;
use rusqlite::Connection;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS check_ins (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            subject    TEXT NOT NULL,
            group_id   TEXT NOT NULL DEFAULT '',
            date       TEXT NOT NULL,
            outcome    TEXT NOT NULL CHECK(outcome IN ('disciplined','lapsed')),
            created_at TEXT DEFAULT (datetime('now')),
            UNIQUE(subject, group_id, date)
        );

        CREATE TABLE IF NOT EXISTS goals (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            subject     TEXT NOT NULL,
            title       TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            target_days INTEGER NOT NULL CHECK(target_days > 0),
            start_date  TEXT NOT NULL,
            end_date    TEXT NOT NULL,
            locked      INTEGER NOT NULL DEFAULT 0,
            is_public   INTEGER NOT NULL DEFAULT 0,
            progress    INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS group_members (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            group_id     TEXT NOT NULL,
            subject      TEXT NOT NULL,
            display_name TEXT NOT NULL,
            joined_at    TEXT DEFAULT (datetime('now')),
            UNIQUE(group_id, subject)
        );

        CREATE TABLE IF NOT EXISTS fasting_log (
            id    INTEGER PRIMARY KEY AUTOINCREMENT,
            date  TEXT NOT NULL UNIQUE,
            kind  TEXT NOT NULL CHECK(kind IN ('voluntary','ramadan','makeup')),
            note  TEXT
        );

        CREATE TABLE IF NOT EXISTS prayer_times_cache (
            date     TEXT PRIMARY KEY,
            fajr     TEXT,
            sunrise  TEXT,
            zuhr     TEXT,
            asr      TEXT,
            maghrib  TEXT,
            isha     TEXT
        );

        CREATE TABLE IF NOT EXISTS app_meta (
            key   TEXT PRIMARY KEY,
            value TEXT
        );
    ")?;
    Ok(())
}
