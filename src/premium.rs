use anyhow::Result;
use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::repository::MetaRepo;

const META_PREMIUM: &str = "premium";
const META_PREMIUM_EXPIRES: &str = "premium_expires_at";

/// Features behind the premium flag. Everything else is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    WeeklyReports,
    MonthlyTrends,
}

impl Feature {
    pub fn display_name(&self) -> &'static str {
        match self {
            Feature::WeeklyReports => "Weekly reports (export)",
            Feature::MonthlyTrends => "Monthly trends (stats --months)",
        }
    }

    pub fn all() -> Vec<Feature> {
        vec![Feature::WeeklyReports, Feature::MonthlyTrends]
    }
}

/// Premium state is a flag plus an optional expiry date in app meta. An
/// expired flag counts as inactive without being rewritten.
#[derive(Debug, Clone, Default)]
pub struct PremiumStatus {
    pub active: bool,
    pub expires_at: Option<NaiveDate>,
}

impl PremiumStatus {
    pub fn load(conn: &Connection, today: NaiveDate) -> Result<Self> {
        let flagged = MetaRepo::get(conn, META_PREMIUM)?.as_deref() == Some("1");
        let expires_at = MetaRepo::get(conn, META_PREMIUM_EXPIRES)?
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok());

        let active = flagged && expires_at.map(|e| e >= today).unwrap_or(true);
        Ok(Self { active, expires_at })
    }

    pub fn has_feature(&self, _feature: Feature) -> bool {
        // All premium features ship together for now.
        self.active
    }

    pub fn activate(conn: &Connection, today: NaiveDate, days: i64) -> Result<Self> {
        let expires = today + chrono::Duration::days(days);
        MetaRepo::set(conn, META_PREMIUM, "1")?;
        MetaRepo::set(conn, META_PREMIUM_EXPIRES, &expires.format("%Y-%m-%d").to_string())?;
        Ok(Self {
            active: true,
            expires_at: Some(expires),
        })
    }

    pub fn deactivate(conn: &Connection) -> Result<()> {
        MetaRepo::set(conn, META_PREMIUM, "0")?;
        MetaRepo::delete(conn, META_PREMIUM_EXPIRES)?;
        Ok(())
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

    #[test]
    fn inactive_by_default() {
        let (_dir, conn) = open_test_db();
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();
        let status = PremiumStatus::load(&conn, today).unwrap();
        assert!(!status.active);
        assert!(!status.has_feature(Feature::WeeklyReports));
    }

    #[test]
    fn activation_and_expiry() {
        let (_dir, conn) = open_test_db();
        let today = NaiveDate::from_ymd_opt(2026, 8, 29).unwrap();

        let status = PremiumStatus::activate(&conn, today, 30).unwrap();
        assert!(status.active);

        let reloaded = PremiumStatus::load(&conn, today).unwrap();
        assert!(reloaded.active);
        assert!(reloaded.has_feature(Feature::MonthlyTrends));

        // Past the expiry date the flag no longer counts.
        let later = today + chrono::Duration::days(31);
        let expired = PremiumStatus::load(&conn, later).unwrap();
        assert!(!expired.active);

        PremiumStatus::deactivate(&conn).unwrap();
        let off = PremiumStatus::load(&conn, today).unwrap();
        assert!(!off.active);
    }
}
