use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use rusqlite::Connection;
use salah::prelude::*;

use crate::db::repository::{CacheRepo, CachedTimes};

/// The five daily prayers, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrayerSlot {
    Fajr,
    Zuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerSlot {
    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerSlot::Fajr => "Fajr",
            PrayerSlot::Zuhr => "Zuhr",
            PrayerSlot::Asr => "Asr",
            PrayerSlot::Maghrib => "Maghrib",
            PrayerSlot::Isha => "Isha",
        }
    }
}

/// Calculation method names accepted in config, paired with the salah enum.
const METHOD_TABLE: &[(&str, Method)] = &[
    ("MuslimWorldLeague", Method::MuslimWorldLeague),
    ("Egyptian", Method::Egyptian),
    ("Karachi", Method::Karachi),
    ("UmmAlQura", Method::UmmAlQura),
    ("Dubai", Method::Dubai),
    ("MoonsightingCommittee", Method::MoonsightingCommittee),
    ("NorthAmerica", Method::NorthAmerica),
    ("Kuwait", Method::Kuwait),
    ("Qatar", Method::Qatar),
    ("Singapore", Method::Singapore),
    ("Tehran", Method::Tehran),
    ("Turkey", Method::Turkey),
    ("Other", Method::Other),
];

pub const CALC_METHODS: &[&str] = &[
    "MuslimWorldLeague",
    "Egyptian",
    "Karachi",
    "UmmAlQura",
    "Dubai",
    "MoonsightingCommittee",
    "NorthAmerica",
    "Kuwait",
    "Qatar",
    "Singapore",
    "Tehran",
    "Turkey",
    "Other",
];

fn parse_method(s: &str) -> Result<Method> {
    METHOD_TABLE
        .iter()
        .find(|(name, _)| *name == s)
        .map(|(_, m)| *m)
        .ok_or_else(|| anyhow!("Unknown calculation method: '{}'", s))
}

fn parse_madhab(s: &str) -> Result<Madhab> {
    match s {
        "Hanafi" => Ok(Madhab::Hanafi),
        "Shafi" | "Shafi'i" => Ok(Madhab::Shafi),
        _ => Err(anyhow!("Unknown madhab: '{}'", s)),
    }
}

/// Offline prayer-time computation, validated once at construction.
pub struct PrayerCalculator {
    lat: f64,
    lng: f64,
    method: Method,
    madhab: Madhab,
    offset: FixedOffset,
}

impl PrayerCalculator {
    pub fn new(
        lat: f64,
        lng: f64,
        method: &str,
        madhab: &str,
        tz_offset_minutes: i32,
    ) -> Result<Self> {
        let offset = FixedOffset::east_opt(tz_offset_minutes * 60)
            .ok_or_else(|| anyhow!("Invalid timezone offset: {}", tz_offset_minutes))?;
        Ok(Self {
            lat,
            lng,
            method: parse_method(method)?,
            madhab: parse_madhab(madhab)?,
            offset,
        })
    }

    fn local_time(&self, utc: DateTime<Utc>) -> NaiveTime {
        utc.with_timezone(&self.offset).time()
    }

    fn compute_times(&self, date: NaiveDate) -> Result<CachedTimes> {
        let schedule = PrayerSchedule::new()
            .on(date)
            .for_location(Coordinates::new(self.lat, self.lng))
            .with_configuration(Configuration::with(self.method, self.madhab))
            .calculate()
            .map_err(|e| anyhow!("Prayer calculation failed: {}", e))?;

        Ok(CachedTimes {
            fajr: self.local_time(schedule.time(Prayer::Fajr)),
            sunrise: self.local_time(schedule.time(Prayer::Sunrise)),
            zuhr: self.local_time(schedule.time(Prayer::Dhuhr)),
            asr: self.local_time(schedule.time(Prayer::Asr)),
            maghrib: self.local_time(schedule.time(Prayer::Maghrib)),
            isha: self.local_time(schedule.time(Prayer::Isha)),
        })
    }

    /// Get times from cache, computing and caching on a miss.
    pub fn times_for_date(&self, conn: &Connection, date: NaiveDate) -> Result<CachedTimes> {
        if let Some(cached) = CacheRepo::get_times_for_date(conn, date)? {
            return Ok(cached);
        }
        let times = self.compute_times(date)?;
        CacheRepo::store_times(conn, date, &times)?;
        Ok(times)
    }

    /// Fill the cache for today through `days_ahead` days out.
    pub fn ensure_cached(&self, conn: &Connection, days_ahead: u32) -> Result<()> {
        let today = chrono::Local::now().date_naive();
        for i in 0..=(days_ahead as i64) {
            self.times_for_date(conn, today + Duration::days(i))?;
        }
        Ok(())
    }

    /// Returns (next prayer, seconds until it), rolling over to tomorrow's
    /// Fajr once all of today's prayers have passed.
    pub fn next_prayer(
        &self,
        conn: &Connection,
        now_date: NaiveDate,
        now_time: NaiveTime,
    ) -> Result<Option<(PrayerSlot, i64)>> {
        let today = self.times_for_date(conn, now_date)?;

        let schedule = [
            (PrayerSlot::Fajr, today.fajr),
            (PrayerSlot::Zuhr, today.zuhr),
            (PrayerSlot::Asr, today.asr),
            (PrayerSlot::Maghrib, today.maghrib),
            (PrayerSlot::Isha, today.isha),
        ];
        for (slot, time) in schedule {
            if time > now_time {
                return Ok(Some((slot, (time - now_time).num_seconds())));
            }
        }

        // After Isha: count across midnight into tomorrow's Fajr.
        let tomorrow = now_date.succ_opt().unwrap_or(now_date);
        let fajr = self.times_for_date(conn, tomorrow)?.fajr;
        let midnight = NaiveTime::from_hms_opt(0, 0, 0).unwrap();
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap();
        let secs = (end_of_day - now_time).num_seconds() + (fajr - midnight).num_seconds() + 1;
        Ok(Some((PrayerSlot::Fajr, secs)))
    }
}
