use chrono::{Datelike, Duration};
use hijri_date::HijriDate;

/// Islamic month names in English (index 0 = Muharram = month 1)
const HIJRI_MONTH_NAMES: &[&str] = &[
    "Muharram",
    "Safar",
    "Rabi' al-Awwal",
    "Rabi' al-Thani",
    "Jumada al-Awwal",
    "Jumada al-Thani",
    "Rajab",
    "Sha'ban",
    "Ramadan",
    "Shawwal",
    "Dhu al-Qi'dah",
    "Dhu al-Hijjah",
];

fn hijri_month_name(month: usize) -> &'static str {
    if (1..=12).contains(&month) {
        HIJRI_MONTH_NAMES[month - 1]
    } else {
        "Unknown"
    }
}

/// Returns the Hijri date string for today, with an optional day offset.
/// `offset_days` lets users adjust for local moon sighting differences
/// (e.g., -1 if your country is one day behind Saudi Arabia).
pub fn today_hijri_string(offset_days: i32) -> String {
    let today = chrono::Local::now().date_naive();
    let adjusted = today + Duration::days(offset_days as i64);

    match HijriDate::from_gr(
        adjusted.year() as usize,
        adjusted.month() as usize,
        adjusted.day() as usize,
    ) {
        Ok(hd) => format!("{} {} {}", hd.day(), hijri_month_name(hd.month()), hd.year()),
        Err(_) => {
            let hd = HijriDate::today();
            format!("{} {} {}", hd.day(), hijri_month_name(hd.month()), hd.year())
        }
    }
}

/// True during Ramadan (after the configured moon-sighting offset), used to
/// pre-select the fast kind.
pub fn is_ramadan(offset_days: i32) -> bool {
    let today = chrono::Local::now().date_naive() + Duration::days(offset_days as i64);
    HijriDate::from_gr(
        today.year() as usize,
        today.month() as usize,
        today.day() as usize,
    )
    .map(|hd| hd.month() == 9)
    .unwrap_or(false)
}
