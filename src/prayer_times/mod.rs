pub mod calculator;

pub use calculator::{PrayerCalculator, PrayerSlot, CALC_METHODS};
