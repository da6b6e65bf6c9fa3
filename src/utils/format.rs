use chrono::NaiveTime;

/// Format a duration in seconds to "Xh Ym" or "Ym" string
pub fn format_duration_secs(secs: i64) -> String {
    if secs <= 0 {
        return "now".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a NaiveTime to "HH:MM"
pub fn format_time(t: NaiveTime) -> String {
    t.format("%H:%M").to_string()
}

/// Signed point total with an explicit + for positives
pub fn format_points(points: i64) -> String {
    if points > 0 {
        format!("+{}", points)
    } else {
        format!("{}", points)
    }
}

/// Create a simple ASCII progress bar
pub fn progress_bar(filled: u32, total: u32, width: usize) -> String {
    if total == 0 {
        return "░".repeat(width);
    }
    let ratio = (filled as f64 / total as f64).min(1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration_secs(-5), "now");
        assert_eq!(format_duration_secs(90), "1m");
        assert_eq!(format_duration_secs(3660), "1h 1m");
    }

    #[test]
    fn points_carry_sign() {
        assert_eq!(format_points(25), "+25");
        assert_eq!(format_points(0), "0");
        assert_eq!(format_points(-10), "-10");
    }

    #[test]
    fn progress_bar_clamps() {
        assert_eq!(progress_bar(0, 0, 4), "░░░░");
        assert_eq!(progress_bar(10, 5, 4), "████");
        assert_eq!(progress_bar(2, 4, 4), "██░░");
    }
}
