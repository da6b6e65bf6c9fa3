use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::db::repository::CachedTimes;
use crate::prayer_times::PrayerSlot;
use crate::tui::theme;
use crate::utils::format::{format_duration_secs, format_time};

pub fn render(
    frame: &mut Frame,
    area: Rect,
    times: Option<&CachedTimes>,
    next: Option<&(PrayerSlot, i64)>,
) {
    let block = Block::default()
        .title(Span::styled(" Prayer Times ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    let mut lines = vec![Line::from("")];

    match times {
        None => lines.push(Line::from(Span::styled("  No data", theme::dim()))),
        Some(t) => {
            let schedule = [
                (PrayerSlot::Fajr, t.fajr),
                (PrayerSlot::Zuhr, t.zuhr),
                (PrayerSlot::Asr, t.asr),
                (PrayerSlot::Maghrib, t.maghrib),
                (PrayerSlot::Isha, t.isha),
            ];
            for (slot, time) in &schedule {
                let is_next = next.map(|(n, _)| n == slot).unwrap_or(false);
                let name_style = if is_next {
                    theme::gold().add_modifier(Modifier::BOLD)
                } else {
                    theme::dim()
                };
                lines.push(Line::from(vec![
                    Span::styled(format!("  {:<8}", slot.display_name()), name_style),
                    Span::styled(format_time(*time), theme::dim()),
                ]));
            }
        }
    }

    if let Some((slot, secs)) = next {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("  Next: ", theme::dim()),
            Span::styled(
                format!("{} in {}", slot.display_name(), format_duration_secs(*secs)),
                theme::amber(),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
