use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{Outcome, Summary};
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, summary: &Summary, week: &[Option<Outcome>]) {
    let block = Block::default()
        .title(Span::styled(" Streak ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    // Streak bar, filled proportional to streak/30 (the Legend threshold)
    let bar_len = 12usize;
    let ratio = (summary.current_streak as f64 / 30.0).min(1.0);
    let filled = (ratio * bar_len as f64).round() as usize;
    let empty = bar_len.saturating_sub(filled);
    let bar = format!("{}{}", "█".repeat(filled), "░".repeat(empty));

    let streak_line = Line::from(vec![
        Span::styled("  ", theme::dim()),
        Span::styled(bar, theme::green()),
        Span::styled(
            format!("  {} days", summary.current_streak),
            theme::green().add_modifier(Modifier::BOLD),
        ),
    ]);

    // Last 7 days as dots, oldest first
    let mut dot_spans = vec![Span::styled("  ", theme::dim())];
    for day in week {
        let (dot, style) = match day {
            Some(Outcome::Disciplined) => ("●", theme::green().add_modifier(Modifier::BOLD)),
            Some(Outcome::Lapsed) => ("✗", theme::red()),
            None => ("·", theme::dim()),
        };
        dot_spans.push(Span::styled(dot, style));
        dot_spans.push(Span::styled("  ", theme::dim()));
    }
    let dots_line = Line::from(dot_spans);

    let badge_str = summary
        .badge
        .map(|b| b.to_string())
        .unwrap_or_else(|| "—".to_string());
    let meta_line = Line::from(Span::styled(
        format!(
            "  Best: {}  ·  Rate: {}%  ·  {}",
            summary.longest_streak, summary.success_rate, badge_str
        ),
        theme::dim(),
    ));

    let text = vec![Line::from(""), streak_line, Line::from(""), dots_line, meta_line];
    let paragraph = Paragraph::new(text).block(block);
    frame.render_widget(paragraph, area);
}
