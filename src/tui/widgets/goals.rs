use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::{Goal, LOCK_THRESHOLD};
use crate::tui::theme;
use crate::utils::format::progress_bar;

pub fn render(frame: &mut Frame, area: Rect, goal: Option<&Goal>) {
    let block = Block::default()
        .title(Span::styled(" Goal ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    let content: Vec<Line> = match goal {
        None => vec![
            Line::from(""),
            Line::from(Span::styled("  No active goal", theme::dim())),
            Line::from(Span::styled(
                "  `akhcheck goal new` to set one",
                theme::dim(),
            )),
        ],
        Some(g) => {
            let bar = progress_bar(g.progress, g.target_days, 14);
            let title_line = Line::from(vec![
                Span::styled(format!("  {}", g.title), theme::bold()),
                if g.locked {
                    Span::styled("  🔒", theme::amber())
                } else {
                    Span::raw("")
                },
            ]);
            let bar_line = Line::from(vec![
                Span::styled("  ", theme::dim()),
                Span::styled(bar, theme::green()),
                Span::styled(
                    format!("  {}/{} days", g.progress, g.target_days),
                    theme::dim(),
                ),
            ]);
            let hint = if !g.locked && g.progress >= LOCK_THRESHOLD {
                Line::from(Span::styled(
                    format!("  `akhcheck goal lock {}` to lock it in", g.id.unwrap_or(0)),
                    theme::dim(),
                ))
            } else {
                Line::from("")
            };
            vec![Line::from(""), title_line, Line::from(""), bar_line, hint]
        }
    };

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}
