use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::Outcome;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, today_outcome: Option<Outcome>) {
    let block = Block::default()
        .title(Span::styled(" Today ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    let content: Vec<Line> = match today_outcome {
        Some(Outcome::Disciplined) => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  ✓ Disciplined today",
                theme::green().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled("  MashaAllah. Keep going.", theme::dim())),
        ],
        Some(Outcome::Lapsed) => vec![
            Line::from(""),
            Line::from(Span::styled("  ✗ Lapsed today", theme::red())),
            Line::from(""),
            Line::from(Span::styled(
                "  Tomorrow is a new day. Start again.",
                theme::dim(),
            )),
        ],
        None => vec![
            Line::from(""),
            Line::from(Span::styled("  How did you do today?", theme::bold())),
            Line::from(""),
            Line::from(vec![
                Span::styled("  [d]", theme::green()),
                Span::styled(" disciplined    ", theme::dim()),
                Span::styled("[l]", theme::red()),
                Span::styled(" lapsed", theme::dim()),
            ]),
        ],
    };

    let paragraph = Paragraph::new(content).block(block);
    frame.render_widget(paragraph, area);
}
