use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem},
    Frame,
};

use crate::models::Standing;
use crate::tui::theme;
use crate::utils::format::format_points;

pub fn render(frame: &mut Frame, area: Rect, group: &str, standings: &[Standing], own_subject: &str) {
    let block = Block::default()
        .title(Span::styled(format!(" {} — this week ", group), theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(ratatui::style::Style::default().fg(theme::BORDER))
        .style(theme::surface());

    if standings.is_empty() {
        let empty = List::new(vec![ListItem::new(Line::from(Span::styled(
            "  No activity yet — be the first to check in",
            theme::dim(),
        )))])
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = standings
        .iter()
        .map(|s| {
            let is_me = s.subject == own_subject;
            let medal = match s.rank {
                1 => Span::styled("👑", theme::gold()),
                2 => Span::styled("🥈", theme::dim()),
                3 => Span::styled("🥉", theme::amber()),
                _ => Span::styled(format!("#{}", s.rank), theme::dim()),
            };
            let name_style = if is_me {
                theme::accent().add_modifier(Modifier::BOLD)
            } else {
                theme::bold()
            };
            let suffix = if is_me { " (you)" } else { "" };

            let line = Line::from(vec![
                Span::styled("  ", theme::dim()),
                medal,
                Span::styled(format!("  {:<14}{}", s.display_name, suffix), name_style),
                Span::styled(
                    format!("  {:>5} pts  {:>3}🔥", format_points(s.points), s.current_streak),
                    theme::dim(),
                ),
            ]);
            ListItem::new(line)
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
