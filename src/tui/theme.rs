use ratatui::style::{Color, Modifier, Style};

pub const BG: Color = Color::Rgb(14, 18, 16);
pub const SURFACE: Color = Color::Rgb(22, 28, 24);
pub const BORDER: Color = Color::Rgb(42, 54, 46);
pub const TEXT: Color = Color::Rgb(212, 226, 214);
pub const TEXT_DIM: Color = Color::Rgb(108, 126, 110);
pub const ACCENT: Color = Color::Rgb(96, 176, 120);
pub const GOLD: Color = Color::Rgb(196, 160, 68);
pub const GREEN: Color = Color::Rgb(92, 168, 92);
pub const AMBER: Color = Color::Rgb(210, 148, 60);
pub const RED: Color = Color::Rgb(186, 84, 66);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn red() -> Style {
    Style::default().fg(RED)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}
