use anyhow::Result;
use chrono::Local;
use crossterm::event::{KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
    Frame,
};
use rusqlite::Connection;

use crate::cli::handlers::build_leaderboard;
use crate::config::AppConfig;
use crate::db::repository::{CachedTimes, CheckInRepo, GoalRepo};
use crate::ledger;
use crate::models::{CheckIn, Goal, Outcome, Period, Standing, Summary};
use crate::prayer_times::{PrayerCalculator, PrayerSlot};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{checkin, goals, header, leaderboard, prayers, statusbar, streak};
use crate::utils::format::format_points;
use crate::utils::hijri::today_hijri_string;

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Dashboard,
    Stats,
    Help,
}

pub struct App {
    pub view: View,
    pub config: AppConfig,
    pub should_quit: bool,
    /// Outcome waiting for confirmation, if any.
    pub pending_outcome: Option<Outcome>,

    // Cached state (refreshed on load/action)
    pub hijri_str: String,
    pub today_outcome: Option<Outcome>,
    pub summary: Summary,
    pub week: Vec<Option<Outcome>>,
    pub active_goal: Option<Goal>,
    pub standings: Vec<Standing>,
    pub times: Option<CachedTimes>,
    pub next_prayer: Option<(PrayerSlot, i64)>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let hijri_str = today_hijri_string(config.salah.hijri_offset);
        App {
            view: View::Dashboard,
            config,
            should_quit: false,
            pending_outcome: None,
            hijri_str,
            today_outcome: None,
            summary: Summary::default(),
            week: Vec::new(),
            active_goal: None,
            standings: Vec::new(),
            times: None,
            next_prayer: None,
        }
    }

    pub fn load(&mut self, conn: &Connection) -> Result<()> {
        let today = Local::now().date_naive();
        let subject = self.config.profile.subject.clone();

        let records = CheckInRepo::get_all(conn, &subject, "")?;
        self.today_outcome = records
            .iter()
            .find(|r| r.date == today)
            .map(|r| r.outcome);

        let anchor = ledger::anchor_date(&records, today);
        self.summary = ledger::summarize(&records, anchor)?;

        self.week = (0..7)
            .rev()
            .map(|offset| {
                let date = today - chrono::Duration::days(offset);
                records.iter().find(|r| r.date == date).map(|r| r.outcome)
            })
            .collect();

        self.active_goal = GoalRepo::active_for(conn, &subject, today)?;

        let group = self.config.profile.default_group.clone();
        self.standings = if group.is_empty() {
            Vec::new()
        } else {
            build_leaderboard(conn, &group, Period::Weekly, today).unwrap_or_default()
        };

        if let Ok(calc) = self.make_calculator() {
            self.times = calc.times_for_date(conn, today).ok();
            let now_time = Local::now().time();
            self.next_prayer = calc.next_prayer(conn, today, now_time).ok().flatten();
        }

        Ok(())
    }

    pub fn tick(&mut self, conn: &Connection) {
        // Refresh the next-prayer countdown
        let today = Local::now().date_naive();
        let now_time = Local::now().time();
        if let Ok(calc) = self.make_calculator() {
            self.next_prayer = calc.next_prayer(conn, today, now_time).ok().flatten();
        }
    }

    fn make_calculator(&self) -> Result<PrayerCalculator> {
        PrayerCalculator::new(
            self.config.salah.latitude,
            self.config.salah.longitude,
            &self.config.salah.calc_method,
            &self.config.salah.madhab,
            self.config.salah.timezone_offset,
        )
    }

    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        // Only handle actual key presses — ignore release/repeat events
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.pending_outcome.is_some() {
            self.handle_confirm_key(key, conn);
            return;
        }
        match self.view {
            View::Dashboard => self.handle_dashboard_key(key),
            View::Stats => self.handle_stats_key(key),
            View::Help => self.handle_help_key(key),
        }
    }

    fn handle_dashboard_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('?') => {
                self.view = View::Help;
            }
            KeyCode::Char('s') => {
                self.view = View::Stats;
            }
            // Check-in goes through a confirmation overlay — it is a
            // once-a-day action worth a second look.
            KeyCode::Char('d') => {
                if self.today_outcome.is_none() {
                    self.pending_outcome = Some(Outcome::Disciplined);
                }
            }
            KeyCode::Char('l') => {
                if self.today_outcome.is_none() {
                    self.pending_outcome = Some(Outcome::Lapsed);
                }
            }
            _ => {}
        }
    }

    fn handle_confirm_key(&mut self, key: crossterm::event::KeyEvent, conn: &Connection) {
        match key.code {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(outcome) = self.pending_outcome.take() {
                    self.record_checkin(conn, outcome);
                }
            }
            KeyCode::Char('n') | KeyCode::Esc => {
                self.pending_outcome = None;
            }
            _ => {}
        }
    }

    fn handle_stats_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('s') => {
                self.view = View::Dashboard;
            }
            _ => {}
        }
    }

    fn handle_help_key(&mut self, key: crossterm::event::KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('?') => {
                self.view = View::Dashboard;
            }
            _ => {}
        }
    }

    fn record_checkin(&mut self, conn: &Connection, outcome: Outcome) {
        let today = Local::now().date_naive();
        let subject = self.config.profile.subject.clone();
        let record = CheckIn::new(&subject, "", today, outcome);
        if CheckInRepo::upsert(conn, &record).is_ok() {
            if outcome == Outcome::Disciplined {
                let _ = GoalRepo::advance_active(conn, &subject, today);
            }
            let _ = self.load(conn);
        }
    }

    pub fn draw(&self, frame: &mut Frame) {
        match self.view {
            View::Dashboard => self.draw_dashboard(frame),
            View::Stats => self.draw_stats(frame),
            View::Help => {
                self.draw_dashboard(frame);
                self.draw_help_overlay(frame);
            }
        }

        if self.pending_outcome.is_some() {
            self.draw_confirm_overlay(frame);
        }
    }

    fn draw_dashboard(&self, frame: &mut Frame) {
        let area = frame.area();

        frame.render_widget(Block::default().style(theme::base()), area);

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(
            frame,
            outer_chunks[0],
            &self.config.profile.display_name,
            &self.hijri_str,
        );
        statusbar::render(frame, outer_chunks[2]);

        let body = outer_chunks[1];
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(body);

        // Left column: check-in + streak + goal
        let left_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // check-in
                Constraint::Length(8), // streak
                Constraint::Length(7), // goal
            ])
            .split(columns[0]);

        checkin::render(frame, left_chunks[0], self.today_outcome);
        streak::render(frame, left_chunks[1], &self.summary, &self.week);
        goals::render(frame, left_chunks[2], self.active_goal.as_ref());

        // Right column: prayer times + leaderboard
        let right_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(10), Constraint::Min(0)])
            .split(columns[1]);

        prayers::render(
            frame,
            right_chunks[0],
            self.times.as_ref(),
            self.next_prayer.as_ref(),
        );
        leaderboard::render(
            frame,
            right_chunks[1],
            &self.config.profile.default_group,
            &self.standings,
            &self.config.profile.subject,
        );
    }

    fn draw_stats(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::base()), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(vec![
            Span::styled("  Stats  ", theme::accent().add_modifier(Modifier::BOLD)),
            Span::styled("  [Esc] back", theme::dim()),
        ]));
        frame.render_widget(title, chunks[0]);

        let badge_str = self
            .summary
            .badge
            .map(|b| b.to_string())
            .unwrap_or_else(|| "none yet".to_string());

        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("  Streak (current):  ", theme::dim()),
                Span::styled(
                    format!("{} days", self.summary.current_streak),
                    theme::green().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("  Streak (best):     ", theme::dim()),
                Span::styled(format!("{} days", self.summary.longest_streak), theme::green()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Check-ins:         ", theme::dim()),
                Span::styled(format!("{} days", self.summary.total_days), theme::bold()),
            ]),
            Line::from(vec![
                Span::styled("  Success rate:      ", theme::dim()),
                Span::styled(format!("{}%", self.summary.success_rate), theme::bold()),
            ]),
            Line::from(vec![
                Span::styled("  Points:            ", theme::dim()),
                Span::styled(format_points(self.summary.points), theme::bold()),
            ]),
            Line::from(vec![
                Span::styled("  Badge:             ", theme::dim()),
                Span::styled(badge_str, theme::gold()),
            ]),
            Line::from(""),
            Line::from(Span::styled("  Last 7 Days", theme::accent())),
            Line::from(""),
        ];

        for (i, day) in self.week.iter().enumerate() {
            let date = Local::now().date_naive() - chrono::Duration::days((6 - i) as i64);
            let (bar, style) = match day {
                Some(Outcome::Disciplined) => ("  ████████████  ", theme::green()),
                Some(Outcome::Lapsed) => ("  ✗✗✗✗✗✗✗✗✗✗✗✗  ", theme::red()),
                None => ("  ░░░░░░░░░░░░  ", theme::dim()),
            };
            lines.push(Line::from(vec![
                Span::styled(bar, style),
                Span::styled(format!("{}", date), theme::dim()),
            ]));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, chunks[1]);
    }

    fn draw_confirm_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 2 - 4,
            width: area.width / 2,
            height: 7,
        };

        frame.render_widget(Clear, popup_area);

        let (question, border) = match self.pending_outcome {
            Some(Outcome::Disciplined) => (
                "  Confirm: you stayed disciplined today?",
                theme::green(),
            ),
            _ => ("  Confirm: you lapsed today?", theme::red()),
        };

        let text = vec![
            Line::from(""),
            Line::from(Span::styled(question, theme::bold())),
            Line::from(""),
            Line::from(Span::styled(
                "  This is recorded once per day.  [y] confirm  ·  [n] cancel",
                theme::dim(),
            )),
        ];

        let block = Block::default()
            .title(Span::styled(" Check-in ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .style(theme::surface());

        let paragraph = Paragraph::new(text).block(block);
        frame.render_widget(paragraph, popup_area);
    }

    fn draw_help_overlay(&self, frame: &mut Frame) {
        let area = frame.area();
        let popup_area = Rect {
            x: area.width / 4,
            y: area.height / 4,
            width: area.width / 2,
            height: area.height / 2,
        };

        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::from(Span::styled(
                "  Keybindings",
                theme::accent().add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  [d]          ", theme::accent()),
                Span::styled("Check in disciplined", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [l]          ", theme::accent()),
                Span::styled("Check in lapsed", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [s]          ", theme::accent()),
                Span::styled("Stats view", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [?]          ", theme::accent()),
                Span::styled("Toggle help", theme::dim()),
            ]),
            Line::from(vec![
                Span::styled("  [Esc]        ", theme::accent()),
                Span::styled("Quit", theme::dim()),
            ]),
        ];

        let block = Block::default()
            .title(Span::styled(" Help ", theme::accent()))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::accent())
            .style(theme::surface());

        let paragraph = Paragraph::new(help_text).block(block);
        frame.render_widget(paragraph, popup_area);
    }
}

/// Run the TUI event loop.
pub fn run(conn: Connection, config: AppConfig) -> Result<()> {
    let mut app = App::new(config);
    app.load(&conn)?;

    let mut terminal = ratatui::init();
    let events = EventHandler::new(std::time::Duration::from_millis(500));

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        match events.next()? {
            Event::Key(key) => {
                app.handle_key(key, &conn);
                if app.should_quit {
                    break;
                }
            }
            Event::Resize => {}
            Event::Tick => {
                app.tick(&conn);
            }
        }
    }

    ratatui::restore();
    Ok(())
}
