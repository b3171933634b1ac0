use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use slide_core::ErrorSeverity;

/// Bottom bar: stage badge, last status message, key hints and slide position.
pub struct StatusBar<'a> {
    stage: &'a str,
    status: &'a str,
    severity: ErrorSeverity,
    hints: &'a str,
    position: Option<&'a str>,
}

impl<'a> StatusBar<'a> {
    pub fn new(stage: &'a str, status: &'a str, hints: &'a str) -> Self {
        Self {
            stage,
            status,
            severity: ErrorSeverity::Info,
            hints,
            position: None,
        }
    }

    pub fn severity(mut self, severity: ErrorSeverity) -> Self {
        self.severity = severity;
        self
    }

    pub fn position(mut self, position: Option<&'a str>) -> Self {
        self.position = position;
        self
    }
}

fn severity_color(severity: ErrorSeverity) -> Color {
    match severity {
        ErrorSeverity::Info => Color::Yellow,
        ErrorSeverity::Warning => Color::LightYellow,
        ErrorSeverity::Error | ErrorSeverity::Critical => Color::LightRed,
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        block.render(area, buf);

        let position_width = self.position.map_or(0, |p| p.chars().count() as u16 + 2);
        let [left, right] = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(position_width)])
            .areas(inner);

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", self.stage),
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(self.status, Style::default().fg(severity_color(self.severity))),
            Span::raw("  |  "),
            Span::styled(self.hints, Style::default().fg(Color::Gray)),
        ]);
        Paragraph::new(line).render(left, buf);

        if let Some(position) = self.position {
            Paragraph::new(Span::styled(
                position,
                Style::default().add_modifier(Modifier::BOLD),
            ))
            .render(right, buf);
        }
    }
}
