use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Text,
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Blocking message box; dismissed with Esc or Enter.
pub struct Modal<'a> {
    title: &'a str,
    body: &'a str,
    alert: bool,
}

impl<'a> Modal<'a> {
    pub fn new(title: &'a str, body: &'a str) -> Self {
        Self {
            title,
            body,
            alert: false,
        }
    }

    /// Red border for failures.
    pub fn alert(mut self, alert: bool) -> Self {
        self.alert = alert;
        self
    }
}

impl Widget for Modal<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let border = if self.alert {
            Style::default().fg(Color::LightRed)
        } else {
            Style::default()
        };
        let widget = Paragraph::new(Text::from(self.body.to_string()))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border)
                    .title(self.title),
            )
            .wrap(Wrap { trim: false });
        widget.render(area, buf);
    }
}

/// A rectangle of the given percentages, centered in `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);

    horizontal[1]
}
