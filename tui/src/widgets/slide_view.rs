use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use slide_common::{HexColor, SlideContent, Theme};

/// Terminal color for a theme hex string; unparsable values fall back to `fallback`.
pub fn theme_color(value: &str, fallback: Color) -> Color {
    HexColor::parse(value)
        .map(|c| Color::Rgb(c.r, c.g, c.b))
        .unwrap_or(fallback)
}

/// One slide drawn with the deck's theme: background, title color, body color.
pub struct SlideView<'a> {
    slide: &'a SlideContent,
    theme: &'a Theme,
    show_notes: bool,
}

impl<'a> SlideView<'a> {
    pub fn new(slide: &'a SlideContent, theme: &'a Theme) -> Self {
        Self {
            slide,
            theme,
            show_notes: false,
        }
    }

    pub fn show_notes(mut self, show: bool) -> Self {
        self.show_notes = show;
        self
    }
}

impl Widget for SlideView<'_> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let background = theme_color(&self.theme.secondary_color, Color::Reset);
        let title_color = theme_color(&self.theme.primary_color, Color::Cyan);
        let text_color = theme_color(&self.theme.text_color, Color::White);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.theme.font_family))
            .style(Style::default().bg(background));
        let inner = block.inner(area);
        block.render(area, buf);

        let notes_height = if self.show_notes { 6 } else { 0 };
        let [title_area, body_area, notes_area] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(notes_height),
            ])
            .areas(inner);

        Paragraph::new(Line::from(Span::styled(
            self.slide.title.as_str(),
            Style::default()
                .fg(title_color)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Right)
        .wrap(Wrap { trim: true })
        .render(title_area, buf);

        let bullets: Vec<Line> = self
            .slide
            .content
            .iter()
            .map(|point| {
                Line::from(vec![
                    Span::styled(point.as_str(), Style::default().fg(text_color)),
                    Span::styled(" •", Style::default().fg(title_color)),
                ])
            })
            .collect();
        Paragraph::new(Text::from(bullets))
            .alignment(Alignment::Right)
            .wrap(Wrap { trim: true })
            .render(body_area, buf);

        if self.show_notes {
            Paragraph::new(self.slide.speaker_notes.as_str())
                .block(Block::default().borders(Borders::TOP).title("ملاحظات المتحدث"))
                .style(Style::default().fg(text_color))
                .alignment(Alignment::Right)
                .wrap(Wrap { trim: true })
                .render(notes_area, buf);
        }
    }
}
