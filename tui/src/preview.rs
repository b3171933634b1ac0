use anyhow::{anyhow, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    prelude::*,
};
use slide_common::PresentationData;
use slide_core::{ErrorSeverity, SlideNavigator};
use std::io;

use crate::widgets::{slide_view::SlideView, status_bar::StatusBar};

/// Read-only viewer for a saved deck.
pub struct SlidePreview {
    data: PresentationData,
    navigator: SlideNavigator,
    show_notes: bool,
    running: bool,
}

impl SlidePreview {
    pub fn new(data: PresentationData) -> Result<Self> {
        let navigator = SlideNavigator::new(data.slide_count())
            .ok_or_else(|| anyhow!("presentation has no slides"))?;
        Ok(Self {
            data,
            navigator,
            show_notes: false,
            running: true,
        })
    }

    pub fn navigator(&self) -> &SlideNavigator {
        &self.navigator
    }

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.event_loop(&mut terminal);

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        result
    }

    fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        while self.running {
            terminal.draw(|f| self.draw(f))?;
            if let Event::Key(key) = event::read()? {
                self.handle_key(key);
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Left | KeyCode::Char('h') => {
                self.navigator.prev();
            }
            KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
                self.navigator.next();
            }
            KeyCode::Home => self.navigator.go_first(),
            KeyCode::End => self.navigator.go_last(),
            KeyCode::Char('n') => self.show_notes = !self.show_notes,
            _ => {}
        }
    }

    pub fn draw(&self, f: &mut Frame) {
        let [body, footer] = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(3)])
            .areas(f.area());

        if let Some(slide) = self.data.slides.get(self.navigator.index()) {
            f.render_widget(
                SlideView::new(slide, &self.data.theme).show_notes(self.show_notes),
                body,
            );
        }

        let position = self.navigator.position_label();
        f.render_widget(
            StatusBar::new("PREVIEW", "", "←/→:move  Home/End  n:notes  q:quit")
                .severity(ErrorSeverity::Info)
                .position(Some(position.as_str())),
            footer,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use slide_common::{FontFamily, SlideContent, Theme};

    fn deck(n: usize) -> PresentationData {
        PresentationData {
            slides: (0..n)
                .map(|i| SlideContent {
                    title: format!("Slide {i}"),
                    content: vec!["point".into()],
                    speaker_notes: String::new(),
                })
                .collect(),
            theme: Theme {
                primary_color: "#000080".into(),
                secondary_color: "#FFFFFF".into(),
                text_color: "#111111".into(),
                font_family: FontFamily::SansSerif,
            },
        }
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        assert!(SlidePreview::new(deck(0)).is_err());
    }

    #[test]
    fn test_keys_wrap_and_jump() {
        let mut preview = SlidePreview::new(deck(3)).unwrap();
        let press = |code| KeyEvent::new(code, KeyModifiers::NONE);
        preview.handle_key(press(KeyCode::Left));
        assert_eq!(preview.navigator().index(), 2);
        preview.handle_key(press(KeyCode::Right));
        assert_eq!(preview.navigator().index(), 0);
        preview.handle_key(press(KeyCode::End));
        assert_eq!(preview.navigator().position_label(), "slide 3 of 3");
        preview.handle_key(press(KeyCode::Char('q')));
        assert!(!preview.running);
    }

    #[test]
    fn test_draw_shows_title_and_position() {
        let preview = SlidePreview::new(deck(2)).unwrap();
        let mut terminal = Terminal::new(ratatui::backend::TestBackend::new(80, 20)).unwrap();
        terminal.draw(|f| preview.draw(f)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Slide 0"));
        assert!(text.contains("slide 1 of 2"));
    }
}
