use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tokio::time::Duration;
use tracing::{info, warn};

use crate::app_event_sender::{AppEvent, AppEventSender};
use crate::widgets::{
    modal::{centered_rect, Modal},
    slide_view::SlideView,
    status_bar::StatusBar,
};
use slide_common::SlideConfig;
use slide_core::{
    acquire_style_asset, export_presentation, generate_presentation, is_video, read_topics_file,
    ComposerForm, ErrorReporter, ErrorSeverity, ExportOptions, FfmpegFrameSource,
    PresentationModel, Session, SessionState, SlideError,
};

const HELP_TEXT: &str = "Tab: next field\n\
Ctrl+G: generate presentation\n\
Ctrl+S: load style file (image or video)\n\
Ctrl+X: remove style\n\
Ctrl+O: load topics file (.txt / .md)\n\
Ctrl+T: clear topics file\n\
←/→: previous / next slide\n\
Ctrl+N: toggle speaker notes\n\
Ctrl+E: export to PowerPoint\n\
F1: this help\n\
Esc / Ctrl+Q: quit";

const HINTS: &str = "Tab:field  Ctrl+G:generate  Ctrl+E:export  F1:help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Topics,
    StylePath,
    TopicsPath,
}

impl Field {
    fn next(self) -> Self {
        match self {
            Field::Title => Field::Topics,
            Field::Topics => Field::StylePath,
            Field::StylePath => Field::TopicsPath,
            Field::TopicsPath => Field::Title,
        }
    }
}

struct ModalState {
    title: String,
    body: String,
    alert: bool,
}

/// Composer plus stage. All state lives here and is mutated only by the loop.
pub struct App {
    should_quit: bool,
    focus: Field,
    form: ComposerForm,
    style_path: String,
    topics_path: String,
    session: Session,
    style_pending: Option<String>,
    exporting: bool,
    show_notes: bool,
    status: String,
    severity: ErrorSeverity,
    modal: Option<ModalState>,
    model: Arc<dyn PresentationModel>,
    config: SlideConfig,
    app_event_rx: UnboundedReceiver<AppEvent>,
    app_event_tx: AppEventSender,
}

impl App {
    pub fn new(model: Arc<dyn PresentationModel>, config: SlideConfig) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            should_quit: false,
            focus: Field::Title,
            form: ComposerForm::new(),
            style_path: String::new(),
            topics_path: String::new(),
            session: Session::new(),
            style_pending: None,
            exporting: false,
            show_notes: false,
            status: "جاهز".to_string(),
            severity: ErrorSeverity::Info,
            modal: None,
            model,
            config,
            app_event_rx: rx,
            app_event_tx: AppEventSender::new(tx),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn form(&self) -> &ComposerForm {
        &self.form
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn set_status(&mut self, status: impl Into<String>, severity: ErrorSeverity) {
        self.status = status.into();
        self.severity = severity;
    }

    fn show_modal(&mut self, title: &str, body: impl Into<String>, alert: bool) {
        self.modal = Some(ModalState {
            title: title.to_string(),
            body: body.into(),
            alert,
        });
    }

    fn focused_buffer(&mut self) -> &mut String {
        match self.focus {
            Field::Title => &mut self.form.title,
            Field::Topics => &mut self.form.topics,
            Field::StylePath => &mut self.style_path,
            Field::TopicsPath => &mut self.topics_path,
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if self.modal.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::F(1)) {
                self.modal = None;
            }
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('q') | KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('g') => self.submit(),
                KeyCode::Char('s') => self.load_style(),
                KeyCode::Char('x') => {
                    self.form.remove_style();
                    self.style_path.clear();
                    self.set_status("أزيل ملف النمط", ErrorSeverity::Info);
                }
                KeyCode::Char('o') => self.load_topics(),
                KeyCode::Char('t') => {
                    self.form.remove_topics_file();
                    self.topics_path.clear();
                }
                KeyCode::Char('e') => self.export(),
                KeyCode::Char('n') => self.show_notes = !self.show_notes,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::F(1) => self.show_modal("Help", HELP_TEXT, false),
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::Left => {
                if let Some(nav) = self.session.navigator_mut() {
                    nav.prev();
                }
            }
            KeyCode::Right => {
                if let Some(nav) = self.session.navigator_mut() {
                    nav.next();
                }
            }
            KeyCode::Enter if self.focus == Field::Topics => self.form.topics.push('\n'),
            KeyCode::Enter => self.focus = self.focus.next(),
            KeyCode::Backspace => {
                self.focused_buffer().pop();
            }
            KeyCode::Char(c) => self.focused_buffer().push(c),
            _ => {}
        }
    }

    fn submit(&mut self) {
        if self.style_pending.is_some() {
            self.set_status("انتظر حتى تكتمل معالجة ملف النمط", ErrorSeverity::Warning);
            return;
        }
        if !self.session.can_submit(&self.form.title, &self.form.topics) {
            if !self.session.is_loading() {
                self.set_status(
                    "يرجى إدخال عنوان المشروع والمواضيع الرئيسية",
                    ErrorSeverity::Warning,
                );
            }
            return;
        }
        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(err) => {
                self.set_status(err.to_string(), ErrorSeverity::Warning);
                return;
            }
        };
        if self.session.begin().is_err() {
            return;
        }
        self.set_status("جاري إنشاء العرض التقديمي...", ErrorSeverity::Info);

        let model = Arc::clone(&self.model);
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let result = generate_presentation(model.as_ref(), &request).await;
            tx.send(AppEvent::GenerationFinished(result));
        });
    }

    fn load_style(&mut self) {
        let raw = self.style_path.trim();
        if raw.is_empty() {
            self.set_status("أدخل مسار ملف النمط أولاً", ErrorSeverity::Warning);
            return;
        }
        if self.style_pending.is_some() {
            return;
        }
        let path = PathBuf::from(raw);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| raw.to_string());
        let from_video = is_video(&path);
        self.style_pending = Some(if from_video {
            ComposerForm::processing_label(&name)
        } else {
            name
        });

        let ffmpeg = self.config.ffmpeg_path.clone();
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let joined = tokio::task::spawn_blocking(move || {
                let mut source = FfmpegFrameSource::new(ffmpeg);
                acquire_style_asset(&path, &mut source)
            })
            .await;
            let event = match joined {
                Ok(Ok(asset)) => AppEvent::StyleLoaded { asset, from_video },
                Ok(Err(err)) => AppEvent::StyleFailed {
                    message: ErrorReporter::format_user_error(&err),
                    unsupported: matches!(err, SlideError::UnsupportedInput { .. }),
                },
                Err(join_err) => AppEvent::StyleFailed {
                    message: format!("{join_err}"),
                    unsupported: false,
                },
            };
            tx.send(event);
        });
    }

    fn load_topics(&mut self) {
        let raw = self.topics_path.trim();
        if raw.is_empty() {
            self.set_status("أدخل مسار ملف المواضيع أولاً", ErrorSeverity::Warning);
            return;
        }
        let path = PathBuf::from(raw);
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let event = match read_topics_file(&path).await {
                Ok(text) => AppEvent::TopicsLoaded {
                    file_name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    text,
                },
                Err(err) => AppEvent::TopicsFailed {
                    message: ErrorReporter::format_user_error(&err),
                },
            };
            tx.send(event);
        });
    }

    fn export(&mut self) {
        if self.exporting {
            return;
        }
        let Some(data) = self.session.data().cloned() else {
            self.set_status("لا يوجد عرض لتصديره", ErrorSeverity::Warning);
            return;
        };
        self.exporting = true;
        self.set_status("جاري التصدير...", ErrorSeverity::Info);

        let options = ExportOptions::in_dir(&self.config.output_dir);
        let tx = self.app_event_tx.clone();
        tokio::spawn(async move {
            let joined =
                tokio::task::spawn_blocking(move || export_presentation(&data, &options)).await;
            let result = match joined {
                Ok(Ok(path)) => Ok(path),
                Ok(Err(err)) => Err(ErrorReporter::format_user_error(&err)),
                Err(join_err) => Err(format!("{join_err}")),
            };
            tx.send(AppEvent::ExportFinished(result));
        });
    }

    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::StyleLoaded { asset, from_video } => {
                info!(style = %asset.name, from_video, "style ready");
                self.style_pending = None;
                self.form.set_style(asset, from_video);
                self.set_status("تم تحميل ملف النمط", ErrorSeverity::Info);
            }
            AppEvent::StyleFailed {
                message,
                unsupported,
            } => {
                self.style_pending = None;
                if !unsupported {
                    self.form.remove_style();
                }
                self.show_modal("خطأ", message, true);
            }
            AppEvent::TopicsLoaded { file_name, text } => {
                self.form.load_topics(file_name, text);
                self.set_status("تم تحميل ملف المواضيع", ErrorSeverity::Info);
            }
            AppEvent::TopicsFailed { message } => self.show_modal("خطأ", message, true),
            AppEvent::GenerationFinished(result) => {
                self.session.finish(result);
                match self.session.state() {
                    SessionState::Ready { navigator, .. } => {
                        let label = navigator.position_label();
                        self.set_status(label, ErrorSeverity::Info);
                    }
                    SessionState::Failed { .. } => {
                        self.set_status("فشل الإنشاء", ErrorSeverity::Error);
                    }
                    _ => {}
                }
            }
            AppEvent::ExportFinished(result) => {
                self.exporting = false;
                match result {
                    Ok(path) => {
                        self.set_status(format!("تم الحفظ: {}", path.display()), ErrorSeverity::Info)
                    }
                    Err(message) => {
                        warn!(%message, "export failed");
                        self.show_modal("خطأ", message, true);
                    }
                }
            }
        }
    }

    fn drain_app_events(&mut self) {
        while let Ok(ev) = self.app_event_rx.try_recv() {
            self.handle_app_event(ev);
        }
    }
}

/// Run the interactive composer until the user quits.
pub async fn run_app(model: Arc<dyn PresentationModel>, config: SlideConfig) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(model, config);
    info!("interactive session started");
    let result = event_loop(&mut terminal, &mut app).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.drain_app_events();
        terminal.draw(|f| draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key_event(key);
            }
        }
        if app.should_quit {
            return Ok(());
        }
        tokio::task::yield_now().await;
    }
}

pub fn draw(f: &mut Frame, app: &App) {
    let [header, body, footer] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .areas(f.area());

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            " مولّد العروض التقديمية لمشاريع التخرج ",
            Style::default().add_modifier(Modifier::BOLD),
        ))),
        header,
    );

    let [composer, stage] = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .areas(body);
    draw_composer(f, app, composer);
    draw_stage(f, app, stage);

    let stage_label = match app.session.state() {
        SessionState::Idle => "IDLE",
        SessionState::Loading => "LOADING",
        SessionState::Ready { .. } => "READY",
        SessionState::Failed { .. } => "FAILED",
    };
    let position = app.session.navigator().map(|n| n.position_label());
    f.render_widget(
        StatusBar::new(stage_label, &app.status, HINTS)
            .severity(app.severity)
            .position(position.as_deref()),
        footer,
    );

    if let Some(modal) = &app.modal {
        let area = centered_rect(60, 50, f.area());
        f.render_widget(Clear, area);
        f.render_widget(Modal::new(&modal.title, &modal.body).alert(modal.alert), area);
    }
}

fn field_block(title: &str, focused: bool) -> Block<'_> {
    let style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title)
}

fn draw_composer(f: &mut Frame, app: &App, area: Rect) {
    let [title, topics, style, topics_file] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(4),
            Constraint::Length(4),
        ])
        .areas(area);

    f.render_widget(
        Paragraph::new(app.form.title.as_str())
            .alignment(Alignment::Right)
            .block(field_block("عنوان المشروع", app.focus == Field::Title)),
        title,
    );
    f.render_widget(
        Paragraph::new(app.form.topics.as_str())
            .alignment(Alignment::Right)
            .wrap(Wrap { trim: false })
            .block(field_block("المواضيع الرئيسية", app.focus == Field::Topics)),
        topics,
    );

    let style_status = app
        .style_pending
        .as_deref()
        .or(app.form.style_label())
        .unwrap_or("لا يوجد");
    f.render_widget(
        Paragraph::new(vec![
            Line::from(app.style_path.as_str()),
            Line::from(Span::styled(style_status, Style::default().fg(Color::Green))),
        ])
        .block(field_block(
            "ملف النمط (Ctrl+S)",
            app.focus == Field::StylePath,
        )),
        style,
    );

    let topics_status = app.form.topics_file().unwrap_or("لا يوجد");
    f.render_widget(
        Paragraph::new(vec![
            Line::from(app.topics_path.as_str()),
            Line::from(Span::styled(topics_status, Style::default().fg(Color::Green))),
        ])
        .block(field_block(
            "ملف المواضيع (Ctrl+O)",
            app.focus == Field::TopicsPath,
        )),
        topics_file,
    );
}

fn draw_stage(f: &mut Frame, app: &App, area: Rect) {
    match app.session.state() {
        SessionState::Idle => {
            f.render_widget(
                Paragraph::new("أدخل عنوان المشروع والمواضيع ثم اضغط Ctrl+G")
                    .alignment(Alignment::Center)
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
        }
        SessionState::Loading => {
            f.render_widget(
                Paragraph::new("جاري إنشاء العرض التقديمي...")
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::Yellow))
                    .block(Block::default().borders(Borders::ALL)),
                area,
            );
        }
        SessionState::Failed { reason } => {
            f.render_widget(
                Paragraph::new(reason.as_str())
                    .alignment(Alignment::Right)
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(Color::LightRed))
                    .block(Block::default().borders(Borders::ALL).title("خطأ")),
                area,
            );
        }
        SessionState::Ready { data, navigator } => {
            if let Some(slide) = data.slides.get(navigator.index()) {
                f.render_widget(
                    SlideView::new(slide, &data.theme).show_notes(app.show_notes),
                    area,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use slide_core::StubModel;

    fn app() -> App {
        App::new(Arc::new(StubModel), SlideConfig::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c)));
        }
    }

    async fn next_event(app: &mut App) -> AppEvent {
        app.app_event_rx.recv().await.unwrap()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[tokio::test]
    async fn test_generate_and_navigate() {
        let mut app = app();
        type_text(&mut app, "نظام توصيات");
        app.handle_key_event(key(KeyCode::Tab));
        type_text(&mut app, "مقدمة");
        app.handle_key_event(key(KeyCode::Enter));
        type_text(&mut app, "المنهجية");

        app.handle_key_event(ctrl('g'));
        assert!(app.session().is_loading());
        // A second submit while loading is ignored.
        app.handle_key_event(ctrl('g'));

        let ev = next_event(&mut app).await;
        app.handle_app_event(ev);
        let nav = app.session().navigator().unwrap();
        assert_eq!(nav.position_label(), "slide 1 of 12");

        app.handle_key_event(key(KeyCode::Left));
        assert_eq!(app.session().navigator().unwrap().index(), 11);
        app.handle_key_event(key(KeyCode::Right));
        assert_eq!(app.session().navigator().unwrap().index(), 0);

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(f, &app)).unwrap();
        assert!(screen_text(&terminal).contains("slide 1 of 12"));
    }

    #[tokio::test]
    async fn test_generate_requires_title_and_topics() {
        let mut app = app();
        type_text(&mut app, "عنوان فقط");
        app.handle_key_event(ctrl('g'));
        assert!(!app.session().is_loading());
        assert!(matches!(app.session().state(), SessionState::Idle));
    }

    #[tokio::test]
    async fn test_unsupported_style_opens_modal() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::Tab));
        app.handle_key_event(key(KeyCode::Tab));
        type_text(&mut app, "/tmp/brief.pdf");
        app.handle_key_event(ctrl('s'));
        let ev = next_event(&mut app).await;
        assert!(matches!(ev, AppEvent::StyleFailed { .. }));
        app.handle_app_event(ev);
        assert!(app.modal.as_ref().is_some_and(|m| m.alert));
        assert!(app.form().style().is_none());

        app.handle_key_event(key(KeyCode::Esc));
        assert!(app.modal.is_none());
        assert!(!app.should_quit());
    }

    #[tokio::test]
    async fn test_failed_video_clears_previous_style() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("style.png");
        image::RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 255]))
            .save(&image_path)
            .unwrap();

        let mut app = app();
        app.style_path = image_path.display().to_string();
        app.handle_key_event(ctrl('s'));
        let ev = next_event(&mut app).await;
        app.handle_app_event(ev);
        assert_eq!(app.form().style_label(), Some("style.png"));

        // Missing file: the frame source fails before ffmpeg is looked up.
        app.style_path = dir.path().join("broken.mp4").display().to_string();
        app.handle_key_event(ctrl('s'));
        let ev = next_event(&mut app).await;
        assert!(matches!(
            ev,
            AppEvent::StyleFailed {
                unsupported: false,
                ..
            }
        ));
        app.handle_app_event(ev);
        assert!(app.form().style().is_none());
        assert!(app.form().style_label().is_none());
        assert!(app.modal.is_some());
    }

    #[tokio::test]
    async fn test_unsupported_style_keeps_previous_style() {
        let mut app = app();
        app.form.set_style(
            slide_common::StyleAsset {
                name: "style.png".into(),
                mime_type: "image/png".into(),
                data: "AAAA".into(),
            },
            false,
        );
        app.style_path = "/tmp/brief.pdf".into();
        app.handle_key_event(ctrl('s'));
        let ev = next_event(&mut app).await;
        app.handle_app_event(ev);
        assert!(app.form().style().is_some());
    }

    #[test]
    fn test_backspace_edits_instead_of_opening_help() {
        let mut app = app();
        type_text(&mut app, "ab");
        app.handle_key_event(key(KeyCode::Backspace));
        assert_eq!(app.form().title, "a");
        assert!(app.modal.is_none());
    }

    #[tokio::test]
    async fn test_topics_file_fills_topics() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("topics.txt");
        std::fs::write(&path, "مقدمة\nالنتائج").unwrap();

        let mut app = app();
        app.focus = Field::TopicsPath;
        type_text(&mut app, &path.display().to_string());
        app.handle_key_event(ctrl('o'));
        let ev = next_event(&mut app).await;
        app.handle_app_event(ev);
        assert_eq!(app.form().topics, "مقدمة\nالنتائج");
        assert_eq!(app.form().topics_file(), Some("topics.txt"));

        app.handle_key_event(ctrl('t'));
        assert!(app.form().topics.is_empty());
    }

    #[tokio::test]
    async fn test_export_writes_pptx_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = SlideConfig {
            output_dir: dir.path().to_path_buf(),
            ..SlideConfig::default()
        };
        let mut app = App::new(Arc::new(StubModel), config);
        app.form.title = "t".into();
        app.form.topics = "a".into();
        app.handle_key_event(ctrl('g'));
        let ev = next_event(&mut app).await;
        app.handle_app_event(ev);

        app.handle_key_event(ctrl('e'));
        assert!(app.exporting);
        // Ignored while the first export runs.
        app.handle_key_event(ctrl('e'));

        let ev = next_event(&mut app).await;
        app.handle_app_event(ev);
        assert!(!app.exporting);
        assert!(dir
            .path()
            .join(slide_common::DEFAULT_PPTX_FILENAME)
            .exists());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.handle_key_event(key(KeyCode::F(1)));
        assert!(app.modal.is_some());
        app.handle_key_event(key(KeyCode::F(1)));
        assert!(app.modal.is_none());
        app.handle_key_event(ctrl('q'));
        assert!(app.should_quit());
    }
}
