//! Main console application logic.

use super::notifications::ViewModel;
use super::{events, logs, notifications, LogBuffer, Route, Theme};
use crate::services::NotificationCenter;
use crate::types::{Notification, NotificationKind};
use crossterm::{
    event::{KeyCode, KeyEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Tabs},
    Frame, Terminal,
};
use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};

/// How long a status message stays on screen.
const TOAST_TTL: Duration = Duration::from_secs(4);

struct Toast {
    text: String,
    is_error: bool,
    shown_at: Instant,
}

/// Console application.
pub struct App {
    current_route: Route,
    center: Arc<NotificationCenter>,
    log_buffer: Arc<LogBuffer>,
    theme: Theme,
    notifications: Vec<Notification>,
    selected: usize,
    toast: Option<Toast>,
    should_quit: bool,
}

impl App {
    pub fn new(center: Arc<NotificationCenter>, log_buffer: Arc<LogBuffer>) -> Self {
        Self {
            current_route: Route::Notifications,
            center,
            log_buffer,
            theme: Theme::default(),
            notifications: Vec::new(),
            selected: 0,
            toast: None,
            should_quit: false,
        }
    }

    /// Pull the latest derived list from the center.
    pub async fn refresh(&mut self) {
        self.notifications = self.center.notifications().await;
        self.selected = self.selected.min(self.notifications.len().saturating_sub(1));

        if self
            .toast
            .as_ref()
            .is_some_and(|t| t.shown_at.elapsed() > TOAST_TTL)
        {
            self.toast = None;
        }
    }

    fn show_toast(&mut self, text: impl Into<String>, is_error: bool) {
        self.toast = Some(Toast {
            text: text.into(),
            is_error,
            shown_at: Instant::now(),
        });
    }

    fn selected_notification(&self) -> Option<&Notification> {
        self.notifications.get(self.selected)
    }

    fn can_approve_selected(&self) -> bool {
        self.center.rights().is_elevated()
            && self
                .selected_notification()
                .is_some_and(|n| n.kind == NotificationKind::Registration)
    }

    pub async fn handle_event(&mut self, event: events::Event) {
        match event {
            events::Event::Key(key) => {
                if events::is_quit(&key) {
                    self.should_quit = true;
                    return;
                }

                for route in Route::all() {
                    if events::is_key(&key, KeyCode::Char(route.key())) {
                        self.current_route = route;
                        return;
                    }
                }

                if self.current_route == Route::Notifications {
                    self.handle_notification_key(&key).await;
                }
            }
            events::Event::Tick => self.refresh().await,
            events::Event::Resize(_, _) => {}
        }
    }

    async fn handle_notification_key(&mut self, key: &KeyEvent) {
        if events::is_up(key) {
            self.selected = self.selected.saturating_sub(1);
        } else if events::is_down(key) {
            if self.selected + 1 < self.notifications.len() {
                self.selected += 1;
            }
        } else if events::is_char(key, 'r') {
            if let Some(id) = self.selected_notification().map(|n| n.id.clone()) {
                self.center.mark_as_read(&id).await;
            }
        } else if events::is_char(key, 'a') {
            self.center.mark_all_as_read().await;
        } else if key.code == KeyCode::Enter || events::is_char(key, 'y') {
            if !self.can_approve_selected() {
                return;
            }
            let Some(id) = self.selected_notification().map(|n| n.id.clone()) else {
                return;
            };
            match self.center.approve_notification(&id).await {
                Ok(()) => {
                    let msg = self.center.locale().admin_activated();
                    self.show_toast(msg, false);
                }
                Err(e) => self.show_toast(e.to_string(), true),
            }
        } else {
            return;
        }

        self.refresh().await;
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Tabs
                Constraint::Min(0),    // Content
                Constraint::Length(3), // Status bar
            ])
            .split(area);

        self.render_tabs(frame, chunks[0]);

        match self.current_route {
            Route::Notifications => {
                let vm = ViewModel {
                    notifications: &self.notifications,
                    selected: self.selected,
                    locale: self.center.locale(),
                    now: self.center.now(),
                    can_approve: self.can_approve_selected(),
                };
                notifications::render(frame, chunks[1], &self.theme, &vm);
            }
            Route::Logs => logs::render(frame, chunks[1], &self.theme, &self.log_buffer),
        }

        self.render_status_bar(frame, chunks[2]);
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect) {
        let routes = Route::all();
        let titles: Vec<Line> = routes
            .iter()
            .map(|r| {
                Line::from(vec![
                    Span::styled(format!("[{}] ", r.key()), self.theme.muted()),
                    Span::raw(r.name()),
                ])
            })
            .collect();

        let selected = routes
            .iter()
            .position(|r| *r == self.current_route)
            .unwrap_or(0);

        let tabs = Tabs::new(titles)
            .block(Block::default().borders(Borders::ALL).title("lantern-watch"))
            .select(selected)
            .style(self.theme.tab_inactive())
            .highlight_style(self.theme.tab_active());

        frame.render_widget(tabs, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let text = match &self.toast {
            Some(toast) => {
                let style = if toast.is_error {
                    self.theme.error()
                } else {
                    self.theme.success()
                };
                Line::from(Span::styled(toast.text.clone(), style))
            }
            None => Line::from(vec![
                Span::styled("q", self.theme.muted()),
                Span::raw(" quit | "),
                Span::styled("1-2", self.theme.muted()),
                Span::raw(" switch views | "),
                Span::styled("j/k", self.theme.muted()),
                Span::raw(" move | operator: "),
                Span::styled(self.center.rights().as_str(), self.theme.info()),
            ]),
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border());
        frame.render_widget(block, area);

        let inner = Rect {
            x: area.x + 2,
            y: area.y + 1,
            width: area.width.saturating_sub(4),
            height: 1,
        };
        frame.render_widget(text, inner);
    }
}

/// Run the console until the operator quits.
pub async fn run_tui(center: Arc<NotificationCenter>, log_buffer: Arc<LogBuffer>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(center, log_buffer);
    let mut event_handler = events::EventHandler::new(Duration::from_millis(250));
    app.refresh().await;

    loop {
        terminal.draw(|f| app.render(f))?;

        match event_handler.next().await {
            Some(event) => app.handle_event(event).await,
            None => break,
        }

        if app.should_quit() {
            break;
        }
    }

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}
