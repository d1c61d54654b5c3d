//! Terminal input pump.

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    /// No input within the tick rate; time to refresh the snapshot.
    Tick,
    Resize(u16, u16),
}

/// Polls crossterm on a blocking thread and forwards events over a channel.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::task::spawn_blocking(move || loop {
            let event = match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    // Windows reports releases too.
                    Ok(CrosstermEvent::Key(key)) if key.kind == KeyEventKind::Press => Event::Key(key),
                    Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
                    _ => continue,
                },
                Ok(false) => Event::Tick,
                Err(_) => break,
            };

            if tx.send(event).is_err() {
                break;
            }
        });

        Self { rx }
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Plain (unmodified) key press.
pub fn is_key(event: &KeyEvent, code: KeyCode) -> bool {
    event.code == code && event.modifiers == KeyModifiers::NONE
}

/// Character key regardless of case.
pub fn is_char(event: &KeyEvent, c: char) -> bool {
    matches!(event.code, KeyCode::Char(k) if k.eq_ignore_ascii_case(&c))
        && !event.modifiers.contains(KeyModifiers::CONTROL)
}

pub fn is_quit(event: &KeyEvent) -> bool {
    event.code == KeyCode::Char('c') && event.modifiers == KeyModifiers::CONTROL
        || event.code == KeyCode::Char('q')
}

pub fn is_up(event: &KeyEvent) -> bool {
    event.code == KeyCode::Up || is_key(event, KeyCode::Char('k'))
}

pub fn is_down(event: &KeyEvent) -> bool {
    event.code == KeyCode::Down || is_key(event, KeyCode::Char('j'))
}
