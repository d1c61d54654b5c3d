//! Logs view: live tracing output with a failure tally in the title.

use super::{LogBuffer, Theme};
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Severity {
    Error,
    Warn,
    Info,
    Debug,
}

fn severity(line: &str) -> Severity {
    if line.contains("ERROR") {
        Severity::Error
    } else if line.contains("WARN") {
        Severity::Warn
    } else if line.contains("INFO") {
        Severity::Info
    } else {
        Severity::Debug
    }
}

fn style_for(theme: &Theme, severity: Severity) -> Style {
    match severity {
        Severity::Error => theme.error(),
        Severity::Warn => theme.warning(),
        Severity::Info => theme.success(),
        Severity::Debug => theme.muted(),
    }
}

/// Title with the number of failed feed refreshes among `lines`.
fn title(lines: &[String]) -> String {
    let failures = lines
        .iter()
        .filter(|l| severity(l) == Severity::Warn && l.contains("refresh failed"))
        .count();

    match failures {
        0 => "Logs (live)".to_string(),
        n => format!("Logs (live) - {} failed refresh(es)", n),
    }
}

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, buffer: &LogBuffer) {
    let lines = buffer.recent(area.height.saturating_sub(2) as usize);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title(&lines))
        .border_style(theme.border());

    if lines.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled("No logs yet.", theme.muted())))
            .block(block)
            .centered();
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = lines
        .iter()
        .rev()
        .map(|line| {
            ListItem::new(Line::from(Span::styled(
                line.clone(),
                style_for(theme, severity(line)),
            )))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
