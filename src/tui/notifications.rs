//! Notifications view - the bell dropdown as a full panel.

use super::Theme;
use crate::types::{badge_text, unread_count, Locale, Notification, NotificationKind};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// What the view needs from the app for one frame.
pub struct ViewModel<'a> {
    pub notifications: &'a [Notification],
    pub selected: usize,
    pub locale: Locale,
    pub now: DateTime<Utc>,
    pub can_approve: bool,
}

pub fn render(frame: &mut Frame, area: Rect, theme: &Theme, vm: &ViewModel<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Bell + actions
            Constraint::Min(0),    // List
            Constraint::Length(5), // Details
        ])
        .split(area);

    render_header(frame, chunks[0], theme, vm);
    render_list(frame, chunks[1], theme, vm);
    render_details(frame, chunks[2], theme, vm);
}

fn render_header(frame: &mut Frame, area: Rect, theme: &Theme, vm: &ViewModel<'_>) {
    let unread = unread_count(vm.notifications);
    let mut spans = vec![Span::styled(vm.locale.notifications_title(), theme.title())];
    if let Some(badge) = badge_text(unread) {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} ", badge), theme.badge()));
    }

    spans.push(Span::raw("   "));
    spans.push(Span::styled("[r]", theme.info()));
    spans.push(Span::raw(" read  "));
    if unread > 0 {
        spans.push(Span::styled("[a]", theme.info()));
        spans.push(Span::raw(" read all  "));
    }
    if vm.can_approve {
        spans.push(Span::styled("[enter]", theme.success()));
        spans.push(Span::raw(" approve"));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border()),
    );
    frame.render_widget(header, area);
}

fn kind_marker(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Registration => "+",
        NotificationKind::Breakdown => "!",
    }
}

fn render_list(frame: &mut Frame, area: Rect, theme: &Theme, vm: &ViewModel<'_>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border());

    if vm.notifications.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            vm.locale.no_notifications(),
            theme.muted(),
        )))
        .block(block)
        .centered();
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = vm
        .notifications
        .iter()
        .map(|n| {
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", kind_marker(n.kind)), theme.marker(n, vm.now)),
                Span::styled(n.title.clone(), theme.row(n.read)),
                Span::raw("  "),
                Span::styled(
                    vm.locale.format_time(n.timestamp.as_ref()),
                    theme.muted(),
                ),
            ]))
        })
        .collect();

    let mut list_state = ListState::default();
    list_state.select(Some(vm.selected.min(vm.notifications.len() - 1)));

    let list = List::new(items)
        .block(block)
        .highlight_style(theme.selected());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_details(frame: &mut Frame, area: Rect, theme: &Theme, vm: &ViewModel<'_>) {
    let text = vm
        .notifications
        .get(vm.selected)
        .map(|n| n.message.clone())
        .unwrap_or_default();

    let details = Paragraph::new(text).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border()),
    );
    frame.render_widget(details, area);
}
