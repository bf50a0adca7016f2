use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use crate::app::App;
use crate::keys::Action;

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let style = &app.config.style;
    let entries = app.log_buffer.get_entries();

    let block = Block::default()
        .title(format!(" SYSTEM_LOG ({}) ", entries.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(style.signal()))
        .style(Style::default().bg(style.terminal()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if entries.is_empty() {
        let empty = Paragraph::new("NO LOG ENTRIES").style(Style::default().fg(style.muted()));
        frame.render_widget(empty, inner);
        return;
    }

    let paper = style.paper();
    let muted = style.muted();
    let highlight = style.ink();

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let (level_str, level_color) = match entry.level {
                tracing::Level::ERROR => ("ERR", Color::Red),
                tracing::Level::WARN => ("WRN", Color::Yellow),
                tracing::Level::INFO => ("INF", Color::Cyan),
                tracing::Level::DEBUG => ("DBG", Color::Green),
                tracing::Level::TRACE => ("TRC", muted),
            };

            let target = if entry.target.len() > super::layout::LOG_TARGET_WIDTH {
                let cut = entry.target.len() - super::layout::LOG_TARGET_SUFFIX_LEN;
                match entry.target.get(cut..) {
                    Some(suffix) => format!("...{suffix}"),
                    None => entry.target.clone(),
                }
            } else {
                entry.target.clone()
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    level_str,
                    Style::default()
                        .fg(level_color)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{target:width$}", width = super::layout::LOG_TARGET_WIDTH),
                    Style::default().fg(muted),
                ),
                Span::raw(" "),
                Span::styled(entry.message.clone(), Style::default().fg(paper)),
            ]))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .bg(highlight)
            .add_modifier(Modifier::BOLD),
    );

    let max_offset = entries.len().saturating_sub(1);
    app.logs_scroll_offset = app.logs_scroll_offset.min(max_offset);

    let mut state = ListState::default();
    state.select(Some(app.logs_scroll_offset));
    frame.render_stateful_widget(list, inner, &mut state);
}

pub fn handle_key(app: &mut App, action: Action) {
    match action {
        Action::Back => app.toggle_logs(),
        Action::MoveUp => scroll(app, -1),
        Action::MoveDown => scroll(app, 1),
        Action::PageUp => scroll(app, -(super::layout::PAGE_SCROLL_SIZE as isize)),
        Action::PageDown => scroll(app, super::layout::PAGE_SCROLL_SIZE as isize),
        Action::GotoTop => app.logs_scroll_offset = 0,
        Action::GotoBottom => app.logs_scroll_offset = app.log_buffer.len().saturating_sub(1),
        _ => {}
    }
}

/// Moves the log selection by `delta` entries, staying within the buffer.
pub fn scroll(app: &mut App, delta: isize) {
    let max_offset = app.log_buffer.len().saturating_sub(1);
    app.logs_scroll_offset = app
        .logs_scroll_offset
        .saturating_add_signed(delta)
        .min(max_offset);
}
