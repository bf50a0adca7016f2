//! The header and footer around the desk.

use archival_core::Selection;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr as _;

use crate::{app::App, keys};

pub fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let style = &app.config.style;

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(style.muted()))
        .style(Style::default().bg(style.terminal()));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mode = match app.workstation.selection() {
        _ if app.workstation.lightbox().is_open() => "MODE: FULL_VIEW".to_string(),
        Selection::Focused(_) => match app.workstation.active_record() {
            Some(record) => format!("MODE: INSPECT // {}", record.code),
            None => "MODE: INSPECT".to_string(),
        },
        Selection::Unfocused => "MODE: BROWSE".to_string(),
    };

    let left = vec![
        Line::from(vec![
            Span::styled(
                " ARCHIVAL_OS",
                Style::default()
                    .fg(style.paper())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                concat!(" v", env!("CARGO_PKG_VERSION"), " // RECORD_INDEX"),
                Style::default().fg(style.muted()),
            ),
        ]),
        Line::from(Span::styled(
            format!(" {mode}"),
            Style::default().fg(style.signal()),
        )),
    ];
    let right = vec![
        Line::from(Span::styled(
            format!("{} ", app.ticker.clock_text()),
            Style::default()
                .fg(style.paper())
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} ", app.ticker.date_text()),
            Style::default().fg(style.muted()),
        )),
    ];
    frame.render_widget(Paragraph::new(left), inner);
    frame.render_widget(Paragraph::new(right).right_aligned(), inner);
}

pub fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let style = &app.config.style;
    let total = app.workstation.catalog().len();
    let mut position = match app.workstation.selection().active_index() {
        Some(i) => format!(" {:02}/{total:02} ", i + 1),
        None => format!(" --/{total:02} "),
    };
    // Warnings (missing images, mostly) are only visible in the log panel, so point at it.
    let warnings = app.log_buffer.count_at_least(tracing::Level::WARN);
    if warnings > 0 {
        position = format!(" \u{26A0} {warnings}{position}");
    }

    let help_actions: &[keys::Action] = if app.show_logs {
        keys::LOGS_HELP
    } else if app.workstation.lightbox().is_open() {
        keys::LIGHTBOX_HELP
    } else if app.workstation.selection().is_focused() {
        keys::FOCUSED_HELP
    } else {
        keys::DESK_HELP
    };
    let mut help = vec![];
    let mut help_width = 0;
    for action in help_actions {
        if let Some((key, label)) = action.help_label() {
            let label = format!(":{label} ");
            help_width += key.width() + label.width();
            help.push(Span::styled(
                String::from(key),
                Style::default().fg(style.accent()),
            ));
            help.push(Span::styled(label, Style::default().fg(style.muted())));
        }
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(help_width as u16),
            Constraint::Length(position.width() as u16),
        ])
        .split(area);

    let status = Span::styled(
        super::truncate(
            &format!(" > {}", app.ticker.status_text()),
            chunks[0].width as usize,
        ),
        Style::default().fg(style.signal()),
    );

    let bg = Style::default().bg(style.terminal());
    frame.render_widget(Paragraph::new(Line::from(status)).style(bg), chunks[0]);
    frame.render_widget(Paragraph::new(Line::from(help)).style(bg), chunks[1]);
    frame.render_widget(
        Paragraph::new(Span::styled(
            position,
            Style::default()
                .fg(style.paper())
                .add_modifier(Modifier::BOLD),
        ))
        .style(bg),
        chunks[2],
    );
}
