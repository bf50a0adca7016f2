pub(crate) mod chrome;
pub(crate) mod desk;
pub(crate) mod layout;
pub(crate) mod lightbox;
pub(crate) mod logs;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Paragraph},
};
use unicode_width::UnicodeWidthChar as _;

use crate::{app::App, art::ArtCache, style::blend};

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();

    // Fill entire terminal with background color.
    let bg = Block::default().style(Style::default().bg(app.config.style.background()));
    frame.render_widget(bg, size);

    let main = layout::split_main(size);

    chrome::draw_header(frame, app, main.header);
    desk::draw(frame, app, main.desk);
    chrome::draw_footer(frame, app, main.footer);

    if app.workstation.lightbox().is_open() {
        lightbox::draw(frame, app, size);
    }

    if app.show_logs {
        let panel = layout::log_panel_rect(main.desk);
        frame.render_widget(Clear, panel);
        logs::draw(frame, app, panel);
    }
}

/// Draws an image into `area` with half-block characters, two image rows per terminal row.
///
/// Until the image is available (or if it never will be), the area is filled with `fallback`.
/// Every colour is pulled towards `backdrop` by `opacity`. Returns whether the image was drawn.
pub(crate) fn draw_art(
    frame: &mut Frame,
    art_cache: &mut ArtCache,
    image_ref: &str,
    area: Rect,
    fallback: Color,
    backdrop: Color,
    opacity: f32,
) -> bool {
    if area.width == 0 || area.height == 0 {
        return false;
    }
    let cols = area.width as usize;
    let pixel_rows = area.height as usize * 2;

    let Some(grid) = art_cache.grid(image_ref, cols, pixel_rows) else {
        let fill = Block::default().style(Style::default().bg(blend(fallback, backdrop, opacity)));
        frame.render_widget(fill, area);
        return false;
    };

    for term_row in 0..area.height as usize {
        let mut spans = Vec::with_capacity(cols);
        for col in 0..cols {
            let top = grid.get(col, term_row * 2).unwrap_or(fallback);
            let bot = grid.get(col, term_row * 2 + 1).unwrap_or(fallback);
            spans.push(Span::styled(
                "\u{2580}",
                Style::default()
                    .fg(blend(top, backdrop, opacity))
                    .bg(blend(bot, backdrop, opacity)),
            ));
        }
        let row_rect = Rect::new(area.x, area.y + term_row as u16, area.width, 1);
        frame.render_widget(Paragraph::new(Line::from(spans)), row_rect);
    }
    true
}

/// Cuts `text` down to at most `width` display columns, ending in an ellipsis if shortened.
pub(crate) fn truncate(text: &str, width: usize) -> String {
    let total: usize = text.chars().map(|c| c.width().unwrap_or(0)).sum();
    if total <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('\u{2026}');
    out
}
