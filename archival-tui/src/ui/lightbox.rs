use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};

use crate::{app::App, style::rgb};

use super::layout;

/// What a click on the lightbox landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxHit {
    ExitButton,
    Image,
    Backdrop,
}

/// Aspect ratio (width / height) to frame the enlarged image with: the decoded image's if
/// it is loaded, otherwise whatever the focused record declares.
fn aspect_ratio(app: &App) -> f32 {
    app.workstation
        .enlarged_image_ref()
        .and_then(|image_ref| app.art_cache.aspect_ratio(image_ref))
        .or_else(|| app.workstation.active_record().map(|r| r.aspect_ratio))
        .unwrap_or(1.0)
}

/// Draws the enlarged image over everything, on a dimmed backdrop.
pub fn draw(frame: &mut Frame, app: &mut App, size: Rect) {
    let Some(image_ref) = app.workstation.enlarged_image_ref().map(str::to_string) else {
        return;
    };
    let title = app
        .workstation
        .active_record()
        .map(|r| format!(" {} // {} ", r.code, r.title.to_uppercase()))
        .unwrap_or_default();
    let fallback = app
        .workstation
        .active_record()
        .and_then(|r| r.color_rgb())
        .map(rgb)
        .unwrap_or(Color::DarkGray);

    let style = &app.config.style;
    let backdrop = style.terminal();
    let paper = style.paper();
    let accent = style.accent();

    frame.render_widget(Clear, size);
    frame.render_widget(
        Block::default().style(Style::default().bg(backdrop)),
        size,
    );

    frame.render_widget(
        Paragraph::new(Span::styled(
            format!(" {} ", layout::EXIT_BUTTON_LABEL),
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        layout::exit_button_rect(size),
    );

    let rect = layout::lightbox_image_rect(size, aspect_ratio(app), layout::half_block_correction());
    let border_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(paper))
        .title(Line::from(Span::styled(
            title,
            Style::default().fg(paper).add_modifier(Modifier::BOLD),
        )));
    let art_area = border_block.inner(rect);
    frame.render_widget(border_block, rect);

    let loaded = super::draw_art(
        frame,
        &mut app.art_cache,
        &image_ref,
        art_area,
        fallback,
        backdrop,
        1.0,
    );
    if loaded {
        return;
    }

    // Centre a label over the fallback fill explaining why there's no picture.
    let label = if app.art_cache.is_loading(&image_ref) {
        " LOADING\u{2026} "
    } else {
        " IMAGE UNAVAILABLE "
    };
    let label_len = label.chars().count() as u16;
    if label_len < art_area.width {
        let label_rect = Rect::new(
            art_area.x + (art_area.width - label_len) / 2,
            art_area.y + art_area.height / 2,
            label_len,
            1,
        );
        frame.render_widget(
            Paragraph::new(Span::styled(
                label,
                Style::default()
                    .fg(paper)
                    .bg(backdrop)
                    .add_modifier(Modifier::BOLD),
            )),
            label_rect,
        );
    }
}

/// Classifies a click while the lightbox is open. Clicks on the image itself do nothing;
/// anything else dismisses the lightbox.
pub fn hit_test(app: &App, size: Rect, x: u16, y: u16) -> LightboxHit {
    if layout::contains(layout::exit_button_rect(size), x, y) {
        return LightboxHit::ExitButton;
    }
    let rect = layout::lightbox_image_rect(size, aspect_ratio(app), layout::half_block_correction());
    if layout::contains(rect, x, y) {
        LightboxHit::Image
    } else {
        LightboxHit::Backdrop
    }
}
