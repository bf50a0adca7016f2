use archival_core::{
    LayoutTarget,
    layout::{self, Footprint},
};
use ratatui::layout::{Constraint, Direction, Layout, Rect};

// ── Main vertical layout ────────────────────────────────────────────────────

pub const HEADER_HEIGHT: u16 = 3;
pub const DESK_MIN_HEIGHT: u16 = 6;
pub const FOOTER_HEIGHT: u16 = 1;

pub struct MainLayout {
    pub header: Rect,
    pub desk: Rect,
    pub footer: Rect,
}

pub fn split_main(area: Rect) -> MainLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(DESK_MIN_HEIGHT),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);
    MainLayout {
        header: chunks[0],
        desk: chunks[1],
        footer: chunks[2],
    }
}

// ── Desk projection ─────────────────────────────────────────────────────────

/// The desk is laid out as if it were a viewport of this many pixels, then squeezed into
/// whatever cells the terminal has.
pub const DESIGN_VIEWPORT_WIDTH: f32 = 1600.0;
pub const DESIGN_VIEWPORT_HEIGHT: f32 = 900.0;

pub const CARD_MIN_WIDTH: u16 = 12;
pub const CARD_MIN_HEIGHT: u16 = 5;
pub const FOCUSED_INTERIOR_MIN_WIDTH: u16 = 30;
pub const FOCUSED_INTERIOR_MIN_HEIGHT: u16 = 8;

/// Unscaled footprint of a card, in design pixels.
///
/// A card growing into (or shrinking out of) focus is somewhere between its resting and
/// focused footprints; how far is read off its animated scale. Hover never reaches it.
pub fn card_footprint(aspect_ratio: f32, scale: f32) -> Footprint {
    let resting = layout::resting_footprint(aspect_ratio);
    let focused = layout::focused_footprint(DESIGN_VIEWPORT_WIDTH, DESIGN_VIEWPORT_HEIGHT);
    let progress = ((scale - layout::HOVER_SCALE) / (layout::FOCUSED_SCALE - layout::HOVER_SCALE))
        .clamp(0.0, 1.0);
    Footprint {
        width: resting.width + (focused.width - resting.width) * progress,
        height: resting.height + (focused.height - resting.height) * progress,
    }
}

/// Whether a card is far enough into focus to show its full interior.
pub fn shows_focused_interior(rect: Rect, scale: f32) -> bool {
    scale > (layout::HOVER_SCALE + layout::FOCUSED_SCALE) / 2.0
        && rect.width >= FOCUSED_INTERIOR_MIN_WIDTH
        && rect.height >= FOCUSED_INTERIOR_MIN_HEIGHT
}

/// Projects a card's placement onto the desk, clipped to it. `None` if nothing is visible.
pub fn card_rect(desk: Rect, target: &LayoutTarget, footprint: Footprint) -> Option<Rect> {
    if desk.width == 0 || desk.height == 0 {
        return None;
    }
    let cells_per_px_x = desk.width as f32 / DESIGN_VIEWPORT_WIDTH;
    let cells_per_px_y = desk.height as f32 / DESIGN_VIEWPORT_HEIGHT;

    let width = (footprint.width * target.scale * cells_per_px_x)
        .round()
        .max(CARD_MIN_WIDTH as f32);
    let height = (footprint.height * target.scale * cells_per_px_y)
        .round()
        .max(CARD_MIN_HEIGHT as f32);

    let center_x = desk.x as f32 + desk.width as f32 / 2.0
        + target.translate_x / 100.0 * desk.width as f32;
    let center_y = desk.y as f32 + desk.height as f32 / 2.0
        + target.translate_y / 100.0 * desk.height as f32;

    let left = (center_x - width / 2.0).round();
    let top = (center_y - height / 2.0).round();
    let right = (left + width).min(desk.right() as f32);
    let bottom = (top + height).min(desk.bottom() as f32);
    let left = left.max(desk.x as f32);
    let top = top.max(desk.y as f32);
    if right <= left || bottom <= top {
        return None;
    }
    Some(Rect::new(
        left as u16,
        top as u16,
        (right - left) as u16,
        (bottom - top) as u16,
    ))
}

pub fn contains(rect: Rect, x: u16, y: u16) -> bool {
    x >= rect.x && x < rect.right() && y >= rect.y && y < rect.bottom()
}

// ── Card interiors ──────────────────────────────────────────────────────────

pub const CLOSE_BUTTON_WIDTH: u16 = 3;
pub const CLOSE_BUTTON_RIGHT_OFFSET: u16 = 4;

pub struct FocusedCardLayout {
    pub header: Rect,
    pub close_button: Rect,
    pub meta: Rect,
    pub image: Rect,
    pub footer: Rect,
}

/// Splits a focused card (including its border) into its regions.
pub fn split_focused_card(card: Rect) -> FocusedCardLayout {
    let inner = Rect::new(
        card.x + 1,
        card.y + 1,
        card.width.saturating_sub(2),
        card.height.saturating_sub(2),
    );
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
        .split(rows[1]);

    // The close button sits in the top border, like the lightbox's exit button.
    let close_button = Rect::new(
        (card.x + card.width).saturating_sub(CLOSE_BUTTON_RIGHT_OFFSET),
        card.y,
        CLOSE_BUTTON_WIDTH.min(card.width),
        1,
    );
    FocusedCardLayout {
        header: rows[0],
        close_button,
        meta: columns[0],
        image: columns[1],
        footer: rows[2],
    }
}

pub struct RestingCardLayout {
    pub art: Rect,
    pub caption: Rect,
}

pub fn split_resting_card(card: Rect) -> RestingCardLayout {
    let inner = Rect::new(
        card.x + 1,
        card.y + 1,
        card.width.saturating_sub(2),
        card.height.saturating_sub(2),
    );
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);
    RestingCardLayout {
        art: rows[0],
        caption: rows[1],
    }
}

// ── Lightbox ────────────────────────────────────────────────────────────────

pub const LIGHTBOX_FILL_FRACTION: f32 = 0.85;
pub const LIGHTBOX_MIN_WIDTH: u16 = 10;
pub const LIGHTBOX_BORDER_OVERHEAD: u16 = 2;
pub const LIGHTBOX_TOP_BAR_HEIGHT: u16 = 1;
pub const EXIT_BUTTON_LABEL: &str = "\u{2190} EXIT_FULL_VIEW";

/// Default half-block pixel aspect ratio (width / height) used when the
/// terminal does not report pixel dimensions.
const DEFAULT_HALF_BLOCK_RATIO: f64 = 10.0 / 13.0;

/// Aspect ratio of a single half-block pixel (width / height) for the current
/// terminal: one column wide, half a character cell tall.
pub(crate) fn half_block_correction() -> f64 {
    let Ok(ws) = crossterm::terminal::window_size() else {
        return DEFAULT_HALF_BLOCK_RATIO;
    };
    if ws.width == 0 || ws.height == 0 || ws.columns == 0 || ws.rows == 0 {
        return DEFAULT_HALF_BLOCK_RATIO;
    }
    let char_width = ws.width as f64 / ws.columns as f64;
    let char_height = ws.height as f64 / ws.rows as f64;
    2.0 * char_width / char_height
}

/// The exit button in the lightbox's top bar.
pub fn exit_button_rect(size: Rect) -> Rect {
    let width = (EXIT_BUTTON_LABEL.chars().count() as u16 + 2).min(size.width);
    Rect::new(size.x + 1, size.y, width, LIGHTBOX_TOP_BAR_HEIGHT)
}

/// The framed image in the lightbox, preserving the image's aspect ratio (width / height).
pub fn lightbox_image_rect(size: Rect, aspect_ratio: f32, half_block_ratio: f64) -> Rect {
    let aspect_ratio = layout::sanitize_aspect_ratio(aspect_ratio) as f64;
    let top = size.y + LIGHTBOX_TOP_BAR_HEIGHT;
    let available_height = size.height.saturating_sub(LIGHTBOX_TOP_BAR_HEIGHT);
    let max_width = ((size.width as f32) * LIGHTBOX_FILL_FRACTION) as u16;
    let max_height = ((available_height as f32) * LIGHTBOX_FILL_FRACTION) as u16;

    if max_height < LIGHTBOX_BORDER_OVERHEAD + 1 || max_width < LIGHTBOX_MIN_WIDTH {
        return Rect::new(size.x, top, size.width, available_height);
    }

    // Pixel rows per column, for an image of this aspect on this terminal.
    let pixel_rows_per_col = half_block_ratio / aspect_ratio;

    let mut width = max_width;
    let art_cols = width.saturating_sub(LIGHTBOX_BORDER_OVERHEAD) as f64;
    let max_art_rows = max_height.saturating_sub(LIGHTBOX_BORDER_OVERHEAD);
    // Anything taller than the frame gets clamped below, so cap before the cast.
    let art_term_rows = (art_cols * pixel_rows_per_col / 2.0)
        .ceil()
        .min(max_art_rows as f64 + 1.0) as u16;
    let mut height = art_term_rows.saturating_add(LIGHTBOX_BORDER_OVERHEAD);

    if height > max_height {
        height = max_height;
        let art_term_rows = height.saturating_sub(LIGHTBOX_BORDER_OVERHEAD) as f64;
        let art_cols = (art_term_rows * 2.0 / pixel_rows_per_col).floor() as u16;
        width = art_cols
            .saturating_add(LIGHTBOX_BORDER_OVERHEAD)
            .max(LIGHTBOX_MIN_WIDTH)
            .min(max_width);
    }

    let x = size.x + size.width.saturating_sub(width) / 2;
    let y = top + available_height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

// ── Interaction constants ───────────────────────────────────────────────────

pub const PAGE_SCROLL_SIZE: usize = 20;
pub const SCROLL_WHEEL_STEPS: usize = 3;

// ── Log view ────────────────────────────────────────────────────────────────

pub const LOG_TARGET_WIDTH: usize = 24;
pub const LOG_TARGET_SUFFIX_LEN: usize = 21;
pub const LOG_PANEL_WIDTH_FRACTION: f32 = 0.8;
pub const LOG_PANEL_HEIGHT_FRACTION: f32 = 0.7;

pub fn log_panel_rect(desk: Rect) -> Rect {
    let width = ((desk.width as f32) * LOG_PANEL_WIDTH_FRACTION) as u16;
    let height = ((desk.height as f32) * LOG_PANEL_HEIGHT_FRACTION) as u16;
    Rect::new(
        desk.x + desk.width.saturating_sub(width) / 2,
        desk.y + desk.height.saturating_sub(height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESK: Rect = Rect {
        x: 0,
        y: 3,
        width: 160,
        height: 45,
    };

    #[test]
    fn test_focused_card_is_centred() {
        let target = LayoutTarget::focused(5);
        let rect = card_rect(DESK, &target, card_footprint(1.0, target.scale)).unwrap();
        // 1152 / 1600 of the width, 86% of the height.
        assert_eq!(rect.width, 115);
        assert_eq!(rect.height, 39);
        let centre_x = rect.x + rect.width / 2;
        assert!(centre_x.abs_diff(DESK.x + DESK.width / 2) <= 1);
    }

    #[test]
    fn test_resting_cards_follow_scatter() {
        let (left, right) = (LayoutTarget::resting(0), LayoutTarget::resting(1));
        let left = card_rect(DESK, &left, card_footprint(1.0, left.scale)).unwrap();
        let right = card_rect(DESK, &right, card_footprint(1.0, right.scale)).unwrap();
        assert!(left.x < right.x);
        assert!(left.width < 115);
    }

    #[test]
    fn test_footprint_grows_with_scale() {
        let resting = card_footprint(0.5, layout::RESTING_SCALE);
        assert_eq!(resting, layout::resting_footprint(0.5));
        assert_eq!(card_footprint(0.5, layout::HOVER_SCALE), resting);

        let halfway = card_footprint(0.5, 0.82);
        let focused = card_footprint(0.5, layout::FOCUSED_SCALE);
        assert!(resting.width < halfway.width && halfway.width < focused.width);
        let expected = layout::focused_footprint(DESIGN_VIEWPORT_WIDTH, DESIGN_VIEWPORT_HEIGHT);
        assert!((focused.width - expected.width).abs() < 1e-3);
        assert!((focused.height - expected.height).abs() < 1e-3);
    }

    #[test]
    fn test_cards_are_clipped_to_desk() {
        let mut target = LayoutTarget::resting(0);
        target.translate_x = -60.0;
        let rect = card_rect(DESK, &target, card_footprint(1.0, target.scale));
        assert!(rect.is_none_or(|r| r.x >= DESK.x && r.right() <= DESK.right()));

        target.translate_x = -200.0;
        assert_eq!(card_rect(DESK, &target, card_footprint(1.0, target.scale)), None);
    }

    #[test]
    fn test_lightbox_image_stays_inside() {
        let size = Rect::new(0, 0, 120, 40);
        for aspect in [0.5, 1.0, 2.5, -3.0, 0.0001, 1e4] {
            let rect = lightbox_image_rect(size, aspect, DEFAULT_HALF_BLOCK_RATIO);
            assert!(rect.right() <= size.right());
            assert!(rect.bottom() <= size.bottom());
            assert!(rect.y >= LIGHTBOX_TOP_BAR_HEIGHT);
            assert!(rect.width >= LIGHTBOX_MIN_WIDTH);
            assert!(rect.height > LIGHTBOX_BORDER_OVERHEAD);
        }
    }

    #[test]
    fn test_close_button_in_top_border() {
        let card = Rect::new(10, 5, 40, 20);
        let layout = split_focused_card(card);
        assert_eq!(layout.close_button.y, card.y);
        assert!(layout.close_button.right() < card.right());
        assert!(layout.image.x > layout.meta.x);
    }
}
