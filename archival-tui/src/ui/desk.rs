use archival_core::{LayoutTarget, Record, Selection};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Clear, Paragraph, Sparkline, Wrap},
};

use crate::{
    app::App,
    style::{blend, rgb},
};

use super::layout;

/// Which part of a card the pointer is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardRegion {
    Body,
    Image,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardHit {
    pub index: usize,
    pub region: CardRegion,
}

#[derive(Debug, Clone, Copy)]
struct PlacedCard {
    index: usize,
    rect: Rect,
    target: LayoutTarget,
}
impl PlacedCard {
    fn focused_interior(&self) -> bool {
        layout::shows_focused_interior(self.rect, self.target.scale)
    }
}

/// Every visible card, bottom of the pile first.
fn placed_cards(app: &App, desk: Rect) -> Vec<PlacedCard> {
    let catalog = app.workstation.catalog();
    let mut cards: Vec<_> = app
        .animator
        .cards()
        .iter()
        .enumerate()
        .filter_map(|(index, target)| {
            let record = catalog.get(index)?;
            let footprint = layout::card_footprint(record.aspect_ratio, target.scale);
            let rect = layout::card_rect(desk, target, footprint)?;
            Some(PlacedCard {
                index,
                rect,
                target: *target,
            })
        })
        .collect();
    cards.sort_by_key(|c| (c.target.z_index, c.index));
    cards
}

/// Finds the topmost card under the pointer.
pub fn hit_test(app: &App, desk: Rect, x: u16, y: u16) -> Option<CardHit> {
    let card = placed_cards(app, desk)
        .into_iter()
        .rev()
        .find(|c| layout::contains(c.rect, x, y))?;

    let mut region = CardRegion::Body;
    if app.workstation.selection().is_active(card.index) && card.focused_interior() {
        let interior = layout::split_focused_card(card.rect);
        if layout::contains(interior.close_button, x, y) {
            region = CardRegion::Close;
        } else if layout::contains(interior.image, x, y) {
            region = CardRegion::Image;
        }
    }
    Some(CardHit {
        index: card.index,
        region,
    })
}

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let selection = app.workstation.selection();
    for card in placed_cards(app, area) {
        let Some(record) = app.workstation.catalog().get(card.index).cloned() else {
            continue;
        };
        let hovered = app.hovered == Some(card.index);
        draw_card(frame, app, &record, card, selection, hovered);
    }

    if app.workstation.catalog().is_empty() {
        let empty = Paragraph::new("NO RECORDS IN INDEX")
            .style(Style::default().fg(app.config.style.muted()))
            .centered();
        frame.render_widget(empty, Rect::new(area.x, area.y + area.height / 2, area.width, 1));
    }
}

fn draw_card(
    frame: &mut Frame,
    app: &mut App,
    record: &Record,
    card: PlacedCard,
    selection: Selection,
    hovered: bool,
) {
    let style = &app.config.style;
    let backdrop = style.background();
    let opacity = card.target.opacity;

    let folder = record.color_rgb().map(rgb).unwrap_or(style.paper());
    let ink = if record.is_dark() { style.paper() } else { style.ink() };
    let folder = blend(folder, backdrop, opacity);
    let ink = blend(ink, backdrop, opacity);
    let border = if hovered || selection.is_active(card.index) {
        blend(style.accent(), backdrop, opacity)
    } else {
        ink
    };

    frame.render_widget(Clear, card.rect);
    let block = Block::bordered()
        .border_type(if selection.is_active(card.index) {
            BorderType::Thick
        } else {
            BorderType::Plain
        })
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(folder).fg(ink))
        .title(Line::from(Span::styled(
            format!(" {} ", record.code),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    frame.render_widget(block, card.rect);

    if selection.is_active(card.index) && card.focused_interior() {
        draw_focused_interior(frame, app, record, card.rect, folder, ink);
    } else {
        let interior = layout::split_resting_card(card.rect);
        let fallback = record.color_rgb().map(rgb).unwrap_or(Color::DarkGray);
        super::draw_art(
            frame,
            &mut app.art_cache,
            &record.image_ref,
            interior.art,
            fallback,
            backdrop,
            opacity,
        );
        let caption = super::truncate(&record.title, interior.caption.width as usize);
        frame.render_widget(
            Paragraph::new(caption).style(Style::default().fg(ink).bg(folder)),
            interior.caption,
        );
    }
}

fn draw_focused_interior(
    frame: &mut Frame,
    app: &mut App,
    record: &Record,
    rect: Rect,
    folder: Color,
    ink: Color,
) {
    let style = &app.config.style;
    let accent = style.accent();
    let muted = blend(ink, folder, 0.6);
    let backdrop = style.background();
    let interior = layout::split_focused_card(rect);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "[X]",
            Style::default().fg(accent).add_modifier(Modifier::BOLD),
        )),
        interior.close_button,
    );

    let header = Line::from(vec![
        Span::styled(format!("REF: {}  ", record.id), Style::default().fg(muted)),
        Span::styled(
            super::truncate(
                &record.title.to_uppercase(),
                (interior.header.width as usize).saturating_sub(record.id.as_str().len() + 7),
            ),
            Style::default().fg(ink).add_modifier(Modifier::BOLD),
        ),
    ]);
    frame.render_widget(Paragraph::new(header), interior.header);

    // Metadata column: description, tags, then the signal log if there's room.
    let meta = interior.meta;
    let stats_height = if record.stats.is_empty() || meta.height < 8 {
        0
    } else {
        3
    };
    let text_area = Rect::new(
        meta.x,
        meta.y,
        meta.width.saturating_sub(1),
        meta.height.saturating_sub(stats_height),
    );
    let mut lines = vec![
        Line::from(Span::styled("// DESCRIPTION", Style::default().fg(muted))),
        Line::from(Span::styled(
            record.description.as_str(),
            Style::default().fg(ink),
        )),
        Line::default(),
    ];
    if !record.tags.is_empty() {
        lines.push(Line::from(Span::styled("// TAGS", Style::default().fg(muted))));
        lines.push(Line::from(
            record
                .tags
                .iter()
                .map(|tag| Span::styled(format!("#{tag} "), Style::default().fg(ink)))
                .collect::<Vec<_>>(),
        ));
    }
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        text_area,
    );

    if stats_height > 0 {
        let stats_area = Rect::new(
            meta.x,
            meta.bottom() - stats_height,
            meta.width.saturating_sub(1),
            stats_height,
        );
        let data: Vec<u64> = record
            .stats
            .iter()
            .map(|v| (v.max(0.0) * 100.0).round() as u64)
            .collect();
        let sparkline = Sparkline::default()
            .block(Block::default().title(Span::styled(
                "// SIGNAL_LOG",
                Style::default().fg(muted),
            )))
            .data(data)
            .style(Style::default().fg(accent).bg(folder));
        frame.render_widget(sparkline, stats_area);
    }

    let fallback = record.color_rgb().map(rgb).unwrap_or(Color::DarkGray);
    let loaded = super::draw_art(
        frame,
        &mut app.art_cache,
        &record.image_ref,
        interior.image,
        fallback,
        backdrop,
        1.0,
    );
    if !loaded && app.art_cache.is_loading(&record.image_ref) {
        frame.render_widget(
            Paragraph::new("LOADING\u{2026}")
                .style(Style::default().fg(ink))
                .centered(),
            Rect::new(
                interior.image.x,
                interior.image.y + interior.image.height / 2,
                interior.image.width,
                1,
            ),
        );
    }

    frame.render_widget(
        Paragraph::new(Span::styled(
            "CLICK IMAGE OR PRESS ENTER TO ENLARGE",
            Style::default().fg(muted),
        ))
        .right_aligned(),
        interior.footer,
    );
}
