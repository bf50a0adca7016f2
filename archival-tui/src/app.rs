use std::time::Instant;

use archival_core::{InputEvent, InputPort, LayoutTarget, RecordId, Ticker, Workstation};

use crate::{
    animator::DeskAnimator,
    art::ArtCache,
    config::Config,
    log_buffer::LogBuffer,
    ui::desk::{CardHit, CardRegion},
};

pub struct App {
    // Core infrastructure
    pub workstation: Workstation,
    pub input: InputPort,
    pub config: Config,
    pub art_cache: ArtCache,
    pub ticker: Ticker,
    pub animator: DeskAnimator,

    // Global UI orchestration
    pub show_logs: bool,
    pub should_quit: bool,
    pub needs_redraw: bool,
    pub hovered: Option<usize>,

    pub log_buffer: LogBuffer,
    pub logs_scroll_offset: usize,
}

impl App {
    pub fn new(
        config: Config,
        workstation: Workstation,
        input: InputPort,
        art_cache: ArtCache,
        log_buffer: LogBuffer,
    ) -> Self {
        let animator = DeskAnimator::new(
            (0..workstation.catalog().len()).map(LayoutTarget::entry),
        );
        let mut ticker = Ticker::new();
        ticker.start(Instant::now());

        Self {
            workstation,
            input,
            config,
            art_cache,
            ticker,
            animator,

            show_logs: false,
            should_quit: false,
            needs_redraw: true,
            hovered: None,

            log_buffer,
            logs_scroll_offset: 0,
        }
    }

    /// Sends an event through the input port and lets the workstation handle it right away,
    /// so the next frame already reflects it.
    pub fn send(&mut self, event: InputEvent) {
        self.input.send(event);
        self.workstation.update();
        self.needs_redraw = true;
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        self.workstation.update();
        self.art_cache.update();

        let events = self.ticker.poll(now);
        if events.status {
            tracing::trace!("status: {}", self.ticker.status_text());
        }

        let targets = self.layout_targets(now);
        if !self.animator.is_settled(&targets) || events.clock || events.status {
            self.animator
                .step(&targets, self.config.general.animation_rate);
            self.needs_redraw = true;
        }
    }

    /// Targets for every card, with the hover nudge applied to the card under the pointer.
    pub fn layout_targets(&self, now: Instant) -> Vec<LayoutTarget> {
        (0..self.workstation.catalog().len())
            .map(|i| {
                if self.hovered == Some(i) && !self.workstation.lightbox().is_open() {
                    self.workstation.hovered_layout_target(i, now)
                } else {
                    self.workstation.layout_target(i, now)
                }
            })
            .collect()
    }

    /// Opens the lightbox on the focused record's image.
    pub fn enlarge_focused(&mut self) {
        if let Some(id) = self.workstation.active_id().cloned() {
            self.send(InputEvent::ClickImage(id));
        }
    }

    pub fn click_record(&mut self, id: RecordId) {
        self.send(InputEvent::ClickRecord(id));
    }

    /// Routes a left click on a desk card. The focused card only reacts to its close button
    /// and its image; clicks elsewhere on it are ignored.
    pub fn click_card(&mut self, hit: CardHit) {
        let Some(id) = self
            .workstation
            .catalog()
            .get(hit.index)
            .map(|r| r.id.clone())
        else {
            return;
        };
        let active = self.workstation.selection().is_active(hit.index);
        match hit.region {
            CardRegion::Close => self.click_record(id),
            CardRegion::Body if !active => self.click_record(id),
            CardRegion::Body => {}
            CardRegion::Image => self.send(InputEvent::ClickImage(id)),
        }
    }

    pub fn toggle_logs(&mut self) {
        self.show_logs = !self.show_logs;
        if self.show_logs {
            self.logs_scroll_offset = self.log_buffer.len().saturating_sub(1);
        }
    }

    /// Stops the background timers; called when the desk is torn down.
    pub fn shutdown(&mut self) {
        self.ticker.stop();
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use archival_core::{Catalog, Selection};

    use super::*;

    fn test_app() -> App {
        let catalog = Catalog::from_toml_str(
            r#"
            [[record]]
            id = "a"
            title = "First"
            image_ref = "https://example.invalid/a.jpg"

            [[record]]
            id = "b"
            title = "Second"
            image_ref = "https://example.invalid/b.jpg"
            "#,
        )
        .unwrap();
        let config = Config::default();
        let (workstation, input) = Workstation::new(catalog, &config.navigation);
        App::new(
            config,
            workstation,
            input,
            ArtCache::new(PathBuf::from(".")),
            LogBuffer::new(),
        )
    }

    fn hit(index: usize, region: CardRegion) -> CardHit {
        CardHit { index, region }
    }

    #[test]
    fn test_body_click_focuses_resting_card() {
        let mut app = test_app();
        app.click_card(hit(1, CardRegion::Body));
        assert_eq!(app.workstation.selection(), Selection::Focused(1));
    }

    #[test]
    fn test_body_click_on_focused_card_is_ignored() {
        let mut app = test_app();
        app.click_card(hit(0, CardRegion::Body));
        app.click_card(hit(0, CardRegion::Body));
        assert_eq!(app.workstation.selection(), Selection::Focused(0));

        // Another card's body still switches focus.
        app.click_card(hit(1, CardRegion::Body));
        assert_eq!(app.workstation.selection(), Selection::Focused(1));
    }

    #[test]
    fn test_close_button_unfocuses() {
        let mut app = test_app();
        app.click_card(hit(0, CardRegion::Body));
        app.click_card(hit(0, CardRegion::Close));
        assert_eq!(app.workstation.selection(), Selection::Unfocused);
    }

    #[test]
    fn test_image_click_opens_lightbox() {
        let mut app = test_app();
        app.click_card(hit(0, CardRegion::Body));
        app.click_card(hit(0, CardRegion::Image));
        assert!(app.workstation.lightbox().is_open());
        assert_eq!(app.workstation.selection(), Selection::Focused(0));
    }

    #[test]
    fn test_click_on_missing_card_is_ignored() {
        let mut app = test_app();
        app.click_card(hit(7, CardRegion::Body));
        assert_eq!(app.workstation.selection(), Selection::Unfocused);
    }
}
