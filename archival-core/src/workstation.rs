use std::{
    sync::mpsc::{Receiver, Sender, TryRecvError},
    time::Instant,
};

use archival_state::{Catalog, Record, RecordId};

use crate::{
    config::NavigationConfig,
    input::{InputDebouncer, InputGate, Intent, Key},
    layout::{self, LayoutTarget, StackingSchedule},
    lightbox::Lightbox,
    selection::{Selection, SelectionMachine, Transition},
};

/// A raw event from the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Wheel { delta_y: f32 },
    Key(Key),
    /// Pointer click on a card.
    ClickRecord(RecordId),
    /// Pointer click on a card's image.
    ClickImage(RecordId),
    /// Pointer click on the lightbox backdrop (or its exit button).
    ClickBackdrop,
}

/// The single way input reaches a [`Workstation`].
///
/// Each event is stamped with the time it was sent. Dropping every port unsubscribes.
#[derive(Debug, Clone)]
pub struct InputPort {
    tx: Sender<(InputEvent, Instant)>,
}
impl InputPort {
    pub fn send(&self, event: InputEvent) {
        self.send_at(event, Instant::now());
    }

    pub fn send_at(&self, event: InputEvent, at: Instant) {
        if self.tx.send((event, at)).is_err() {
            tracing::warn!("input event dropped: workstation is gone");
        }
    }
}

/// Owns the catalog, the selection, and everything gated on it.
///
/// Every state change happens synchronously inside [`Workstation::dispatch`], in the order
/// events arrive.
pub struct Workstation {
    catalog: Catalog,
    selection: SelectionMachine,
    debouncer: InputDebouncer,
    lightbox: Lightbox,
    stacking: StackingSchedule,
    input_rx: Receiver<(InputEvent, Instant)>,
    subscribed: bool,
}
impl Workstation {
    pub fn new(catalog: Catalog, navigation: &NavigationConfig) -> (Self, InputPort) {
        let (tx, input_rx) = std::sync::mpsc::channel();
        tracing::info!("workstation opened with {} records", catalog.len());
        let workstation = Self {
            catalog,
            selection: SelectionMachine::new(),
            debouncer: InputDebouncer::new(navigation),
            lightbox: Lightbox::new(),
            stacking: StackingSchedule::new(),
            input_rx,
            subscribed: true,
        };
        (workstation, InputPort { tx })
    }

    /// Drains the input port, dispatching events in arrival order.
    pub fn update(&mut self) {
        if !self.subscribed {
            return;
        }
        loop {
            match self.input_rx.try_recv() {
                Ok((event, at)) => {
                    self.dispatch(event, at);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    tracing::info!("all input ports dropped, unsubscribing");
                    self.subscribed = false;
                    break;
                }
            }
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Handles one raw event. Returns the selection transition it caused, if any.
    pub fn dispatch(&mut self, event: InputEvent, now: Instant) -> Option<Transition> {
        match event {
            InputEvent::Wheel { delta_y } => {
                let intent = self.debouncer.wheel(delta_y, now, self.gate())?;
                self.apply_intent(&intent, now)
            }
            InputEvent::Key(key) => {
                let intent = self.debouncer.key(key, self.gate())?;
                self.apply_intent(&intent, now)
            }
            InputEvent::ClickRecord(id) => self.apply_intent(&Intent::Toggle(id), now),
            InputEvent::ClickImage(id) => {
                self.click_image(&id);
                None
            }
            InputEvent::ClickBackdrop => {
                self.close_lightbox();
                None
            }
        }
    }

    /// Feeds an intent to the selection machine and cascades the result.
    pub fn apply_intent(&mut self, intent: &Intent, now: Instant) -> Option<Transition> {
        let transition = self.selection.apply(intent, &self.catalog)?;
        if transition.is_unfocus() {
            self.lightbox.close();
        }
        self.stacking.on_transition(&transition, now);
        Some(transition)
    }

    /// Opens the lightbox on a record's image, but only if that record is the focused one.
    pub fn click_image(&mut self, id: &RecordId) -> bool {
        let Some(index) = self.catalog.index_of(id) else {
            tracing::debug!("image click on unknown record {id}");
            return false;
        };
        if !self.selection.selection().is_active(index) {
            return false;
        }
        let Some(record) = self.catalog.get(index) else {
            return false;
        };
        let image_ref = record.image_ref.clone();
        self.open_lightbox(image_ref)
    }

    pub fn open_lightbox(&mut self, image_ref: impl Into<String>) -> bool {
        self.lightbox.open(image_ref, self.selection.selection())
    }

    pub fn close_lightbox(&mut self) -> bool {
        self.lightbox.close()
    }

    pub fn gate(&self) -> InputGate {
        InputGate {
            focused: self.selection.selection().is_focused(),
            lightbox_open: self.lightbox.is_open(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selection(&self) -> Selection {
        self.selection.selection()
    }

    pub fn active_id(&self) -> Option<&RecordId> {
        self.selection.active_id(&self.catalog)
    }

    pub fn active_record(&self) -> Option<&Record> {
        self.selection
            .selection()
            .active_index()
            .and_then(|i| self.catalog.get(i))
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    pub fn enlarged_image_ref(&self) -> Option<&str> {
        self.lightbox.enlarged_image_ref()
    }

    /// Layout target for the record at `index`, including any pending stacking demotion.
    pub fn layout_target(&self, index: usize, now: Instant) -> LayoutTarget {
        let size = self.catalog.len();
        let target = layout::resolve(index, self.selection(), size);
        self.stacking.apply(index, target, size, now)
    }

    /// Like [`Self::layout_target`], with the hover nudge applied to resting records.
    pub fn hovered_layout_target(&self, index: usize, now: Instant) -> LayoutTarget {
        let target = self.layout_target(index, now);
        if self.selection().is_active(index) {
            target
        } else {
            target.hovered()
        }
    }

    /// Layout targets for every record, in catalog order.
    pub fn layout_targets(&self, now: Instant) -> Vec<LayoutTarget> {
        (0..self.catalog.len())
            .map(|i| self.layout_target(i, now))
            .collect()
    }

    /// Whether stacking has finished settling after the last transition.
    pub fn is_settled(&self, now: Instant) -> bool {
        self.stacking.is_settled(now)
    }
}
impl std::fmt::Debug for Workstation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workstation")
            .field("records", &self.catalog.len())
            .field("selection", &self.selection.selection())
            .field("lightbox", &self.lightbox)
            .field("subscribed", &self.subscribed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn catalog(ids: &[&str]) -> Catalog {
        Catalog::new(ids.iter().map(|id| Record {
            id: RecordId::new(*id),
            index: 0,
            code: Default::default(),
            title: id.to_string(),
            description: String::new(),
            tags: vec![],
            image_ref: format!("{id}.png"),
            aspect_ratio: 1.0,
            color: "#E8E4D9".to_string(),
            stats: vec![],
        }))
        .unwrap()
    }

    fn workstation(ids: &[&str]) -> (Workstation, InputPort) {
        Workstation::new(catalog(ids), &NavigationConfig::default())
    }

    #[test]
    fn test_port_events_are_dispatched_in_order() {
        let (mut ws, port) = workstation(&["a", "b", "c"]);
        let t0 = Instant::now();
        port.send_at(InputEvent::Key(Key::ArrowDown), t0);
        port.send_at(InputEvent::Key(Key::ArrowDown), t0);
        port.send_at(InputEvent::Key(Key::ArrowUp), t0);
        ws.update();
        assert_eq!(ws.active_id(), Some(&RecordId::new("a")));
    }

    #[test]
    fn test_dropping_ports_unsubscribes() {
        let (mut ws, port) = workstation(&["a"]);
        let second = port.clone();
        drop(port);
        ws.update();
        assert!(ws.is_subscribed());
        drop(second);
        ws.update();
        assert!(!ws.is_subscribed());
    }

    #[test]
    fn test_image_click_only_opens_for_active_record() {
        let (mut ws, _port) = workstation(&["a", "b"]);
        let t0 = Instant::now();
        assert!(!ws.click_image(&"a".into()));

        ws.dispatch(InputEvent::ClickRecord("a".into()), t0);
        assert!(!ws.click_image(&"b".into()));
        assert!(ws.click_image(&"a".into()));
        assert_eq!(ws.enlarged_image_ref(), Some("a.png"));
    }

    #[test]
    fn test_lightbox_swallows_keys_and_wheel() {
        let (mut ws, _port) = workstation(&["a", "b"]);
        let t0 = Instant::now();
        ws.dispatch(InputEvent::ClickRecord("a".into()), t0);
        ws.dispatch(InputEvent::ClickImage("a".into()), t0);

        assert_eq!(ws.dispatch(InputEvent::Key(Key::ArrowDown), t0), None);
        assert_eq!(ws.dispatch(InputEvent::Key(Key::Escape), t0), None);
        assert_eq!(
            ws.dispatch(InputEvent::Wheel { delta_y: 120.0 }, t0 + Duration::from_secs(5)),
            None
        );
        assert_eq!(ws.selection(), Selection::Focused(0));

        ws.dispatch(InputEvent::ClickBackdrop, t0);
        assert!(!ws.lightbox().is_open());
        assert_eq!(ws.selection(), Selection::Focused(0));
    }

    #[test]
    fn test_unfocus_by_click_closes_lightbox() {
        let (mut ws, _port) = workstation(&["a", "b"]);
        let t0 = Instant::now();
        ws.dispatch(InputEvent::ClickRecord("a".into()), t0);
        ws.open_lightbox("a.png");
        ws.dispatch(InputEvent::ClickRecord("a".into()), t0);
        assert_eq!(ws.selection(), Selection::Unfocused);
        assert_eq!(ws.enlarged_image_ref(), None);
    }

    #[test]
    fn test_clicks_do_not_touch_wheel_clock() {
        let (mut ws, _port) = workstation(&["a", "b"]);
        let t0 = Instant::now();
        ws.dispatch(InputEvent::ClickRecord("a".into()), t0);
        ws.dispatch(InputEvent::ClickRecord("a".into()), t0);
        let transition = ws.dispatch(InputEvent::Wheel { delta_y: 120.0 }, t0);
        assert_eq!(transition.map(|t| t.to), Some(Selection::Focused(0)));
    }

    #[test]
    fn test_layout_target_applies_stacking() {
        let (mut ws, _port) = workstation(&["a", "b", "c"]);
        let t0 = Instant::now();
        ws.dispatch(InputEvent::Key(Key::ArrowDown), t0);
        ws.dispatch(InputEvent::Key(Key::Escape), t0);

        let during = ws.layout_target(0, t0 + Duration::from_millis(100));
        assert!(during.z_index > layout::resting_z_index(2));
        assert!(!ws.is_settled(t0 + Duration::from_millis(100)));

        let after = ws.layout_target(0, t0 + layout::DEMOTION_DELAY);
        assert_eq!(after, layout::LayoutTarget::resting(0));
        assert!(ws.is_settled(t0 + layout::DEMOTION_DELAY));
    }

    #[test]
    fn test_hover_only_affects_resting_records() {
        let (mut ws, _port) = workstation(&["a", "b"]);
        let t0 = Instant::now();
        ws.dispatch(InputEvent::ClickRecord("a".into()), t0);
        assert_eq!(ws.hovered_layout_target(0, t0), ws.layout_target(0, t0));
        assert_eq!(
            ws.hovered_layout_target(1, t0).scale,
            layout::HOVER_SCALE
        );
    }
}
