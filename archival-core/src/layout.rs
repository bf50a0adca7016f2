//! Where each record's card should be, given the current selection.
//!
//! Targets are discrete end states; interpolating between them is up to the renderer. The only
//! ordering rule the renderer must honour is the stacking one in [`StackingSchedule`].

use std::time::{Duration, Instant};

use crate::selection::{Selection, Transition};

/// Offset and tilt of one slot in the scattered desk arrangement.
///
/// Offsets are viewport-relative: `offset_x` in percent of the viewport width, `offset_y` in
/// percent of the viewport height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterDescriptor {
    pub offset_x: f32,
    pub offset_y: f32,
    /// Degrees, positive is clockwise.
    pub rotation: f32,
}
impl ScatterDescriptor {
    const fn new(offset_x: f32, offset_y: f32, rotation: f32) -> Self {
        Self {
            offset_x,
            offset_y,
            rotation,
        }
    }

    pub fn for_index(index: usize) -> Self {
        SCATTER_SET[index % SCATTER_SET.len()]
    }
}

pub const SCATTER_SET: [ScatterDescriptor; 5] = [
    ScatterDescriptor::new(-22.0, -12.0, -6.0),
    ScatterDescriptor::new(18.0, -15.0, 5.0),
    ScatterDescriptor::new(-16.0, 16.0, 7.0),
    ScatterDescriptor::new(20.0, 10.0, -4.0),
    ScatterDescriptor::new(2.0, 6.0, -2.0),
];

pub const FOCUSED_SCALE: f32 = 1.0;
pub const RESTING_SCALE: f32 = 0.6;
pub const HOVER_SCALE: f32 = 0.64;
pub const HOVER_ROTATION_FACTOR: f32 = 0.8;
pub const ENTRY_SCALE: f32 = 0.5;

/// Resting records at or beyond this index are drawn faded.
pub const OPAQUE_PILE_DEPTH: usize = 6;
pub const FADED_OPACITY: f32 = 0.3;

const FOCUSED_Z_INDEX_FLOOR: i32 = 50;

/// How long a record that lost focus keeps floating above the pile.
pub const DEMOTION_DELAY: Duration = Duration::from_millis(250);

/// Placement of one card. Translation uses the same units as [`ScatterDescriptor`], relative to
/// the centre of the desk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutTarget {
    pub translate_x: f32,
    pub translate_y: f32,
    pub rotation: f32,
    pub scale: f32,
    pub z_index: i32,
    pub opacity: f32,
}
impl LayoutTarget {
    /// Target for the active record.
    pub fn focused(catalog_size: usize) -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            rotation: 0.0,
            scale: FOCUSED_SCALE,
            z_index: focused_z_index(catalog_size),
            opacity: 1.0,
        }
    }

    /// Target for a record lying in the scattered pile.
    pub fn resting(index: usize) -> Self {
        let scatter = ScatterDescriptor::for_index(index);
        Self {
            translate_x: scatter.offset_x,
            translate_y: scatter.offset_y,
            rotation: scatter.rotation,
            scale: RESTING_SCALE,
            z_index: resting_z_index(index),
            opacity: if index < OPAQUE_PILE_DEPTH {
                1.0
            } else {
                FADED_OPACITY
            },
        }
    }

    /// Where a card starts before its first animation: centred, tilted, small and invisible.
    pub fn entry(index: usize) -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            rotation: ScatterDescriptor::for_index(index).rotation,
            scale: ENTRY_SCALE,
            z_index: resting_z_index(index),
            opacity: 0.0,
        }
    }

    /// Nudges a resting target up and towards level while the pointer is over it.
    pub fn hovered(self) -> Self {
        Self {
            scale: HOVER_SCALE,
            rotation: self.rotation * HOVER_ROTATION_FACTOR,
            ..self
        }
    }
}

/// Resolves the target for the record at `index`. Pure: equal inputs give equal outputs.
pub fn resolve(index: usize, selection: Selection, catalog_size: usize) -> LayoutTarget {
    if selection.is_active(index) {
        LayoutTarget::focused(catalog_size)
    } else {
        LayoutTarget::resting(index)
    }
}

/// Stacking order of a resting record; later records lie on top of earlier ones.
pub fn resting_z_index(index: usize) -> i32 {
    i32::try_from(index).map_or(i32::MAX - 2, |i| i.saturating_add(1))
}

/// Stacking order of the focused record: above every resting record, with one slot to spare
/// for a record that is still being demoted.
pub fn focused_z_index(catalog_size: usize) -> i32 {
    resting_z_index(catalog_size)
        .saturating_add(1)
        .max(FOCUSED_Z_INDEX_FLOOR)
}

/// Defers the stacking demotion of records that just lost focus.
///
/// Promotion is immediate. A record that stops being active keeps floating just below the
/// focused slot for [`DEMOTION_DELAY`], so its closing motion finishes above the pile.
#[derive(Debug, Clone, Default)]
pub struct StackingSchedule {
    demoting: Vec<(usize, Instant)>,
}
impl StackingSchedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_transition(&mut self, transition: &Transition, now: Instant) {
        self.demoting.retain(|(_, until)| *until > now);
        if let Some(promoted) = transition.promoted() {
            self.demoting.retain(|(index, _)| *index != promoted);
        }
        if let Some(demoted) = transition.demoted() {
            self.demoting.retain(|(index, _)| *index != demoted);
            self.demoting.push((demoted, now + DEMOTION_DELAY));
        }
    }

    pub fn is_demoting(&self, index: usize, now: Instant) -> bool {
        self.demoting
            .iter()
            .any(|(i, until)| *i == index && now < *until)
    }

    /// Whether no demotion is pending at `now`.
    pub fn is_settled(&self, now: Instant) -> bool {
        self.demoting.iter().all(|(_, until)| now >= *until)
    }

    /// Applies any pending demotion to `target`.
    pub fn apply(
        &self,
        index: usize,
        target: LayoutTarget,
        catalog_size: usize,
        now: Instant,
    ) -> LayoutTarget {
        if self.is_demoting(index, now) {
            LayoutTarget {
                z_index: focused_z_index(catalog_size) - 1,
                ..target
            }
        } else {
            target
        }
    }
}

/// Size of a card, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub width: f32,
    pub height: f32,
}

pub const RESTING_HEIGHT: f32 = 560.0;
pub const RESTING_MIN_WIDTH: f32 = 460.0;
pub const RESTING_MAX_WIDTH: f32 = 750.0;
pub const PORTRAIT_WIDENING: f32 = 1.15;

pub const FOCUSED_WIDTH_FRACTION: f32 = 0.94;
pub const FOCUSED_MAX_WIDTH: f32 = 1152.0;
pub const FOCUSED_HEIGHT_FRACTION: f32 = 0.86;

/// Falls back to square for aspect ratios that can't be laid out.
pub fn sanitize_aspect_ratio(aspect_ratio: f32) -> f32 {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        aspect_ratio
    } else {
        1.0
    }
}

/// Unscaled size of a resting card. Portrait records are widened (and given a minimum width)
/// so they don't collapse into slivers, and everything is capped at a maximum width.
pub fn resting_footprint(aspect_ratio: f32) -> Footprint {
    let aspect_ratio = sanitize_aspect_ratio(aspect_ratio);
    let mut width = RESTING_HEIGHT * aspect_ratio;
    if aspect_ratio < 1.0 {
        width = (width * PORTRAIT_WIDENING).max(RESTING_MIN_WIDTH);
    }
    Footprint {
        width: width.min(RESTING_MAX_WIDTH),
        height: RESTING_HEIGHT,
    }
}

/// Size of the focused card within a viewport of the given size.
pub fn focused_footprint(viewport_width: f32, viewport_height: f32) -> Footprint {
    Footprint {
        width: (viewport_width * FOCUSED_WIDTH_FRACTION).min(FOCUSED_MAX_WIDTH),
        height: viewport_height * FOCUSED_HEIGHT_FRACTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focused_target() {
        let target = resolve(2, Selection::Focused(2), 8);
        assert_eq!(target.translate_x, 0.0);
        assert_eq!(target.translate_y, 0.0);
        assert_eq!(target.rotation, 0.0);
        assert_eq!(target.scale, 1.0);
        assert_eq!(target.opacity, 1.0);
        assert!((0..8).all(|i| target.z_index > resolve(i, Selection::Unfocused, 8).z_index));
    }

    #[test]
    fn test_focused_z_index_grows_with_large_catalogs() {
        assert_eq!(focused_z_index(3), 50);
        let size = 200;
        let focused = focused_z_index(size);
        assert!(focused - 1 > resting_z_index(size - 1));
    }

    #[test]
    fn test_resting_target_uses_scatter() {
        let target = resolve(1, Selection::Unfocused, 3);
        assert_eq!(target.translate_x, 18.0);
        assert_eq!(target.translate_y, -15.0);
        assert_eq!(target.rotation, 5.0);
        assert_eq!(target.scale, 0.6);
        assert_eq!(target.z_index, 2);
        assert_eq!(target.opacity, 1.0);

        // Index 6 reuses slot 1 but is deep enough in the pile to fade.
        let deep = resolve(6, Selection::Focused(0), 10);
        assert_eq!(deep.translate_x, 18.0);
        assert_eq!(deep.z_index, 7);
        assert_eq!(deep.opacity, 0.3);
    }

    #[test]
    fn test_other_records_rest_while_one_is_focused() {
        assert_eq!(
            resolve(0, Selection::Focused(1), 3),
            resolve(0, Selection::Unfocused, 3)
        );
    }

    #[test]
    fn test_resolve_is_deterministic() {
        for index in 0..12 {
            for selection in [Selection::Unfocused, Selection::Focused(3)] {
                assert_eq!(resolve(index, selection, 12), resolve(index, selection, 12));
            }
        }
    }

    #[test]
    fn test_hover_and_entry() {
        let hovered = LayoutTarget::resting(0).hovered();
        assert_eq!(hovered.scale, HOVER_SCALE);
        assert!((hovered.rotation - -4.8).abs() < 1e-5);

        let entry = LayoutTarget::entry(2);
        assert_eq!(entry.opacity, 0.0);
        assert_eq!(entry.rotation, 7.0);
        assert_eq!(entry.scale, ENTRY_SCALE);
    }

    #[test]
    fn test_stacking_promotes_immediately_and_demotes_late() {
        let t0 = Instant::now();
        let mut stacking = StackingSchedule::new();
        let focus_a = Transition {
            from: Selection::Unfocused,
            to: Selection::Focused(0),
        };
        stacking.on_transition(&focus_a, t0);
        let a = stacking.apply(0, resolve(0, focus_a.to, 3), 3, t0);
        assert_eq!(a.z_index, focused_z_index(3));

        let a_to_b = Transition {
            from: Selection::Focused(0),
            to: Selection::Focused(1),
        };
        stacking.on_transition(&a_to_b, t0);
        let a = stacking.apply(0, resolve(0, a_to_b.to, 3), 3, t0 + Duration::from_millis(100));
        let b = stacking.apply(1, resolve(1, a_to_b.to, 3), 3, t0 + Duration::from_millis(100));
        assert_eq!(b.z_index, focused_z_index(3));
        assert_eq!(a.z_index, focused_z_index(3) - 1);
        // Everything except stacking already points at the resting slot.
        assert_eq!(a.scale, RESTING_SCALE);

        let later = t0 + DEMOTION_DELAY;
        let a = stacking.apply(0, resolve(0, a_to_b.to, 3), 3, later);
        assert_eq!(a.z_index, resting_z_index(0));
        assert!(stacking.is_settled(later));
    }

    #[test]
    fn test_repromotion_cancels_demotion() {
        let t0 = Instant::now();
        let mut stacking = StackingSchedule::new();
        stacking.on_transition(
            &Transition {
                from: Selection::Focused(0),
                to: Selection::Unfocused,
            },
            t0,
        );
        assert!(stacking.is_demoting(0, t0));
        stacking.on_transition(
            &Transition {
                from: Selection::Unfocused,
                to: Selection::Focused(0),
            },
            t0,
        );
        assert!(!stacking.is_demoting(0, t0));
    }

    #[test]
    fn test_resting_footprint() {
        let landscape = resting_footprint(1.2);
        assert_eq!(landscape.height, 560.0);
        assert!((landscape.width - 672.0).abs() < 1e-3);

        // Wide records hit the cap.
        assert_eq!(resting_footprint(3.0).width, 750.0);

        // Portrait: 560 * 0.8 * 1.15 = 515.2
        assert!((resting_footprint(0.8).width - 515.2).abs() < 1e-3);
        // Very tall records get the minimum width.
        assert_eq!(resting_footprint(0.3).width, 460.0);
    }

    #[test]
    fn test_malformed_aspect_ratio_falls_back_to_square() {
        for bad in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert_eq!(resting_footprint(bad), resting_footprint(1.0));
        }
        assert_eq!(resting_footprint(1.0).width, 560.0);
    }

    #[test]
    fn test_focused_footprint() {
        let small = focused_footprint(1000.0, 800.0);
        assert!((small.width - 940.0).abs() < 1e-3);
        assert!((small.height - 688.0).abs() < 1e-3);
        assert_eq!(focused_footprint(4000.0, 800.0).width, FOCUSED_MAX_WIDTH);
    }
}
