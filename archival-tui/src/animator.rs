//! Eases each card from where it is drawn towards its current layout target.

use archival_core::LayoutTarget;

/// Distances below this snap straight to the target.
const SETTLE_EPSILON: f32 = 0.01;

#[derive(Debug, Clone, Default)]
pub struct DeskAnimator {
    cards: Vec<LayoutTarget>,
}

impl DeskAnimator {
    /// Cards start at their entry placement and animate towards their targets from there.
    pub fn new(entry: impl IntoIterator<Item = LayoutTarget>) -> Self {
        Self {
            cards: entry.into_iter().collect(),
        }
    }

    /// Moves every card `rate` of the way towards its target. Stacking order is never
    /// interpolated: it is taken from the target as-is.
    pub fn step(&mut self, targets: &[LayoutTarget], rate: f32) {
        let rate = rate.clamp(0.0, 1.0);
        self.cards.resize(targets.len(), LayoutTarget::resting(0));
        for (card, target) in self.cards.iter_mut().zip(targets) {
            *card = LayoutTarget {
                translate_x: approach(card.translate_x, target.translate_x, rate),
                translate_y: approach(card.translate_y, target.translate_y, rate),
                rotation: approach(card.rotation, target.rotation, rate),
                scale: approach(card.scale, target.scale, rate),
                opacity: approach(card.opacity, target.opacity, rate),
                z_index: target.z_index,
            };
        }
    }

    pub fn cards(&self) -> &[LayoutTarget] {
        &self.cards
    }

    pub fn is_settled(&self, targets: &[LayoutTarget]) -> bool {
        self.cards.len() == targets.len() && self.cards.iter().zip(targets).all(|(c, t)| c == t)
    }
}

fn approach(current: f32, target: f32, rate: f32) -> f32 {
    let next = current + (target - current) * rate;
    if (target - next).abs() < SETTLE_EPSILON {
        target
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use archival_core::layout;

    use super::*;

    #[test]
    fn test_cards_converge_on_targets() {
        let mut animator = DeskAnimator::new((0..3).map(LayoutTarget::entry));
        let targets: Vec<_> = (0..3).map(LayoutTarget::resting).collect();
        assert!(!animator.is_settled(&targets));
        for _ in 0..100 {
            animator.step(&targets, 0.35);
        }
        assert!(animator.is_settled(&targets));
    }

    #[test]
    fn test_z_index_is_not_interpolated() {
        let mut animator = DeskAnimator::new([LayoutTarget::resting(0)]);
        let focused = LayoutTarget::focused(1);
        animator.step(&[focused], 0.1);
        assert_eq!(animator.cards()[0].z_index, focused.z_index);
        assert!(animator.cards()[0].scale < layout::FOCUSED_SCALE);
    }

    #[test]
    fn test_catalog_size_changes_are_tolerated() {
        let mut animator = DeskAnimator::default();
        let targets: Vec<_> = (0..2).map(LayoutTarget::resting).collect();
        animator.step(&targets, 1.0);
        assert!(animator.is_settled(&targets));
    }
}
