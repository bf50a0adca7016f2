use archival_state::{Catalog, RecordId};

use crate::input::Intent;

/// Which record, if any, is in focused full view.
///
/// Stored as a catalog index; IDs are resolved once when an intent arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unfocused,
    Focused(usize),
}
impl Selection {
    pub fn is_focused(&self) -> bool {
        matches!(self, Selection::Focused(_))
    }

    pub fn active_index(&self) -> Option<usize> {
        match self {
            Selection::Unfocused => None,
            Selection::Focused(index) => Some(*index),
        }
    }

    pub fn is_active(&self, index: usize) -> bool {
        self.active_index() == Some(index)
    }
}

/// A selection change that actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Selection,
    pub to: Selection,
}
impl Transition {
    /// The record that just became active.
    pub fn promoted(&self) -> Option<usize> {
        self.to.active_index()
    }

    /// The record that just stopped being active.
    pub fn demoted(&self) -> Option<usize> {
        self.from.active_index()
    }

    pub fn is_unfocus(&self) -> bool {
        !self.to.is_focused()
    }
}

/// The single writer of [`Selection`].
#[derive(Debug, Clone, Default)]
pub struct SelectionMachine {
    selection: Selection,
}
impl SelectionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn active_id<'a>(&self, catalog: &'a Catalog) -> Option<&'a RecordId> {
        self.selection
            .active_index()
            .and_then(|i| catalog.get(i))
            .map(|r| &r.id)
    }

    /// Applies `intent`, returning the transition if the selection changed.
    ///
    /// Intents that refer to unknown records, or that would leave the selection where it is,
    /// are no-ops.
    pub fn apply(&mut self, intent: &Intent, catalog: &Catalog) -> Option<Transition> {
        let Some(to) = Self::next(self.selection, intent, catalog) else {
            tracing::debug!("intent {intent:?} rejected from {:?}", self.selection);
            return None;
        };
        if to == self.selection {
            return None;
        }

        let transition = Transition {
            from: self.selection,
            to,
        };
        self.selection = to;
        tracing::debug!("selection {:?} -> {:?}", transition.from, transition.to);
        Some(transition)
    }

    fn next(current: Selection, intent: &Intent, catalog: &Catalog) -> Option<Selection> {
        let next = match (intent, current) {
            (Intent::Advance, Selection::Unfocused) => Selection::Focused(catalog.first_index()?),
            (Intent::Advance, Selection::Focused(i)) => Selection::Focused(catalog.next_index(i)?),
            (Intent::Retreat, Selection::Unfocused) => Selection::Focused(catalog.last_index()?),
            (Intent::Retreat, Selection::Focused(i)) => {
                Selection::Focused(catalog.previous_index(i)?)
            }
            (Intent::Dismiss, _) => Selection::Unfocused,
            (Intent::Toggle(id), current) => {
                let index = catalog.index_of(id)?;
                if current.is_active(index) {
                    Selection::Unfocused
                } else {
                    Selection::Focused(index)
                }
            }
        };
        Some(next)
    }
}
