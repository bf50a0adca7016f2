use crate::selection::Selection;

/// The enlarged image shown over everything else.
///
/// Only ever open while a record is focused; [`crate::Workstation`] closes it whenever the
/// selection is cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lightbox {
    enlarged_image_ref: Option<String>,
}
impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens the lightbox on `image_ref`. Returns `false` (and stays closed) when nothing is
    /// focused.
    pub fn open(&mut self, image_ref: impl Into<String>, selection: Selection) -> bool {
        if !selection.is_focused() {
            tracing::debug!("lightbox open ignored: no record focused");
            return false;
        }
        let image_ref = image_ref.into();
        tracing::debug!("lightbox opened on {image_ref}");
        self.enlarged_image_ref = Some(image_ref);
        true
    }

    /// Closes the lightbox. Returns whether it was open.
    pub fn close(&mut self) -> bool {
        let was_open = self.enlarged_image_ref.take().is_some();
        if was_open {
            tracing::debug!("lightbox closed");
        }
        was_open
    }

    pub fn enlarged_image_ref(&self) -> Option<&str> {
        self.enlarged_image_ref.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.enlarged_image_ref.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_requires_focus() {
        let mut lightbox = Lightbox::new();
        assert!(!lightbox.open("a.png", Selection::Unfocused));
        assert!(!lightbox.is_open());

        assert!(lightbox.open("a.png", Selection::Focused(0)));
        assert_eq!(lightbox.enlarged_image_ref(), Some("a.png"));
    }

    #[test]
    fn test_close_is_always_allowed() {
        let mut lightbox = Lightbox::new();
        assert!(!lightbox.close());
        lightbox.open("a.png", Selection::Focused(0));
        assert!(lightbox.close());
        assert!(!lightbox.close());
        assert_eq!(lightbox.enlarged_image_ref(), None);
    }
}
