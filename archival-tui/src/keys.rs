use archival_core::Key;
use crossterm::event::{KeyCode, KeyEvent};
use smol_str::{SmolStr, ToSmolStr};

/// Centrally defined key actions for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Forwarded to the workstation's input port as-is.
    Navigate(Key),
    Enlarge,
    Logs,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GotoTop,
    GotoBottom,
    Back,
}

// ── Key code constants ───────────────────────────────────────────

pub const KEY_QUIT: KeyCode = KeyCode::Char('q');
pub const KEY_LOGS: KeyCode = KeyCode::Char('L');
pub const KEY_ENLARGE: KeyCode = KeyCode::Enter;
pub const KEY_BACK: KeyCode = KeyCode::Esc;
pub const KEY_UP: KeyCode = KeyCode::Up;
pub const KEY_DOWN: KeyCode = KeyCode::Down;
pub const KEY_LEFT: KeyCode = KeyCode::Left;
pub const KEY_RIGHT: KeyCode = KeyCode::Right;
pub const KEY_PAGE_UP: KeyCode = KeyCode::PageUp;
pub const KEY_PAGE_DOWN: KeyCode = KeyCode::PageDown;
pub const KEY_GOTO_TOP: KeyCode = KeyCode::Home;
pub const KEY_GOTO_BOTTOM: KeyCode = KeyCode::End;

/// The terminal key that stands for each workstation key.
pub fn workstation_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KEY_UP => Key::ArrowUp,
        KEY_DOWN => Key::ArrowDown,
        KEY_LEFT => Key::ArrowLeft,
        KEY_RIGHT => Key::ArrowRight,
        KEY_BACK => Key::Escape,
        _ => return None,
    })
}

impl Action {
    /// Label shown in the help bar. Returns `None` for actions that shouldn't appear.
    pub fn help_label(&self) -> Option<(SmolStr, SmolStr)> {
        let (key, desc): (SmolStr, &str) = match self {
            Action::Quit => (KEY_QUIT.to_smolstr(), "quit"),
            Action::Navigate(Key::ArrowDown) => ("\u{2193}\u{2192}".into(), "next"),
            Action::Navigate(Key::ArrowUp) => ("\u{2191}\u{2190}".into(), "prev"),
            Action::Navigate(Key::Escape) | Action::Back => ("esc".into(), "close"),
            Action::Enlarge => ("enter".into(), "enlarge"),
            Action::Logs => (KEY_LOGS.to_smolstr(), "logs"),
            Action::MoveUp => ("\u{2191}".into(), "up"),
            Action::MoveDown => ("\u{2193}".into(), "down"),
            _ => return None,
        };
        Some((key, desc.into()))
    }
}

/// Resolve a key event on the desk.
pub fn desk_action(key: &KeyEvent) -> Option<Action> {
    if let Some(key) = workstation_key(key.code) {
        return Some(Action::Navigate(key));
    }
    match key.code {
        KEY_QUIT => Some(Action::Quit),
        KEY_LOGS => Some(Action::Logs),
        KEY_ENLARGE => Some(Action::Enlarge),
        _ => None,
    }
}

/// Resolve a key event while the lightbox is open. Every mapped key closes it.
pub fn lightbox_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KEY_BACK | KEY_QUIT | KEY_ENLARGE => Some(Action::Back),
        _ => None,
    }
}

/// Resolve a key event in the log panel.
pub fn logs_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KEY_BACK | KEY_LOGS | KEY_QUIT => Some(Action::Back),
        KEY_UP => Some(Action::MoveUp),
        KEY_DOWN => Some(Action::MoveDown),
        KEY_PAGE_UP => Some(Action::PageUp),
        KEY_PAGE_DOWN => Some(Action::PageDown),
        KEY_GOTO_TOP => Some(Action::GotoTop),
        KEY_GOTO_BOTTOM => Some(Action::GotoBottom),
        _ => None,
    }
}

/// Help bar on the desk with nothing focused.
pub const DESK_HELP: &[Action] = &[
    Action::Navigate(Key::ArrowDown),
    Action::Navigate(Key::ArrowUp),
    Action::Logs,
    Action::Quit,
];

/// Help bar while a record is focused.
pub const FOCUSED_HELP: &[Action] = &[
    Action::Navigate(Key::ArrowDown),
    Action::Navigate(Key::ArrowUp),
    Action::Enlarge,
    Action::Navigate(Key::Escape),
    Action::Quit,
];

pub const LIGHTBOX_HELP: &[Action] = &[Action::Back];

pub const LOGS_HELP: &[Action] = &[Action::Back, Action::MoveUp, Action::MoveDown];

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_desk_keys() {
        assert_eq!(
            desk_action(&press(KeyCode::Down)),
            Some(Action::Navigate(Key::ArrowDown))
        );
        assert_eq!(
            desk_action(&press(KeyCode::Left)),
            Some(Action::Navigate(Key::ArrowLeft))
        );
        assert_eq!(
            desk_action(&press(KeyCode::Esc)),
            Some(Action::Navigate(Key::Escape))
        );
        assert_eq!(desk_action(&press(KeyCode::Char('q'))), Some(Action::Quit));
        assert_eq!(desk_action(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_lightbox_keys_only_close() {
        assert_eq!(lightbox_action(&press(KeyCode::Esc)), Some(Action::Back));
        assert_eq!(lightbox_action(&press(KeyCode::Down)), None);
    }

    #[test]
    fn test_help_labels() {
        assert!(DESK_HELP.iter().all(|a| a.help_label().is_some()));
        assert!(FOCUSED_HELP.iter().all(|a| a.help_label().is_some()));
        assert_eq!(
            Action::Quit.help_label(),
            Some(("q".into(), "quit".into()))
        );
    }
}
