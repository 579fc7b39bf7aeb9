#![forbid(unsafe_code)]

//! Input events as the controller sees them.
//!
//! Only what the key bindings can act on survives translation from crossterm:
//! mouse input, paste, resize, focus changes and keys without a binding are
//! dropped at the boundary. Auto-repeat counts as a press so held arrows keep
//! panning.

use bitflags::bitflags;
use crossterm::event as cte;

/// One input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// The session asked to end.
    Close,
}

impl Event {
    /// Translate a crossterm event, or `None` if nothing can bind to it.
    #[must_use]
    pub fn from_crossterm(event: cte::Event) -> Option<Self> {
        match event {
            cte::Event::Key(key) => Some(Event::Key(KeyEvent {
                code: map_key_code(key.code)?,
                modifiers: map_modifiers(key.modifiers),
                kind: map_key_kind(key.kind),
            })),
            _ => None,
        }
    }

    /// A plain key press.
    #[must_use]
    pub const fn key(code: KeyCode) -> Self {
        Event::Key(KeyEvent::new(code))
    }

    /// A plain character press.
    #[must_use]
    pub const fn char(c: char) -> Self {
        Event::key(KeyCode::Char(c))
    }
}

/// A key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub modifiers: Modifiers,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::empty(),
            kind: KeyEventKind::Press,
        }
    }

    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub const fn with_kind(mut self, kind: KeyEventKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether Ctrl was held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }
}

/// Keys that can carry a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key, keypad digits included.
    Char(char),
    Enter,
    Escape,
    Home,
    Up,
    Down,
    Left,
    Right,
    /// Keypad 5 with Num Lock off.
    KeypadBegin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyEventKind {
    #[default]
    Press,
    Release,
}

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const CTRL = 0b0001;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::empty()
    }
}

fn map_key_kind(kind: cte::KeyEventKind) -> KeyEventKind {
    match kind {
        cte::KeyEventKind::Press | cte::KeyEventKind::Repeat => KeyEventKind::Press,
        cte::KeyEventKind::Release => KeyEventKind::Release,
    }
}

fn map_key_code(code: cte::KeyCode) -> Option<KeyCode> {
    let code = match code {
        cte::KeyCode::Char(c) => KeyCode::Char(c),
        cte::KeyCode::Enter => KeyCode::Enter,
        cte::KeyCode::Esc => KeyCode::Escape,
        cte::KeyCode::Home => KeyCode::Home,
        cte::KeyCode::Up => KeyCode::Up,
        cte::KeyCode::Down => KeyCode::Down,
        cte::KeyCode::Left => KeyCode::Left,
        cte::KeyCode::Right => KeyCode::Right,
        cte::KeyCode::KeypadBegin => KeyCode::KeypadBegin,
        _ => return None,
    };
    Some(code)
}

fn map_modifiers(modifiers: cte::KeyModifiers) -> Modifiers {
    if modifiers.contains(cte::KeyModifiers::CONTROL) {
        Modifiers::CTRL
    } else {
        Modifiers::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(code: cte::KeyCode, modifiers: cte::KeyModifiers) -> Option<Event> {
        Event::from_crossterm(cte::Event::Key(cte::KeyEvent::new(code, modifiers)))
    }

    #[test]
    fn plain_character() {
        assert_eq!(
            translate(cte::KeyCode::Char('p'), cte::KeyModifiers::NONE),
            Some(Event::char('p'))
        );
    }

    #[test]
    fn ctrl_is_kept_and_other_modifiers_are_not() {
        let Some(Event::Key(key)) = translate(cte::KeyCode::Char('c'), cte::KeyModifiers::CONTROL)
        else {
            panic!("expected a key event");
        };
        assert!(key.ctrl());
        assert_eq!(key.code, KeyCode::Char('c'));

        let alt = translate(cte::KeyCode::Char('c'), cte::KeyModifiers::ALT | cte::KeyModifiers::SHIFT);
        assert_eq!(alt, Some(Event::char('c')));
    }

    #[test]
    fn unbindable_keys_and_events_are_dropped() {
        for code in [
            cte::KeyCode::Tab,
            cte::KeyCode::Backspace,
            cte::KeyCode::PageUp,
            cte::KeyCode::F(5),
            cte::KeyCode::Insert,
        ] {
            assert_eq!(translate(code, cte::KeyModifiers::NONE), None, "{code:?}");
        }
        assert_eq!(Event::from_crossterm(cte::Event::Resize(80, 24)), None);
        assert_eq!(Event::from_crossterm(cte::Event::FocusLost), None);
        assert_eq!(Event::from_crossterm(cte::Event::Paste("x".into())), None);
    }

    #[test]
    fn escape_and_keypad_centre() {
        assert_eq!(map_key_code(cte::KeyCode::Esc), Some(KeyCode::Escape));
        assert_eq!(map_key_code(cte::KeyCode::KeypadBegin), Some(KeyCode::KeypadBegin));
    }

    #[test]
    fn repeat_is_a_press_and_release_is_kept() {
        let event = |kind| {
            Event::from_crossterm(cte::Event::Key(cte::KeyEvent::new_with_kind(
                cte::KeyCode::Up,
                cte::KeyModifiers::NONE,
                kind,
            )))
        };
        assert_eq!(event(cte::KeyEventKind::Repeat), Some(Event::key(KeyCode::Up)));
        assert_eq!(
            event(cte::KeyEventKind::Release),
            Some(Event::Key(KeyEvent::new(KeyCode::Up).with_kind(KeyEventKind::Release)))
        );
    }
}
