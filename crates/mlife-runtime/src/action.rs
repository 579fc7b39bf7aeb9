#![forbid(unsafe_code)]

//! Key bindings: what each input event asks the controller to do.
//!
//! | Input                         | Action                 |
//! |-------------------------------|------------------------|
//! | `Esc`, `q`, `Q`, window close | quit                   |
//! | `Ctrl+C`                      | cancel                 |
//! | `Space`, `p`, `P`             | toggle pause           |
//! | `Enter`, `s`, `S`             | single step (paused)   |
//! | arrows, keypad `2 4 6 8`      | pan one cell           |
//! | keypad `1 3 7 9`              | pan diagonally         |
//! | keypad `5`, `Home`            | recentre               |
//! | `+`, `=` / `-`                | zoom in / out          |
//!
//! Pan deltas move the picture: `Up` shifts it one row down, so the view
//! travels up the grid.

use crate::event::{Event, KeyCode, KeyEvent, KeyEventKind};

/// Zoom step for one key press.
pub const ZOOM_STEP: f64 = 1.0;

/// A controller action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Quit,
    Cancel,
    TogglePause,
    Step,
    Move(i64, i64),
    Recentre,
    Zoom(f64),
}

/// Action bound to `event`, or `None` when the event is not bound.
#[must_use]
pub fn action_for(event: &Event) -> Option<Action> {
    match event {
        Event::Key(key) => key_action(key),
        Event::Close => Some(Action::Quit),
    }
}

fn key_action(key: &KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.ctrl() {
        return match key.code {
            KeyCode::Char('c' | 'C') => Some(Action::Cancel),
            _ => None,
        };
    }
    let action = match key.code {
        KeyCode::Escape | KeyCode::Char('q' | 'Q') => Action::Quit,
        KeyCode::Char(' ' | 'p' | 'P') => Action::TogglePause,
        KeyCode::Enter | KeyCode::Char('s' | 'S') => Action::Step,
        KeyCode::Up | KeyCode::Char('8') => Action::Move(0, 1),
        KeyCode::Down | KeyCode::Char('2') => Action::Move(0, -1),
        KeyCode::Left | KeyCode::Char('4') => Action::Move(1, 0),
        KeyCode::Right | KeyCode::Char('6') => Action::Move(-1, 0),
        KeyCode::Char('7') => Action::Move(1, 1),
        KeyCode::Char('9') => Action::Move(-1, 1),
        KeyCode::Char('1') => Action::Move(1, -1),
        KeyCode::Char('3') => Action::Move(-1, -1),
        KeyCode::Home | KeyCode::KeypadBegin | KeyCode::Char('5') => Action::Recentre,
        KeyCode::Char('+' | '=') => Action::Zoom(ZOOM_STEP),
        KeyCode::Char('-') => Action::Zoom(-ZOOM_STEP),
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Modifiers;

    #[test]
    fn quit_keys() {
        for event in [Event::key(KeyCode::Escape), Event::char('q'), Event::char('Q'), Event::Close] {
            assert_eq!(action_for(&event), Some(Action::Quit), "{event:?}");
        }
    }

    #[test]
    fn pause_and_step_keys() {
        for c in [' ', 'p', 'P'] {
            assert_eq!(action_for(&Event::char(c)), Some(Action::TogglePause));
        }
        for event in [Event::key(KeyCode::Enter), Event::char('s'), Event::char('S')] {
            assert_eq!(action_for(&event), Some(Action::Step));
        }
    }

    #[test]
    fn arrows_match_keypad() {
        let pairs = [
            (KeyCode::Up, '8'),
            (KeyCode::Down, '2'),
            (KeyCode::Left, '4'),
            (KeyCode::Right, '6'),
        ];
        for (arrow, digit) in pairs {
            assert_eq!(action_for(&Event::key(arrow)), action_for(&Event::char(digit)));
        }
        assert_eq!(action_for(&Event::key(KeyCode::Up)), Some(Action::Move(0, 1)));
        assert_eq!(action_for(&Event::key(KeyCode::Right)), Some(Action::Move(-1, 0)));
    }

    #[test]
    fn diagonals_and_recentre() {
        assert_eq!(action_for(&Event::char('7')), Some(Action::Move(1, 1)));
        assert_eq!(action_for(&Event::char('9')), Some(Action::Move(-1, 1)));
        assert_eq!(action_for(&Event::char('1')), Some(Action::Move(1, -1)));
        assert_eq!(action_for(&Event::char('3')), Some(Action::Move(-1, -1)));
        assert_eq!(action_for(&Event::char('5')), Some(Action::Recentre));
        assert_eq!(action_for(&Event::key(KeyCode::Home)), Some(Action::Recentre));
    }

    #[test]
    fn ctrl_c_cancels_but_plain_c_is_unbound() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c')).with_modifiers(Modifiers::CTRL));
        assert_eq!(action_for(&ctrl_c), Some(Action::Cancel));
        assert_eq!(action_for(&Event::char('c')), None);
        let ctrl_q = Event::Key(KeyEvent::new(KeyCode::Char('q')).with_modifiers(Modifiers::CTRL));
        assert_eq!(action_for(&ctrl_q), None);
    }

    #[test]
    fn releases_and_unknown_keys_are_unbound() {
        let release = Event::Key(KeyEvent::new(KeyCode::Char('q')).with_kind(KeyEventKind::Release));
        assert_eq!(action_for(&release), None);
        assert_eq!(action_for(&Event::char('x')), None);
    }

    #[test]
    fn zoom_keys() {
        assert_eq!(action_for(&Event::char('+')), Some(Action::Zoom(1.0)));
        assert_eq!(action_for(&Event::char('=')), Some(Action::Zoom(1.0)));
        assert_eq!(action_for(&Event::char('-')), Some(Action::Zoom(-1.0)));
    }
}
