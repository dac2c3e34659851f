use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{ControlId, EngineHandle};

#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    Continue,
    Quit,
}

/// Keys stand in for the widget's buttons, so they go through the
/// controls bound at the last refresh.
pub fn handle_key_event(engine: &EngineHandle, key: KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Continue;
    }

    if let Some(control) = control_for_key(key) {
        engine.activate(control);
        return KeyAction::Continue;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => KeyAction::Quit,
        KeyCode::Char('r') => {
            engine.refresh();
            KeyAction::Continue
        }
        _ => KeyAction::Continue,
    }
}

fn control_for_key(key: KeyEvent) -> Option<ControlId> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') => Some(ControlId::PlayPause),
        KeyCode::Char('n') | KeyCode::Right => Some(ControlId::Next),
        KeyCode::Char('p') | KeyCode::Left => Some(ControlId::Previous),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_control_keys() {
        assert_eq!(control_for_key(key(KeyCode::Char(' '))), Some(ControlId::PlayPause));
        assert_eq!(control_for_key(key(KeyCode::Char('n'))), Some(ControlId::Next));
        assert_eq!(control_for_key(key(KeyCode::Right)), Some(ControlId::Next));
        assert_eq!(control_for_key(key(KeyCode::Char('p'))), Some(ControlId::Previous));
        assert_eq!(control_for_key(key(KeyCode::Left)), Some(ControlId::Previous));
        assert_eq!(control_for_key(key(KeyCode::Char('x'))), None);
        assert_eq!(
            control_for_key(KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            None
        );
    }
}
