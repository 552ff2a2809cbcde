use std::ops::Deref;

use crossterm::event::{KeyCode, KeyEvent as CrosstermKeyEvent, KeyModifiers};

fn key_code_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Backspace => "backspace",
        KeyCode::Enter => "enter",
        KeyCode::Left => "left",
        KeyCode::Right => "right",
        KeyCode::Up => "up",
        KeyCode::Down => "down",
        KeyCode::Home => "home",
        KeyCode::End => "end",
        KeyCode::PageUp => "pageup",
        KeyCode::PageDown => "pagedown",
        KeyCode::Tab => "tab",
        KeyCode::BackTab => "backtab",
        KeyCode::Delete => "delete",
        KeyCode::Insert => "insert",
        KeyCode::Esc => "esc",
        KeyCode::Char(' ') => "space",
        KeyCode::F(n) => return Some(format!("f{n}")),
        KeyCode::Char(c) => return Some(c.to_string()),
        _ => return None,
    };
    Some(name.to_string())
}

/// Printable name of a key press, modifiers first: `ctrl-l`, `shift-tab`
pub fn key_event_to_string(key_event: &CrosstermKeyEvent) -> String {
    let Some(code) = key_code_name(key_event.code) else {
        return String::new();
    };

    let mut parts: Vec<String> = [
        (KeyModifiers::CONTROL, "ctrl"),
        (KeyModifiers::SHIFT, "shift"),
        (KeyModifiers::ALT, "alt"),
    ]
    .into_iter()
    .filter(|(modifier, _)| key_event.modifiers.intersects(*modifier))
    .map(|(_, name)| name.to_string())
    .collect();
    parts.push(code);
    parts.join("-")
}

/// A key press usable in help entries, printable through [`std::fmt::Display`]
#[derive(Clone, Debug, PartialEq)]
pub struct KeyEvent(pub CrosstermKeyEvent);

impl From<CrosstermKeyEvent> for KeyEvent {
    fn from(key_event: CrosstermKeyEvent) -> Self {
        Self(key_event)
    }
}
impl From<KeyCode> for KeyEvent {
    fn from(key_code: KeyCode) -> Self {
        Self(CrosstermKeyEvent::new(key_code, KeyModifiers::NONE))
    }
}
impl From<char> for KeyEvent {
    fn from(c: char) -> Self {
        Self(CrosstermKeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }
}
impl Deref for KeyEvent {
    type Target = CrosstermKeyEvent;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl std::fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", key_event_to_string(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_keys() {
        assert_eq!(KeyEvent::from('q').to_string(), "q");
        assert_eq!(KeyEvent::from(' ').to_string(), "space");
        assert_eq!(KeyEvent::from(KeyCode::Esc).to_string(), "esc");
        assert_eq!(KeyEvent::from(KeyCode::F(5)).to_string(), "f5");
        assert_eq!(KeyEvent::from(KeyCode::Null).to_string(), "");
    }

    #[test]
    fn modifiers_come_first() {
        let key = CrosstermKeyEvent::new(
            KeyCode::Char('l'),
            KeyModifiers::CONTROL | KeyModifiers::ALT,
        );
        assert_eq!(key_event_to_string(&key), "ctrl-alt-l");
        let key = CrosstermKeyEvent::new(KeyCode::BackTab, KeyModifiers::SHIFT);
        assert_eq!(KeyEvent::from(key).to_string(), "shift-backtab");
    }
}
