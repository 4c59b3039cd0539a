use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::layout::Layout;

/// Result of handling a key: Quit the app, or key was consumed (needs render).
/// None means the key was not handled.
#[derive(Debug, PartialEq, Eq)]
pub enum InputResult {
    Quit,
    Consumed,
}

/// Handle a key event. Returns Some(Quit) to exit, Some(Consumed) if key was handled and
/// a render is needed, None if the key was not handled.
pub fn handle_key(layout: &mut Layout, key_event: KeyEvent) -> Option<InputResult> {
    let KeyEvent { code, modifiers, .. } = key_event;

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputResult::Quit);
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => Some(InputResult::Quit),
        KeyCode::Char(c @ '1'..='9') => {
            let n = c.to_digit(10).unwrap_or(0) as usize;
            layout.toggle_nth(n).then_some(InputResult::Consumed)
        }
        _ => None,
    }
}
