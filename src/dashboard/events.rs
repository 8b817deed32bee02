use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::controller::Controller;
use crate::models::ViewMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

pub fn handle_key_event(key: KeyEvent, controller: &mut Controller) -> Action {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            return Action::Quit;
        }
        KeyCode::Char('c') => select(controller, ViewMode::Crypto),
        KeyCode::Char('w') => select(controller, ViewMode::Weather),
        KeyCode::Tab | KeyCode::BackTab => {
            let next = controller.mode().toggle();
            controller.set_view(next);
        }
        KeyCode::Char('r') => {
            controller.refresh();
        }
        _ => {}
    }
    Action::Continue
}

/// Like a select box: picking the current view again is not a change
fn select(controller: &mut Controller, mode: ViewMode) {
    if controller.mode() != mode {
        controller.set_view(mode);
    }
}
