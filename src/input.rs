use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::app::Focus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Down,
    Up,
    Submit,
    QueryChar(char),
    Backspace,
    ClearQuery,
    ToggleFocus,
    OpenInBrowser,
    OpenImage,
    None,
}

pub fn poll_action(focus: Focus) -> anyhow::Result<Action> {
    if !event::poll(Duration::from_millis(50))? {
        return Ok(Action::None);
    }

    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(map_key(focus, key)),
        _ => Ok(Action::None),
    }
}

fn map_key(focus: Focus, KeyEvent { code, modifiers, .. }: KeyEvent) -> Action {
    if let (KeyCode::Char('c'), KeyModifiers::CONTROL) = (code, modifiers) {
        return Action::Quit;
    }

    match focus {
        Focus::Input => match (code, modifiers) {
            (KeyCode::Enter, _) => Action::Submit,
            (KeyCode::Tab, _) | (KeyCode::Esc, _) | (KeyCode::Down, _) => Action::ToggleFocus,
            (KeyCode::Backspace, _) => Action::Backspace,
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => Action::ClearQuery,
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => Action::QueryChar(c),
            _ => Action::None,
        },
        Focus::List => match (code, modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Action::Quit,
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Action::Down,
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Action::Up,
            (KeyCode::Enter, _) | (KeyCode::Char('o'), _) => Action::OpenInBrowser,
            (KeyCode::Char('i'), _) => Action::OpenImage,
            (KeyCode::Tab, _) | (KeyCode::Char('/'), _) => Action::ToggleFocus,
            _ => Action::None,
        },
    }
}
