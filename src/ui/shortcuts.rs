use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::Mode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Quit,
    FocusInput,
    LeaveInput,
    Submit,
    StartEdit,
    ConfirmEdit,
    CancelEdit,
    ToggleFocused,
    DeleteFocused,
    FocusPrev,
    FocusNext,
    MoveUp,
    MoveDown,
    Insert(char),
    Backspace,
}

pub fn resolve(mode: &Mode, key: KeyEvent) -> Option<Intent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c')).then_some(Intent::Quit);
    }
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match mode {
        Mode::Browse => match key.code {
            KeyCode::Char('q') => Some(Intent::Quit),
            KeyCode::Char('n') | KeyCode::Char('N') => Some(Intent::FocusInput),
            KeyCode::Char(' ') => Some(Intent::ToggleFocused),
            KeyCode::Delete | KeyCode::Backspace => Some(Intent::DeleteFocused),
            KeyCode::Char('e') | KeyCode::Enter => Some(Intent::StartEdit),
            KeyCode::Up if shift => Some(Intent::MoveUp),
            KeyCode::Down if shift => Some(Intent::MoveDown),
            KeyCode::Char('K') => Some(Intent::MoveUp),
            KeyCode::Char('J') => Some(Intent::MoveDown),
            KeyCode::Up | KeyCode::Char('k') => Some(Intent::FocusPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(Intent::FocusNext),
            _ => None,
        },
        Mode::Compose => match key.code {
            KeyCode::Enter => Some(Intent::Submit),
            KeyCode::Esc => Some(Intent::LeaveInput),
            KeyCode::Backspace => Some(Intent::Backspace),
            KeyCode::Char(c) => Some(Intent::Insert(c)),
            _ => None,
        },
        Mode::Editing { .. } => match key.code {
            KeyCode::Enter => Some(Intent::ConfirmEdit),
            KeyCode::Esc => Some(Intent::CancelEdit),
            KeyCode::Backspace => Some(Intent::Backspace),
            KeyCode::Char(c) => Some(Intent::Insert(c)),
            _ => None,
        },
    }
}
