use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, PartialEq, Eq)]
pub enum Action {
    Quit,
    DismissError,
    MoveUp,
    MoveDown,
    NextPage,
    PrevPage,
    ToggleSelect,
    SelectAll,
    ClearSelection,
    Refresh,
    DeleteCurrent,
    DeleteSelected,
    OpenBrowser,
    CycleAffiliation,
    CycleVisibility,
    CycleSort,
    ToggleDirection,
    CyclePerPage,
    StartSearch,
    SearchChar(char),
    SearchBackspace,
    SearchSubmit,
    SearchCancel,
    ConfirmAccept,
    ConfirmCancel,
    None,
}

/// Which input mode the key press lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing into the search field; most keys become text.
    Search,
    /// Delete confirmation overlay; only accept/cancel are live.
    Confirm,
}

/// Captures the UI state needed to interpret a key press.
#[derive(Debug, Clone, Default)]
pub struct InputContext {
    pub has_error: bool,
    pub is_loading: bool,
    pub has_selection: bool,
    pub mode: InputMode,
}

pub fn map_key(key: KeyEvent, ctx: &InputContext) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }

    // Ctrl+C always quits
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Action::Quit;
    }

    if ctx.mode == InputMode::Confirm {
        return match key.code {
            KeyCode::Char('y' | 'Y') | KeyCode::Enter => Action::ConfirmAccept,
            KeyCode::Char('n' | 'N' | 'q') | KeyCode::Esc => Action::ConfirmCancel,
            _ => Action::None,
        };
    }

    if ctx.mode == InputMode::Search {
        return match key.code {
            KeyCode::Enter => Action::SearchSubmit,
            KeyCode::Esc => Action::SearchCancel,
            KeyCode::Backspace => Action::SearchBackspace,
            KeyCode::Char(c) => Action::SearchChar(c),
            _ => Action::None,
        };
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => {
            if ctx.has_error {
                Action::DismissError
            } else if ctx.has_selection {
                Action::ClearSelection
            } else {
                Action::Quit
            }
        }
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Right | KeyCode::Char('l') => Action::NextPage,
        KeyCode::Left | KeyCode::Char('h') => Action::PrevPage,
        KeyCode::Char(' ') => Action::ToggleSelect,
        KeyCode::Char('a') => Action::SelectAll,
        KeyCode::Char('r') if !ctx.is_loading => Action::Refresh,
        KeyCode::Char('d') => Action::DeleteCurrent,
        KeyCode::Char('D') => Action::DeleteSelected,
        KeyCode::Char('o') => Action::OpenBrowser,
        KeyCode::Char('f') => Action::CycleAffiliation,
        KeyCode::Char('v') => Action::CycleVisibility,
        KeyCode::Char('s') => Action::CycleSort,
        KeyCode::Char('S') => Action::ToggleDirection,
        KeyCode::Char('p') => Action::CyclePerPage,
        KeyCode::Char('/') => Action::StartSearch,
        _ => Action::None,
    }
}
