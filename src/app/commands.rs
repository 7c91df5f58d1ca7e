use std::collections::HashMap;

use crate::app::host::UiHost;
use crate::app::state::EditorState;

/// Every user-invokable command (menu items and shortcuts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    New,
    Open,
    Save,
    SaveAs,
    CloseTab,
    NextTab,
    PreviousTab,
    Exit,
    Undo,
    Redo,
    FindReplace,
    CheckSpelling,
    ToggleDarkMode,
    VoiceToText,
}

impl CommandId {
    pub const ALL: [CommandId; 14] = [
        CommandId::New,
        CommandId::Open,
        CommandId::Save,
        CommandId::SaveAs,
        CommandId::CloseTab,
        CommandId::NextTab,
        CommandId::PreviousTab,
        CommandId::Exit,
        CommandId::Undo,
        CommandId::Redo,
        CommandId::FindReplace,
        CommandId::CheckSpelling,
        CommandId::ToggleDarkMode,
        CommandId::VoiceToText,
    ];
}

pub type Handler = fn(&mut EditorState, &mut dyn UiHost);

/// Maps command ids to handlers.
pub struct CommandTable {
    handlers: HashMap<CommandId, Handler>,
}

impl CommandTable {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// All menu commands wired to their `EditorState` operations.
    pub fn standard() -> Self {
        let mut table = Self::empty();
        table.register(CommandId::New, |state, _| state.file_new());
        table.register(CommandId::Open, |state, host| state.file_open(host));
        table.register(CommandId::Save, |state, host| {
            state.file_save(host);
        });
        table.register(CommandId::SaveAs, |state, host| {
            state.file_save_as(host);
        });
        table.register(CommandId::CloseTab, |state, host| {
            let id = state.tabs.active_id();
            state.close_tab(id, host);
        });
        table.register(CommandId::NextTab, |state, _| state.next_tab());
        table.register(CommandId::PreviousTab, |state, _| state.previous_tab());
        table.register(CommandId::Exit, |state, host| state.request_quit(host));
        table.register(CommandId::Undo, |_, host| host.undo());
        table.register(CommandId::Redo, |_, host| host.redo());
        table.register(CommandId::FindReplace, |state, host| state.find_replace(host));
        table.register(CommandId::CheckSpelling, |state, host| state.check_spelling(host));
        table.register(CommandId::ToggleDarkMode, |state, _| state.toggle_dark_mode());
        table.register(CommandId::VoiceToText, |state, host| state.start_voice(host));
        table
    }

    pub fn register(&mut self, id: CommandId, handler: Handler) {
        self.handlers.insert(id, handler);
    }

    /// Run the handler for `id`. Returns `false` if none is registered.
    pub fn dispatch(&self, id: CommandId, state: &mut EditorState, host: &mut dyn UiHost) -> bool {
        match self.handlers.get(&id) {
            Some(handler) => {
                log::debug!("dispatch {:?}", id);
                handler(state, host);
                true
            }
            None => {
                log::warn!("no handler registered for {:?}", id);
                false
            }
        }
    }
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::host::testing::ScriptedHost;
    use crate::app::state::tests::editor;

    #[test]
    fn test_standard_table_covers_every_command() {
        let table = CommandTable::standard();
        for id in CommandId::ALL {
            assert!(table.handlers.contains_key(&id), "{:?} missing", id);
        }
    }

    #[test]
    fn test_dispatch_unknown_command() {
        let table = CommandTable::empty();
        let mut state = editor();
        let mut host = ScriptedHost::default();
        assert!(!table.dispatch(CommandId::New, &mut state, &mut host));
        assert_eq!(state.tabs.count(), 1);
    }

    #[test]
    fn test_dispatch_new_and_toggle() {
        let table = CommandTable::standard();
        let mut state = editor();
        let mut host = ScriptedHost::default();

        assert!(table.dispatch(CommandId::New, &mut state, &mut host));
        assert_eq!(state.tabs.count(), 2);

        let was_dark = state.theme.is_dark();
        assert!(table.dispatch(CommandId::ToggleDarkMode, &mut state, &mut host));
        assert_ne!(state.theme.is_dark(), was_dark);
    }

    #[test]
    fn test_undo_redo_go_to_host() {
        let table = CommandTable::standard();
        let mut state = editor();
        let mut host = ScriptedHost::default();
        table.dispatch(CommandId::Undo, &mut state, &mut host);
        table.dispatch(CommandId::Redo, &mut state, &mut host);
        table.dispatch(CommandId::Redo, &mut state, &mut host);
        assert_eq!(host.undos, 1);
        assert_eq!(host.redos, 2);
    }

    #[test]
    fn test_tab_cycling_commands() {
        let table = CommandTable::standard();
        let mut state = editor();
        let mut host = ScriptedHost::default();
        let first = state.tabs.active_id();
        table.dispatch(CommandId::New, &mut state, &mut host);
        let second = state.tabs.active_id();

        table.dispatch(CommandId::NextTab, &mut state, &mut host);
        assert_eq!(state.tabs.active_id(), first);
        table.dispatch(CommandId::PreviousTab, &mut state, &mut host);
        assert_eq!(state.tabs.active_id(), second);
    }
}
