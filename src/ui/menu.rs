use fltk::{
    app::Sender,
    enums::{Key, Shortcut},
    menu::{MenuBar, MenuFlag},
    prelude::*,
};

use crate::app::commands::CommandId;
use crate::app::domain::messages::Message;

/// Menu path and keyboard shortcut of a command.
pub fn menu_entry(id: CommandId) -> (&'static str, Shortcut) {
    match id {
        CommandId::New => ("File/New", Shortcut::Ctrl | 'n'),
        CommandId::Open => ("File/Open...", Shortcut::Ctrl | 'o'),
        CommandId::Save => ("File/Save", Shortcut::Ctrl | 's'),
        CommandId::SaveAs => ("File/Save As...", Shortcut::Ctrl | Shortcut::Shift | 's'),
        CommandId::CloseTab => ("File/Close Tab", Shortcut::Ctrl | 'w'),
        CommandId::NextTab => ("File/Next Tab", Shortcut::Ctrl | Key::Tab),
        CommandId::PreviousTab => ("File/Previous Tab", Shortcut::Ctrl | Shortcut::Shift | Key::Tab),
        CommandId::Exit => ("File/Exit", Shortcut::Ctrl | 'q'),
        CommandId::Undo => ("Edit/Undo", Shortcut::Ctrl | 'z'),
        CommandId::Redo => ("Edit/Redo", Shortcut::Ctrl | Shortcut::Shift | 'z'),
        CommandId::FindReplace => ("Edit/Find && Replace...", Shortcut::Ctrl | 'h'),
        CommandId::CheckSpelling => ("Edit/Check Spelling", Shortcut::None),
        CommandId::ToggleDarkMode => ("View/Toggle Dark Mode", Shortcut::None),
        CommandId::VoiceToText => ("Tools/Voice to Text", Shortcut::Ctrl | Shortcut::Shift | 'v'),
    }
}

pub fn build_menu(menu: &mut MenuBar, sender: &Sender<Message>, initial_dark_mode: bool) {
    for id in CommandId::ALL {
        let (path, shortcut) = menu_entry(id);
        let flag = match id {
            CommandId::ToggleDarkMode if initial_dark_mode => MenuFlag::Toggle | MenuFlag::Value,
            CommandId::ToggleDarkMode => MenuFlag::Toggle,
            CommandId::PreviousTab | CommandId::Redo => MenuFlag::MenuDivider,
            _ => MenuFlag::Normal,
        };
        let s = *sender;
        menu.add(path, shortcut, flag, move |_| s.send(Message::Command(id)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_menu_paths_are_unique() {
        let paths: HashSet<&str> = CommandId::ALL.iter().map(|id| menu_entry(*id).0).collect();
        assert_eq!(paths.len(), CommandId::ALL.len());
    }

    #[test]
    fn test_menu_groups() {
        assert!(menu_entry(CommandId::Exit).0.starts_with("File/"));
        assert!(menu_entry(CommandId::CheckSpelling).0.starts_with("Edit/"));
        assert!(menu_entry(CommandId::ToggleDarkMode).0.starts_with("View/"));
        assert!(menu_entry(CommandId::VoiceToText).0.starts_with("Tools/"));
    }
}
