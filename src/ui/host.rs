use std::path::{Path, PathBuf};

use fltk::{app, app::Sender, dialog, prelude::*};

use crate::app::controllers::voice::VoiceReport;
use crate::app::domain::document::DocumentId;
use crate::app::domain::messages::Message;
use crate::app::domain::theme::ThemeState;
use crate::app::host::{UiHost, UnsavedChoice, VoiceCompletion};
use crate::app::state::EditorState;

use super::buffers::BufferRegistry;
use super::dialogs::find_replace::ask_find_replace;
use super::dialogs::listening::ListeningDialog;
use super::file_dialogs::{native_open_dialog, native_save_dialog};
use super::main_window::MainWidgets;
use super::menu::menu_entry;
use super::theme::apply_theme;
#[cfg(target_os = "windows")]
use super::theme::set_windows_titlebar_theme;
use crate::app::commands::CommandId;

/// FLTK implementation of `UiHost`. Owns the widgets and mirrors
/// `EditorState` into them after every message.
pub struct FltkHost {
    pub widgets: MainWidgets,
    sender: Sender<Message>,
    buffers: BufferRegistry,
    listening: ListeningDialog,
    bound: Option<DocumentId>,
    applied_theme: Option<ThemeState>,
}

impl FltkHost {
    pub fn new(widgets: MainWidgets, sender: Sender<Message>) -> Self {
        Self {
            widgets,
            sender,
            buffers: BufferRegistry::new(sender),
            listening: ListeningDialog::new(sender),
            bound: None,
            applied_theme: None,
        }
    }

    /// Refresh widgets from the state: buffers, bound editor buffer, tab
    /// bar, theme, status bar and window title.
    pub fn sync(&mut self, state: &EditorState) {
        let documents = state.tabs.documents();
        let active = state.tabs.active_id();

        self.buffers.sync(documents);

        if self.bound != Some(active) {
            self.bind(active);
        }
        self.buffers.prune(documents);

        if self.applied_theme != Some(state.theme) {
            self.apply_theme(state.theme);
        }

        self.widgets
            .tab_bar
            .rebuild(documents, active, state.theme.palette());
        self.widgets.status_bar.set_label(&state.status_text());
        self.widgets.wind.set_label(&state.window_title());
    }

    fn bind(&mut self, id: DocumentId) {
        if let Some(previous) = self.bound {
            let pos = self.widgets.text_editor.insert_position();
            self.buffers.remember_cursor(previous, pos);
        }
        let Some(buffer) = self.buffers.buffer(id) else {
            return;
        };
        let editor = &mut self.widgets.text_editor;
        editor.set_buffer(buffer);
        editor.set_insert_position(self.buffers.cursor(id));
        editor.show_insert_position();
        let _ = editor.take_focus();
        self.bound = Some(id);
    }

    fn apply_theme(&mut self, theme: ThemeState) {
        let w = &mut self.widgets;
        apply_theme(&mut w.text_editor, &mut w.wind, &mut w.menu, &mut w.status_bar, theme);

        let (path, _) = menu_entry(CommandId::ToggleDarkMode);
        let idx = w.menu.find_index(path);
        if idx >= 0
            && let Some(mut item) = w.menu.at(idx)
        {
            if theme.is_dark() {
                item.set();
            } else {
                item.clear();
            }
        }

        #[cfg(target_os = "windows")]
        set_windows_titlebar_theme(&w.wind, theme.is_dark());

        self.applied_theme = Some(theme);
    }
}

impl UiHost for FltkHost {
    fn pick_open_path(&mut self, start_dir: Option<&Path>) -> Option<PathBuf> {
        native_open_dialog(start_dir)
    }

    fn pick_save_path(&mut self, start_dir: Option<&Path>) -> Option<PathBuf> {
        native_save_dialog(start_dir)
    }

    fn ask_find_replace(&mut self) -> Option<(String, String)> {
        ask_find_replace()
    }

    fn confirm_overwrite(&mut self, path: &Path) -> bool {
        let message = format!("{} already exists.\nDo you want to replace it?", path.display());
        dialog::choice2_default(&message, "Replace", "Cancel", "") == Some(0)
    }

    fn confirm_unsaved(&mut self, message: &str, save_label: &str, discard_label: &str) -> UnsavedChoice {
        match dialog::choice2_default(message, save_label, discard_label, "Cancel") {
            Some(0) => UnsavedChoice::Save,
            Some(1) => UnsavedChoice::Discard,
            _ => UnsavedChoice::Cancel,
        }
    }

    fn show_info(&mut self, title: &str, message: &str) {
        dialog::message_title(title);
        dialog::message_default(message);
    }

    fn show_error(&mut self, message: &str) {
        dialog::message_title("Error");
        dialog::alert_default(message);
    }

    fn undo(&mut self) {
        let _ = self.widgets.text_editor.undo();
    }

    fn redo(&mut self) {
        let _ = self.widgets.text_editor.redo();
    }

    fn editor_text(&self, id: DocumentId) -> Option<String> {
        self.buffers.text(id)
    }

    fn voice_completion(&self) -> VoiceCompletion {
        let sender = self.sender;
        Box::new(move |report: VoiceReport| {
            // Sending from the worker thread wakes the event loop
            sender.send(Message::VoiceFinished(report));
            app::awake();
        })
    }

    fn show_listening(&mut self, listening: bool) {
        self.listening.set_visible(listening);
    }

    fn quit(&mut self) {
        self.listening.set_visible(false);
        self.widgets.wind.hide();
        app::quit();
    }
}
