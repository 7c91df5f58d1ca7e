use std::path::{Path, PathBuf};

use super::commands::CommandTable;
use super::controllers::tabs::TabManager;
use super::controllers::voice::{VoiceReport, VoiceService};
use super::domain::document::DocumentId;
use super::domain::messages::Message;
use super::domain::settings::AppSettings;
use super::domain::theme::ThemeState;
use super::host::{UiHost, UnsavedChoice};
use super::infrastructure::error::VoiceError;
use super::services::file_filters::with_default_extension;
use super::services::spellcheck::{Dictionary, WordListDictionary, find_misspelled, format_report};
use super::services::text_ops::status_line;

pub const APP_NAME: &str = "QuillPad";

/// Everything the editor knows, independent of the widget toolkit.
///
/// Only the UI thread touches this; background work reports back through
/// `Message`s.
pub struct EditorState {
    pub tabs: TabManager,
    pub theme: ThemeState,
    pub settings: AppSettings,
    dictionary: Option<Box<dyn Dictionary>>,
    voice: VoiceService,
    /// Last directory used in a file open/save dialog.
    last_open_directory: Option<PathBuf>,
    quit_requested: bool,
}

impl EditorState {
    pub fn new(settings: AppSettings, voice: VoiceService) -> Self {
        let theme = ThemeState::new(settings.theme_mode.resolve());
        Self {
            tabs: TabManager::new(),
            theme,
            settings,
            dictionary: None,
            voice,
            last_open_directory: None,
            quit_requested: false,
        }
    }

    /// Use `dictionary` instead of loading a word list on first spell check.
    pub fn set_dictionary(&mut self, dictionary: Box<dyn Dictionary>) {
        self.dictionary = Some(dictionary);
    }

    pub fn last_open_directory(&self) -> Option<&Path> {
        self.last_open_directory.as_deref()
    }

    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn is_listening(&self) -> bool {
        self.voice.is_running()
    }

    pub fn window_title(&self) -> String {
        let doc = self.tabs.active_doc();
        let prefix = if doc.is_dirty() { "*" } else { "" };
        format!("{}{} - {}", prefix, doc.display_name, APP_NAME)
    }

    pub fn status_text(&self) -> String {
        status_line(self.tabs.active_doc().text())
    }

    /// Single entry point from the event loop.
    pub fn handle_message(&mut self, msg: Message, commands: &CommandTable, host: &mut dyn UiHost) {
        match msg {
            Message::Command(id) => {
                commands.dispatch(id, self, host);
            }
            Message::TabSwitch(id) => self.tabs.set_active(id),
            Message::TabClose(id) => {
                self.close_tab(id, host);
            }
            Message::BufferModified(id) => self.buffer_modified(id, host),
            Message::VoiceFinished(report) => self.finish_voice(report, host),
            Message::VoiceCancel => self.cancel_voice(host),
            Message::WindowClose => self.request_quit(host),
        }
    }

    /// Pull the widget's text into the document after an edit.
    pub fn buffer_modified(&mut self, id: DocumentId, host: &dyn UiHost) {
        let Some(text) = host.editor_text(id) else {
            return;
        };
        if let Some(doc) = self.tabs.doc_by_id_mut(id) {
            doc.apply_edit(text);
        }
    }

    // --- File operations ---

    pub fn file_new(&mut self) {
        self.tabs.open_new_tab();
    }

    pub fn file_open(&mut self, host: &mut dyn UiHost) {
        if let Some(path) = host.pick_open_path(self.last_open_directory.as_deref()) {
            self.open_path(&path, host);
        }
    }

    /// Open `path`: switch to it if already open, load into an untouched
    /// Untitled tab, or add a new tab.
    pub fn open_path(&mut self, path: &Path, host: &mut dyn UiHost) {
        self.remember_directory(path);

        if let Some(existing) = self.tabs.find_by_path(path) {
            self.tabs.set_active(existing);
            return;
        }

        let result = if self.tabs.active_doc().is_pristine() {
            self.tabs.active_doc_mut().load(path)
        } else {
            self.tabs.add_from_file(path).map(|_| ())
        };

        if let Err(e) = result {
            log::warn!("open {} failed: {}", path.display(), e);
            host.show_error(&format!("Error opening file: {}", e));
        }
    }

    /// Save the active document. Returns `true` when it ends up clean.
    pub fn file_save(&mut self, host: &mut dyn UiHost) -> bool {
        let id = self.tabs.active_id();
        self.save_document(id, host)
    }

    pub fn file_save_as(&mut self, host: &mut dyn UiHost) -> bool {
        let id = self.tabs.active_id();
        self.save_document_as(id, host)
    }

    fn save_document(&mut self, id: DocumentId, host: &mut dyn UiHost) -> bool {
        let has_path = match self.tabs.doc_by_id(id) {
            Some(doc) => doc.file_path.is_some(),
            None => return false,
        };
        if !has_path {
            return self.save_document_as(id, host);
        }
        let Some(doc) = self.tabs.doc_by_id_mut(id) else {
            return false;
        };
        match doc.save(None) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("save failed: {}", e);
                host.show_error(&format!("Error saving file: {}", e));
                false
            }
        }
    }

    fn save_document_as(&mut self, id: DocumentId, host: &mut dyn UiHost) -> bool {
        let Some(path) = host.pick_save_path(self.last_open_directory.as_deref()) else {
            return false;
        };
        let chosen = path.clone();
        let path = with_default_extension(path);
        // The dialog only confirmed overwriting the name the user typed
        if path != chosen && path.exists() && !host.confirm_overwrite(&path) {
            return false;
        }
        self.remember_directory(&path);

        let Some(doc) = self.tabs.doc_by_id_mut(id) else {
            return false;
        };
        match doc.save(Some(&path)) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("save as {} failed: {}", path.display(), e);
                host.show_error(&format!("Error saving file: {}", e));
                false
            }
        }
    }

    fn remember_directory(&mut self, path: &Path) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.last_open_directory = Some(parent.to_path_buf());
        }
    }

    // --- Tabs ---

    /// Close a tab, asking first if it has unsaved changes. Returns `true`
    /// if the tab was closed.
    pub fn close_tab(&mut self, id: DocumentId, host: &mut dyn UiHost) -> bool {
        let Some(doc) = self.tabs.doc_by_id(id) else {
            return false;
        };

        if doc.is_dirty() {
            let message = format!("\"{}\" has unsaved changes.", doc.display_name);
            match host.confirm_unsaved(&message, "Save", "Discard") {
                UnsavedChoice::Save => {
                    if !self.save_document(id, host) {
                        return false;
                    }
                }
                UnsavedChoice::Discard => {}
                UnsavedChoice::Cancel => return false,
            }
        }

        if self.voice.target() == Some(id) {
            self.cancel_voice(host);
        }
        self.tabs.close_tab(id)
    }

    pub fn next_tab(&mut self) {
        let id = self.tabs.next_doc_id();
        self.tabs.set_active(id);
    }

    pub fn previous_tab(&mut self) {
        let id = self.tabs.prev_doc_id();
        self.tabs.set_active(id);
    }

    /// Exit menu and window close. Sets the quit flag unless the user cancels.
    pub fn request_quit(&mut self, host: &mut dyn UiHost) {
        let dirty = self.tabs.dirty_ids();

        if !dirty.is_empty() {
            let choice = host.confirm_unsaved(
                "You have unsaved changes in one or more tabs.",
                "Save All",
                "Quit Without Saving",
            );
            match choice {
                UnsavedChoice::Save => {
                    for id in dirty {
                        self.tabs.set_active(id);
                        if !self.save_document(id, host) {
                            return;
                        }
                    }
                }
                UnsavedChoice::Discard => {}
                UnsavedChoice::Cancel => return,
            }
        }

        self.voice.cancel();
        self.quit_requested = true;
        log::info!("quitting");
        host.quit();
    }

    // --- Edit ---

    pub fn find_replace(&mut self, host: &mut dyn UiHost) {
        let Some((find, replace)) = host.ask_find_replace() else {
            return;
        };

        if find.is_empty() {
            host.show_info("Find & Replace", "Please enter text to find");
            return;
        }

        let count = self.tabs.active_doc_mut().replace_all(&find, &replace);
        let message = if count == 0 {
            format!("Cannot find '{}'", find)
        } else {
            format!("Replaced {} occurrence(s)", count)
        };
        host.show_info("Find & Replace", &message);
    }

    pub fn check_spelling(&mut self, host: &mut dyn UiHost) {
        if self.dictionary.is_none() {
            match WordListDictionary::locate(self.settings.dictionary_path.as_deref()) {
                Ok(dict) => self.dictionary = Some(Box::new(dict)),
                Err(e) => {
                    log::warn!("{}", e);
                    host.show_error(&e.to_string());
                    return;
                }
            }
        }
        let Some(dictionary) = self.dictionary.as_deref() else {
            return;
        };

        let misspelled = find_misspelled(self.tabs.active_doc().text(), dictionary);
        host.show_info("Spell Check", &format_report(&misspelled));
    }

    // --- View ---

    pub fn toggle_dark_mode(&mut self) {
        let dark = self.theme.toggle();
        log::debug!("dark mode {}", if dark { "on" } else { "off" });
    }

    // --- Voice ---

    /// Start capturing into the active tab.
    pub fn start_voice(&mut self, host: &mut dyn UiHost) {
        let target = self.tabs.active_id();
        match self.voice.start(target, host.voice_completion()) {
            Ok(_) => host.show_listening(true),
            Err(VoiceError::Busy) => host.show_info("Voice to Text", &VoiceError::Busy.to_string()),
            Err(e) => {
                log::warn!("{}", e);
                host.show_error(&e.to_string());
            }
        }
    }

    pub fn cancel_voice(&mut self, host: &mut dyn UiHost) {
        self.voice.cancel();
        host.show_listening(false);
    }

    /// Apply a worker's report. Stale and cancelled reports change nothing.
    pub fn finish_voice(&mut self, report: VoiceReport, host: &mut dyn UiHost) {
        if !self.voice.finish(&report) {
            return;
        }
        host.show_listening(false);

        match report.result {
            Ok(text) => {
                // Merge edits still queued behind this report first
                self.buffer_modified(report.target, host);
                match self.tabs.doc_by_id_mut(report.target) {
                    Some(doc) => doc.append(&text),
                    None => log::warn!("voice result dropped, tab {:?} is gone", report.target),
                }
            }
            Err(VoiceError::Cancelled) => {}
            Err(e) => {
                log::warn!("{}", e);
                host.show_error(&e.to_string());
            }
        }
    }
}
