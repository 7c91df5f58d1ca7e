//! The seam between editor logic and the widget toolkit.
//!
//! `EditorState` only talks to dialogs and widgets through `UiHost`, so every
//! command can run against a scripted host in tests.

use std::path::{Path, PathBuf};

use crate::app::controllers::voice::VoiceReport;
use crate::app::domain::document::DocumentId;

/// Answer to "this tab has unsaved changes".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnsavedChoice {
    Save,
    Discard,
    Cancel,
}

/// Callback the voice worker uses to hand back its report.
pub type VoiceCompletion = Box<dyn FnOnce(VoiceReport) + Send + 'static>;

pub trait UiHost {
    /// `None` when the user cancels
    fn pick_open_path(&mut self, start_dir: Option<&Path>) -> Option<PathBuf>;
    fn pick_save_path(&mut self, start_dir: Option<&Path>) -> Option<PathBuf>;

    /// Ask for the find and replace strings. `None` when cancelled.
    fn ask_find_replace(&mut self) -> Option<(String, String)>;

    /// Ask before replacing `path`. Only used when the path was not the one
    /// the save dialog confirmed.
    fn confirm_overwrite(&mut self, path: &Path) -> bool;

    /// Three-button prompt for unsaved changes; the third button is "Cancel".
    fn confirm_unsaved(&mut self, message: &str, save_label: &str, discard_label: &str)
        -> UnsavedChoice;

    fn show_info(&mut self, title: &str, message: &str);
    fn show_error(&mut self, message: &str);

    fn undo(&mut self);
    fn redo(&mut self);

    /// Current widget text of a document, if the host has a buffer for it.
    fn editor_text(&self, id: DocumentId) -> Option<String>;

    fn voice_completion(&self) -> VoiceCompletion;
    /// Show or hide the "Listening..." indicator.
    fn show_listening(&mut self, listening: bool);

    fn quit(&mut self);
}
