use std::fs;
use std::path::{Path, PathBuf};

use crate::app::infrastructure::error::{AppError, Result};
use crate::app::services::text_ops::{
    append_with_separator, char_count, extract_filename, replace_all_in_text, word_count,
};

pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// One editing session: a text buffer and the file it belongs to, if any.
///
/// Undo history lives in the widget buffer, not here.
#[derive(Debug)]
pub struct Document {
    pub id: DocumentId,
    pub file_path: Option<PathBuf>,
    pub display_name: String,
    text: String,
    dirty: bool,
    revision: u64,
}

impl Document {
    pub fn create_empty(id: DocumentId) -> Self {
        Self {
            id,
            file_path: None,
            display_name: UNTITLED.to_string(),
            text: String::new(),
            dirty: false,
            revision: 0,
        }
    }

    pub fn new_from_file(id: DocumentId, path: &Path) -> Result<Self> {
        let mut doc = Self::create_empty(id);
        doc.load(path)?;
        Ok(doc)
    }

    /// Replace the buffer with the contents of `path`.
    ///
    /// On failure the buffer and path are left untouched.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)?;
        self.text = content;
        self.revision += 1;
        self.file_path = Some(path.to_path_buf());
        self.update_display_name();
        self.dirty = false;
        log::info!("loaded {} ({} bytes)", path.display(), self.text.len());
        Ok(())
    }

    /// Write the buffer to `path`, or to the associated path when `None`.
    ///
    /// A given path becomes the document's path. Returns `AppError::NoPath`
    /// without writing anything when neither is available.
    pub fn save(&mut self, path: Option<&Path>) -> Result<()> {
        let target = match path {
            Some(p) => p.to_path_buf(),
            None => self.file_path.clone().ok_or(AppError::NoPath)?,
        };
        fs::write(&target, &self.text)?;
        log::info!("saved {} ({} bytes)", target.display(), self.text.len());
        if self.file_path.as_deref() != Some(target.as_path()) {
            self.file_path = Some(target);
            self.update_display_name();
        }
        self.dirty = false;
        Ok(())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Revision of the core-side text; bumped whenever the core rewrites the
    /// buffer so the widget knows to pick up the new content.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the text from the core side (marks dirty, bumps the revision).
    pub fn set_text(&mut self, text: String) {
        if self.text != text {
            self.text = text;
            self.revision += 1;
            self.dirty = true;
        }
    }

    /// Record an edit that already happened in the widget.
    ///
    /// Returns `true` when the text actually changed.
    pub fn apply_edit(&mut self, text: String) -> bool {
        if self.text == text {
            return false;
        }
        self.text = text;
        self.dirty = true;
        true
    }

    pub fn replace_all(&mut self, find: &str, replace: &str) -> usize {
        let (new_text, count) = replace_all_in_text(&self.text, find, replace);
        if count > 0 {
            self.set_text(new_text);
        }
        count
    }

    pub fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let joined = append_with_separator(&self.text, text);
        self.set_text(joined);
    }

    pub fn word_count(&self) -> usize {
        word_count(&self.text)
    }

    pub fn char_count(&self) -> usize {
        char_count(&self.text)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// An Untitled tab nobody has typed into yet.
    pub fn is_pristine(&self) -> bool {
        self.file_path.is_none() && !self.dirty && self.text.is_empty()
    }

    pub fn update_display_name(&mut self) {
        if let Some(ref path) = self.file_path {
            self.display_name = extract_filename(path);
        }
    }
}
