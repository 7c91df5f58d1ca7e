use std::path::Path;

use crate::app::domain::document::{Document, DocumentId};
use crate::app::infrastructure::error::Result;

/// Ordered set of open documents, one per tab. Never empty.
pub struct TabManager {
    documents: Vec<Document>,
    active_id: DocumentId,
    next_id: u64,
}

impl Default for TabManager {
    fn default() -> Self {
        Self::new()
    }
}

impl TabManager {
    /// Start with a single Untitled tab.
    pub fn new() -> Self {
        let first = Document::create_empty(DocumentId(1));
        Self {
            active_id: first.id,
            documents: vec![first],
            next_id: 2,
        }
    }

    fn next_document_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Create and activate an empty "Untitled" document.
    pub fn open_new_tab(&mut self) -> DocumentId {
        let id = self.next_document_id();
        self.documents.push(Document::create_empty(id));
        self.active_id = id;
        log::debug!("opened tab {:?}", id);
        id
    }

    /// Load `path` into a new tab and activate it.
    ///
    /// Nothing changes when the file can't be read.
    pub fn add_from_file(&mut self, path: &Path) -> Result<DocumentId> {
        let id = DocumentId(self.next_id);
        let doc = Document::new_from_file(id, path)?;
        self.next_id += 1;
        self.documents.push(doc);
        self.active_id = id;
        Ok(id)
    }

    pub fn active_doc(&self) -> &Document {
        self.doc_by_id(self.active_id)
            .unwrap_or(&self.documents[0])
    }

    pub fn active_doc_mut(&mut self) -> &mut Document {
        let idx = self
            .documents
            .iter()
            .position(|d| d.id == self.active_id)
            .unwrap_or(0);
        &mut self.documents[idx]
    }

    pub fn set_active(&mut self, id: DocumentId) {
        if self.documents.iter().any(|d| d.id == id) {
            self.active_id = id;
        }
    }

    /// Remove a document by id and activate its nearest neighbour.
    ///
    /// Closing the last tab leaves a fresh Untitled one behind. Returns
    /// `false` for unknown ids.
    pub fn close_tab(&mut self, id: DocumentId) -> bool {
        let idx = match self.documents.iter().position(|d| d.id == id) {
            Some(i) => i,
            None => return false,
        };
        let doc = self.documents.remove(idx);
        log::debug!("closed tab {:?} ({})", doc.id, doc.display_name);

        if self.documents.is_empty() {
            self.open_new_tab();
            return true;
        }

        if self.active_id == id {
            let new_idx = idx.min(self.documents.len() - 1);
            self.active_id = self.documents[new_idx].id;
        }
        true
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn active_id(&self) -> DocumentId {
        self.active_id
    }

    /// Find a document by file path
    pub fn find_by_path(&self, path: &Path) -> Option<DocumentId> {
        self.documents
            .iter()
            .find(|d| d.file_path.as_deref() == Some(path))
            .map(|d| d.id)
    }

    pub fn doc_by_id(&self, id: DocumentId) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == id)
    }

    pub fn doc_by_id_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.iter_mut().find(|d| d.id == id)
    }

    pub fn dirty_ids(&self) -> Vec<DocumentId> {
        self.documents
            .iter()
            .filter(|d| d.is_dirty())
            .map(|d| d.id)
            .collect()
    }

    /// Get the next document id (for tab cycling)
    pub fn next_doc_id(&self) -> DocumentId {
        let idx = self.active_index();
        let next_idx = (idx + 1) % self.documents.len();
        self.documents[next_idx].id
    }

    /// Get the previous document id (for tab cycling)
    pub fn prev_doc_id(&self) -> DocumentId {
        let idx = self.active_index();
        let prev_idx = if idx == 0 {
            self.documents.len() - 1
        } else {
            idx - 1
        };
        self.documents[prev_idx].id
    }

    fn active_index(&self) -> usize {
        self.documents
            .iter()
            .position(|d| d.id == self.active_id)
            .unwrap_or(0)
    }
}
