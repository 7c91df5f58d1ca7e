use std::collections::HashMap;

use fltk::{app::Sender, text::TextBuffer};

use crate::app::domain::document::{Document, DocumentId};
use crate::app::domain::messages::Message;

/// Read text from an FLTK TextBuffer without leaking the C-allocated copy.
///
/// `TextBuffer::text()` copies FLTK's `malloc()`'d string into a `String`
/// but never frees the original, leaking the whole buffer on every call.
/// Edits pull the full text on each change, so go through the FFI directly.
pub fn buffer_text_no_leak(buf: &TextBuffer) -> String {
    unsafe extern "C" {
        fn Fl_Text_Buffer_text(buf: *mut std::ffi::c_void) -> *mut std::ffi::c_char;
        fn free(ptr: *mut std::ffi::c_void);
    }

    // SAFETY: buf.as_ptr() is valid while buf exists; FLTK returns a
    // malloc'd, null-terminated copy (or null) which we free after copying.
    unsafe {
        let inner = buf.as_ptr() as *mut std::ffi::c_void;
        let ptr = Fl_Text_Buffer_text(inner);
        if ptr.is_null() {
            return String::new();
        }
        let cstr = std::ffi::CStr::from_ptr(ptr);
        let result = cstr.to_string_lossy().into_owned();
        free(ptr as *mut std::ffi::c_void);
        result
    }
}

struct BoundBuffer {
    buffer: TextBuffer,
    /// Document revision last copied into `buffer`
    pushed_revision: u64,
    cursor: i32,
}

/// One widget buffer per open document. Keeps undo history per tab.
pub struct BufferRegistry {
    buffers: HashMap<DocumentId, BoundBuffer>,
    sender: Sender<Message>,
}

impl BufferRegistry {
    pub fn new(sender: Sender<Message>) -> Self {
        Self {
            buffers: HashMap::new(),
            sender,
        }
    }

    /// Create buffers for new documents and push core-side rewrites.
    pub fn sync(&mut self, documents: &[Document]) {
        for doc in documents {
            match self.buffers.get_mut(&doc.id) {
                Some(bound) => {
                    if bound.pushed_revision != doc.revision() {
                        bound.buffer.set_text(doc.text());
                        bound.pushed_revision = doc.revision();
                    }
                }
                None => {
                    let buffer = self.create_buffer(doc);
                    self.buffers.insert(
                        doc.id,
                        BoundBuffer {
                            buffer,
                            pushed_revision: doc.revision(),
                            cursor: 0,
                        },
                    );
                }
            }
        }
    }

    /// Drop buffers of closed tabs. Call after the editor is bound to a
    /// surviving buffer.
    pub fn prune(&mut self, documents: &[Document]) {
        self.buffers
            .retain(|id, _| documents.iter().any(|d| d.id == *id));
    }

    fn create_buffer(&self, doc: &Document) -> TextBuffer {
        let mut buffer = TextBuffer::default();
        buffer.set_text(doc.text());
        buffer.can_undo(true);

        let sender = self.sender;
        let doc_id = doc.id;
        buffer.add_modify_callback(move |_pos, inserted, deleted, _restyled, _deleted_text| {
            if inserted > 0 || deleted > 0 {
                sender.send(Message::BufferModified(doc_id));
            }
        });
        buffer
    }

    pub fn buffer(&self, id: DocumentId) -> Option<TextBuffer> {
        self.buffers.get(&id).map(|b| b.buffer.clone())
    }

    pub fn text(&self, id: DocumentId) -> Option<String> {
        self.buffers.get(&id).map(|b| buffer_text_no_leak(&b.buffer))
    }

    pub fn cursor(&self, id: DocumentId) -> i32 {
        self.buffers.get(&id).map_or(0, |b| b.cursor)
    }

    pub fn remember_cursor(&mut self, id: DocumentId, pos: i32) {
        if let Some(bound) = self.buffers.get_mut(&id) {
            bound.cursor = pos;
        }
    }
}
