use crate::app::commands::CommandId;
use crate::app::controllers::voice::VoiceReport;

use super::document::DocumentId;

/// All messages that can be sent through the FLTK channel.
/// Menu callbacks send `Command`; widgets and the voice worker send the rest.
#[derive(Debug, Clone)]
pub enum Message {
    Command(CommandId),

    // Tabs
    TabSwitch(DocumentId),
    TabClose(DocumentId),

    /// The widget buffer of a document changed (typing, undo, paste...)
    BufferModified(DocumentId),

    // Voice capture
    VoiceFinished(VoiceReport),
    VoiceCancel,

    WindowClose,
}
