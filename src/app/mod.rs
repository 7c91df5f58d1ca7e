//! Application layer - organized by Clean Architecture principles.
//!
//! # Structure
//!
//! - `domain/` - Core data structures (Document, Settings, Theme, Messages)
//! - `controllers/` - Orchestration (TabManager, VoiceService)
//! - `services/` - Business operations (text_ops, spellcheck, speech, file filters)
//! - `infrastructure/` - External integrations (microphone, platform, error)
//! - `host.rs` - The UI surface the core talks to
//! - `commands.rs` - Menu command dispatch table
//! - `state.rs` - Main application coordinator

pub mod commands;
pub mod controllers;
pub mod domain;
pub mod host;
pub mod infrastructure;
pub mod services;
pub mod state;

// Re-exports for convenient external access
pub use commands::{CommandId, CommandTable};
pub use controllers::tabs::TabManager;
pub use controllers::voice::{CancelToken, VoiceReport, VoiceService};
pub use domain::{AppSettings, Document, DocumentId, Message, Palette, Rgb, ThemeMode, ThemeState};
pub use host::{UiHost, UnsavedChoice};
pub use infrastructure::error::{AppError, Result};
pub use infrastructure::platform::detect_system_dark_mode;
pub use state::EditorState;
