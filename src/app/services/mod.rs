//! Services layer - business operations and utilities.
//!
//! This module contains business logic and operations:
//! - Text operations (replace, counts)
//! - Spell checking
//! - Speech capture policy and transcription
//! - File dialog filters

pub mod file_filters;
pub mod speech;
pub mod spellcheck;
pub mod text_ops;
