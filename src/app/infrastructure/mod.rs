//! Infrastructure layer - external integrations and utilities.
//!
//! This module contains code that interfaces with external systems:
//! - Microphone capture (cpal)
//! - Platform-specific detection
//! - Error types

pub mod error;
pub mod microphone;
pub mod platform;
