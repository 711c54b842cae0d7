//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate note store calls into editor-level use-cases.
//! - Keep the terminal shell decoupled from storage details.

pub mod editor_session;
