//! Core use-case services.
//!
//! # Responsibility
//! - Mediate between the entry store and presentation code.
//! - Keep front ends decoupled from storage details.

pub mod entry_cache;
