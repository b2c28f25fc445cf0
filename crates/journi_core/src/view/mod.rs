//! Presentation-side core: list formatting and screen navigation.
//!
//! # Responsibility
//! - Format entries for display without owning data.
//! - Drive the list/detail screen switch for any front end.

pub mod controller;
pub mod display;
