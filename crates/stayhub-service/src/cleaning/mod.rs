//! Cleaning timer management.

pub mod service;

pub use service::{CleaningService, CleaningStatus};
