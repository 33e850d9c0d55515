//! # stayhub-core
//!
//! Core crate for StayHub. Contains the configuration schemas, the
//! injectable clock, and the unified error system.
//!
//! This crate has **no** internal dependencies on other StayHub crates.

pub mod clock;
pub mod config;
pub mod error;
pub mod result;

pub use error::AppError;
pub use result::AppResult;
