//! Checkin lifecycle management.

pub mod service;

pub use service::{CheckinService, CreateCheckinRequest, ExtendCheckinRequest};
