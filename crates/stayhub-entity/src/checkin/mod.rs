//! Checkin entity: one guest stay, the source of truth for unit status.

pub mod extension;
pub mod model;
pub mod status;

pub use extension::{CheckinExtension, CreateCheckinExtension};
pub use model::{Checkin, CreateCheckin};
pub use status::CheckinStatus;
