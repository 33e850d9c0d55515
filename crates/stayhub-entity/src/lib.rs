//! # stayhub-entity
//!
//! Domain entity models for StayHub: units, checkins, checkin extensions,
//! and the actor attribution type. Pure data definitions plus the small
//! derivation helpers that belong to the data itself; all mutation logic
//! lives in `stayhub-service`.

pub mod actor;
pub mod checkin;
pub mod unit;

pub use actor::Actor;
