//! Repository implementations.

pub mod checkin;
pub mod unit;
