//! Unit status projection.

pub mod projector;

pub use projector::UnitStatusProjector;
