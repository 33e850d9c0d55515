//! Unit entity: the rentable room whose status the engine projects.

pub mod model;
pub mod status;

pub use model::{Unit, UnitStatusChange};
pub use status::UnitStatus;
