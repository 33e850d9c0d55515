//! # stayhub-database
//!
//! PostgreSQL connection management, migrations, and repository
//! implementations. Every status-changing write in this crate is a
//! guarded (compare-and-set) update that reports whether it applied;
//! a guard miss is an `Ok(false)`, never an error.

pub mod connection;
pub mod migration;
pub mod repositories;
