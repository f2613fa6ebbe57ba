//! Domain types and pure business rules for Baby Control.
//!
//! Nothing in this crate performs I/O; the database, billing, and HTTP
//! layers depend on it for shared vocabulary and validation.

pub mod activity;
pub mod billing;
pub mod error;
pub mod pin;
pub mod roles;
pub mod slug;
pub mod tokens;
pub mod types;
