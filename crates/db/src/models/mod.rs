//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches
//!
//! JSON field names are camelCase to match the web client.

pub mod account;
pub mod baby;
pub mod bath_log;
pub mod caretaker;
pub mod diaper_log;
pub mod family;
pub mod family_setup;
pub mod feed_log;
pub mod log_filter;
pub mod measurement;
pub mod medicine;
pub mod milestone;
pub mod note;
pub mod settings;
pub mod setup_token;
pub mod sleep_log;
pub mod timeline;
pub mod unit;
