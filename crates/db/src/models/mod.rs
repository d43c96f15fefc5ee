//! Persisted record structs and DTOs.
//!
//! Each submodule contains:
//! - A `Serialize` + `Deserialize` record struct matching the stored JSON
//! - A `Deserialize` create DTO
//! - Where records are editable, an update DTO (all `Option` fields)

pub mod category;
pub mod topic;
pub mod user;
