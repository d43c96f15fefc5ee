//! `forum-core`: pure domain logic for the forum store.
//!
//! Nothing in this crate touches storage. Repositories in `forum-db` call
//! into these helpers for key derivation, validation, id allocation and
//! permission checks.

pub mod error;
pub mod ids;
pub mod naming;
pub mod roles;
pub mod types;
pub mod validation;
