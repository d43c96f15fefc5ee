//! Repository layer.
//!
//! Each repository is a zero-sized struct providing synchronous CRUD methods
//! that accept `&S: KeyValueStore` as the first argument.

pub mod category_repo;
pub mod topic_repo;
pub mod user_repo;

pub use category_repo::CategoryRepo;
pub use topic_repo::TopicRepo;
pub use user_repo::UserRepo;
