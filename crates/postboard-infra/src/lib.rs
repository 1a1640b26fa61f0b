//! # Postboard Infrastructure
//!
//! Concrete implementations of the ports defined in `postboard-core`:
//! the JSON file storage and the post store built on top of it.

pub mod repository;
pub mod storage;

pub use repository::PostStore;
pub use storage::JsonFileStorage;
