//! Storage implementations for the post collection.

mod json_file;

pub use json_file::JsonFileStorage;
