//! # Postboard Core
//!
//! The domain layer of the Postboard API.
//! This crate contains the post model, its validation rules and the query
//! vocabulary, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, StorageError};
