//! # Quill Core
//!
//! The domain layer of the Quill post service.
//! This crate contains the post entity, the error taxonomy, and the ports
//! that infrastructure implements. It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{ConfigError, DomainError, RepoError};
