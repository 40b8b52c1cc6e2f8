//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the document store adapter, the in-memory fallback,
//! the key-file secret provider, and the markup renderer.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `mongodb` - MongoDB document store support

pub mod database;
pub mod render;
pub mod secrets;

// Re-exports - In-Memory
pub use database::InMemoryPostRepository;
pub use render::CommonMarkRenderer;
pub use secrets::FileSecretProvider;

// Re-exports - MongoDB
#[cfg(feature = "mongodb")]
pub use database::{DecodePolicy, MongoConfig, MongoPostRepository};
