//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod markup;
mod repository;
mod secrets;

pub use markup::MarkupRenderer;
pub use repository::PostRepository;
pub use secrets::{SecretName, SecretProvider};
