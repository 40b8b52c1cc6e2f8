//! Post repositories - MongoDB and in-memory fallback.

mod memory;

#[cfg(feature = "mongodb")]
mod document;
#[cfg(feature = "mongodb")]
mod mongo_repo;

pub use memory::InMemoryPostRepository;

#[cfg(feature = "mongodb")]
pub use mongo_repo::{DecodePolicy, MongoConfig, MongoPostRepository};

#[cfg(feature = "mongodb")]
#[cfg(test)]
mod tests;
