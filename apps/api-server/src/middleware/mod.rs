//! Middleware modules.
//!
//! Interceptor order matters: [`cors`] runs first, then [`AccessLog`].

pub mod access_log;
pub mod cors;
pub mod error;

pub use access_log::AccessLog;
pub use cors::cors;
