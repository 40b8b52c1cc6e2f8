//! CORS policy - applied ahead of every other interceptor.

use actix_cors::Cors;
use actix_web::http::{Method, header};

/// Browser clients may call the API from any origin.
pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods([Method::GET, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allowed_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .expose_headers([header::LOCATION])
        .max_age(3600)
}
