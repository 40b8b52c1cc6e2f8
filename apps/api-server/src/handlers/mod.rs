//! HTTP handlers and route configuration.

mod posts;

use actix_web::{HttpResponse, http::header::ContentType, web};

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into()),
    )
    .service(
        web::resource("/posts")
            .route(web::get().to(posts::list_posts))
            .route(web::put().to(posts::put_post)),
    )
    .service(
        web::resource("/posts/{post_id}")
            .route(web::get().to(posts::get_post))
            .route(web::delete().to(posts::delete_post)),
    )
    .route("/posts/{post_id}/html", web::get().to(posts::get_post_html))
    .route("/", web::to(invalid));
}

/// Anything sent to the root is rejected.
async fn invalid() -> HttpResponse {
    HttpResponse::BadRequest()
        .content_type(ContentType::plaintext())
        .body("invalid")
}
