//! Post handlers.

use actix_web::{HttpResponse, http::header, http::header::ContentType, web};
use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::Deserialize;
use uuid::Uuid;

use quill_core::DomainError;
use quill_core::domain::{Post, posts_to_json};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Ceiling on a PUT body, far above any realistic post.
const MAX_POST_BYTES: usize = 16 * 1024 * 1024;

#[derive(Debug, Deserialize)]
pub struct ListPostsQuery {
    /// RFC 3339 cut-off; only posts published strictly earlier are listed.
    #[serde(rename = "publishDate")]
    pub publish_date: Option<String>,
}

fn parse_post_id(raw: &str) -> Result<Uuid, AppError> {
    Ok(Uuid::parse_str(raw).map_err(DomainError::from)?)
}

fn parse_cut_off(raw: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    match raw.filter(|s| !s.is_empty()) {
        Some(text) => DateTime::parse_from_rfc3339(text)
            .map(|date| date.with_timezone(&Utc))
            .map_err(|e| AppError::BadRequest(format!("invalid publishDate {text:?}: {e}"))),
        None => Ok(Utc::now()),
    }
}

/// GET /posts
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let before = parse_cut_off(query.publish_date.as_deref())?;
    tracing::debug!(before = %before.to_rfc3339(), "Fetching posts published before");

    let posts = state.posts.fetch_many(before, state.page_size).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(posts_to_json(&posts)))
}

/// GET /posts/{post_id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let post = state.posts.fetch_one(id).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::json())
        .body(post.to_json()))
}

/// GET /posts/{post_id}/html
pub async fn get_post_html(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;
    let post = state.posts.fetch_one(id).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(post.render_body(state.renderer.as_ref())))
}

/// PUT /posts
///
/// Body is a JSON post. A post without an id gets a fresh one, reported back
/// in the `Location` header.
pub async fn put_post(
    state: web::Data<AppState>,
    mut payload: web::Payload,
) -> AppResult<HttpResponse> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
        if body.len() + chunk.len() > MAX_POST_BYTES {
            return Err(AppError::BadRequest(format!("post exceeds {MAX_POST_BYTES} bytes")));
        }
        body.extend_from_slice(&chunk);
    }

    let mut post = Post::from_slice(&body)?;
    let id = post.ensure_id();

    state.posts.save(&post).await?;
    tracing::info!(post_id = %id, "Post saved");

    Ok(HttpResponse::Ok()
        .insert_header((header::LOCATION, format!("/posts/{id}")))
        .finish())
}

/// DELETE /posts/{post_id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_post_id(&path)?;

    state.posts.remove(id).await?;
    tracing::info!(post_id = %id, "Post removed");

    Ok(HttpResponse::Ok().finish())
}
