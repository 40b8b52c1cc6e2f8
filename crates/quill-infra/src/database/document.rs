//! Stored layout of a post in the document store.

use bson::spec::BinarySubtype;
use bson::{Binary, Document, doc};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::domain::Post;
use quill_core::error::RepoError;

use super::DecodePolicy;

/// One document per post. The primary key is the 16 raw bytes of the post id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct PostDocument {
    #[serde(rename = "_id")]
    pub id: Binary,
    #[serde(rename = "publishDate")]
    pub publish_date: bson::DateTime,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub summary: String,
}

pub(crate) fn id_key(id: Uuid) -> Binary {
    Binary {
        subtype: BinarySubtype::Generic,
        bytes: id.as_bytes().to_vec(),
    }
}

/// Filter matching exactly one post by id.
pub(crate) fn id_filter(id: Uuid) -> Document {
    doc! { "_id": id_key(id) }
}

/// Filter matching posts published strictly before `before`.
pub(crate) fn published_before(before: DateTime<Utc>) -> Document {
    doc! { "publishDate": { "$lt": bson::DateTime::from_chrono(before) } }
}

/// Listing projection: the body is never shipped for multi-post fetches.
pub(crate) fn listing_projection() -> Document {
    doc! { "body": 0 }
}

impl From<&Post> for PostDocument {
    fn from(post: &Post) -> Self {
        Self {
            id: id_key(post.id()),
            publish_date: bson::DateTime::from_chrono(post.publish_date),
            title: post.title.clone(),
            body: post.body.clone(),
            summary: post.summary.clone(),
        }
    }
}

impl TryFrom<PostDocument> for Post {
    type Error = RepoError;

    fn try_from(document: PostDocument) -> Result<Self, Self::Error> {
        let id = Uuid::from_slice(&document.id.bytes)
            .map_err(|e| RepoError::Decode(format!("bad _id: {e}")))?;

        Ok(Post::from_parts(
            id,
            document.publish_date.to_chrono(),
            document.title,
            document.body,
            document.summary,
        ))
    }
}

pub(crate) fn encode(post: &Post) -> Result<Document, RepoError> {
    bson::to_document(&PostDocument::from(post)).map_err(|e| RepoError::Query(e.to_string()))
}

pub(crate) fn decode(document: Document) -> Result<Post, RepoError> {
    let document: PostDocument =
        bson::from_document(document).map_err(|e| RepoError::Decode(e.to_string()))?;
    Post::try_from(document)
}

/// Decode one listing page. Bodies are dropped even if the store sent them.
pub(crate) fn collect_listing(
    documents: impl IntoIterator<Item = Document>,
    policy: DecodePolicy,
) -> Result<Vec<Post>, RepoError> {
    let mut posts = Vec::new();
    for document in documents {
        match decode(document) {
            Ok(mut post) => {
                post.body.clear();
                posts.push(post);
            }
            Err(err) if policy == DecodePolicy::SkipInvalid => {
                tracing::warn!(error = %err, "Skipping undecodable post");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(posts)
}
