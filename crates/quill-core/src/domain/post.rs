use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::DomainError;
use crate::ports::MarkupRenderer;

/// Post entity - a published article with a markup body.
///
/// Missing fields take their zero values when decoded, so a client may send
/// a partial object. The identifier is only ever assigned once, either by
/// [`Post::new`], by decoding, or by [`Post::ensure_id`] when it is still nil.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "postId")]
    id: Uuid,
    #[serde(deserialize_with = "millisecond_date")]
    pub publish_date: DateTime<Utc>,
    pub title: String,
    pub body: String,
    pub summary: String,
}

impl Post {
    /// Create a new post with a fresh identifier, published now.
    ///
    /// The publish date is kept at millisecond precision, the resolution of
    /// the document store's datetime type.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            publish_date: Utc::now().trunc_subsecs(3),
            title: title.into(),
            body: body.into(),
            summary: String::new(),
        }
    }

    /// Rebuild a post from stored parts.
    pub fn from_parts(
        id: Uuid,
        publish_date: DateTime<Utc>,
        title: String,
        body: String,
        summary: String,
    ) -> Self {
        Self {
            id,
            publish_date,
            title,
            body,
            summary,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Assign a fresh identifier if this post has none yet.
    /// Returns the (possibly new) identifier.
    pub fn ensure_id(&mut self) -> Uuid {
        if self.id.is_nil() {
            self.id = Uuid::new_v4();
        }
        self.id
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    pub fn published_at(mut self, publish_date: DateTime<Utc>) -> Self {
        self.publish_date = publish_date.trunc_subsecs(3);
        self
    }

    /// Decode a post from a JSON object. Unknown fields are ignored.
    pub fn from_json(text: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Decode a post from raw request bytes. Bytes that are not UTF-8 fail
    /// the same way as malformed JSON.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, DomainError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("post serialization is infallible")
    }

    /// Render the markup body to an HTML fragment.
    pub fn render_body(&self, renderer: &dyn MarkupRenderer) -> String {
        renderer.render(&self.body)
    }
}

// Sub-millisecond digits cannot survive the store, so they are dropped on the way in.
fn millisecond_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    DateTime::<Utc>::deserialize(deserializer).map(|date| date.trunc_subsecs(3))
}

/// Serialize an ordered sequence of posts as a JSON array.
pub fn posts_to_json(posts: &[Post]) -> String {
    serde_json::to_string(posts).expect("post serialization is infallible")
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shouting;

    impl MarkupRenderer for Shouting {
        fn render(&self, markup: &str) -> String {
            format!("<p>{}</p>", markup.to_uppercase())
        }
    }

    #[test]
    fn test_new_post_has_identity() {
        let post = Post::new("", "");
        assert!(!post.id().is_nil());
    }

    #[test]
    fn test_json_round_trip() {
        let post = Post::new("A Title", "A Body").with_summary("short");
        let decoded = Post::from_json(&post.to_json()).unwrap();

        assert_eq!(decoded.id(), post.id());
        assert_eq!(decoded.title, "A Title");
        assert_eq!(decoded.body, "A Body");
        assert_eq!(decoded, post);
    }

    #[test]
    fn test_wire_field_names() {
        let post = Post::new("t", "b");
        let value: serde_json::Value = serde_json::from_str(&post.to_json()).unwrap();

        for field in ["postId", "publishDate", "title", "body", "summary"] {
            assert!(value.get(field).is_some(), "missing {field}");
        }
    }

    #[test]
    fn test_missing_fields_take_zero_values() {
        let post = Post::from_json(r#"{"title":"A","body":"B","extra":42}"#).unwrap();

        assert!(post.id().is_nil());
        assert_eq!(post.summary, "");
        assert_eq!(post.publish_date, DateTime::<Utc>::default());
    }

    #[test]
    fn test_trailing_garbage_is_rejected() {
        let text = format!("{} INVALID ", Post::new("A", "B").to_json());
        assert!(matches!(
            Post::from_json(&text),
            Err(DomainError::Deserialization(_))
        ));
    }

    #[test]
    fn test_publish_date_normalized_to_utc() {
        let post = Post::from_json(r#"{"publishDate":"2020-03-01T12:00:00+02:00"}"#).unwrap();
        assert_eq!(post.publish_date.to_rfc3339(), "2020-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_publish_date_kept_to_milliseconds() {
        let post = Post::from_json(r#"{"publishDate":"2020-03-01T10:00:00.123456Z"}"#).unwrap();
        assert_eq!(post.publish_date.to_rfc3339(), "2020-03-01T10:00:00.123+00:00");
    }

    #[test]
    fn test_from_slice_rejects_non_utf8() {
        assert!(matches!(
            Post::from_slice(&[b'{', 0xff, b'}']),
            Err(DomainError::Deserialization(_))
        ));
        assert_eq!(Post::from_slice(br#"{"title":"A"}"#).unwrap().title, "A");
    }

    #[test]
    fn test_ensure_id_never_reassigns() {
        let mut post = Post::new("A", "B");
        let original = post.id();
        assert_eq!(post.ensure_id(), original);

        let mut blank = Post::default();
        let assigned = blank.ensure_id();
        assert!(!assigned.is_nil());
        assert_eq!(blank.ensure_id(), assigned);
    }

    #[test]
    fn test_render_body_uses_renderer() {
        let post = Post::new("A", "hello");
        assert_eq!(post.render_body(&Shouting), "<p>HELLO</p>");
    }

    #[test]
    fn test_posts_to_json_keeps_order() {
        let first = Post::new("first", "");
        let second = Post::new("second", "");
        let json = posts_to_json(&[first.clone(), second.clone()]);

        let decoded: Vec<Post> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, vec![first, second]);
    }
}
