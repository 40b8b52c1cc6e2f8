#[cfg(test)]
mod tests {
    use std::time::Duration;

    use bson::{Bson, doc};
    use chrono::{TimeZone, Utc};
    use quill_core::domain::Post;
    use quill_core::error::RepoError;
    use quill_core::ports::PostRepository;
    use uuid::Uuid;

    use crate::database::document::{
        collect_listing, decode, encode, id_filter, listing_projection, published_before,
    };
    use crate::database::{DecodePolicy, MongoConfig, MongoPostRepository};

    fn local_config() -> MongoConfig {
        MongoConfig {
            uri: "mongodb://127.0.0.1:27017".to_string(),
            database: "quill_test".to_string(),
            collection: "posts".to_string(),
            timeout: Duration::from_millis(200),
            decode_policy: DecodePolicy::FailFast,
        }
    }

    #[test]
    fn test_id_filter_uses_raw_bytes() {
        let id = Uuid::new_v4();
        let filter = id_filter(id);

        match filter.get("_id") {
            Some(Bson::Binary(binary)) => assert_eq!(binary.bytes, id.as_bytes().to_vec()),
            other => panic!("unexpected _id filter: {other:?}"),
        }
    }

    #[test]
    fn test_listing_filter_and_projection() {
        let before = Utc.with_ymd_and_hms(2020, 3, 1, 0, 0, 0).unwrap();
        let filter = published_before(before);

        let lt = filter.get_document("publishDate").unwrap().get("$lt");
        assert_eq!(lt, Some(&Bson::DateTime(bson::DateTime::from_chrono(before))));
        assert_eq!(listing_projection(), doc! { "body": 0 });
    }

    #[test]
    fn test_document_layout() {
        let post = Post::new("Title", "Body").with_summary("Summary");
        let document = encode(&post).unwrap();

        assert!(matches!(document.get("_id"), Some(Bson::Binary(_))));
        assert!(matches!(document.get("publishDate"), Some(Bson::DateTime(_))));
        assert_eq!(document.get_str("title").unwrap(), "Title");
        assert_eq!(document.get_str("body").unwrap(), "Body");
        assert_eq!(document.get_str("summary").unwrap(), "Summary");
    }

    #[test]
    fn test_decode_restores_post() {
        let post = Post::new("Title", "Body").with_summary("Summary");
        assert_eq!(decode(encode(&post).unwrap()).unwrap(), post);
    }

    #[test]
    fn test_decode_tolerates_projected_body() {
        let post = Post::new("Title", "Body");
        let mut document = encode(&post).unwrap();
        document.remove("body");

        assert_eq!(decode(document).unwrap().body, "");
    }

    #[test]
    fn test_decode_rejects_short_id() {
        let short_id = bson::Binary {
            subtype: bson::spec::BinarySubtype::Generic,
            bytes: vec![1, 2, 3],
        };
        let document = doc! {
            "_id": short_id,
            "publishDate": bson::DateTime::now(),
            "title": "t",
        };
        assert!(matches!(decode(document), Err(RepoError::Decode(_))));
    }

    #[test]
    fn test_decode_keeps_sub_millisecond_posts_equal() {
        let json = r#"{"title":"t","publishDate":"2020-03-01T10:00:00.123456Z"}"#;
        let post = Post::from_json(json).unwrap();
        assert_eq!(decode(encode(&post).unwrap()).unwrap(), post);
    }

    fn listing_page() -> (Post, Post, bson::Document) {
        let first = Post::new("first", "body one");
        let second = Post::new("second", "body two");
        let corrupt = doc! {
            "_id": "not-binary",
            "publishDate": bson::DateTime::now(),
        };
        (first, second, corrupt)
    }

    #[test]
    fn test_listing_fails_fast_on_corrupt_document() {
        let (first, second, corrupt) = listing_page();
        let documents = vec![encode(&first).unwrap(), corrupt, encode(&second).unwrap()];

        assert!(matches!(
            collect_listing(documents, DecodePolicy::FailFast),
            Err(RepoError::Decode(_))
        ));
    }

    #[test]
    fn test_listing_skips_corrupt_document_when_asked() {
        let (first, second, corrupt) = listing_page();
        let documents = vec![encode(&first).unwrap(), corrupt, encode(&second).unwrap()];

        let posts = collect_listing(documents, DecodePolicy::SkipInvalid).unwrap();
        let titles: Vec<_> = posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["first", "second"]);
        assert!(posts.iter().all(|p| p.body.is_empty()));
    }

    #[tokio::test]
    async fn test_operations_before_open_fail_fast() {
        let repo = MongoPostRepository::connect(local_config(), false)
            .await
            .unwrap();

        assert!(!repo.is_open());
        assert!(matches!(
            repo.fetch_one(Uuid::new_v4()).await,
            Err(RepoError::NotOpen)
        ));
        assert!(matches!(
            repo.save(&Post::new("a", "b")).await,
            Err(RepoError::NotOpen)
        ));
        assert!(matches!(
            repo.fetch_many(Utc::now(), 10).await,
            Err(RepoError::NotOpen)
        ));
        assert!(matches!(
            repo.remove(Uuid::new_v4()).await,
            Err(RepoError::NotOpen)
        ));
    }

    #[tokio::test]
    async fn test_close_without_open_is_noop_and_final() {
        let repo = MongoPostRepository::connect(local_config(), false)
            .await
            .unwrap();

        repo.close().await.unwrap();
        repo.close().await.unwrap();
        assert!(matches!(repo.open().await, Err(RepoError::Connection(_))));
    }

    #[test]
    fn test_config_debug_hides_uri() {
        let mut config = local_config();
        config.uri = "mongodb://admin:secret@db".to_string();
        assert!(!format!("{config:?}").contains("secret"));
    }

    /// Needs a live server: `MONGODB_TEST_URI=mongodb://... cargo test -- --ignored`
    #[tokio::test]
    #[ignore]
    async fn test_round_trip_against_live_server() {
        let uri = std::env::var("MONGODB_TEST_URI").expect("MONGODB_TEST_URI not set");
        let config = MongoConfig {
            uri,
            timeout: Duration::from_secs(5),
            ..local_config()
        };
        let repo = MongoPostRepository::connect(config, true).await.unwrap();
        repo.open().await.unwrap();

        let post = Post::new("Live", "**body**").with_summary("s");
        repo.save(&post).await.unwrap();
        assert_eq!(repo.fetch_one(post.id()).await.unwrap(), post);

        let page = repo
            .fetch_many(post.publish_date + chrono::Duration::seconds(1), 5)
            .await
            .unwrap();
        assert!(page.len() <= 5);
        assert!(page.iter().all(|p| p.body.is_empty()));

        repo.remove(post.id()).await.unwrap();
        repo.remove(post.id()).await.unwrap();
        assert!(matches!(
            repo.fetch_one(post.id()).await,
            Err(RepoError::NotFound)
        ));

        repo.close().await.unwrap();
    }
}
