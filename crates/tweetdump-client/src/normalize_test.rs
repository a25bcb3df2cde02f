use super::*;

fn page_from(value: serde_json::Value) -> RawPage {
    serde_json::from_value(value).expect("fixture should deserialize")
}

fn full_page() -> RawPage {
    page_from(serde_json::json!({
        "data": [
            {
                "id": "1001",
                "text": "Shipping the new release 🚀 #rustlang @tokio_rs https://t.co/abc",
                "created_at": "2025-03-01T12:00:00.000Z",
                "author_id": "42",
                "lang": "en",
                "source": "Twitter Web App",
                "public_metrics": {
                    "retweet_count": 3, "reply_count": 1, "like_count": 10, "quote_count": 0
                },
                "attachments": { "media_keys": ["3_1", "missing", "7_2"] },
                "referenced_tweets": [
                    { "type": "quoted", "id": "900" },
                    { "type": "replied_to", "id": "901" }
                ],
                "entities": {
                    "hashtags": [{ "start": 29, "end": 38, "tag": "rustlang" }],
                    "mentions": [{ "start": 39, "end": 48, "username": "tokio_rs", "id": "7" }],
                    "urls": [{
                        "start": 49, "end": 72,
                        "url": "https://t.co/abc",
                        "expanded_url": "https://blog.example.com/release"
                    }]
                }
            },
            {
                "id": "1000",
                "text": "plain post",
                "created_at": "2025-02-28T08:30:00.000Z",
                "author_id": "unknown-author"
            }
        ],
        "includes": {
            "users": [{
                "id": "42",
                "name": "Example Dev",
                "username": "exampledev",
                "description": "I write Rust",
                "public_metrics": {
                    "followers_count": 1200, "following_count": 80, "tweet_count": 5400, "listed_count": 9
                },
                "verified": true,
                "profile_image_url": "https://pbs.twimg.com/profile_images/1/a.jpg"
            }],
            "media": [
                { "media_key": "7_2", "type": "video", "public_metrics": { "view_count": 500 } },
                { "media_key": "3_1", "type": "photo", "url": "https://pbs.twimg.com/media/x.jpg", "alt_text": "diagram" }
            ],
            "tweets": [{
                "id": "900",
                "text": "the original",
                "created_at": "2025-02-01T00:00:00.000Z",
                "public_metrics": { "retweet_count": 0, "reply_count": 0, "like_count": 2, "quote_count": 1 }
            }]
        },
        "meta": { "result_count": 2, "next_token": "NEXT" }
    }))
}

#[test]
fn produces_one_record_per_post_in_order() {
    let records = normalize_page(&full_page());
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["1001", "1000"]);
}

#[test]
fn copies_core_fields() {
    let records = normalize_page(&full_page());
    let r = &records[0];
    assert!(r.text.contains("🚀"));
    assert_eq!(r.created_at.to_rfc3339(), "2025-03-01T12:00:00+00:00");
    assert_eq!(r.lang.as_deref(), Some("en"));
    assert_eq!(r.source.as_deref(), Some("Twitter Web App"));
    assert_eq!(r.public_metrics.as_ref().unwrap().like_count, 10);
}

#[test]
fn joins_author_from_includes() {
    let records = normalize_page(&full_page());
    let author = records[0].author.as_ref().expect("author should resolve");
    assert_eq!(author.username, "exampledev");
    assert_eq!(author.followers_count, 1200);
    assert_eq!(author.following_count, 80);
    assert_eq!(author.tweet_count, 5400);
    assert!(author.verified);
    assert_eq!(
        author.profile_image_url.as_deref(),
        Some("https://pbs.twimg.com/profile_images/1/a.jpg")
    );
}

#[test]
fn author_is_none_when_not_in_includes() {
    let records = normalize_page(&full_page());
    assert!(records[1].author.is_none());
}

#[test]
fn media_preserves_attachment_order_and_skips_unknown_keys() {
    let records = normalize_page(&full_page());
    let media = records[0].media.as_ref().expect("media should resolve");
    let keys: Vec<&str> = media.iter().map(|m| m.media_key.as_str()).collect();
    assert_eq!(keys, vec!["3_1", "7_2"]);
    assert_eq!(media[0].kind, "photo");
    assert_eq!(media[0].alt_text.as_deref(), Some("diagram"));
    assert!(media[0].metrics.is_none());
    assert_eq!(media[1].metrics.as_ref().unwrap().view_count, Some(500));
    assert!(media[1].url.is_none());
}

#[test]
fn media_is_none_when_no_key_resolves() {
    let page = page_from(serde_json::json!({
        "data": [{
            "id": "1", "text": "t", "created_at": "2025-01-01T00:00:00Z",
            "attachments": { "media_keys": ["nope"] }
        }]
    }));
    let records = normalize_page(&page);
    assert!(records[0].media.is_none());
}

#[test]
fn references_are_enriched_when_target_is_included() {
    let records = normalize_page(&full_page());
    let refs = records[0].referenced_tweets.as_ref().unwrap();
    assert_eq!(refs.len(), 2);

    assert_eq!(refs[0].kind, "quoted");
    assert_eq!(refs[0].text.as_deref(), Some("the original"));
    assert!(refs[0].created_at.is_some());
    assert_eq!(refs[0].public_metrics.as_ref().unwrap().quote_count, 1);

    assert_eq!(refs[1].kind, "replied_to");
    assert_eq!(refs[1].id, "901");
    assert!(refs[1].text.is_none());
    assert!(refs[1].created_at.is_none());
}

#[test]
fn references_are_none_when_post_has_none() {
    let records = normalize_page(&full_page());
    assert!(records[1].referenced_tweets.is_none());
}

#[test]
fn extracts_entities() {
    let records = normalize_page(&full_page());
    let e = &records[0].entities;
    assert_eq!(e.hashtags, vec!["rustlang"]);
    assert_eq!(e.mentions[0].username, "tokio_rs");
    assert_eq!(e.mentions[0].id.as_deref(), Some("7"));
    assert_eq!(e.urls[0].url, "https://t.co/abc");
    assert_eq!(
        e.urls[0].expanded_url.as_deref(),
        Some("https://blog.example.com/release")
    );
}

#[test]
fn entities_default_to_three_empty_lists() {
    let records = normalize_page(&full_page());
    let value = serde_json::to_value(&records[1].entities).unwrap();
    assert_eq!(
        value,
        serde_json::json!({"hashtags": [], "mentions": [], "urls": []})
    );
}

#[test]
fn partial_entities_fill_missing_lists() {
    let page = page_from(serde_json::json!({
        "data": [{
            "id": "1", "text": "#one", "created_at": "2025-01-01T00:00:00Z",
            "entities": { "hashtags": [{ "tag": "one" }] }
        }]
    }));
    let records = normalize_page(&page);
    assert_eq!(records[0].entities.hashtags, vec!["one"]);
    assert!(records[0].entities.mentions.is_empty());
    assert!(records[0].entities.urls.is_empty());
}

#[test]
fn missing_side_tables_are_not_errors() {
    let page = page_from(serde_json::json!({
        "data": [{
            "id": "1", "text": "t", "created_at": "2025-01-01T00:00:00Z",
            "author_id": "42",
            "attachments": { "media_keys": ["3_1"] },
            "referenced_tweets": [{ "type": "retweeted", "id": "5" }]
        }]
    }));
    let records = normalize_page(&page);
    assert_eq!(records.len(), 1);
    assert!(records[0].author.is_none());
    assert!(records[0].media.is_none());
    assert_eq!(records[0].referenced_tweets.as_ref().unwrap()[0].id, "5");
}

#[test]
fn drops_posts_missing_mandatory_fields() {
    let page = page_from(serde_json::json!({
        "data": [
            { "text": "no id", "created_at": "2025-01-01T00:00:00Z" },
            { "id": "2", "created_at": "2025-01-01T00:00:00Z" },
            { "id": "3", "text": "no timestamp" },
            { "id": "4", "text": "bad timestamp", "created_at": "yesterday" },
            { "id": "5", "text": "fine", "created_at": "2025-01-01T00:00:00Z" }
        ]
    }));
    let records = normalize_page(&page);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id, "5");
}

#[test]
fn normalize_post_reports_missing_text() {
    let page = RawPage::default();
    let lookups = Lookups::from_page(&page);
    let post = RawPost {
        id: Some("77".to_owned()),
        created_at: Some("2025-01-01T00:00:00Z".to_owned()),
        ..RawPost::default()
    };
    let err = normalize_post(&post, &lookups).unwrap_err();
    assert!(
        matches!(err, ClientError::Normalization { ref post_id, .. } if post_id == "77"),
        "got: {err:?}"
    );
}

#[test]
fn empty_page_yields_no_records() {
    assert!(normalize_page(&RawPage::default()).is_empty());
}
