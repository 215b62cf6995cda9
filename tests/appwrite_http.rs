//! HTTP-level checks of the Appwrite client against a mock backend.

use std::sync::Arc;

use minglekari::{
    api::{AppwriteClient, CookieFallback},
    config::{BackendIds, Config},
    gateway::Gateway,
    models::{NewPost, UploadFile},
    GatewayError,
};
use serde_json::json;
use url::Url;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

type HttpGateway = Gateway<AppwriteClient, AppwriteClient, AppwriteClient>;

fn ids() -> BackendIds {
    BackendIds {
        database_id: "main".into(),
        user_collection_id: "users".into(),
        post_collection_id: "posts".into(),
        saves_collection_id: "saves".into(),
        storage_id: "media".into(),
    }
}

fn gateway(server: &MockServer, fallback: Arc<CookieFallback>) -> HttpGateway {
    let endpoint = Url::parse(&format!("{}/v1", server.uri())).unwrap();
    let config = Config::new(endpoint, "mingle", ids());
    let client = AppwriteClient::new(&config, fallback).unwrap();
    Gateway::new(client.clone(), client.clone(), client, ids())
}

fn post_body(id: &str, image_id: &str, image_url: &str) -> serde_json::Value {
    json!({
        "$id": id,
        "$collectionId": "posts",
        "$databaseId": "main",
        "$createdAt": "2024-05-01T10:00:00.000+00:00",
        "$updatedAt": "2024-05-01T10:00:00.000+00:00",
        "$permissions": [],
        "creator": {
            "$id": "u1",
            "$createdAt": "2024-04-01T10:00:00.000+00:00",
            "$updatedAt": "2024-04-01T10:00:00.000+00:00",
            "accountId": "acc-1",
            "name": "Ana",
            "username": "ana",
            "email": "ana@example.com",
            "bio": null,
            "imageUrl": "https://img/ana"
        },
        "caption": "sunset",
        "tags": ["sky", "sea"],
        "imageUrl": image_url,
        "imageId": image_id,
        "location": "Porto",
        "likes": []
    })
}

#[tokio::test]
async fn create_post_uploads_then_writes_document() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/storage/buckets/media/files"))
        .and(header("x-appwrite-project", "mingle"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "$id": "file-1",
            "bucketId": "media",
            "name": "sunset.jpg",
            "mimeType": "image/jpeg",
            "sizeOriginal": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    let preview = format!(
        "{}/v1/storage/buckets/media/files/file-1/preview?width=2000&height=2000&gravity=top&quality=100&project=mingle",
        server.uri()
    );
    Mock::given(method("POST"))
        .and(path("/v1/databases/main/collections/posts/documents"))
        .and(header("x-appwrite-project", "mingle"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(post_body("p1", "file-1", &preview)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway(&server, Arc::new(CookieFallback::default()));
    let post = gateway
        .create_post(NewPost {
            user_id: "u1".into(),
            caption: "sunset".into(),
            file: vec![UploadFile::new("sunset.jpg", b"jpeg".to_vec())],
            location: Some("Porto".into()),
            tags: "sky, sea".into(),
        })
        .await
        .unwrap();

    assert_eq!(post.id, "p1");
    assert_eq!(post.image_id, "file-1");
    assert_eq!(post.image_url, preview);
    assert_eq!(post.creator.id(), "u1");
    assert_eq!(post.creator.expanded().unwrap().username, "ana");

    let requests = server.received_requests().await.unwrap();
    let write = requests
        .iter()
        .find(|request| request.url.path().ends_with("/documents"))
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&write.body).unwrap();
    assert_eq!(body["documentId"], "unique()");
    assert_eq!(body["data"]["creator"], "u1");
    assert_eq!(body["data"]["imageId"], "file-1");
    assert_eq!(body["data"]["tags"], json!(["sky", "sea"]));
}

#[tokio::test]
async fn failed_write_deletes_uploaded_file() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/storage/buckets/media/files"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "$id": "file-9" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/databases/main/collections/posts/documents"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "message": "Invalid document structure",
            "code": 400,
            "type": "document_invalid_structure"
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/v1/storage/buckets/media/files/file-9"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway(&server, Arc::new(CookieFallback::default()));
    let err = gateway
        .create_post(NewPost {
            user_id: "u1".into(),
            caption: String::new(),
            file: vec![UploadFile::new("a.png", vec![1])],
            location: None,
            tags: String::new(),
        })
        .await
        .unwrap_err();

    match err {
        GatewayError::Remote { code, kind, .. } => {
            assert_eq!(code, 400);
            assert_eq!(kind, "document_invalid_structure");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn feed_page_sends_encoded_queries() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/databases/main/collections/posts/documents"))
        .and(query_param(
            "queries[]",
            r#"{"method":"orderDesc","attribute":"$updatedAt"}"#,
        ))
        .and(query_param("queries[]", r#"{"method":"limit","values":[10]}"#))
        .and(query_param(
            "queries[]",
            r#"{"method":"cursorAfter","values":["p10"]}"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 11,
            "documents": [post_body("p11", "file-11", "https://img/p11")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway(&server, Arc::new(CookieFallback::default()));
    let page = gateway.get_infinite_posts(Some("p10")).await.unwrap();

    assert_eq!(page.total, 11);
    assert_eq!(page.documents[0].id, "p11");
    assert_eq!(page.documents[0].location.as_deref(), Some("Porto"));
}

#[tokio::test]
async fn session_fallback_is_kept_and_replayed() {
    let server = MockServer::start().await;
    let cookies = r#"{"a_session_mingle":"secret"}"#;

    Mock::given(method("POST"))
        .and(path("/v1/account/sessions/email"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("X-Fallback-Cookies", cookies)
                .set_body_json(json!({
                    "$id": "sess-1",
                    "userId": "acc-1",
                    "expire": "2025-01-01T00:00:00.000+00:00"
                })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .and(header("x-fallback-cookies", cookies))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "$id": "acc-1",
            "name": "Ana",
            "email": "ana@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/databases/main/collections/users/documents"))
        .and(query_param(
            "queries[]",
            r#"{"method":"equal","attribute":"accountId","values":["acc-1"]}"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 1,
            "documents": [{
                "$id": "u1",
                "$createdAt": "2024-04-01T10:00:00.000+00:00",
                "$updatedAt": "2024-04-01T10:00:00.000+00:00",
                "accountId": "acc-1",
                "name": "Ana",
                "username": "ana",
                "email": "ana@example.com",
                "imageUrl": "https://img/ana"
            }]
        })))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let fallback = Arc::new(
        CookieFallback::load(dir.path().join("cookie-fallback.json"))
            .await
            .unwrap(),
    );
    let gateway = gateway(&server, fallback.clone());

    let session = gateway.sign_in_account("ana@example.com", "pw").await.unwrap();
    assert_eq!(session.user_id, "acc-1");
    assert_eq!(fallback.get().await.as_deref(), Some(cookies));

    let user = gateway.get_current_user().await.unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.username, "ana");
}

#[tokio::test]
async fn unauthorized_account_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/account"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "User (role: guests) missing scope (account)",
            "code": 401,
            "type": "general_unauthorized_scope"
        })))
        .mount(&server)
        .await;

    let gateway = gateway(&server, Arc::new(CookieFallback::default()));
    let err = gateway.get_current_user().await.unwrap_err();
    assert!(matches!(err, GatewayError::Remote { code: 401, .. }));
    assert_eq!(
        err.to_string(),
        "User (role: guests) missing scope (account) (general_unauthorized_scope, 401)"
    );
}

#[tokio::test]
async fn sign_out_clears_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/v1/account/sessions/current"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let fallback = Arc::new(CookieFallback::in_memory(Some(
        r#"{"a_session_mingle":"secret"}"#.into(),
    )));
    let gateway = gateway(&server, fallback.clone());

    gateway.sign_out_account().await.unwrap();
    assert!(fallback.is_empty().await);
}
