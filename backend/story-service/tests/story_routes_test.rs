//! Integration Tests: Story Routes
//!
//! Drives the production route table against the in-memory store.
//!
//! Coverage:
//! - Story and chapter lookup, including cross-story chapter ids
//! - Vote counting
//! - Comment add and delete, including mismatched id triples
//! - Authentication gate on mutating routes
//! - Body validation and the edit placeholders

mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use common::mock_verifier::{bearer, StaticTokenVerifier, ALICE_TOKEN, BOB_TOKEN};
use common::{build_app, call_status, details, seeded_store, CountingStore};
use crypto_core::testing::{TEST_PRIVATE_KEY, TEST_PUBLIC_KEY};
use crypto_core::TokenIssuer;
use serde_json::{json, Value};
use std::sync::Arc;
use story_service::auth::{DenyAllVerifier, JwtVerifier};
use story_service::models::{Chapter, Story};
use story_service::store::MemoryStore;

fn default_verifier() -> Arc<StaticTokenVerifier> {
    Arc::new(StaticTokenVerifier::with_default_users())
}

#[actix_web::test]
async fn test_get_story_returns_document() {
    let app = test::init_service(build_app(Arc::new(seeded_store()), default_verifier())).await;

    let req = test::TestRequest::get().uri("/story/S1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], "S1");
    assert_eq!(body["voteCount"], 0);
    assert_eq!(body["title"], "The Long Road");
}

#[actix_web::test]
async fn test_details_cannot_shadow_document_fields() {
    let store = seeded_store();
    store.insert_story(Story {
        id: "S3".into(),
        vote_count: 4,
        details: details(json!({"voteCount": 99, "id": "S-other", "title": "Echo"})),
    });
    store.insert_chapter(Chapter {
        id: "C3".into(),
        story_id: "S3".into(),
        comments: Vec::new(),
        details: details(json!({"comments": [{"id": "stale"}], "storyId": "S1"})),
    });
    let app = test::init_service(build_app(Arc::new(store), default_verifier())).await;

    let req = test::TestRequest::get().uri("/story/S3").to_request();
    let raw = test::call_and_read_body(&app, req).await;
    let wire = String::from_utf8_lossy(&raw);
    assert_eq!(wire.matches("\"voteCount\"").count(), 1);
    let body: Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(body["voteCount"], 4);
    assert_eq!(body["id"], "S3");
    assert_eq!(body["title"], "Echo");

    let req = test::TestRequest::get()
        .uri("/story/S3/chapter/C3")
        .to_request();
    let raw = test::call_and_read_body(&app, req).await;
    let wire = String::from_utf8_lossy(&raw);
    assert_eq!(wire.matches("\"comments\"").count(), 1);
    assert_eq!(wire.matches("\"storyId\"").count(), 1);
    let body: Value = serde_json::from_slice(&raw).unwrap();
    assert_eq!(body["comments"], json!([]));
    assert_eq!(body["storyId"], "S3");
}

#[actix_web::test]
async fn test_get_missing_story_is_404() {
    let app = test::init_service(build_app(Arc::new(seeded_store()), default_verifier())).await;

    let req = test::TestRequest::get()
        .uri("/story/does-not-exist")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
}

#[actix_web::test]
async fn test_two_votes_count_twice() {
    let store = seeded_store();
    let app = test::init_service(build_app(Arc::new(store.clone()), default_verifier())).await;

    for token in [ALICE_TOKEN, BOB_TOKEN] {
        let req = test::TestRequest::put()
            .uri("/story/S1/vote")
            .insert_header(bearer(token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/story/S1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["voteCount"], 2);

    let req = test::TestRequest::get().uri("/story/S2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["voteCount"], 0);
}

#[actix_web::test]
async fn test_vote_response_is_updated_story() {
    let app = test::init_service(build_app(Arc::new(seeded_store()), default_verifier())).await;

    let req = test::TestRequest::put()
        .uri("/story/S2/vote")
        .insert_header(bearer(ALICE_TOKEN))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], "S2");
    assert_eq!(body["voteCount"], 1);
    assert_eq!(body["title"], "Night Shift");
}

#[actix_web::test]
async fn test_vote_for_missing_story_is_404() {
    let app = test::init_service(build_app(Arc::new(seeded_store()), default_verifier())).await;

    let req = test::TestRequest::put()
        .uri("/story/S9/vote")
        .insert_header(bearer(ALICE_TOKEN))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_unauthenticated_mutations_never_reach_the_store() {
    let store = CountingStore::new(seeded_store());
    let verifier = default_verifier();
    let app = test::init_service(build_app(Arc::new(store.clone()), verifier.clone())).await;

    let requests = vec![
        test::TestRequest::put().uri("/story/S1/vote").to_request(),
        test::TestRequest::put()
            .uri("/story/S1/vote")
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_request(),
        test::TestRequest::put()
            .uri("/story/S1/vote")
            .insert_header(bearer("forged"))
            .to_request(),
        test::TestRequest::put()
            .uri("/story/S1/chapter/C1/comment")
            .set_json(json!({"username": "alice", "userId": "u1", "comment": "hi"}))
            .to_request(),
        test::TestRequest::delete()
            .uri("/story/S1/chapter/C1/comment/any")
            .insert_header(bearer("forged"))
            .to_request(),
    ];

    for req in requests {
        assert_eq!(call_status(&app, req).await, StatusCode::UNAUTHORIZED);
    }

    assert_eq!(store.calls(), 0);
    // Only the two requests carrying a bearer token reach the verifier.
    assert_eq!(verifier.verify_calls(), 2);
}

#[actix_web::test]
async fn test_wrong_method_on_protected_path_is_405() {
    let store = CountingStore::new(seeded_store());
    let verifier = default_verifier();
    let app = test::init_service(build_app(Arc::new(store.clone()), verifier.clone())).await;

    let req = test::TestRequest::get().uri("/story/S1/vote").to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::METHOD_NOT_ALLOWED);

    let req = test::TestRequest::post()
        .uri("/story/S1/chapter/C1/comment")
        .insert_header(bearer(ALICE_TOKEN))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::METHOD_NOT_ALLOWED);

    assert_eq!(verifier.verify_calls(), 0);
    assert_eq!(store.calls(), 0);
}

#[actix_web::test]
async fn test_reads_do_not_require_a_token() {
    let verifier = default_verifier();
    let app = test::init_service(build_app(Arc::new(seeded_store()), verifier.clone())).await;

    let req = test::TestRequest::get()
        .uri("/story/S1/chapter/C1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["id"], "C1");
    assert_eq!(body["storyId"], "S1");
    assert_eq!(body["comments"], json!([]));
    assert_eq!(verifier.verify_calls(), 0);
}

#[actix_web::test]
async fn test_chapter_under_wrong_story_is_404() {
    let app = test::init_service(build_app(Arc::new(seeded_store()), default_verifier())).await;

    let req = test::TestRequest::get()
        .uri("/story/S2/chapter/C1")
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_add_comment_appends_with_assigned_id() {
    let app = test::init_service(build_app(Arc::new(seeded_store()), default_verifier())).await;

    let req = test::TestRequest::put()
        .uri("/story/S1/chapter/C1/comment")
        .insert_header(bearer(ALICE_TOKEN))
        .set_json(json!({"username": "alice", "userId": "u1", "comment": "hi"}))
        .to_request();
    let chapter: Value = test::call_and_read_body_json(&app, req).await;

    let comments = chapter["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["comment"], "hi");
    assert_eq!(comments[0]["storyId"], "S1");
    assert_eq!(comments[0]["userId"], "u1");
    assert!(!comments[0]["id"].as_str().unwrap().is_empty());
    assert!(comments[0]["createdAt"].is_string());

    let req = test::TestRequest::put()
        .uri("/story/S1/chapter/C1/comment")
        .insert_header(bearer(BOB_TOKEN))
        .set_json(json!({"username": "bob", "userId": "u2", "comment": "second"}))
        .to_request();
    let chapter: Value = test::call_and_read_body_json(&app, req).await;

    let comments = chapter["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[1]["comment"], "second");
    assert_ne!(comments[0]["id"], comments[1]["id"]);
}

#[actix_web::test]
async fn test_add_comment_to_missing_chapter_is_404() {
    let app = test::init_service(build_app(Arc::new(seeded_store()), default_verifier())).await;

    let req = test::TestRequest::put()
        .uri("/story/S2/chapter/C1/comment")
        .insert_header(bearer(ALICE_TOKEN))
        .set_json(json!({"username": "alice", "userId": "u1", "comment": "hi"}))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_malformed_comment_body_is_400() {
    let store = CountingStore::new(seeded_store());
    let app = test::init_service(build_app(Arc::new(store.clone()), default_verifier())).await;

    let bodies = vec![
        json!({"username": "alice", "userId": "u1"}),
        json!({"username": "alice", "userId": "u1", "comment": ""}),
        json!(["not", "an", "object"]),
    ];

    for body in bodies {
        let req = test::TestRequest::put()
            .uri("/story/S1/chapter/C1/comment")
            .insert_header(bearer(ALICE_TOKEN))
            .set_json(body)
            .to_request();
        assert_eq!(call_status(&app, req).await, StatusCode::BAD_REQUEST);
    }

    let req = test::TestRequest::put()
        .uri("/story/S1/chapter/C1/comment")
        .insert_header(bearer(ALICE_TOKEN))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::BAD_REQUEST);

    assert_eq!(store.calls(), 0);
}

#[actix_web::test]
async fn test_delete_comment_requires_matching_triple() {
    let store = seeded_store();
    let app = test::init_service(build_app(Arc::new(store.clone()), default_verifier())).await;

    let req = test::TestRequest::put()
        .uri("/story/S1/chapter/C1/comment")
        .insert_header(bearer(ALICE_TOKEN))
        .set_json(json!({"username": "alice", "userId": "u1", "comment": "hi"}))
        .to_request();
    let chapter: Value = test::call_and_read_body_json(&app, req).await;
    let comment_id = chapter["comments"][0]["id"].as_str().unwrap().to_string();

    // Right chapter and comment, wrong story.
    let req = test::TestRequest::delete()
        .uri(&format!("/story/S2/chapter/C1/comment/{}", comment_id))
        .insert_header(bearer(ALICE_TOKEN))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/story/S1/chapter/C1")
        .to_request();
    let chapter: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(chapter["comments"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/story/S1/chapter/C1/comment/{}", comment_id))
        .insert_header(bearer(ALICE_TOKEN))
        .to_request();
    let chapter: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(chapter["comments"], json!([]));
}

#[actix_web::test]
async fn test_delete_unknown_comment_is_404() {
    let app = test::init_service(build_app(Arc::new(seeded_store()), default_verifier())).await;

    let req = test::TestRequest::delete()
        .uri("/story/S1/chapter/C1/comment/no-such-comment")
        .insert_header(bearer(BOB_TOKEN))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_edit_routes_are_placeholders() {
    let store = CountingStore::new(seeded_store());
    let app = test::init_service(build_app(Arc::new(store.clone()), default_verifier())).await;

    for uri in ["/edit/story/S1/details", "/edit/story/S1/chapter/C1"] {
        let req = test::TestRequest::put()
            .uri(uri)
            .set_json(json!({"title": "ignored"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("not available yet"));
    }

    assert_eq!(store.calls(), 0);
}

#[actix_web::test]
async fn test_unknown_route_is_404() {
    let app = test::init_service(build_app(Arc::new(seeded_store()), default_verifier())).await;

    let req = test::TestRequest::get().uri("/stories").to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_rs256_token_end_to_end() {
    let verifier = Arc::new(JwtVerifier::from_public_key_pem(TEST_PUBLIC_KEY).unwrap());
    let app = test::init_service(build_app(Arc::new(seeded_store()), verifier)).await;

    let issuer = TokenIssuer::from_rsa_pem(TEST_PRIVATE_KEY).unwrap();
    let access = issuer.issue_access_token("u1", "alice").unwrap();
    let refresh = issuer.issue_refresh_token("u1", "alice").unwrap();

    let req = test::TestRequest::put()
        .uri("/story/S1/vote")
        .insert_header(bearer(&access))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::OK);

    let req = test::TestRequest::put()
        .uri("/story/S1/vote")
        .insert_header(bearer(&refresh))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/story/S1").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["voteCount"], 1);
}

#[actix_web::test]
async fn test_unconfigured_auth_rejects_every_mutation() {
    let store = MemoryStore::new();
    let app = test::init_service(build_app(Arc::new(store), Arc::new(DenyAllVerifier))).await;

    let token = TokenIssuer::from_rsa_pem(TEST_PRIVATE_KEY)
        .unwrap()
        .issue_access_token("u1", "alice")
        .unwrap();

    let req = test::TestRequest::put()
        .uri("/story/S1/vote")
        .insert_header(bearer(&token))
        .to_request();
    assert_eq!(call_status(&app, req).await, StatusCode::UNAUTHORIZED);
}
