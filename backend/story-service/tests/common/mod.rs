//! Shared fixtures for story-service integration tests
//!
//! - `mock_verifier`: token table standing in for JWT verification
//! - `CountingStore`: `MemoryStore` wrapper that records store round-trips
//! - `build_app`: the production route table over test state
#![allow(dead_code)]

pub mod mock_verifier;

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use story_service::auth::AuthVerifier;
use story_service::models::{Chapter, Details, NewComment, Story};
use story_service::routes;
use story_service::services::{ChapterService, StoryService};
use story_service::store::{MemoryStore, ResourceStore, StoreResult};

/// Build an app with the full route table, services over `store` and the given verifier.
pub fn build_app(
    store: Arc<dyn ResourceStore>,
    verifier: Arc<dyn AuthVerifier>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let verifier: web::Data<dyn AuthVerifier> = web::Data::from(verifier);

    App::new()
        .app_data(web::Data::new(StoryService::new(store.clone())))
        .app_data(web::Data::new(ChapterService::new(store)))
        .app_data(verifier)
        .configure(routes::configure)
}

/// Status of a response, whether the service answered or failed in middleware.
pub async fn call_status<S, R, B>(app: &S, req: R) -> StatusCode
where
    S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    match test::try_call_service(app, req).await {
        Ok(resp) => resp.status(),
        Err(err) => err.as_response_error().status_code(),
    }
}

/// Store with story S1 (chapter C1) and story S2 (chapter C2).
pub fn seeded_store() -> MemoryStore {
    let store = MemoryStore::new();

    let seeds = [("S1", "C1", "The Long Road"), ("S2", "C2", "Night Shift")];
    for (story_id, chapter_id, title) in seeds {
        store.insert_story(Story::new(story_id, details(json!({"title": title}))));
        store.insert_chapter(Chapter::new(
            chapter_id,
            story_id,
            details(json!({"title": "Chapter One", "body": "It began."})),
        ));
    }

    store
}

pub fn details(value: serde_json::Value) -> Details {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("details must be a JSON object, got {other}"),
    }
}

/// Delegates to a `MemoryStore` and counts every store call.
#[derive(Clone)]
pub struct CountingStore {
    inner: MemoryStore,
    calls: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl ResourceStore for CountingStore {
    fn backend(&self) -> &'static str {
        "counting"
    }

    async fn ping(&self) -> StoreResult<()> {
        self.record();
        self.inner.ping().await
    }

    async fn find_story(&self, story_id: &str) -> StoreResult<Option<Story>> {
        self.record();
        self.inner.find_story(story_id).await
    }

    async fn increment_votes(&self, story_id: &str) -> StoreResult<Option<Story>> {
        self.record();
        self.inner.increment_votes(story_id).await
    }

    async fn find_chapter(
        &self,
        story_id: &str,
        chapter_id: &str,
    ) -> StoreResult<Option<Chapter>> {
        self.record();
        self.inner.find_chapter(story_id, chapter_id).await
    }

    async fn push_comment(
        &self,
        story_id: &str,
        chapter_id: &str,
        comment: NewComment,
    ) -> StoreResult<Option<Chapter>> {
        self.record();
        self.inner.push_comment(story_id, chapter_id, comment).await
    }

    async fn pull_comment(
        &self,
        story_id: &str,
        chapter_id: &str,
        comment_id: &str,
    ) -> StoreResult<Option<Chapter>> {
        self.record();
        self.inner
            .pull_comment(story_id, chapter_id, comment_id)
            .await
    }
}
