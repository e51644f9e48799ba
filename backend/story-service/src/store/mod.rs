/// Resource store: the document database behind the story routes.
///
/// Contract every backend must honour:
/// - a read returns one whole document or `None`
/// - each mutation is a single-document atomic update, linearizable per
///   document; nothing here spans two documents
/// - a mutation whose filter matches no document changes nothing and
///   returns `None`
/// - inserts drop reserved keys from `details` (see `models::strip_reserved`)
///
/// Backends:
/// - `postgres`: documents in JSONB columns, one `UPDATE ... RETURNING` per mutation
/// - `memory`: concurrent in-process map, used by tests and local runs
pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgResourceStore;

use crate::models::{Chapter, NewComment, Story};
use async_trait::async_trait;
use thiserror::Error;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Connection, query or document decoding failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Short backend name for logs and health reports.
    fn backend(&self) -> &'static str;

    /// Cheap round-trip proving the store is reachable.
    async fn ping(&self) -> StoreResult<()>;

    /// Find one story by id.
    async fn find_story(&self, story_id: &str) -> StoreResult<Option<Story>>;

    /// Atomically add one to the story's vote counter and return the updated story.
    async fn increment_votes(&self, story_id: &str) -> StoreResult<Option<Story>>;

    /// Find the chapter matching both ids.
    async fn find_chapter(&self, story_id: &str, chapter_id: &str)
        -> StoreResult<Option<Chapter>>;

    /// Atomically append a comment to the chapter matching both ids.
    ///
    /// The store assigns the comment id and creation time. Returns the updated chapter.
    async fn push_comment(
        &self,
        story_id: &str,
        chapter_id: &str,
        comment: NewComment,
    ) -> StoreResult<Option<Chapter>>;

    /// Atomically remove a comment from a chapter.
    ///
    /// Matches on the full story/chapter/comment triple; when any of the three
    /// disagrees nothing is removed and `None` is returned.
    async fn pull_comment(
        &self,
        story_id: &str,
        chapter_id: &str,
        comment_id: &str,
    ) -> StoreResult<Option<Chapter>>;
}

/// Identifier for a freshly inserted comment.
pub(crate) fn new_comment_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
