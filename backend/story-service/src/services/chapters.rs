/// Chapter service - chapter lookup and embedded comment mutation
use crate::error::{AppError, Result};
use crate::metrics::observe_store_op;
use crate::models::{Chapter, NewComment};
use crate::store::ResourceStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use validator::Validate;

#[derive(Clone)]
pub struct ChapterService {
    store: Arc<dyn ResourceStore>,
}

impl ChapterService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    /// Get a chapter, scoped to its story
    pub async fn get_chapter(&self, story_id: &str, chapter_id: &str) -> Result<Chapter> {
        let started = Instant::now();
        let result = self.store.find_chapter(story_id, chapter_id).await;
        observe_store_op("find_chapter", started, &result);

        result?.ok_or_else(|| {
            debug!(story_id, chapter_id, "Chapter not found");
            AppError::NotFound(format!("chapter {} of story {}", chapter_id, story_id))
        })
    }

    /// Append a comment to a chapter and return the updated chapter
    pub async fn add_comment(
        &self,
        story_id: &str,
        chapter_id: &str,
        comment: NewComment,
    ) -> Result<Chapter> {
        comment.validate()?;
        let author = comment.user_id.clone();

        let started = Instant::now();
        let result = self.store.push_comment(story_id, chapter_id, comment).await;
        observe_store_op("push_comment", started, &result);

        let chapter = result?.ok_or_else(|| {
            debug!(story_id, chapter_id, "Comment target not found");
            AppError::NotFound(format!("chapter {} of story {}", chapter_id, story_id))
        })?;

        info!(
            story_id,
            chapter_id,
            user_id = %author,
            comments = chapter.comments.len(),
            "Comment added"
        );
        Ok(chapter)
    }

    /// Remove a comment; story, chapter and comment ids must all match
    pub async fn delete_comment(
        &self,
        story_id: &str,
        chapter_id: &str,
        comment_id: &str,
    ) -> Result<Chapter> {
        let started = Instant::now();
        let result = self
            .store
            .pull_comment(story_id, chapter_id, comment_id)
            .await;
        observe_store_op("pull_comment", started, &result);

        let chapter = result?.ok_or_else(|| {
            debug!(story_id, chapter_id, comment_id, "Comment not found");
            AppError::NotFound(format!(
                "comment {} in chapter {} of story {}",
                comment_id, chapter_id, story_id
            ))
        })?;

        info!(story_id, chapter_id, comment_id, "Comment deleted");
        Ok(chapter)
    }
}
