/// Story service - story lookup and vote counting
use crate::error::{AppError, Result};
use crate::metrics::observe_store_op;
use crate::models::Story;
use crate::store::ResourceStore;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

#[derive(Clone)]
pub struct StoryService {
    store: Arc<dyn ResourceStore>,
}

impl StoryService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }

    /// Get a story by id
    pub async fn get_story(&self, story_id: &str) -> Result<Story> {
        let started = Instant::now();
        let result = self.store.find_story(story_id).await;
        observe_store_op("find_story", started, &result);

        match result? {
            Some(story) => {
                debug!(story_id, "Story details fetched");
                Ok(story)
            }
            None => {
                debug!(story_id, "Story not found");
                Err(AppError::NotFound(format!("story {}", story_id)))
            }
        }
    }

    /// Increment the story's vote counter by one.
    ///
    /// Votes are not deduplicated per user: every call counts.
    pub async fn vote(&self, story_id: &str, voter_id: &str) -> Result<Story> {
        let started = Instant::now();
        let result = self.store.increment_votes(story_id).await;
        observe_store_op("increment_votes", started, &result);

        let story = result?.ok_or_else(|| {
            debug!(story_id, "Vote for unknown story");
            AppError::NotFound(format!("story {}", story_id))
        })?;

        info!(
            story_id,
            user_id = voter_id,
            vote_count = story.vote_count,
            "Story vote counter increased"
        );
        Ok(story)
    }
}
