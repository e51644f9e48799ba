/// In-process resource store.
///
/// Each document lives in a `DashMap` entry; `get_mut` holds the entry's shard
/// write lock for the duration of one mutation, which gives the same
/// per-document atomicity the database backend gets from a single UPDATE.
/// No guard is ever held across an `.await`.
use super::{new_comment_id, ResourceStore, StoreResult};
use crate::models::{Chapter, NewComment, Story};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct MemoryStore {
    stories: Arc<DashMap<String, Story>>,
    chapters: Arc<DashMap<String, Chapter>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a story. Stories are created outside this service;
    /// this exists for seeding. Reserved keys in `details` are dropped.
    pub fn insert_story(&self, story: Story) {
        let story = story.sanitized();
        self.stories.insert(story.id.clone(), story);
    }

    /// Insert or replace a chapter (seeding only). Reserved keys in `details`
    /// are dropped.
    pub fn insert_chapter(&self, chapter: Chapter) {
        let chapter = chapter.sanitized();
        self.chapters.insert(chapter.id.clone(), chapter);
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn find_story(&self, story_id: &str) -> StoreResult<Option<Story>> {
        Ok(self.stories.get(story_id).map(|story| story.clone()))
    }

    async fn increment_votes(&self, story_id: &str) -> StoreResult<Option<Story>> {
        Ok(self.stories.get_mut(story_id).map(|mut story| {
            story.vote_count += 1;
            story.clone()
        }))
    }

    async fn find_chapter(
        &self,
        story_id: &str,
        chapter_id: &str,
    ) -> StoreResult<Option<Chapter>> {
        Ok(self
            .chapters
            .get(chapter_id)
            .filter(|chapter| chapter.story_id == story_id)
            .map(|chapter| chapter.clone()))
    }

    async fn push_comment(
        &self,
        story_id: &str,
        chapter_id: &str,
        comment: NewComment,
    ) -> StoreResult<Option<Chapter>> {
        let Some(mut chapter) = self.chapters.get_mut(chapter_id) else {
            return Ok(None);
        };
        if chapter.story_id != story_id {
            return Ok(None);
        }

        let comment = comment.into_comment(new_comment_id(), story_id, Utc::now());
        chapter.comments.push(comment);
        Ok(Some(chapter.clone()))
    }

    async fn pull_comment(
        &self,
        story_id: &str,
        chapter_id: &str,
        comment_id: &str,
    ) -> StoreResult<Option<Chapter>> {
        let Some(mut chapter) = self.chapters.get_mut(chapter_id) else {
            return Ok(None);
        };
        if chapter.story_id != story_id {
            return Ok(None);
        }

        let Some(pos) = chapter.comments.iter().position(|c| c.id == comment_id) else {
            return Ok(None);
        };
        chapter.comments.remove(pos);
        Ok(Some(chapter.clone()))
    }
}
