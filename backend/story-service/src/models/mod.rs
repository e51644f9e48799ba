/// Documents served by story-service
///
/// - Story: top-level narrative with an aggregate vote counter
/// - Chapter: belongs to a story by id and embeds its comments
/// - Comment: only ever exists inside one chapter's comment list
///
/// Fields this service does not interpret (title, body, ...) are kept in
/// `details` and flattened into the JSON document on the wire. Keys that name
/// a real field (`STORY_RESERVED_KEYS`, `CHAPTER_RESERVED_KEYS`) are dropped
/// from `details` whenever a document is built, so the wire never carries two
/// copies of `voteCount` or `comments`.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use validator::Validate;

/// Free-form document fields owned by the creation side of the platform.
pub type Details = Map<String, Value>;

/// Wire names owned by `Story` itself.
pub const STORY_RESERVED_KEYS: [&str; 2] = ["id", "voteCount"];

/// Wire names owned by `Chapter` itself.
pub const CHAPTER_RESERVED_KEYS: [&str; 3] = ["id", "storyId", "comments"];

/// Remove every reserved key from `details`.
pub fn strip_reserved(mut details: Details, reserved: &[&str]) -> Details {
    for key in reserved {
        if details.remove(*key).is_some() {
            tracing::warn!(key = *key, "Dropped reserved key from document details");
        }
    }
    details
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    #[serde(default)]
    pub vote_count: i64,
    #[serde(flatten)]
    pub details: Details,
}

impl Story {
    pub fn new(id: impl Into<String>, details: Details) -> Self {
        Self::from_parts(id, 0, details)
    }

    pub fn from_parts(id: impl Into<String>, vote_count: i64, details: Details) -> Self {
        Self {
            id: id.into(),
            vote_count,
            details: strip_reserved(details, &STORY_RESERVED_KEYS),
        }
    }

    /// Re-apply the reserved-key rule to a document built field by field.
    pub fn sanitized(self) -> Self {
        Self::from_parts(self.id, self.vote_count, self.details)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub story_id: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(flatten)]
    pub details: Details,
}

impl Chapter {
    pub fn new(id: impl Into<String>, story_id: impl Into<String>, details: Details) -> Self {
        Self::from_parts(id, story_id, Vec::new(), details)
    }

    pub fn from_parts(
        id: impl Into<String>,
        story_id: impl Into<String>,
        comments: Vec<Comment>,
        details: Details,
    ) -> Self {
        Self {
            id: id.into(),
            story_id: story_id.into(),
            comments,
            details: strip_reserved(details, &CHAPTER_RESERVED_KEYS),
        }
    }

    pub fn sanitized(self) -> Self {
        Self::from_parts(self.id, self.story_id, self.comments, self.details)
    }

    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Assigned by the store on insertion.
    pub id: String,
    pub story_id: String,
    pub username: String,
    pub user_id: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

/// Comment fields supplied by the caller; id and timestamp come from the store.
#[derive(Debug, Clone, PartialEq, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "userId is required"))]
    pub user_id: String,
    #[validate(length(min = 1, message = "comment is required"))]
    pub comment: String,
}

impl NewComment {
    /// Materialize the embedded comment with its store-assigned identity.
    pub fn into_comment(self, id: String, story_id: &str, created_at: DateTime<Utc>) -> Comment {
        Comment {
            id,
            story_id: story_id.to_string(),
            username: self.username,
            user_id: self.user_id,
            comment: self.comment,
            created_at,
        }
    }
}
