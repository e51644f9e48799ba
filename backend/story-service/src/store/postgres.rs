/// PostgreSQL resource store
///
/// Stories and chapters are rows whose free-form fields live in a JSONB
/// `details` column; a chapter's comments are a JSONB array. Every mutation is
/// one `UPDATE ... RETURNING` statement, so the row lock PostgreSQL takes for
/// the update is the only concurrency control involved.
use super::{new_comment_id, ResourceStore, StoreResult};
use crate::config::DatabaseConfig;
use crate::models::{
    strip_reserved, Chapter, Comment, Details, NewComment, Story, CHAPTER_RESERVED_KEYS,
    STORY_RESERVED_KEYS,
};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use sqlx::FromRow;
use std::time::Duration;
use tracing::{error, info};

/// Apply the bundled migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Create the connection pool and verify it with one round-trip.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .test_before_acquire(true)
        .connect(&config.url)
        .await?;

    match sqlx::query("SELECT 1").execute(&pool).await {
        Ok(_) => {
            info!(
                max_connections = config.max_connections,
                min_connections = config.min_connections,
                "Database pool created and verified"
            );
            Ok(pool)
        }
        Err(e) => {
            error!(error = %e, "Database connection verification failed");
            Err(e)
        }
    }
}

#[derive(FromRow)]
struct StoryRow {
    id: String,
    vote_count: i64,
    details: Json<Details>,
}

impl From<StoryRow> for Story {
    fn from(row: StoryRow) -> Self {
        Story::from_parts(row.id, row.vote_count, row.details.0)
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    story_id: String,
    details: Json<Details>,
    comments: Json<Vec<Comment>>,
}

impl From<ChapterRow> for Chapter {
    fn from(row: ChapterRow) -> Self {
        Chapter::from_parts(row.id, row.story_id, row.comments.0, row.details.0)
    }
}

#[derive(Clone)]
pub struct PgResourceStore {
    pool: PgPool,
}

impl PgResourceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a story document. Creation belongs to another service; this is
    /// used for seeding and tests.
    ///
    /// Reserved keys (`STORY_RESERVED_KEYS`) are dropped from `details`
    /// before the row is written.
    pub async fn insert_story(&self, story: &Story) -> StoreResult<()> {
        let details = strip_reserved(story.details.clone(), &STORY_RESERVED_KEYS);

        sqlx::query(
            r#"
            INSERT INTO stories (id, vote_count, details)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&story.id)
        .bind(story.vote_count)
        .bind(Json(&details))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a chapter document (seeding and tests). `CHAPTER_RESERVED_KEYS`
    /// are dropped from `details`.
    pub async fn insert_chapter(&self, chapter: &Chapter) -> StoreResult<()> {
        let details = strip_reserved(chapter.details.clone(), &CHAPTER_RESERVED_KEYS);

        sqlx::query(
            r#"
            INSERT INTO chapters (id, story_id, details, comments)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&chapter.id)
        .bind(&chapter.story_id)
        .bind(Json(&details))
        .bind(Json(&chapter.comments))
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn find_story(&self, story_id: &str) -> StoreResult<Option<Story>> {
        let row = sqlx::query_as::<_, StoryRow>(
            r#"
            SELECT id, vote_count, details
            FROM stories
            WHERE id = $1
            "#,
        )
        .bind(story_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Story::from))
    }

    async fn increment_votes(&self, story_id: &str) -> StoreResult<Option<Story>> {
        let row = sqlx::query_as::<_, StoryRow>(
            r#"
            UPDATE stories
            SET vote_count = vote_count + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING id, vote_count, details
            "#,
        )
        .bind(story_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Story::from))
    }

    async fn find_chapter(
        &self,
        story_id: &str,
        chapter_id: &str,
    ) -> StoreResult<Option<Chapter>> {
        let row = sqlx::query_as::<_, ChapterRow>(
            r#"
            SELECT id, story_id, details, comments
            FROM chapters
            WHERE id = $1 AND story_id = $2
            "#,
        )
        .bind(chapter_id)
        .bind(story_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Chapter::from))
    }

    async fn push_comment(
        &self,
        story_id: &str,
        chapter_id: &str,
        comment: NewComment,
    ) -> StoreResult<Option<Chapter>> {
        let comment = comment.into_comment(new_comment_id(), story_id, Utc::now());

        let row = sqlx::query_as::<_, ChapterRow>(
            r#"
            UPDATE chapters
            SET comments = comments || jsonb_build_array($3::jsonb), updated_at = NOW()
            WHERE id = $1 AND story_id = $2
            RETURNING id, story_id, details, comments
            "#,
        )
        .bind(chapter_id)
        .bind(story_id)
        .bind(Json(&comment))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Chapter::from))
    }

    async fn pull_comment(
        &self,
        story_id: &str,
        chapter_id: &str,
        comment_id: &str,
    ) -> StoreResult<Option<Chapter>> {
        // The containment check in WHERE makes a missing comment a no-match
        // instead of a no-op update.
        let row = sqlx::query_as::<_, ChapterRow>(
            r#"
            UPDATE chapters
            SET comments = COALESCE(
                    (SELECT jsonb_agg(elem ORDER BY pos)
                     FROM jsonb_array_elements(comments) WITH ORDINALITY AS t(elem, pos)
                     WHERE elem->>'id' <> $3),
                    '[]'::jsonb),
                updated_at = NOW()
            WHERE id = $1
              AND story_id = $2
              AND comments @> jsonb_build_array(jsonb_build_object('id', $3::text))
            RETURNING id, story_id, details, comments
            "#,
        )
        .bind(chapter_id)
        .bind(story_id)
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Chapter::from))
    }
}
