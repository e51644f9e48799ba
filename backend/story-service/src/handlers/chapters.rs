/// Chapter handlers - chapter lookup and embedded comments
use crate::auth::CallerIdentity;
use crate::error::Result;
use crate::models::NewComment;
use crate::services::ChapterService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterPath {
    pub story_id: String,
    pub chapter_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPath {
    pub story_id: String,
    pub chapter_id: String,
    pub comment_id: String,
}

/// Get a chapter of a story
#[utoipa::path(
    get,
    path = "/story/{storyId}/chapter/{chapterId}",
    tag = "chapters",
    params(
        ("storyId" = String, Path, description = "Story identifier"),
        ("chapterId" = String, Path, description = "Chapter identifier"),
    ),
    responses(
        (status = 200, description = "Chapter document"),
        (status = 404, description = "No chapter with this id under this story"),
    )
)]
pub async fn get_chapter(
    service: web::Data<ChapterService>,
    path: web::Path<ChapterPath>,
) -> Result<HttpResponse> {
    let chapter = service.get_chapter(&path.story_id, &path.chapter_id).await?;
    Ok(HttpResponse::Ok().json(chapter))
}

/// Add a comment to a chapter
#[utoipa::path(
    put,
    path = "/story/{storyId}/chapter/{chapterId}/comment",
    tag = "chapters",
    params(
        ("storyId" = String, Path, description = "Story identifier"),
        ("chapterId" = String, Path, description = "Chapter identifier"),
    ),
    request_body = NewComment,
    responses(
        (status = 200, description = "Updated chapter document"),
        (status = 400, description = "Missing username, userId or comment"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No chapter with this id under this story"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_comment(
    service: web::Data<ChapterService>,
    path: web::Path<ChapterPath>,
    _caller: CallerIdentity,
    req: web::Json<NewComment>,
) -> Result<HttpResponse> {
    let chapter = service
        .add_comment(&path.story_id, &path.chapter_id, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(chapter))
}

/// Delete a comment from a chapter
#[utoipa::path(
    delete,
    path = "/story/{storyId}/chapter/{chapterId}/comment/{commentId}",
    tag = "chapters",
    params(
        ("storyId" = String, Path, description = "Story identifier"),
        ("chapterId" = String, Path, description = "Chapter identifier"),
        ("commentId" = String, Path, description = "Comment identifier"),
    ),
    responses(
        (status = 200, description = "Updated chapter document"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "Story, chapter and comment ids do not match one comment"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_comment(
    service: web::Data<ChapterService>,
    path: web::Path<CommentPath>,
    caller: CallerIdentity,
) -> Result<HttpResponse> {
    tracing::debug!(user_id = %caller.user_id, comment_id = %path.comment_id, "Deleting comment");
    let chapter = service
        .delete_comment(&path.story_id, &path.chapter_id, &path.comment_id)
        .await?;
    Ok(HttpResponse::Ok().json(chapter))
}
