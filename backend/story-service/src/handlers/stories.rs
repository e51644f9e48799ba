/// Story handlers - HTTP endpoints for story operations
use crate::auth::CallerIdentity;
use crate::error::Result;
use crate::services::StoryService;
use actix_web::{web, HttpResponse};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryPath {
    pub story_id: String,
}

/// Get a story
#[utoipa::path(
    get,
    path = "/story/{storyId}",
    tag = "stories",
    params(("storyId" = String, Path, description = "Story identifier")),
    responses(
        (status = 200, description = "Story document"),
        (status = 404, description = "No story with this id"),
        (status = 500, description = "Resource store failure"),
    )
)]
pub async fn get_story(
    service: web::Data<StoryService>,
    path: web::Path<StoryPath>,
) -> Result<HttpResponse> {
    let story = service.get_story(&path.story_id).await?;
    Ok(HttpResponse::Ok().json(story))
}

/// Vote for a story
#[utoipa::path(
    put,
    path = "/story/{storyId}/vote",
    tag = "stories",
    params(("storyId" = String, Path, description = "Story identifier")),
    responses(
        (status = 200, description = "Updated story document"),
        (status = 401, description = "Missing or invalid bearer token"),
        (status = 404, description = "No story with this id"),
    ),
    security(("bearer_auth" = []))
)]
pub async fn vote_story(
    service: web::Data<StoryService>,
    path: web::Path<StoryPath>,
    caller: CallerIdentity,
) -> Result<HttpResponse> {
    let story = service.vote(&path.story_id, &caller.user_id).await?;
    Ok(HttpResponse::Ok().json(story))
}
