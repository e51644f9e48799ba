/// Edit handlers - reserved endpoints for story and chapter editing.
///
/// Neither endpoint touches the store or checks credentials yet; the request
/// body is ignored and a plain-text acknowledgment is returned.
use actix_web::HttpResponse;

/// Edit story details (placeholder)
#[utoipa::path(
    put,
    path = "/edit/story/{storyId}/details",
    tag = "edit",
    params(("storyId" = String, Path, description = "Story identifier")),
    responses((status = 200, description = "Placeholder acknowledgment")),
    security(("bearer_auth" = []))
)]
pub async fn edit_story_details() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("story details editing is not available yet")
}

/// Edit a chapter (placeholder)
#[utoipa::path(
    put,
    path = "/edit/story/{storyId}/chapter/{chapterId}",
    tag = "edit",
    params(
        ("storyId" = String, Path, description = "Story identifier"),
        ("chapterId" = String, Path, description = "Chapter identifier"),
    ),
    responses((status = 200, description = "Placeholder acknowledgment")),
    security(("bearer_auth" = []))
)]
pub async fn edit_chapter() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("chapter editing is not available yet")
}
