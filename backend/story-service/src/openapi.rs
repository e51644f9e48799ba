/// OpenAPI documentation for the story routes
use crate::handlers;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Story Service API",
        version = "1.0.0",
        description = "Stories, chapters, story votes and chapter comments.",
        license(name = "MIT")
    ),
    paths(
        handlers::stories::get_story,
        handlers::stories::vote_story,
        handlers::chapters::get_chapter,
        handlers::chapters::add_comment,
        handlers::chapters::delete_comment,
        handlers::edit::edit_story_details,
        handlers::edit::edit_chapter,
    ),
    tags(
        (name = "stories", description = "Story lookup and voting"),
        (name = "chapters", description = "Chapter lookup and chapter comments"),
        (name = "edit", description = "Reserved story and chapter editing endpoints"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("RS256 access token"))
                    .build(),
            ),
        );
    }
}

impl ApiDoc {
    pub fn openapi_json_path() -> &'static str {
        "/api/v1/openapi.json"
    }
}
