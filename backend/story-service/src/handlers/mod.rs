/// HTTP handlers for story-service
///
/// - stories: story lookup and voting
/// - chapters: chapter lookup and comment add/delete
/// - edit: reserved story/chapter edit endpoints (placeholders)
/// - health: liveness and readiness probes
///
/// Handlers extract path/body, call one service method and serialize the
/// resulting document. Routing and auth requirements live in `crate::routes`.
pub mod chapters;
pub mod edit;
pub mod health;
pub mod stories;

pub use chapters::{add_comment, delete_comment, get_chapter};
pub use edit::{edit_chapter, edit_story_details};
pub use stories::{get_story, vote_story};
