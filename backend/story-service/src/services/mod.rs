/// Business logic layer for story-service
///
/// - Story service: story lookup and vote counting
/// - Chapter service: chapter lookup and embedded comment mutation
///
/// Each operation is exactly one store round-trip. A filter that matches
/// nothing becomes `AppError::NotFound`; store failures become
/// `AppError::Internal`.
pub mod chapters;
pub mod stories;

pub use chapters::ChapterService;
pub use stories::StoryService;
