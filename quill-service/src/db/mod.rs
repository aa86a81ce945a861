/// Database access layer
///
/// One repository module per entity. Repositories are free async functions
/// over `&PgPool` returning `Result<_, sqlx::Error>`; business rules live in
/// the service layer.
pub mod comment_repo;
pub mod follow_repo;
pub mod group_repo;
pub mod post_repo;
pub mod session_repo;
pub mod user_repo;
