/// Business logic layer
pub mod auth;
pub mod follow;
pub mod posts;

pub use auth::AuthService;
pub use follow::FollowService;
pub use posts::PostService;
