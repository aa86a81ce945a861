/// Data models for quill-service
///
/// Row structs for the persisted entities plus the joined views the listing
/// and detail pages render from.
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Registered account. Owns posts, comments, follow relations and sessions.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Named, slugged category that posts may belong to.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Group {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
}

/// Raw post row. `published_at` is set once at insert and never updated.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub group_id: Option<Uuid>,
    pub text: String,
    pub image_path: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Post joined with its author and optional group, as listing and detail
/// pages consume it.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PostDetail {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub group_id: Option<Uuid>,
    pub group_title: Option<String>,
    pub group_slug: Option<String>,
    pub text: String,
    pub image_path: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Comment joined with its author's username for rendering.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CommentDetail {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Directed follower -> author relation.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Follow {
    pub id: Uuid,
    pub follower_id: Uuid,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Cookie-backed login session.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}
