/// Follow service - the only writer of follow relations
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::follow_repo;
use crate::error::Result;

#[derive(Clone)]
pub struct FollowService {
    pool: PgPool,
}

impl FollowService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent follow; self-follows are a silent no-op. Returns true if
    /// a new relation was created.
    pub async fn follow(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        if follower_id == author_id {
            return Ok(false);
        }

        let created = follow_repo::insert_if_absent(&self.pool, follower_id, author_id).await?;
        if created {
            tracing::info!(%follower_id, %author_id, "follow created");
        }

        Ok(created)
    }

    /// Remove a follow relation; no-op if none exists. Returns true if a
    /// row was removed.
    pub async fn unfollow(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        let removed = follow_repo::delete(&self.pool, follower_id, author_id).await?;
        if removed {
            tracing::info!(%follower_id, %author_id, "follow removed");
        }

        Ok(removed)
    }

    /// Does `follower_id` currently follow `author_id`?
    pub async fn is_following(&self, follower_id: Uuid, author_id: Uuid) -> Result<bool> {
        Ok(follow_repo::exists(&self.pool, follower_id, author_id).await?)
    }
}
