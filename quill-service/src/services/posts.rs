/// Post service - creation and editing on top of the post repository
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::PageCache;
use crate::db::post_repo;
use crate::error::Result;
use crate::forms::UploadedImage;
use crate::media;
use crate::models::Post;

pub struct PostService {
    pool: PgPool,
    cache: PageCache,
    media_root: String,
}

impl PostService {
    pub fn new(pool: PgPool, cache: PageCache, media_root: impl Into<String>) -> Self {
        Self {
            pool,
            cache,
            media_root: media_root.into(),
        }
    }

    /// Persist a new post for `author_id` and invalidate the landing-page
    /// cache so the fresh post is visible immediately.
    pub async fn create_post(
        &self,
        author_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&UploadedImage>,
    ) -> Result<Post> {
        let image_path = match image {
            Some(upload) => {
                Some(media::save_image(&self.media_root, &upload.filename, &upload.bytes).await?)
            }
            None => None,
        };

        let post = post_repo::create_post(
            &self.pool,
            author_id,
            text,
            group_id,
            image_path.as_deref(),
        )
        .await?;

        self.cache.invalidate_all();
        tracing::info!(post_id = %post.id, author_id = %author_id, "post created");

        Ok(post)
    }

    /// Apply an author's edit. Ownership is checked by the caller; the
    /// publication timestamp and author never change. A newly uploaded
    /// image replaces the stored one, otherwise it is kept.
    pub async fn edit_post(
        &self,
        post_id: Uuid,
        text: &str,
        group_id: Option<Uuid>,
        image: Option<&UploadedImage>,
    ) -> Result<()> {
        let image_path = match image {
            Some(upload) => {
                Some(media::save_image(&self.media_root, &upload.filename, &upload.bytes).await?)
            }
            None => None,
        };

        post_repo::update_post(&self.pool, post_id, text, group_id, image_path.as_deref()).await?;

        self.cache.invalidate_all();
        tracing::info!(post_id = %post_id, "post edited");

        Ok(())
    }
}
