/// Comment handlers
use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::comment_repo;
use crate::error::Result;
use crate::forms::CommentForm;
use crate::handlers::posts::resolve_post;
use crate::handlers::{html, redirect};
use crate::middleware::AuthUser;
use crate::render;

/// POST /{username}/{post_id}/comment/ - add a comment to a post
///
/// Anonymous submissions never reach this body: the `AuthUser` extractor
/// redirects them to login first, so the comment count cannot change.
pub async fn add_comment(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<(String, Uuid)>,
    form: web::Form<CommentForm>,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let post = resolve_post(pool.get_ref(), &username, post_id).await?;

    let errors = form.field_errors();
    if !errors.is_empty() {
        let comments = comment_repo::list_by_post(pool.get_ref(), post.id).await?;
        return Ok(html(render::post_detail_page(
            Some(&user.0),
            &post,
            &comments,
            &errors,
            &form.text,
        )));
    }

    comment_repo::create_comment(pool.get_ref(), post.id, user.0.id, form.text.trim()).await?;
    tracing::info!(post_id = %post.id, author_id = %user.0.id, "comment created");

    Ok(redirect(&format!("/{}/{}/", username, post_id)))
}
