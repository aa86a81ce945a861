/// Feed handler - posts from followed authors
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::config::Config;
use crate::db::post_repo;
use crate::error::Result;
use crate::handlers::{html, PageQuery};
use crate::middleware::AuthUser;
use crate::pagination::{parse_page_param, Page, Paginator};
use crate::render;

/// GET /follow/ - paginated posts by everyone the current user follows
pub async fn follow_index(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: AuthUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let total = post_repo::count_feed(pool.get_ref(), user.0.id).await?;
    let paginator = Paginator::new(config.pagination.posts_per_page, total);
    let number = paginator.clamp(parse_page_param(query.page.as_deref()));
    let items = post_repo::list_feed(
        pool.get_ref(),
        user.0.id,
        paginator.per_page(),
        paginator.offset(number),
    )
    .await?;
    let page = Page::new(items, number, &paginator);

    Ok(html(render::feed_page(&user.0, &page)))
}
