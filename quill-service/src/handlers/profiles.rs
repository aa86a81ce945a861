/// Profile handlers - author pages and follow/unfollow
use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use crate::config::Config;
use crate::db::{post_repo, user_repo};
use crate::error::{AppError, Result};
use crate::handlers::{html, redirect, PageQuery};
use crate::middleware::{AuthUser, MaybeUser};
use crate::models::User;
use crate::pagination::{parse_page_param, Page, Paginator};
use crate::render::{self, FollowState};
use crate::services::FollowService;

/// GET /{username}/ - author profile with their posts
pub async fn profile(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    viewer: MaybeUser,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let author = resolve_author(pool.get_ref(), &username).await?;

    let total = post_repo::count_by_author(pool.get_ref(), author.id).await?;
    let paginator = Paginator::new(config.pagination.posts_per_page, total);
    let number = paginator.clamp(parse_page_param(query.page.as_deref()));
    let items = post_repo::list_by_author(
        pool.get_ref(),
        author.id,
        paginator.per_page(),
        paginator.offset(number),
    )
    .await?;
    let page = Page::new(items, number, &paginator);

    let follow_state = match &viewer.0 {
        None => None,
        Some(viewer) if viewer.id == author.id => Some(FollowState::OwnProfile),
        Some(viewer) => {
            let following = FollowService::new(pool.get_ref().clone())
                .is_following(viewer.id, author.id)
                .await?;
            Some(if following {
                FollowState::Following
            } else {
                FollowState::NotFollowing
            })
        }
    };

    Ok(html(render::profile_page(
        viewer.0.as_ref(),
        &author.username,
        total,
        &page,
        follow_state,
    )))
}

/// GET/POST /{username}/follow/ - follow an author
pub async fn profile_follow(
    pool: web::Data<PgPool>,
    user: AuthUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = resolve_author(pool.get_ref(), &username).await?;

    FollowService::new(pool.get_ref().clone())
        .follow(user.0.id, author.id)
        .await?;

    Ok(redirect(&format!("/{}/", author.username)))
}

/// GET/POST /{username}/unfollow/ - unfollow an author
pub async fn profile_unfollow(
    pool: web::Data<PgPool>,
    user: AuthUser,
    username: web::Path<String>,
) -> Result<HttpResponse> {
    let author = resolve_author(pool.get_ref(), &username).await?;

    FollowService::new(pool.get_ref().clone())
        .unfollow(user.0.id, author.id)
        .await?;

    Ok(redirect(&format!("/{}/", author.username)))
}

async fn resolve_author(pool: &PgPool, username: &str) -> Result<User> {
    user_repo::find_by_username(pool, username)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", username)))
}
