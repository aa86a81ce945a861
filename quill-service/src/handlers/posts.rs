/// Post handlers - listings, creation and editing
use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use crate::cache::PageCache;
use crate::config::Config;
use crate::db::{comment_repo, group_repo, post_repo};
use crate::error::{AppError, Result};
use crate::forms::{FieldErrors, PostForm};
use crate::handlers::{html, redirect, PageQuery};
use crate::middleware::{AuthUser, MaybeUser};
use crate::models::{PostDetail, User};
use crate::pagination::{parse_page_param, Page, Paginator};
use crate::render;
use crate::services::PostService;

/// GET / - site-wide listing, cached for the configured TTL
pub async fn index(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    cache: web::Data<PageCache>,
    config: web::Data<Config>,
    user: MaybeUser,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let cache_key = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string());

    if let Some(body) = cache.get(&cache_key).await {
        return Ok(html(body));
    }

    let total = post_repo::count_all(pool.get_ref()).await?;
    let paginator = Paginator::new(config.pagination.posts_per_page, total);
    let number = paginator.clamp(parse_page_param(query.page.as_deref()));
    let items =
        post_repo::list_all(pool.get_ref(), paginator.per_page(), paginator.offset(number))
            .await?;
    let page = Page::new(items, number, &paginator);

    let body = render::index_page(user.0.as_ref(), &page);
    cache.insert(cache_key, body.clone()).await;

    Ok(html(body))
}

/// GET /group/{slug}/ - posts in a group
pub async fn group_posts(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    user: MaybeUser,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let group = group_repo::find_by_slug(pool.get_ref(), &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("group {}", slug)))?;

    let total = post_repo::count_by_group(pool.get_ref(), group.id).await?;
    let paginator = Paginator::new(config.pagination.posts_per_page, total);
    let number = paginator.clamp(parse_page_param(query.page.as_deref()));
    let items = post_repo::list_by_group(
        pool.get_ref(),
        group.id,
        paginator.per_page(),
        paginator.offset(number),
    )
    .await?;
    let page = Page::new(items, number, &paginator);

    Ok(html(render::group_page(user.0.as_ref(), &group, &page)))
}

/// GET /new/ - post form
pub async fn new_post_form(pool: web::Data<PgPool>, user: AuthUser) -> Result<HttpResponse> {
    let groups = group_repo::list_all(pool.get_ref()).await?;

    Ok(html(render::post_form_page(
        &user.0,
        &groups,
        "/new/",
        "",
        "",
        &FieldErrors::default(),
        false,
    )))
}

/// POST /new/ - create a post
pub async fn new_post_submit(
    pool: web::Data<PgPool>,
    cache: web::Data<PageCache>,
    config: web::Data<Config>,
    user: AuthUser,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let form = PostForm::from_multipart(&mut payload).await?;
    let groups = group_repo::list_all(pool.get_ref()).await?;

    match form.validate(&groups) {
        Ok(group_id) => {
            let service = PostService::new(
                pool.get_ref().clone(),
                cache.get_ref().clone(),
                config.media.root.clone(),
            );
            service
                .create_post(user.0.id, form.text.trim(), group_id, form.image.as_ref())
                .await?;

            Ok(redirect("/"))
        }
        Err(errors) => Ok(html(render::post_form_page(
            &user.0,
            &groups,
            "/new/",
            &form.text,
            &form.group_raw,
            &errors,
            false,
        ))),
    }
}

/// GET /{username}/{post_id}/ - post detail with comments
pub async fn post_detail(
    pool: web::Data<PgPool>,
    user: MaybeUser,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let post = resolve_post(pool.get_ref(), &username, post_id).await?;
    let comments = comment_repo::list_by_post(pool.get_ref(), post.id).await?;

    Ok(html(render::post_detail_page(
        user.0.as_ref(),
        &post,
        &comments,
        &FieldErrors::default(),
        "",
    )))
}

/// GET /{username}/{post_id}/edit/ - edit form, author only
pub async fn post_edit_form(
    pool: web::Data<PgPool>,
    user: AuthUser,
    path: web::Path<(String, Uuid)>,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let post = resolve_post(pool.get_ref(), &username, post_id).await?;

    if let Some(response) = deny_non_author(&post, &user.0) {
        return Ok(response);
    }

    let groups = group_repo::list_all(pool.get_ref()).await?;
    let group_raw = post.group_id.map(|id| id.to_string()).unwrap_or_default();

    Ok(html(render::post_form_page(
        &user.0,
        &groups,
        &format!("/{}/{}/edit/", username, post_id),
        &post.text,
        &group_raw,
        &FieldErrors::default(),
        true,
    )))
}

/// POST /{username}/{post_id}/edit/ - apply an edit, author only
pub async fn post_edit_submit(
    pool: web::Data<PgPool>,
    cache: web::Data<PageCache>,
    config: web::Data<Config>,
    user: AuthUser,
    path: web::Path<(String, Uuid)>,
    mut payload: Multipart,
) -> Result<HttpResponse> {
    let (username, post_id) = path.into_inner();
    let post = resolve_post(pool.get_ref(), &username, post_id).await?;

    if let Some(response) = deny_non_author(&post, &user.0) {
        return Ok(response);
    }

    let form = PostForm::from_multipart(&mut payload).await?;
    let groups = group_repo::list_all(pool.get_ref()).await?;

    match form.validate(&groups) {
        Ok(group_id) => {
            let service = PostService::new(
                pool.get_ref().clone(),
                cache.get_ref().clone(),
                config.media.root.clone(),
            );
            service
                .edit_post(post.id, form.text.trim(), group_id, form.image.as_ref())
                .await?;

            Ok(redirect(&format!("/{}/{}/", username, post_id)))
        }
        Err(errors) => Ok(html(render::post_form_page(
            &user.0,
            &groups,
            &format!("/{}/{}/edit/", username, post_id),
            &form.text,
            &form.group_raw,
            &errors,
            true,
        ))),
    }
}

/// Resolve the username + post id pair or 404.
pub async fn resolve_post(pool: &PgPool, username: &str, post_id: Uuid) -> Result<PostDetail> {
    post_repo::find_detail(pool, username, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post /{}/{}/", username, post_id)))
}

/// A logged-in non-author is silently sent back to the detail view.
fn deny_non_author(post: &PostDetail, user: &User) -> Option<HttpResponse> {
    if post.author_id != user.id {
        Some(redirect(&format!("/{}/{}/", post.author_username, post.id)))
    } else {
        None
    }
}
