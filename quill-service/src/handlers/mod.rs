/// HTTP request handlers
///
/// Handlers return `Result<HttpResponse>`; redirects model the happy-path
/// outcomes (post-submit, authorization recovery) and everything else is a
/// rendered HTML page.
pub mod about;
pub mod auth;
pub mod comments;
pub mod feed;
pub mod media;
pub mod posts;
pub mod profiles;

use actix_web::{http::header, web, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::error::AppError;
use crate::render;

/// Route table, shared between `main` and the handler-level tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // A path segment that fails to parse (e.g. a malformed post id) is an
    // unresolvable resource, not a client protocol error.
    cfg.app_data(web::PathConfig::default().error_handler(|_err, req| {
        AppError::NotFound(req.path().to_string()).into()
    }));

    cfg.route("/", web::get().to(posts::index))
        .service(
            web::resource("/new/")
                .route(web::get().to(posts::new_post_form))
                .route(web::post().to(posts::new_post_submit)),
        )
        .route("/follow/", web::get().to(feed::follow_index))
        .route("/about/author/", web::get().to(about::author))
        .route("/about/tech/", web::get().to(about::tech))
        .service(
            web::resource("/auth/login/")
                .route(web::get().to(auth::login_form))
                .route(web::post().to(auth::login_submit)),
        )
        .service(
            web::resource("/auth/signup/")
                .route(web::get().to(auth::signup_form))
                .route(web::post().to(auth::signup_submit)),
        )
        .route("/auth/logout/", web::post().to(auth::logout))
        .route("/media/{path:.*}", web::get().to(media::serve))
        .route("/group/{slug}/", web::get().to(posts::group_posts))
        .service(
            web::resource("/{username}/follow/")
                .route(web::get().to(profiles::profile_follow))
                .route(web::post().to(profiles::profile_follow)),
        )
        .service(
            web::resource("/{username}/unfollow/")
                .route(web::get().to(profiles::profile_unfollow))
                .route(web::post().to(profiles::profile_unfollow)),
        )
        .service(
            web::resource("/{username}/{post_id}/edit/")
                .route(web::get().to(posts::post_edit_form))
                .route(web::post().to(posts::post_edit_submit)),
        )
        .route(
            "/{username}/{post_id}/comment/",
            web::post().to(comments::add_comment),
        )
        .route("/{username}/{post_id}/", web::get().to(posts::post_detail))
        .route("/{username}/", web::get().to(profiles::profile));
}

/// `?page=` query parameter, kept raw: anything non-numeric means page 1.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// 200 with an HTML body.
pub fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

/// 302 to a same-site path.
pub fn redirect(to: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, to.to_string()))
        .finish()
}

/// Default route: rendered 404 page.
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(render::not_found_page(req.path()))
}
