//! Handler-level tests that need no database
//!
//! The pool is created lazily and never connected: every route exercised
//! here resolves before the first query (auth redirects, 404 fallback,
//! static pages, media path validation).
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use quill_service::cache::PageCache;
use quill_service::{handlers, middleware, Config};

fn test_config() -> Config {
    let mut config = Config::from_env().expect("default config loads");
    config.media.root = "/nonexistent-media-root".to_string();
    config
}

macro_rules! test_app {
    () => {{
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/quill_unused")
            .expect("lazy pool");
        test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(PageCache::new(Duration::from_secs(20))))
                .app_data(web::Data::new(test_config()))
                .wrap(middleware::SessionMiddleware)
                .configure(handlers::configure)
                .default_service(web::route().to(handlers::not_found)),
        )
        .await
    }};
}

fn location(resp: &actix_web::dev::ServiceResponse) -> &str {
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[actix_web::test]
async fn anonymous_new_post_redirects_to_login_with_next() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/new/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=%2Fnew%2F");
}

#[actix_web::test]
async fn anonymous_feed_redirects_to_login() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/follow/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=%2Ffollow%2F");
}

#[actix_web::test]
async fn anonymous_edit_redirects_to_login_preserving_path() {
    let app = test_app!();

    let path = "/leo/1f8f4d6e-0000-0000-0000-000000000000/edit/";
    let req = test::TestRequest::get().uri(path).to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(
        location(&resp),
        format!("/auth/login/?next={}", urlencoding::encode(path))
    );
}

#[actix_web::test]
async fn anonymous_follow_and_unfollow_redirect_to_login() {
    let app = test_app!();

    for path in ["/leo/follow/", "/leo/unfollow/"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "path {}", path);
        assert!(location(&resp).starts_with("/auth/login/?next="));
    }
}

#[actix_web::test]
async fn unmatched_path_renders_404_page() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/no/such/page/here/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body = test::read_body(resp).await;
    let body = std::str::from_utf8(&body).unwrap();
    assert!(body.contains("Page not found"));
}

#[actix_web::test]
async fn about_pages_are_public() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/about/author/").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(std::str::from_utf8(&body).unwrap().contains("About the author"));

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/about/tech/").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn login_form_carries_next_through() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/auth/login/?next=%2Fnew%2F")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let body = std::str::from_utf8(&body).unwrap();
    assert!(body.contains(r#"name="next" value="/new/""#));
}

#[actix_web::test]
async fn login_form_rejects_offsite_next() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/auth/login/?next=https%3A%2F%2Fevil.example")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let body = std::str::from_utf8(&body).unwrap();
    assert!(body.contains(r#"name="next" value="/""#));
}

#[actix_web::test]
async fn malformed_post_id_is_not_found() {
    let app = test_app!();

    let req = test::TestRequest::get().uri("/leo/not-a-post-id/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn media_traversal_is_rejected() {
    let app = test_app!();

    let req = test::TestRequest::get()
        .uri("/media/..%2F..%2Fetc%2Fpasswd")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
