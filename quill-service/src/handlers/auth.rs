/// Authentication handlers - login, signup, logout
use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use crate::config::Config;
use crate::error::Result;
use crate::forms::{sanitize_next, LoginForm, SignupForm};
use crate::handlers::html;
use crate::middleware::SESSION_COOKIE;
use crate::render;
use crate::services::auth::SignupRejection;
use crate::services::AuthService;

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .finish()
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.make_removal();
    cookie
}

/// GET /auth/login/ - login form
pub async fn login_form(query: web::Query<NextQuery>) -> Result<HttpResponse> {
    let next = sanitize_next(query.next.as_deref());

    Ok(html(render::login_page(&next, None, "")))
}

/// POST /auth/login/ - verify credentials and open a session
pub async fn login_submit(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    form: web::Form<LoginForm>,
) -> Result<HttpResponse> {
    let next = sanitize_next(form.next.as_deref());
    let service = AuthService::new(pool.get_ref().clone(), config.session.lifetime_days);

    match service.login(&form.username, &form.password).await? {
        Some((_user, session)) => Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, next))
            .cookie(session_cookie(session.token))
            .finish()),
        None => Ok(html(render::login_page(
            &next,
            Some("Username and password did not match."),
            &form.username,
        ))),
    }
}

/// GET /auth/signup/ - signup form
pub async fn signup_form() -> Result<HttpResponse> {
    Ok(html(render::signup_page(&Default::default(), "")))
}

/// POST /auth/signup/ - register and log straight in
pub async fn signup_submit(
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
    form: web::Form<SignupForm>,
) -> Result<HttpResponse> {
    let mut errors = form.field_errors();
    let service = AuthService::new(pool.get_ref().clone(), config.session.lifetime_days);

    if errors.is_empty() {
        match service.signup(&form.username, &form.password).await? {
            Ok(_user) => {
                // Fresh accounts go straight to a session.
                if let Some((_user, session)) =
                    service.login(&form.username, &form.password).await?
                {
                    return Ok(HttpResponse::Found()
                        .insert_header((header::LOCATION, "/"))
                        .cookie(session_cookie(session.token))
                        .finish());
                }
                return Ok(HttpResponse::Found()
                    .insert_header((header::LOCATION, "/auth/login/"))
                    .finish());
            }
            Err(SignupRejection::UsernameTaken) => {
                errors.add("username", "That username is taken.");
            }
        }
    }

    Ok(html(render::signup_page(&errors, &form.username)))
}

/// POST /auth/logout/ - drop the session and clear the cookie
pub async fn logout(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse> {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        let service = AuthService::new(pool.get_ref().clone(), config.session.lifetime_days);
        service.logout(cookie.value()).await?;
    }

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(removal_cookie())
        .finish())
}
