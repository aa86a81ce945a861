/// HTTP middleware for quill-service
///
/// Resolves the session cookie to the logged-in user once per request and
/// stores it in the request extensions. Handlers pick it up through the
/// `AuthUser` / `MaybeUser` extractors; `AuthUser` turns an anonymous
/// request into a login redirect carrying the original path as `next`.
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{web, Error, FromRequest, HttpMessage, HttpRequest};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::db::session_repo;
use crate::error::AppError;
use crate::models::User;

/// Session cookie name.
pub const SESSION_COOKIE: &str = "quill_session";

/// Resolved user stored in request extensions after session lookup.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Actix middleware that resolves the session cookie for every request.
/// Anonymous and expired sessions pass through without an extension.
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

            if let (Some(token), Some(pool)) = (token, req.app_data::<web::Data<PgPool>>()) {
                match session_repo::find_user_by_token(pool.get_ref(), &token).await {
                    Ok(Some(user)) => {
                        req.extensions_mut().insert(CurrentUser(user));
                    }
                    Ok(None) => {}
                    Err(err) => {
                        // Session store unavailable: degrade to anonymous
                        // rather than failing every request.
                        tracing::warn!("session lookup failed: {}", err);
                    }
                }
            }

            service.call(req).await
        })
    }
}

/// Extractor for endpoints that require a login.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequest for AuthUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let resolved = req.extensions().get::<CurrentUser>().cloned();
        ready(match resolved {
            Some(CurrentUser(user)) => Ok(AuthUser(user)),
            None => Err(AppError::LoginRequired {
                next: full_path(req),
            }),
        })
    }
}

/// Extractor for endpoints that render differently for logged-in viewers.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

impl FromRequest for MaybeUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let resolved = req.extensions().get::<CurrentUser>().cloned();
        ready(Ok(MaybeUser(resolved.map(|c| c.0))))
    }
}

/// Request path including the query string, for the login `next` parameter.
fn full_path(req: &HttpRequest) -> String {
    req.uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.path().to_string())
}
