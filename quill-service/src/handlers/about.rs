/// Static informational pages
use actix_web::HttpResponse;

use crate::error::Result;
use crate::handlers::html;
use crate::middleware::MaybeUser;
use crate::render;

/// GET /about/author/
pub async fn author(user: MaybeUser) -> Result<HttpResponse> {
    Ok(html(render::about_author_page(user.0.as_ref())))
}

/// GET /about/tech/
pub async fn tech(user: MaybeUser) -> Result<HttpResponse> {
    Ok(html(render::about_tech_page(user.0.as_ref())))
}
