/// Uploaded media serving
use actix_web::{web, HttpResponse};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::media;

/// GET /media/{path..} - serve an uploaded image from the media root
pub async fn serve(config: web::Data<Config>, path: web::Path<String>) -> Result<HttpResponse> {
    let requested = path.into_inner();
    let resolved = media::resolve_media_path(&config.media.root, &requested)?;

    let bytes = match tokio::fs::read(&resolved).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::NotFound(format!("media {}", requested)))
        }
        Err(err) => return Err(err.into()),
    };

    Ok(HttpResponse::Ok()
        .content_type(media::content_type_for(&requested))
        .body(bytes))
}
