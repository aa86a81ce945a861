/// Uploaded image storage
///
/// Images live on the local filesystem under the configured media root and
/// are referenced from post rows by relative path (e.g. `posts/<uuid>.jpg`).
use std::path::{Component, Path, PathBuf};
use uuid::Uuid;

use crate::error::{AppError, Result};

/// Persist uploaded image bytes under `<media_root>/posts/` with a
/// uuid-based name. Returns the relative path stored on the post row.
pub async fn save_image(media_root: &str, original_name: &str, bytes: &[u8]) -> Result<String> {
    let dir = Path::new(media_root).join("posts");
    tokio::fs::create_dir_all(&dir).await?;

    let relative = match extension_of(original_name) {
        Some(ext) => format!("posts/{}.{}", Uuid::new_v4(), ext),
        None => format!("posts/{}", Uuid::new_v4()),
    };
    tokio::fs::write(Path::new(media_root).join(&relative), bytes).await?;

    Ok(relative)
}

/// Resolve a requested media path against the root, rejecting traversal.
pub fn resolve_media_path(media_root: &str, requested: &str) -> Result<PathBuf> {
    let requested_path = Path::new(requested);
    let safe = requested_path
        .components()
        .all(|c| matches!(c, Component::Normal(_)));
    if !safe || requested.is_empty() {
        return Err(AppError::NotFound(requested.to_string()));
    }

    Ok(Path::new(media_root).join(requested_path))
}

/// Content type for a stored image, by extension.
pub fn content_type_for(path: &str) -> &'static str {
    match extension_of(path).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Lowercased alphanumeric extension of a filename, capped at 8 chars.
fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traversal_is_rejected() {
        assert!(resolve_media_path("media", "../etc/passwd").is_err());
        assert!(resolve_media_path("media", "posts/../../secret").is_err());
        assert!(resolve_media_path("media", "/absolute").is_err());
        assert!(resolve_media_path("media", "").is_err());
    }

    #[test]
    fn normal_paths_resolve_under_root() {
        let path = resolve_media_path("media", "posts/a.jpg").unwrap();
        assert_eq!(path, PathBuf::from("media/posts/a.jpg"));
    }

    #[test]
    fn content_types_by_extension() {
        assert_eq!(content_type_for("posts/a.jpg"), "image/jpeg");
        assert_eq!(content_type_for("posts/a.PNG"), "image/png");
        assert_eq!(content_type_for("posts/a.gif"), "image/gif");
        assert_eq!(content_type_for("posts/noext"), "application/octet-stream");
    }

    #[test]
    fn odd_extensions_are_dropped() {
        assert_eq!(extension_of("a.<script>"), None);
        assert_eq!(extension_of("a.verylongextension"), None);
        assert_eq!(extension_of("shot.JPG").as_deref(), Some("jpg"));
    }

    #[tokio::test]
    async fn save_writes_under_posts_dir() {
        let root = std::env::temp_dir().join(format!("quill-media-{}", Uuid::new_v4()));
        let root_str = root.to_str().unwrap();

        let rel = save_image(root_str, "pic.png", b"\x89PNG").await.unwrap();
        assert!(rel.starts_with("posts/"));
        assert!(rel.ends_with(".png"));

        let stored = tokio::fs::read(root.join(&rel)).await.unwrap();
        assert_eq!(stored, b"\x89PNG");

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
