/// Form payloads and validation
///
/// Validation failures stay inside the form layer: handlers re-render the
/// page with `FieldErrors` and HTTP 200, nothing touches the error type.
use actix_multipart::Multipart;
use futures_util::StreamExt;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::Group;

/// Upload guardrail for post images.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

static USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    // Hardcoded and validated; a compile-time constant in practice.
    Regex::new(r"^[a-zA-Z0-9_-]{3,32}$")
        .expect("hardcoded username regex is invalid - fix source code")
});

/// Username shape: 3-32 characters, alphanumeric with - and _
pub fn validate_username(username: &str) -> bool {
    USERNAME_REGEX.is_match(username)
}

/// Field-level validation errors, in submission order.
#[derive(Debug, Default, Clone)]
pub struct FieldErrors {
    entries: Vec<(&'static str, String)>,
}

impl FieldErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.entries.push((field, message.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.entries.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Image file submitted with a post.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// New-post / edit-post submission (multipart: text, group, image).
#[derive(Debug, Default)]
pub struct PostForm {
    pub text: String,
    /// Raw group field as submitted, kept for re-rendering the select.
    pub group_raw: String,
    pub image: Option<UploadedImage>,
}

impl PostForm {
    /// Read the multipart body into a form. Unknown fields are ignored;
    /// an oversized image is rejected outright.
    pub async fn from_multipart(payload: &mut Multipart) -> Result<Self> {
        let mut form = PostForm::default();

        while let Some(item) = payload.next().await {
            let mut field =
                item.map_err(|e| AppError::BadRequest(format!("multipart error: {}", e)))?;

            let name = field.name().unwrap_or("").to_string();
            let filename = field
                .content_disposition()
                .and_then(|cd| cd.get_filename())
                .map(|s| s.to_string());

            let mut data = Vec::new();
            while let Some(chunk) = field.next().await {
                let bytes =
                    chunk.map_err(|e| AppError::BadRequest(format!("field read error: {}", e)))?;
                data.extend_from_slice(&bytes);
                if name == "image" && data.len() > MAX_IMAGE_BYTES {
                    return Err(AppError::BadRequest("image exceeds upload limit".into()));
                }
            }

            match name.as_str() {
                "text" => form.text = String::from_utf8_lossy(&data).into_owned(),
                "group" => form.group_raw = String::from_utf8_lossy(&data).trim().to_string(),
                "image" => {
                    // Browsers send an empty file part when nothing is picked.
                    if let Some(filename) = filename {
                        if !filename.is_empty() && !data.is_empty() {
                            form.image = Some(UploadedImage {
                                filename,
                                bytes: data,
                            });
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Validate against the known groups. Returns the resolved group id on
    /// success, field errors otherwise.
    pub fn validate(&self, groups: &[Group]) -> std::result::Result<Option<Uuid>, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.text.trim().is_empty() {
            errors.add("text", "This field is required.");
        }

        let group_id = if self.group_raw.is_empty() {
            None
        } else {
            match Uuid::parse_str(&self.group_raw) {
                Ok(id) if groups.iter().any(|g| g.id == id) => Some(id),
                _ => {
                    errors.add("group", "Select a valid group.");
                    None
                }
            }
        };

        if errors.is_empty() {
            Ok(group_id)
        } else {
            Err(errors)
        }
    }
}

/// Comment submission.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub text: String,
}

impl CommentForm {
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if self.validate().is_err() || self.text.trim().is_empty() {
            errors.add("text", "This field is required.");
        }
        errors
    }
}

/// Login submission.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "This field is required."))]
    pub username: String,
    #[validate(length(min = 1, message = "This field is required."))]
    pub password: String,
    #[serde(default)]
    pub next: Option<String>,
}

/// Signup submission.
#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub username: String,
    pub password: String,
}

impl SignupForm {
    /// Shape checks that need no database access.
    pub fn field_errors(&self) -> FieldErrors {
        let mut errors = FieldErrors::default();
        if !validate_username(&self.username) {
            errors.add(
                "username",
                "Usernames are 3-32 characters: letters, digits, - and _.",
            );
        }
        if self.password.len() < crate::security::MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!(
                    "Passwords must be at least {} characters.",
                    crate::security::MIN_PASSWORD_LEN
                ),
            );
        }
        errors
    }
}

/// Only allow same-site relative targets for the post-login redirect.
pub fn sanitize_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_string(),
        _ => "/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(id: Uuid) -> Group {
        Group {
            id,
            title: "Travel".into(),
            slug: "travel".into(),
            description: "".into(),
        }
    }

    #[test]
    fn empty_text_is_an_error() {
        let form = PostForm {
            text: "   ".into(),
            ..Default::default()
        };
        let errors = form.validate(&[]).unwrap_err();
        assert_eq!(errors.get("text"), Some("This field is required."));
    }

    #[test]
    fn missing_group_is_valid() {
        let form = PostForm {
            text: "hello".into(),
            ..Default::default()
        };
        assert_eq!(form.validate(&[]).unwrap(), None);
    }

    #[test]
    fn known_group_resolves() {
        let id = Uuid::new_v4();
        let form = PostForm {
            text: "hello".into(),
            group_raw: id.to_string(),
            ..Default::default()
        };
        assert_eq!(form.validate(&[group(id)]).unwrap(), Some(id));
    }

    #[test]
    fn unknown_group_is_an_error() {
        let form = PostForm {
            text: "hello".into(),
            group_raw: Uuid::new_v4().to_string(),
            ..Default::default()
        };
        let errors = form.validate(&[group(Uuid::new_v4())]).unwrap_err();
        assert_eq!(errors.get("group"), Some("Select a valid group."));
    }

    #[test]
    fn malformed_group_id_is_an_error() {
        let form = PostForm {
            text: "hello".into(),
            group_raw: "not-a-uuid".into(),
            ..Default::default()
        };
        assert!(form.validate(&[]).is_err());
    }

    #[test]
    fn comment_text_required() {
        let form = CommentForm { text: "  ".into() };
        assert!(!form.field_errors().is_empty());

        let form = CommentForm {
            text: "nice post".into(),
        };
        assert!(form.field_errors().is_empty());
    }

    #[test]
    fn username_shape() {
        assert!(validate_username("leo_tolstoy"));
        assert!(validate_username("abc"));
        assert!(!validate_username("ab"));
        assert!(!validate_username("has space"));
        assert!(!validate_username("way-too-long-username-far-beyond-thirty-two-chars"));
    }

    #[test]
    fn next_sanitized_to_relative_paths() {
        assert_eq!(sanitize_next(Some("/new/")), "/new/");
        assert_eq!(sanitize_next(Some("https://evil.example")), "/");
        assert_eq!(sanitize_next(Some("//evil.example")), "/");
        assert_eq!(sanitize_next(None), "/");
    }
}
