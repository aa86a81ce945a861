/// Quill Service Library
///
/// A server-rendered social posting application: users publish text posts
/// (optionally with an image and a group tag), comment on posts, and follow
/// authors to compose a personalized feed.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers returning rendered HTML
/// - `models`: Row structs and the joined views pages render from
/// - `services`: Business logic layer
/// - `db`: Database access layer, one repository per entity
/// - `cache`: Landing page cache and invalidation
/// - `middleware`: Session-cookie authentication
/// - `forms`: Form binding and validation
/// - `pagination`: Page-number parsing, clamping and page metadata
/// - `render`: Thin HTML composition
/// - `media`: Uploaded image storage
/// - `security`: Password hashing and session tokens
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod models;
pub mod pagination;
pub mod render;
pub mod security;
pub mod services;

pub use config::Config;
pub use error::{AppError, Result};
