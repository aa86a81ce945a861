use crate::models::{Post, PostDetail};
use sqlx::PgPool;
use uuid::Uuid;

const DETAIL_COLUMNS: &str = r#"
    p.id, p.author_id, u.username AS author_username,
    p.group_id, g.title AS group_title, g.slug AS group_slug,
    p.text, p.image_path, p.published_at
"#;

/// Create a new post. `published_at` is assigned by the database at insert
/// and never touched again.
pub async fn create_post(
    pool: &PgPool,
    author_id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image_path: Option<&str>,
) -> Result<Post, sqlx::Error> {
    let post = sqlx::query_as::<_, Post>(
        r#"
        INSERT INTO posts (author_id, text, group_id, image_path)
        VALUES ($1, $2, $3, $4)
        RETURNING id, author_id, group_id, text, image_path, published_at
        "#,
    )
    .bind(author_id)
    .bind(text)
    .bind(group_id)
    .bind(image_path)
    .fetch_one(pool)
    .await?;

    Ok(post)
}

/// Update a post's editable fields. Group is replaced with the submitted
/// value (clearing it is valid); a missing image keeps the stored one.
pub async fn update_post(
    pool: &PgPool,
    post_id: Uuid,
    text: &str,
    group_id: Option<Uuid>,
    image_path: Option<&str>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE posts
        SET text = $1, group_id = $2, image_path = COALESCE($3, image_path)
        WHERE id = $4
        "#,
    )
    .bind(text)
    .bind(group_id)
    .bind(image_path)
    .bind(post_id)
    .execute(pool)
    .await?;

    Ok(())
}

/// Resolve a post by its author's username and post id. A mismatched pair
/// resolves to nothing.
pub async fn find_detail(
    pool: &PgPool,
    username: &str,
    post_id: Uuid,
) -> Result<Option<PostDetail>, sqlx::Error> {
    let post = sqlx::query_as::<_, PostDetail>(&format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        WHERE u.username = $1 AND p.id = $2
        "#
    ))
    .bind(username)
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(post)
}

/// Site-wide listing, newest first
pub async fn list_all(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostDetail>(&format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        ORDER BY p.published_at DESC, p.id DESC
        LIMIT $1 OFFSET $2
        "#
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Total post count
pub async fn count_all(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts")
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

/// Posts in a group, newest first
pub async fn list_by_group(
    pool: &PgPool,
    group_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostDetail>(&format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        WHERE p.group_id = $1
        ORDER BY p.published_at DESC, p.id DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(group_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Post count for a group
pub async fn count_by_group(pool: &PgPool, group_id: Uuid) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE group_id = $1")
        .bind(group_id)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

/// Posts by an author, newest first
pub async fn list_by_author(
    pool: &PgPool,
    author_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostDetail>(&format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        WHERE p.author_id = $1
        ORDER BY p.published_at DESC, p.id DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(author_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Post count for an author
pub async fn count_by_author(pool: &PgPool, author_id: Uuid) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM posts WHERE author_id = $1")
        .bind(author_id)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}

/// Posts by every author the given user follows, newest first
pub async fn list_feed(
    pool: &PgPool,
    follower_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostDetail>, sqlx::Error> {
    let posts = sqlx::query_as::<_, PostDetail>(&format!(
        r#"
        SELECT {DETAIL_COLUMNS}
        FROM posts p
        JOIN users u ON u.id = p.author_id
        LEFT JOIN groups g ON g.id = p.group_id
        JOIN follows f ON f.author_id = p.author_id
        WHERE f.follower_id = $1
        ORDER BY p.published_at DESC, p.id DESC
        LIMIT $2 OFFSET $3
        "#
    ))
    .bind(follower_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok(posts)
}

/// Post count for a user's feed
pub async fn count_feed(pool: &PgPool, follower_id: Uuid) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*)
        FROM posts p
        JOIN follows f ON f.author_id = p.author_id
        WHERE f.follower_id = $1
        "#,
    )
    .bind(follower_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}
