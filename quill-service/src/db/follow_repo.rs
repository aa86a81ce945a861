use sqlx::PgPool;
use uuid::Uuid;

/// Conditional follow insert; returns true if a new row was inserted.
/// The unique (follower_id, author_id) index makes this safe under
/// concurrent double-submits.
pub async fn insert_if_absent(
    pool: &PgPool,
    follower_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let inserted = sqlx::query_as::<_, (Uuid,)>(
        r#"
        INSERT INTO follows (follower_id, author_id)
        VALUES ($1, $2)
        ON CONFLICT (follower_id, author_id) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(follower_id)
    .bind(author_id)
    .fetch_optional(pool)
    .await?;

    Ok(inserted.is_some())
}

/// Delete a follow relation; returns true if a row was removed.
pub async fn delete(
    pool: &PgPool,
    follower_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let affected = sqlx::query(
        r#"
        DELETE FROM follows
        WHERE follower_id = $1 AND author_id = $2
        "#,
    )
    .bind(follower_id)
    .bind(author_id)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(affected > 0)
}

/// Does `follower_id` follow `author_id`?
pub async fn exists(
    pool: &PgPool,
    follower_id: Uuid,
    author_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let row: (bool,) = sqlx::query_as(
        "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND author_id = $2)",
    )
    .bind(follower_id)
    .bind(author_id)
    .fetch_one(pool)
    .await?;

    Ok(row.0)
}

/// Total follow relations where the given user is the follower
pub async fn count_by_follower(pool: &PgPool, follower_id: Uuid) -> Result<i64, sqlx::Error> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
        .bind(follower_id)
        .fetch_one(pool)
        .await?;

    Ok(row.0)
}
