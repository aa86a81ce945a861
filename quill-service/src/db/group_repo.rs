use crate::models::Group;
use sqlx::PgPool;
use uuid::Uuid;

/// Create a group. Groups are seeded out of band; there is no HTTP surface
/// for this.
pub async fn create_group(
    pool: &PgPool,
    title: &str,
    slug: &str,
    description: &str,
) -> Result<Group, sqlx::Error> {
    let group = sqlx::query_as::<_, Group>(
        r#"
        INSERT INTO groups (title, slug, description)
        VALUES ($1, $2, $3)
        RETURNING id, title, slug, description
        "#,
    )
    .bind(title)
    .bind(slug)
    .bind(description)
    .fetch_one(pool)
    .await?;

    Ok(group)
}

/// Find a group by its unique slug
pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Group>, sqlx::Error> {
    let group = sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description
        FROM groups
        WHERE slug = $1
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await?;

    Ok(group)
}

/// Find a group by id
pub async fn find_by_id(pool: &PgPool, group_id: Uuid) -> Result<Option<Group>, sqlx::Error> {
    let group = sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description
        FROM groups
        WHERE id = $1
        "#,
    )
    .bind(group_id)
    .fetch_optional(pool)
    .await?;

    Ok(group)
}

/// All groups, for the post form's group selector
pub async fn list_all(pool: &PgPool) -> Result<Vec<Group>, sqlx::Error> {
    let groups = sqlx::query_as::<_, Group>(
        r#"
        SELECT id, title, slug, description
        FROM groups
        ORDER BY title
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(groups)
}
