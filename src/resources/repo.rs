use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

const COLUMNS: &str = "id, title, description, link, created_at";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub link: String,
    pub created_at: OffsetDateTime,
}

/// Allow-listed sort columns; unknown values silently fall back to
/// `created_at`.
pub fn sort_column(sort: Option<&str>) -> &'static str {
    match sort {
        Some("title") => "title",
        _ => "created_at",
    }
}

impl Resource {
    pub async fn list(
        db: &PgPool,
        search: Option<&str>,
        sort_col: &'static str,
        order: &'static str,
    ) -> sqlx::Result<Vec<Resource>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM resources \
             WHERE ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1) \
             ORDER BY {sort_col} {order}"
        );
        sqlx::query_as::<_, Resource>(&sql)
            .bind(search.map(crate::validate::search_pattern))
            .fetch_all(db)
            .await
    }

    pub async fn find(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Resource>> {
        let sql = format!("SELECT {COLUMNS} FROM resources WHERE id = $1");
        sqlx::query_as::<_, Resource>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(
        db: &PgPool,
        title: &str,
        description: &str,
        link: &str,
    ) -> sqlx::Result<Resource> {
        let sql = format!(
            "INSERT INTO resources (title, description, link) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&sql)
            .bind(title)
            .bind(description)
            .bind(link)
            .fetch_one(db)
            .await
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        link: Option<&str>,
    ) -> sqlx::Result<Option<Resource>> {
        let sql = format!(
            "UPDATE resources SET \
               title = COALESCE($2, title), \
               description = COALESCE($3, description), \
               link = COALESCE($4, link) \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&sql)
            .bind(id)
            .bind(title)
            .bind(description)
            .bind(link)
            .fetch_optional(db)
            .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_falls_back_on_unknown_field() {
        assert_eq!(sort_column(Some("title")), "title");
        assert_eq!(sort_column(Some("link")), "created_at");
        assert_eq!(sort_column(None), "created_at");
    }
}
