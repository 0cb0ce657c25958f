use serde::Serialize;
use sqlx::{types::Json, FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

const COLUMNS: &str = "id, title, start_date, description, links, created_at";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Week {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "startDate")]
    pub start_date: Date,
    pub description: String,
    pub links: Json<Vec<String>>,
    pub created_at: OffsetDateTime,
}

/// Allow-listed sort columns; unknown values silently fall back to
/// `start_date`.
pub fn sort_column(sort: Option<&str>) -> &'static str {
    match sort {
        Some("title") => "title",
        Some("created_at") => "created_at",
        _ => "start_date",
    }
}

impl Week {
    pub async fn list(
        db: &PgPool,
        search: Option<&str>,
        sort_col: &'static str,
        order: &'static str,
    ) -> sqlx::Result<Vec<Week>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM weeks \
             WHERE ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1) \
             ORDER BY {sort_col} {order}"
        );
        sqlx::query_as::<_, Week>(&sql)
            .bind(search.map(crate::validate::search_pattern))
            .fetch_all(db)
            .await
    }

    pub async fn find(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Week>> {
        let sql = format!("SELECT {COLUMNS} FROM weeks WHERE id = $1");
        sqlx::query_as::<_, Week>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(
        db: &PgPool,
        title: &str,
        start_date: Date,
        description: &str,
        links: Vec<String>,
    ) -> sqlx::Result<Week> {
        let sql = format!(
            "INSERT INTO weeks (title, start_date, description, links) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Week>(&sql)
            .bind(title)
            .bind(start_date)
            .bind(description)
            .bind(Json(links))
            .fetch_one(db)
            .await
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        start_date: Option<Date>,
        description: Option<&str>,
        links: Option<Vec<String>>,
    ) -> sqlx::Result<Option<Week>> {
        let sql = format!(
            "UPDATE weeks SET \
               title = COALESCE($2, title), \
               start_date = COALESCE($3, start_date), \
               description = COALESCE($4, description), \
               links = COALESCE($5, links) \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Week>(&sql)
            .bind(id)
            .bind(title)
            .bind(start_date)
            .bind(description)
            .bind(links.map(Json))
            .fetch_optional(db)
            .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM weeks WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn sort_column_falls_back_on_unknown_field() {
        assert_eq!(sort_column(Some("title")), "title");
        assert_eq!(sort_column(Some("links")), "start_date");
        assert_eq!(sort_column(None), "start_date");
    }

    #[test]
    fn week_serializes_camel_case_start_date() {
        let w = Week {
            id: Uuid::new_v4(),
            title: "Week 1".into(),
            start_date: date!(2025 - 09 - 01),
            description: "intro".into(),
            links: Json(vec![]),
            created_at: OffsetDateTime::now_utc(),
        };
        let v = serde_json::to_value(&w).unwrap();
        assert!(v.get("startDate").is_some());
        assert!(v.get("start_date").is_none());
    }
}
