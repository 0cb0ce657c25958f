use serde::Serialize;
use sqlx::{types::Json, FromRow, PgPool};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

const COLUMNS: &str = "id, title, description, due_date, files, created_at, updated_at";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Assignment {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub due_date: Date,
    pub files: Json<Vec<String>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Allow-listed sort columns; unknown values silently fall back to
/// `created_at`.
pub fn sort_column(sort: Option<&str>) -> &'static str {
    match sort {
        Some("title") => "title",
        Some("due_date") => "due_date",
        _ => "created_at",
    }
}

impl Assignment {
    pub async fn list(
        db: &PgPool,
        search: Option<&str>,
        sort_col: &'static str,
        order: &'static str,
    ) -> sqlx::Result<Vec<Assignment>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM assignments \
             WHERE ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1) \
             ORDER BY {sort_col} {order}"
        );
        sqlx::query_as::<_, Assignment>(&sql)
            .bind(search.map(crate::validate::search_pattern))
            .fetch_all(db)
            .await
    }

    pub async fn find(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Assignment>> {
        let sql = format!("SELECT {COLUMNS} FROM assignments WHERE id = $1");
        sqlx::query_as::<_, Assignment>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(
        db: &PgPool,
        title: &str,
        description: &str,
        due_date: Date,
        files: Vec<String>,
    ) -> sqlx::Result<Assignment> {
        let sql = format!(
            "INSERT INTO assignments (title, description, due_date, files) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&sql)
            .bind(title)
            .bind(description)
            .bind(due_date)
            .bind(Json(files))
            .fetch_one(db)
            .await
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        title: Option<&str>,
        description: Option<&str>,
        due_date: Option<Date>,
        files: Option<Vec<String>>,
    ) -> sqlx::Result<Option<Assignment>> {
        let sql = format!(
            "UPDATE assignments SET \
               title = COALESCE($2, title), \
               description = COALESCE($3, description), \
               due_date = COALESCE($4, due_date), \
               files = COALESCE($5, files), \
               updated_at = now() \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&sql)
            .bind(id)
            .bind(title)
            .bind(description)
            .bind(due_date)
            .bind(files.map(Json))
            .fetch_optional(db)
            .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        // Comments go with the row via ON DELETE CASCADE.
        let res = sqlx::query("DELETE FROM assignments WHERE id = $1")
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
        assert_eq!(sort_column(Some("due_date")), "due_date");
        assert_eq!(sort_column(Some("files")), "created_at");
        assert_eq!(sort_column(None), "created_at");
    }

    #[test]
    fn files_serialize_as_plain_array() {
        let a = Assignment {
            id: Uuid::new_v4(),
            title: "A1".into(),
            description: "d".into(),
            due_date: date!(2025 - 11 - 10),
            files: Json(vec!["https://example.com/a1.pdf".into()]),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["files"], serde_json::json!(["https://example.com/a1.pdf"]));
    }

    #[sqlx::test]
    async fn created_assignment_reads_back_unchanged(pool: PgPool) {
        let created = Assignment::create(
            &pool,
            "Lab 1",
            "Warm-up exercises",
            date!(2025 - 11 - 10),
            vec!["https://example.com/lab1.pdf".into()],
        )
        .await
        .unwrap();

        let found = Assignment::find(&pool, created.id).await.unwrap().unwrap();
        assert_eq!(found.title, "Lab 1");
        assert_eq!(found.description, "Warm-up exercises");
        assert_eq!(found.due_date, date!(2025 - 11 - 10));
        assert_eq!(found.files.0, vec!["https://example.com/lab1.pdf".to_string()]);
    }

    #[sqlx::test]
    async fn update_leaves_absent_fields_untouched(pool: PgPool) {
        let created = Assignment::create(
            &pool,
            "Lab 2",
            "Pointers",
            date!(2025 - 12 - 01),
            vec!["a.pdf".into(), "b.pdf".into()],
        )
        .await
        .unwrap();

        let updated = Assignment::update(&pool, created.id, Some("Lab 2 (revised)"), None, None, None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "Lab 2 (revised)");
        assert_eq!(updated.description, "Pointers");
        assert_eq!(updated.due_date, date!(2025 - 12 - 01));
        assert_eq!(updated.files.0, created.files.0);
        assert!(updated.updated_at >= created.updated_at);
    }

    #[sqlx::test]
    async fn deleting_assignment_takes_its_comments_along(pool: PgPool) {
        use crate::comments::repo::{Comment, ParentKind};

        let assignment = Assignment::create(&pool, "Lab 3", "Trees", date!(2026 - 01 - 15), vec![])
            .await
            .unwrap();
        Comment::create(&pool, ParentKind::Assignment, assignment.id, "sara", "when is this due?")
            .await
            .unwrap();
        Comment::create(&pool, ParentKind::Assignment, assignment.id, "admin", "see the title")
            .await
            .unwrap();

        assert!(Assignment::delete(&pool, assignment.id).await.unwrap());
        assert!(Assignment::find(&pool, assignment.id).await.unwrap().is_none());
        let orphans = Comment::list_by_parent(&pool, ParentKind::Assignment, assignment.id)
            .await
            .unwrap();
        assert!(orphans.is_empty());
    }
}
