use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

const COLUMNS: &str = "id, student_id, name, email, password_hash, created_at";

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Student {
    pub id: Uuid,
    pub student_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: OffsetDateTime,
}

/// Allow-listed sort columns; unknown values silently fall back to `name`.
pub fn sort_column(sort: Option<&str>) -> &'static str {
    match sort {
        Some("email") => "email",
        Some("student_id") => "student_id",
        Some("created_at") => "created_at",
        _ => "name",
    }
}

impl Student {
    pub async fn list(
        db: &PgPool,
        search: Option<&str>,
        sort_col: &'static str,
        order: &'static str,
    ) -> sqlx::Result<Vec<Student>> {
        // sort_col/order come from the allow-list above, never from input.
        let sql = format!(
            "SELECT {COLUMNS} FROM students \
             WHERE ($1::text IS NULL OR name ILIKE $1 OR email ILIKE $1 OR student_id ILIKE $1) \
             ORDER BY {sort_col} {order}"
        );
        sqlx::query_as::<_, Student>(&sql)
            .bind(search.map(crate::validate::search_pattern))
            .fetch_all(db)
            .await
    }

    pub async fn find(db: &PgPool, id: Uuid) -> sqlx::Result<Option<Student>> {
        let sql = format!("SELECT {COLUMNS} FROM students WHERE id = $1");
        sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(db)
            .await
    }

    pub async fn create(
        db: &PgPool,
        student_id: &str,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> sqlx::Result<Student> {
        let sql = format!(
            "INSERT INTO students (student_id, name, email, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&sql)
            .bind(student_id)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .fetch_one(db)
            .await
    }

    pub async fn update(
        db: &PgPool,
        id: Uuid,
        student_id: Option<&str>,
        name: Option<&str>,
        email: Option<&str>,
        password_hash: Option<&str>,
    ) -> sqlx::Result<Option<Student>> {
        let sql = format!(
            "UPDATE students SET \
               student_id = COALESCE($2, student_id), \
               name = COALESCE($3, name), \
               email = COALESCE($4, email), \
               password_hash = COALESCE($5, password_hash) \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .bind(student_id)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .fetch_optional(db)
            .await
    }

    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<bool> {
        let res = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn email_taken(
        db: &PgPool,
        email: &str,
        exclude: Option<Uuid>,
    ) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM students WHERE email = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(email)
        .bind(exclude)
        .fetch_one(db)
        .await
    }

    pub async fn student_id_taken(
        db: &PgPool,
        student_id: &str,
        exclude: Option<Uuid>,
    ) -> sqlx::Result<bool> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM students WHERE student_id = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(student_id)
        .bind(exclude)
        .fetch_one(db)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_falls_back_on_unknown_field() {
        assert_eq!(sort_column(Some("email")), "email");
        assert_eq!(sort_column(Some("password_hash")), "name");
        assert_eq!(sort_column(Some("1; DROP TABLE students")), "name");
        assert_eq!(sort_column(None), "name");
    }

    #[test]
    fn student_never_serializes_password_hash() {
        let s = Student {
            id: Uuid::new_v4(),
            student_id: "202301234".into(),
            name: "Sara".into(),
            email: "sara@example.com".into(),
            password_hash: "secret-hash".into(),
            created_at: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(!json.contains("secret-hash"));
        assert!(json.contains("202301234"));
    }

    #[sqlx::test]
    async fn duplicate_email_maps_to_conflict(pool: PgPool) {
        Student::create(&pool, "202301001", "Sara", "sara@example.com", "hash-a")
            .await
            .unwrap();
        let err = Student::create(&pool, "202301002", "Other", "sara@example.com", "hash-b")
            .await
            .unwrap_err();

        let api: crate::error::ApiError = err.into();
        assert_eq!(api.status(), axum::http::StatusCode::CONFLICT);
    }

    #[sqlx::test]
    async fn email_taken_excludes_the_row_itself(pool: PgPool) {
        let s = Student::create(&pool, "202301003", "Omar", "omar@example.com", "hash")
            .await
            .unwrap();
        assert!(Student::email_taken(&pool, "omar@example.com", None).await.unwrap());
        assert!(!Student::email_taken(&pool, "omar@example.com", Some(s.id)).await.unwrap());
    }
}
