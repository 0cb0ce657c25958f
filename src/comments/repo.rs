use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Which entity a comment hangs off. Each kind has its own table so the
/// foreign key can cascade from the right parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentKind {
    Assignment,
    Resource,
    Week,
}

impl ParentKind {
    pub fn comments_table(self) -> &'static str {
        match self {
            Self::Assignment => "assignment_comments",
            Self::Resource => "resource_comments",
            Self::Week => "week_comments",
        }
    }

    pub fn parent_table(self) -> &'static str {
        match self {
            Self::Assignment => "assignments",
            Self::Resource => "resources",
            Self::Week => "weeks",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Assignment => "Assignment",
            Self::Resource => "Resource",
            Self::Week => "Week",
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub author: String,
    pub text: String,
    pub created_at: OffsetDateTime,
}

impl Comment {
    /// Latest-first ordering, uniform across all parent kinds.
    pub async fn list_by_parent(
        db: &PgPool,
        kind: ParentKind,
        parent_id: Uuid,
    ) -> sqlx::Result<Vec<Comment>> {
        let sql = format!(
            "SELECT id, parent_id, author, text, created_at FROM {} \
             WHERE parent_id = $1 ORDER BY created_at DESC",
            kind.comments_table()
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(parent_id)
            .fetch_all(db)
            .await
    }

    pub async fn parent_exists(db: &PgPool, kind: ParentKind, parent_id: Uuid) -> sqlx::Result<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            kind.parent_table()
        );
        sqlx::query_scalar::<_, bool>(&sql)
            .bind(parent_id)
            .fetch_one(db)
            .await
    }

    pub async fn create(
        db: &PgPool,
        kind: ParentKind,
        parent_id: Uuid,
        author: &str,
        text: &str,
    ) -> sqlx::Result<Comment> {
        let sql = format!(
            "INSERT INTO {} (parent_id, author, text) VALUES ($1, $2, $3) \
             RETURNING id, parent_id, author, text, created_at",
            kind.comments_table()
        );
        sqlx::query_as::<_, Comment>(&sql)
            .bind(parent_id)
            .bind(author)
            .bind(text)
            .fetch_one(db)
            .await
    }

    pub async fn delete(db: &PgPool, kind: ParentKind, id: Uuid) -> sqlx::Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.comments_table());
        let res = sqlx::query(&sql).bind(id).execute(db).await?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_pair_with_parents() {
        assert_eq!(ParentKind::Assignment.comments_table(), "assignment_comments");
        assert_eq!(ParentKind::Assignment.parent_table(), "assignments");
        assert_eq!(ParentKind::Week.comments_table(), "week_comments");
        assert_eq!(ParentKind::Week.parent_table(), "weeks");
        assert_eq!(ParentKind::Resource.comments_table(), "resource_comments");
    }
}
