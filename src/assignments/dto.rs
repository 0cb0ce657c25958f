use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AssignmentQuery {
    pub id: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAssignment {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub files: Option<Vec<String>>,
}

/// Partial update: absent fields keep their previous values.
#[derive(Debug, Deserialize)]
pub struct UpdateAssignment {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub files: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_payload_leaves_absent_fields_as_none() {
        let req: UpdateAssignment = serde_json::from_str(
            r#"{"id":"8b9f4a96-0000-0000-0000-000000000000","title":"New title"}"#,
        )
        .unwrap();
        assert_eq!(req.title.as_deref(), Some("New title"));
        assert!(req.description.is_none());
        assert!(req.due_date.is_none());
        assert!(req.files.is_none());
    }
}
