use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct StudentQuery {
    pub id: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateStudent {
    pub student_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Partial update: absent fields keep their previous values.
#[derive(Debug, Deserialize)]
pub struct UpdateStudent {
    pub id: Option<String>,
    pub student_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}
