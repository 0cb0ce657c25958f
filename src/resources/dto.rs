use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    pub id: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateResource {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

/// Partial update: absent fields keep their previous values.
#[derive(Debug, Deserialize)]
pub struct UpdateResource {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}
