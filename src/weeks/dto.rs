use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub id: Option<String>,
    pub search: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateWeek {
    pub title: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    pub description: Option<String>,
    pub links: Option<Vec<String>>,
}

/// Partial update: absent fields keep their previous values.
#[derive(Debug, Deserialize)]
pub struct UpdateWeek {
    pub id: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "startDate")]
    pub start_date: Option<String>,
    pub description: Option<String>,
    pub links: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}
