use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CommentListQuery {
    pub parent_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub parent_id: Option<String>,
    pub author: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}
