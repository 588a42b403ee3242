use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
}
