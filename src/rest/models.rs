use serde::{Deserialize, Serialize};

use crate::storage::{Post, User};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub success: bool,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    pub success: bool,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorDetail {
    Message(String),
    Fields(Vec<FieldError>),
}

impl From<String> for ErrorDetail {
    fn from(message: String) -> Self {
        ErrorDetail::Message(message)
    }
}

impl From<&str> for ErrorDetail {
    fn from(message: &str) -> Self {
        ErrorDetail::Message(message.to_string())
    }
}

impl From<Vec<FieldError>> for ErrorDetail {
    fn from(errors: Vec<FieldError>) -> Self {
        ErrorDetail::Fields(errors)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub path: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(path: &str, msg: &str) -> Self {
        Self {
            path: path.to_string(),
            msg: msg.to_string(),
        }
    }
}

#[derive(Default, Deserialize)]
pub struct UserBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// `authorId` stays raw JSON so that both `7` and `"7"` are accepted.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub author_id: Option<serde_json::Value>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub pagesize: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreated {
    pub user_id: i64,
}

#[derive(Serialize, Deserialize)]
pub struct UserPayload {
    pub user: User,
}

#[derive(Serialize, Deserialize)]
pub struct UsersPayload {
    pub users: Vec<User>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostCreated {
    pub post_id: i64,
}

#[derive(Serialize, Deserialize)]
pub struct PostPayload {
    pub post: Post,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostsPayload {
    pub posts: Vec<Post>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}
