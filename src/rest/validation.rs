use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::storage::{PostChanges, UserChanges};

use super::models::{FieldError, PostBody, UserBody};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").expect("email pattern compiles")
});

pub struct NewUser {
    pub name: String,
    pub email: String,
}

pub struct NewPost {
    pub title: String,
    pub content: String,
    pub author_id: i64,
}

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Integer or integer-valued string.
pub fn parse_author_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Whitespace-only text counts as missing.
fn non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

pub fn validate_new_user(body: UserBody) -> Result<NewUser, Vec<FieldError>> {
    let mut errors = Vec::new();
    if !non_empty(&body.name) {
        errors.push(FieldError::new(
            "name",
            "Name is required and cannot be empty",
        ));
    }
    if !body.email.as_deref().is_some_and(is_email) {
        errors.push(FieldError::new(
            "email",
            "Please provide a valid email address",
        ));
    }

    match (body.name, body.email) {
        (Some(name), Some(email)) if errors.is_empty() => Ok(NewUser { name, email }),
        _ => Err(errors),
    }
}

pub fn validate_user_changes(body: UserBody) -> Result<UserChanges, Vec<FieldError>> {
    let mut errors = Vec::new();
    if body.name.is_some() && !non_empty(&body.name) {
        errors.push(FieldError::new("name", "Name cannot be empty"));
    }
    if let Some(email) = body.email.as_deref() {
        if !is_email(email) {
            errors.push(FieldError::new(
                "email",
                "Please provide a valid email address",
            ));
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(UserChanges {
        name: body.name,
        email: body.email,
    })
}

pub fn validate_new_post(body: PostBody) -> Result<NewPost, Vec<FieldError>> {
    let mut errors = Vec::new();
    if !non_empty(&body.title) {
        errors.push(FieldError::new("title", "Title is required"));
    }
    if !non_empty(&body.content) {
        errors.push(FieldError::new("content", "Content is required"));
    }
    let author_id = body.author_id.as_ref().and_then(parse_author_id);
    if author_id.is_none() {
        errors.push(FieldError::new(
            "authorId",
            "Author ID is required and should be an integer",
        ));
    }

    match (body.title, body.content, author_id) {
        (Some(title), Some(content), Some(author_id)) if errors.is_empty() => Ok(NewPost {
            title,
            content,
            author_id,
        }),
        _ => Err(errors),
    }
}

pub fn validate_post_changes(body: PostBody) -> Result<PostChanges, Vec<FieldError>> {
    let mut errors = Vec::new();
    if body.title.is_some() && !non_empty(&body.title) {
        errors.push(FieldError::new("title", "Title cannot be empty"));
    }
    if body.content.is_some() && !non_empty(&body.content) {
        errors.push(FieldError::new("content", "Content cannot be empty"));
    }
    let author_id = match &body.author_id {
        None | Some(Value::Null) => None,
        Some(raw) => match parse_author_id(raw) {
            Some(id) => Some(id),
            None => {
                errors.push(FieldError::new("authorId", "Author ID should be an integer"));
                None
            }
        },
    };

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(PostChanges {
        title: body.title,
        content: body.content,
        author_id,
    })
}
