use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::storage::{Page, PageRequest, Post, Storage, StorageError};

use super::{
    models::{
        ErrorDetail, ErrorResponse, HealthResponse, PageQuery, PostBody, PostCreated,
        PostPayload, PostsPayload, SuccessResponse, UserBody, UserCreated, UserPayload,
        UsersPayload,
    },
    validation, AppState,
};

pub async fn index() -> &'static str {
    "Server is up and running!"
}

pub async fn health<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    let uptime_secs = state.started_at.elapsed().map(|d| d.as_secs()).unwrap_or(0);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            uptime_secs,
        }),
    )
}

pub async fn not_found() -> Response {
    failure(StatusCode::NOT_FOUND, "endpoint not found")
}

// --- Users ---

pub async fn create_user<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<UserBody>, JsonRejection>,
) -> Response {
    let body = match json_body(body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let new_user = match validation::validate_new_user(body) {
        Ok(new_user) => new_user,
        Err(errors) => return failure(StatusCode::BAD_REQUEST, errors),
    };

    match state.storage.create_user(&new_user.name, &new_user.email) {
        Ok(user_id) => success(
            StatusCode::CREATED,
            "User created successfully",
            UserCreated { user_id },
        ),
        Err(err) => storage_failure("create user", err),
    }
}

pub async fn get_user<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.storage.get_user_by_id(id) {
        Ok(Some(user)) => success(
            StatusCode::OK,
            "User fetched successfully",
            UserPayload { user },
        ),
        Ok(None) => failure(
            StatusCode::NOT_FOUND,
            format!("User with ID {id} not found."),
        ),
        Err(err) => storage_failure("fetch user", err),
    }
}

pub async fn list_users<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
) -> Response {
    match state.storage.get_all_users() {
        Ok(users) => success(
            StatusCode::OK,
            "Users fetched successfully",
            UsersPayload { users },
        ),
        Err(err) => storage_failure("list users", err),
    }
}

pub async fn update_user<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Result<Json<UserBody>, JsonRejection>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let body = match json_body(body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let changes = match validation::validate_user_changes(body) {
        Ok(changes) => changes,
        Err(errors) => return failure(StatusCode::BAD_REQUEST, errors),
    };

    match state.storage.update_user(id, &changes) {
        Ok(0) => failure(
            StatusCode::NOT_FOUND,
            format!("User with ID {id} not found or no changes were made."),
        ),
        Ok(_) => success_empty(StatusCode::OK, "User updated successfully"),
        Err(err) => storage_failure("update user", err),
    }
}

pub async fn delete_user<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.storage.delete_user(id) {
        Ok(0) => failure(
            StatusCode::NOT_FOUND,
            format!("User with ID {id} not found."),
        ),
        Ok(_) => success_empty(StatusCode::OK, "User deleted successfully"),
        Err(err) => storage_failure("delete user", err),
    }
}

// --- Blog posts ---

pub async fn create_post<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    body: Result<Json<PostBody>, JsonRejection>,
) -> Response {
    let body = match json_body(body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let new_post = match validation::validate_new_post(body) {
        Ok(new_post) => new_post,
        Err(errors) => return failure(StatusCode::BAD_REQUEST, errors),
    };

    if let Err(resp) = ensure_author_exists(&state.storage, new_post.author_id) {
        return resp;
    }

    match state
        .storage
        .create_post(&new_post.title, &new_post.content, new_post.author_id)
    {
        Ok(post_id) => success(
            StatusCode::CREATED,
            "Blog post created successfully",
            PostCreated { post_id },
        ),
        Err(err) => storage_failure("create post", err),
    }
}

pub async fn get_post<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.storage.get_post_by_id(id) {
        Ok(Some(post)) => success(
            StatusCode::OK,
            "Blog post fetched successfully",
            PostPayload { post },
        ),
        Ok(None) => failure(
            StatusCode::NOT_FOUND,
            format!("Blog post with ID {id} not found."),
        ),
        Err(err) => storage_failure("fetch post", err),
    }
}

pub async fn list_posts<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Query(query): Query<PageQuery>,
) -> Response {
    let request = page_request(&query);
    match state.storage.get_all_posts(request) {
        Ok(page) => success(
            StatusCode::OK,
            "Blog posts fetched successfully",
            posts_payload(page),
        ),
        Err(err) => storage_failure("list posts", err),
    }
}

pub async fn list_posts_by_user<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(author_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Response {
    let author_id = match parse_id(&author_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let request = page_request(&query);
    match state.storage.get_posts_by_user(author_id, request) {
        Ok(page) => success(
            StatusCode::OK,
            "Blog posts fetched successfully",
            posts_payload(page),
        ),
        Err(err) => storage_failure("list posts by user", err),
    }
}

pub async fn update_post<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    body: Result<Json<PostBody>, JsonRejection>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let body = match json_body(body) {
        Ok(body) => body,
        Err(resp) => return resp,
    };
    let changes = match validation::validate_post_changes(body) {
        Ok(changes) => changes,
        Err(errors) => return failure(StatusCode::BAD_REQUEST, errors),
    };

    if let Some(author_id) = changes.author_id {
        if let Err(resp) = ensure_author_exists(&state.storage, author_id) {
            return resp;
        }
    }

    match state.storage.update_post(id, &changes) {
        Ok(0) => failure(
            StatusCode::NOT_FOUND,
            format!("Blog post with ID {id} not found or no changes made."),
        ),
        Ok(_) => success_empty(StatusCode::OK, "Blog post updated successfully"),
        Err(err) => storage_failure("update post", err),
    }
}

pub async fn delete_post<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.storage.delete_post(id) {
        Ok(0) => failure(
            StatusCode::NOT_FOUND,
            format!("Post with ID {id} not found."),
        ),
        Ok(_) => success_empty(StatusCode::OK, "Blog post deleted successfully"),
        Err(err) => storage_failure("delete post", err),
    }
}

pub async fn like_post<S: Storage + Clone + Send + Sync + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match state.storage.like_post(id) {
        Ok(0) => failure(
            StatusCode::NOT_FOUND,
            format!("Post with ID {id} not found."),
        ),
        Ok(_) => success_empty(StatusCode::OK, "Blog post liked successfully"),
        Err(err) => storage_failure("like post", err),
    }
}

// --- Helpers ---

fn success<T: Serialize>(status: StatusCode, message: &str, data: T) -> Response {
    (
        status,
        Json(SuccessResponse {
            message: message.to_string(),
            data: Some(data),
            success: true,
        }),
    )
        .into_response()
}

fn success_empty(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(SuccessResponse::<()> {
            message: message.to_string(),
            data: None,
            success: true,
        }),
    )
        .into_response()
}

fn failure(status: StatusCode, error: impl Into<ErrorDetail>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            success: false,
        }),
    )
        .into_response()
}

fn storage_failure(action: &str, err: StorageError) -> Response {
    match err {
        StorageError::ConstraintViolation(msg) => {
            log::warn!("Failed to {}: {}", action, msg);
            failure(StatusCode::CONFLICT, msg)
        }
        StorageError::EmptyChangeSet => {
            failure(StatusCode::BAD_REQUEST, "No fields to update were provided.")
        }
        err => {
            log::error!("Failed to {}: {:?}", action, err);
            failure(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn parse_id(raw: &str) -> Result<i64, Response> {
    raw.trim().parse::<i64>().map_err(|_| {
        log::warn!("Invalid id {:?}", raw);
        failure(
            StatusCode::BAD_REQUEST,
            "ID is required and should be an integer.",
        )
    })
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    match body {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => Err(failure(StatusCode::BAD_REQUEST, rejection.body_text())),
    }
}

fn ensure_author_exists<S: Storage>(storage: &S, author_id: i64) -> Result<(), Response> {
    match storage.get_user_by_id(author_id) {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(failure(
            StatusCode::NOT_FOUND,
            format!("User with ID {author_id} not found."),
        )),
        Err(err) => Err(storage_failure("look up author", err)),
    }
}

fn page_request(query: &PageQuery) -> PageRequest {
    PageRequest::parse(query.page.as_deref(), query.pagesize.as_deref())
}

fn posts_payload(page: Page<Post>) -> PostsPayload {
    let total_pages = page.total_pages();
    PostsPayload {
        total: page.total,
        page: page.request.page(),
        page_size: page.request.page_size(),
        total_pages,
        posts: page.items,
    }
}
