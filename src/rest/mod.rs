use std::net::SocketAddr;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use crate::storage::Storage;

mod handlers;
pub mod models;
mod validation;

use handlers::{
    create_post, create_user, delete_post, delete_user, get_post, get_user, health, index,
    like_post, list_posts, list_posts_by_user, list_users, not_found, update_post, update_user,
};

#[derive(Clone)]
pub struct AppState<S: Storage> {
    pub storage: S,
    pub started_at: std::time::SystemTime,
}

pub fn router<S: Storage + Clone + Send + Sync + 'static>(storage: S) -> Router {
    let state = AppState {
        storage,
        started_at: std::time::SystemTime::now(),
    };

    let api = Router::new()
        .route("/users", get(list_users::<S>).post(create_user::<S>))
        .route(
            "/users/:id",
            get(get_user::<S>)
                .put(update_user::<S>)
                .delete(delete_user::<S>),
        )
        .route("/blogs", get(list_posts::<S>).post(create_post::<S>))
        .route(
            "/blogs/:id",
            get(get_post::<S>)
                .put(update_post::<S>)
                .delete(delete_post::<S>),
        )
        .route("/blogs/:id/like", post(like_post::<S>))
        .route("/blogs/user/:id", get(list_posts_by_user::<S>));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health::<S>))
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<S: Storage + Clone + Send + Sync + 'static>(
    addr: SocketAddr,
    storage: S,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, storage, shutdown).await
}

/// Serve on an already bound listener until `shutdown` is cancelled.
pub async fn serve_on<S: Storage + Clone + Send + Sync + 'static>(
    listener: TcpListener,
    storage: S,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    log::info!("🌐 REST listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(storage))
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
