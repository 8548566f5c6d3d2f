mod common;

use blog_api::rest;
use blog_api::storage::{PostRepository, UserRepository};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;

async fn request(addr: std::net::SocketAddr, method: &str, path: &str, body: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.expect("connect");
    let raw = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(raw.as_bytes()).await.unwrap();
    let mut buffer = Vec::new();
    stream.read_to_end(&mut buffer).await.unwrap();
    String::from_utf8_lossy(&buffer).into_owned()
}

#[tokio::test]
async fn live_server_handles_user_and_post_flow() {
    let (_dir, storage) = common::file_storage();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = CancellationToken::new();

    let server = tokio::spawn(rest::serve_on(listener, storage.clone(), shutdown.clone()));

    let response = request(addr, "GET", "/", "").await;
    assert!(response.contains("200 OK"));
    assert!(response.contains("Server is up and running!"));

    let response = request(
        addr,
        "POST",
        "/api/users",
        r#"{"name":"Ada","email":"ada@example.com"}"#,
    )
    .await;
    assert!(response.contains("201 Created"));
    assert!(response.contains(r#""userId":1"#));

    let response = request(
        addr,
        "POST",
        "/api/blogs",
        r#"{"title":"Hello","content":"World","authorId":1}"#,
    )
    .await;
    assert!(response.contains("201 Created"));

    let response = request(addr, "POST", "/api/blogs/1/like", "").await;
    assert!(response.contains("200 OK"));
    assert!(response.contains("Blog post liked successfully"));

    let response = request(addr, "GET", "/api/blogs/user/1?page=1&pagesize=5", "").await;
    assert!(response.contains("200 OK"));
    assert!(response.contains(r#""likeCount":1"#));
    assert!(response.contains(r#""total":1"#));

    let response = request(addr, "DELETE", "/api/users/1", "").await;
    assert!(response.contains("200 OK"));
    assert!(storage.get_user_by_id(1).unwrap().is_none());
    assert!(storage.get_post_by_id(1).unwrap().is_none());

    shutdown.cancel();
    server.await.unwrap().unwrap();
}
