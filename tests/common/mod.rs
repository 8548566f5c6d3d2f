#![allow(dead_code)]

use blog_api::storage::{SqliteStorage, UserRepository};
use tempfile::TempDir;

/// A file-backed storage in a fresh temp dir. Keep the `TempDir` alive for
/// as long as the storage is used.
pub fn file_storage() -> (TempDir, SqliteStorage) {
    let dir = tempfile::tempdir().expect("temp dir");
    let storage = SqliteStorage::open(dir.path().join("data.sqlite")).expect("open storage");
    storage.init().expect("init storage");
    (dir, storage)
}

pub fn seed_user(storage: &SqliteStorage, name: &str) -> i64 {
    storage
        .create_user(name, &format!("{}@example.com", name.to_lowercase()))
        .expect("create user")
}
