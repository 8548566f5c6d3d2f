use rusqlite::{params_from_iter, types::Value, Connection};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError},
};

use super::{
    error::{StorageError, StorageResult},
    page::{Page, PageRequest},
    post, user,
    traits::{Post, PostChanges, PostRepository, User, UserChanges, UserRepository},
};

const DB_SCHEMA_VERSION: i64 = 1;

/// The single connection shared by every repository operation.
///
/// Cloning is cheap and yields a handle on the same connection. After
/// [`SqliteStorage::close`] every operation fails with
/// [`StorageError::Closed`].
#[derive(Clone)]
pub struct SqliteStorage {
    path: Option<PathBuf>,
    conn: Arc<Mutex<Option<Connection>>>,
}

impl SqliteStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        let journal_mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        log::debug!("SQLite journal mode: {}", journal_mode);
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            path: Some(path.as_ref().to_path_buf()),
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    pub fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        Ok(Self {
            path: None,
            conn: Arc::new(Mutex::new(Some(conn))),
        })
    }

    /// Delete the database file (and its WAL side files) if present.
    pub fn reset_all<P: AsRef<Path>>(path: P) -> std::io::Result<()> {
        let path = path.as_ref();
        for suffix in ["", "-wal", "-shm"] {
            let mut target = path.as_os_str().to_owned();
            target.push(suffix);
            let target = PathBuf::from(target);
            if target.exists() {
                std::fs::remove_file(&target)?;
            }
        }
        Ok(())
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn init(&self) -> StorageResult<()> {
        self.with_conn(Self::migrate)
    }

    /// Close the underlying connection. Idempotent.
    pub fn close(&self) -> StorageResult<()> {
        let conn = self
            .conn
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(conn) = conn {
            conn.close().map_err(|(_, err)| StorageError::from(err))?;
            log::info!("🔒 SQLite storage closed");
        }
        Ok(())
    }

    fn with_conn<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        let conn = guard.as_ref().ok_or(StorageError::Closed)?;
        Ok(f(conn)?)
    }

    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        log::info!(
            "SQLite schema migration: {} -> {}",
            version,
            DB_SCHEMA_VERSION
        );

        if version == 0 {
            // IF NOT EXISTS adopts databases created before versioning.
            conn.execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS Users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS Blogs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                authorId INTEGER NOT NULL,
                likeCount INTEGER DEFAULT 0,
                FOREIGN KEY (authorId) REFERENCES Users (id) ON DELETE CASCADE
            );
        "#,
            )?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_SCHEMA),
            Some("database schema version mismatch; please run with --reset option".to_string()),
        ))
    }
}

/// Builds `UPDATE <table> SET a = ?1, b = ?2 WHERE id = ?3` from the
/// supplied columns. Column names come from code, never from input.
pub(super) fn db_update_columns(
    conn: &Connection,
    table: &str,
    id: i64,
    assignments: Vec<(&'static str, Value)>,
) -> rusqlite::Result<usize> {
    if assignments.is_empty() {
        return Ok(0);
    }

    let set_clause = assignments
        .iter()
        .enumerate()
        .map(|(i, (column, _))| format!("{column} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE {table} SET {set_clause} WHERE id = ?{}",
        assignments.len() + 1
    );

    let mut values: Vec<Value> = assignments.into_iter().map(|(_, value)| value).collect();
    values.push(Value::Integer(id));
    conn.execute(&sql, params_from_iter(values.iter()))
}

impl UserRepository for SqliteStorage {
    fn create_user(&self, name: &str, email: &str) -> StorageResult<i64> {
        let id = self.with_conn(|conn| user::db_create_user(conn, name, email))?;
        log::debug!("created user {}", id);
        Ok(id)
    }

    fn get_user_by_id(&self, id: i64) -> StorageResult<Option<User>> {
        self.with_conn(|conn| user::db_get_user(conn, id))
    }

    fn get_all_users(&self) -> StorageResult<Vec<User>> {
        self.with_conn(user::db_list_users)
    }

    fn update_user(&self, id: i64, changes: &UserChanges) -> StorageResult<usize> {
        if changes.is_empty() {
            return Err(StorageError::EmptyChangeSet);
        }
        let rows = self.with_conn(|conn| user::db_update_user(conn, id, changes))?;
        log::debug!("updated user {} ({} rows)", id, rows);
        Ok(rows)
    }

    fn delete_user(&self, id: i64) -> StorageResult<usize> {
        let rows = self.with_conn(|conn| user::db_delete_user(conn, id))?;
        log::debug!("deleted user {} ({} rows)", id, rows);
        Ok(rows)
    }
}

impl PostRepository for SqliteStorage {
    fn create_post(&self, title: &str, content: &str, author_id: i64) -> StorageResult<i64> {
        let id = self.with_conn(|conn| post::db_create_post(conn, title, content, author_id))?;
        log::debug!("created post {} for author {}", id, author_id);
        Ok(id)
    }

    fn get_post_by_id(&self, id: i64) -> StorageResult<Option<Post>> {
        self.with_conn(|conn| post::db_get_post(conn, id))
    }

    fn get_posts_by_user(&self, author_id: i64, page: PageRequest) -> StorageResult<Page<Post>> {
        self.with_conn(|conn| post::db_list_posts(conn, Some(author_id), page))
    }

    fn get_all_posts(&self, page: PageRequest) -> StorageResult<Page<Post>> {
        self.with_conn(|conn| post::db_list_posts(conn, None, page))
    }

    fn update_post(&self, id: i64, changes: &PostChanges) -> StorageResult<usize> {
        if changes.is_empty() {
            return Err(StorageError::EmptyChangeSet);
        }
        let rows = self.with_conn(|conn| post::db_update_post(conn, id, changes))?;
        log::debug!("updated post {} ({} rows)", id, rows);
        Ok(rows)
    }

    fn delete_post(&self, id: i64) -> StorageResult<usize> {
        let rows = self.with_conn(|conn| post::db_delete_post(conn, id))?;
        log::debug!("deleted post {} ({} rows)", id, rows);
        Ok(rows)
    }

    fn like_post(&self, id: i64) -> StorageResult<usize> {
        let rows = self.with_conn(|conn| post::db_like_post(conn, id))?;
        log::debug!("liked post {} ({} rows)", id, rows);
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::{Connection, OptionalExtension};

    fn temp_db(dir: &tempfile::TempDir, name: &str) -> PathBuf {
        dir.path().join(format!("{name}.sqlite"))
    }

    #[test]
    fn sqlite_reset_all_ok_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_db(&dir, "reset");
        SqliteStorage::reset_all(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_reset_all_removes_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_db(&dir, "reset");
        std::fs::write(&path, b"dummy").unwrap();
        assert!(path.exists());
        SqliteStorage::reset_all(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn sqlite_init_initializes_schema() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_db(&dir, "init");
        let storage = SqliteStorage::open(&path).unwrap();
        storage.init().unwrap();
        storage.close().unwrap();

        assert!(path.exists());

        let conn = Connection::open(&path).unwrap();
        for table in ["Users", "Blogs"] {
            let found = conn
                .query_row(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get::<_, String>(0),
                )
                .optional()
                .unwrap();
            assert_eq!(found.as_deref(), Some(table));
        }

        let version: i64 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, DB_SCHEMA_VERSION);
    }

    #[test]
    fn sqlite_init_is_idempotent() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.init().unwrap();
        let id = storage.create_user("Ada", "ada@example.com").unwrap();
        storage.init().unwrap();
        assert!(storage.get_user_by_id(id).unwrap().is_some());
    }

    #[test]
    fn sqlite_adopts_unversioned_database_with_existing_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_db(&dir, "legacy");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch(
                r#"
                CREATE TABLE Users (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL UNIQUE
                );
                INSERT INTO Users (name, email) VALUES ('Old', 'old@example.com');
                "#,
            )
            .unwrap();
        }

        let storage = SqliteStorage::open(&path).unwrap();
        storage.init().unwrap();
        let users = storage.get_all_users().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "old@example.com");
    }

    #[test]
    fn sqlite_fails_on_mismatched_schema_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_db(&dir, "bad_version");
        {
            let conn = Connection::open(&path).unwrap();
            conn.execute_batch("PRAGMA user_version = 999;").unwrap();
        }

        let storage = SqliteStorage::open(&path).unwrap();
        let err = storage
            .init()
            .expect_err("init should fail on version mismatch");
        let msg = format!("{err}");
        assert!(msg.contains("database schema version mismatch"));
        assert!(msg.contains("--reset"));
    }

    #[test]
    fn sqlite_enables_foreign_keys() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        let enabled: i64 = storage
            .with_conn(|conn| conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0)))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn sqlite_close_rejects_further_operations() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.init().unwrap();
        let clone = storage.clone();

        storage.close().unwrap();
        storage.close().unwrap();

        assert!(matches!(
            clone.get_all_users().unwrap_err(),
            StorageError::Closed
        ));
    }

    #[test]
    fn sqlite_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_db(&dir, "reopen");

        let storage = SqliteStorage::open(&path).unwrap();
        storage.init().unwrap();
        let author = storage.create_user("Ada", "ada@example.com").unwrap();
        let post = storage.create_post("t", "c", author).unwrap();
        storage.like_post(post).unwrap();
        storage.close().unwrap();

        let reopened = SqliteStorage::open(&path).unwrap();
        reopened.init().unwrap();
        assert_eq!(reopened.path(), Some(path.as_path()));
        let loaded = reopened.get_post_by_id(post).unwrap().unwrap();
        assert_eq!(loaded.like_count, 1);
        assert_eq!(loaded.author_id, author);
    }

    #[test]
    fn update_columns_builds_numbered_placeholders() {
        let storage = SqliteStorage::open_in_memory().unwrap();
        storage.init().unwrap();
        let id = storage.create_user("Ada", "ada@example.com").unwrap();

        let rows = storage
            .with_conn(|conn| {
                db_update_columns(
                    conn,
                    "Users",
                    id,
                    vec![
                        ("name", Value::Text("Grace".into())),
                        ("email", Value::Text("grace@example.com".into())),
                    ],
                )
            })
            .unwrap();
        assert_eq!(rows, 1);

        let user = storage.get_user_by_id(id).unwrap().unwrap();
        assert_eq!(user.name, "Grace");
        assert_eq!(user.email, "grace@example.com");
    }
}
