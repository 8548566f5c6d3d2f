use rusqlite::{params, types::Value, Connection, OptionalExtension};

use super::{
    sqlite::db_update_columns,
    traits::{User, UserChanges},
};

fn map_user_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

pub(super) fn db_create_user(conn: &Connection, name: &str, email: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO Users (name, email) VALUES (?1, ?2)",
        params![name, email],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(super) fn db_get_user(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        "SELECT id, name, email FROM Users WHERE id = ?1",
        params![id],
        map_user_row,
    )
    .optional()
}

pub(super) fn db_list_users(conn: &Connection) -> rusqlite::Result<Vec<User>> {
    let mut stmt = conn.prepare("SELECT id, name, email FROM Users ORDER BY id")?;
    let rows = stmt
        .query_map([], map_user_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

pub(super) fn db_update_user(
    conn: &Connection,
    id: i64,
    changes: &UserChanges,
) -> rusqlite::Result<usize> {
    let mut assignments = Vec::new();
    if let Some(name) = &changes.name {
        assignments.push(("name", Value::Text(name.clone())));
    }
    if let Some(email) = &changes.email {
        assignments.push(("email", Value::Text(email.clone())));
    }
    db_update_columns(conn, "Users", id, assignments)
}

pub(super) fn db_delete_user(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM Users WHERE id = ?1", params![id])
}
