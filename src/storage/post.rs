use rusqlite::{params, types::Value, Connection, OptionalExtension};

use super::{
    page::{Page, PageRequest},
    sqlite::db_update_columns,
    traits::{Post, PostChanges},
};

const POST_COLUMNS: &str = "id, title, content, authorId, likeCount";

fn map_post_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Post> {
    Ok(Post {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        author_id: row.get(3)?,
        like_count: row.get::<_, Option<i64>>(4)?.unwrap_or(0),
    })
}

pub(super) fn db_create_post(
    conn: &Connection,
    title: &str,
    content: &str,
    author_id: i64,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO Blogs (title, content, authorId) VALUES (?1, ?2, ?3)",
        params![title, content, author_id],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(super) fn db_get_post(conn: &Connection, id: i64) -> rusqlite::Result<Option<Post>> {
    conn.query_row(
        &format!("SELECT {POST_COLUMNS} FROM Blogs WHERE id = ?1"),
        params![id],
        map_post_row,
    )
    .optional()
}

/// One window query plus one count query under the same filter.
pub(super) fn db_list_posts(
    conn: &Connection,
    author_id: Option<i64>,
    request: PageRequest,
) -> rusqlite::Result<Page<Post>> {
    let limit = request.page_size();
    let offset = request.offset();

    let (items, total) = match author_id {
        Some(author_id) => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {POST_COLUMNS} FROM Blogs WHERE authorId = ?1 ORDER BY id LIMIT ?2 OFFSET ?3"
            ))?;
            let items = stmt
                .query_map(params![author_id, limit, offset], map_post_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            let total: i64 = conn.query_row(
                "SELECT COUNT(*) FROM Blogs WHERE authorId = ?1",
                params![author_id],
                |row| row.get(0),
            )?;
            (items, total)
        }
        None => {
            let mut stmt = conn.prepare(&format!(
                "SELECT {POST_COLUMNS} FROM Blogs ORDER BY id LIMIT ?1 OFFSET ?2"
            ))?;
            let items = stmt
                .query_map(params![limit, offset], map_post_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            let total: i64 = conn.query_row("SELECT COUNT(*) FROM Blogs", [], |row| row.get(0))?;
            (items, total)
        }
    };

    Ok(Page {
        items,
        total,
        request,
    })
}

pub(super) fn db_update_post(
    conn: &Connection,
    id: i64,
    changes: &PostChanges,
) -> rusqlite::Result<usize> {
    let mut assignments = Vec::new();
    if let Some(title) = &changes.title {
        assignments.push(("title", Value::Text(title.clone())));
    }
    if let Some(content) = &changes.content {
        assignments.push(("content", Value::Text(content.clone())));
    }
    if let Some(author_id) = changes.author_id {
        assignments.push(("authorId", Value::Integer(author_id)));
    }
    db_update_columns(conn, "Blogs", id, assignments)
}

pub(super) fn db_delete_post(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute("DELETE FROM Blogs WHERE id = ?1", params![id])
}

pub(super) fn db_like_post(conn: &Connection, id: i64) -> rusqlite::Result<usize> {
    conn.execute(
        "UPDATE Blogs SET likeCount = likeCount + 1 WHERE id = ?1",
        params![id],
    )
}
