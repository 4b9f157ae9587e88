use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, OptionalExtension};

use crate::infra::sqlite::schema::open_connection;

pub fn upsert_view_query(db_path: &Path, screen: &str, query: &str) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute(
        "INSERT INTO view_query(screen, query, updated_at)
         VALUES (?1, ?2, CURRENT_TIMESTAMP)
         ON CONFLICT(screen) DO UPDATE SET
            query = excluded.query,
            updated_at = excluded.updated_at",
        params![screen, query],
    )
    .with_context(|| format!("failed to store query for screen '{screen}'"))?;
    Ok(())
}

pub fn load_view_query(db_path: &Path, screen: &str) -> Result<Option<String>> {
    let conn = open_connection(db_path)?;
    conn.query_row(
        "SELECT query FROM view_query WHERE screen = ?1",
        [screen],
        |row| row.get::<_, String>(0),
    )
    .optional()
    .with_context(|| format!("failed to load query for screen '{screen}'"))
}

pub fn delete_view_query(db_path: &Path, screen: &str) -> Result<()> {
    let conn = open_connection(db_path)?;
    conn.execute("DELETE FROM view_query WHERE screen = ?1", [screen])
        .with_context(|| format!("failed to delete query for screen '{screen}'"))?;
    Ok(())
}

pub fn list_view_screens(db_path: &Path) -> Result<Vec<String>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare("SELECT screen FROM view_query ORDER BY screen")
        .context("failed to prepare screen listing")?;
    let screens = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("failed to list screens")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to read screen row")?;
    Ok(screens)
}
