use rusqlite::{params, OptionalExtension};

use super::{Database, DbError};

// ---------------------------------------------------------------------------
// Settings queries
// ---------------------------------------------------------------------------

pub fn upsert_setting(
    db: &Database,
    key: &str,
    value: &str,
    updated_at: &str,
) -> Result<(), DbError> {
    let conn = db.conn();
    conn.execute(
        "INSERT INTO settings (key, value, updated_at)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(key)
         DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value, updated_at],
    )?;
    Ok(())
}

pub fn get_setting(db: &Database, key: &str) -> Result<Option<String>, DbError> {
    let conn = db.conn();
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

pub fn applied_migrations(db: &Database) -> Result<Vec<i64>, DbError> {
    let conn = db.conn();
    let mut stmt = conn.prepare("SELECT version FROM _migrations ORDER BY version")?;
    let versions = stmt
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(versions)
}
