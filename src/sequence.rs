use rusqlite::Connection;

use crate::error::Result;

/// Next unique number for an entity tag, formatted `<PREFIX>-NNNNNN`.
/// Counters are per-tag rows in `number_sequences`; when called on a batch
/// transaction the increment commits or rolls back with the batch.
pub fn next_number(conn: &Connection, entity: &str, prefix: &str) -> Result<String> {
    conn.execute(
        "INSERT INTO number_sequences (entity, last_value) VALUES (?1, 1)
         ON CONFLICT(entity) DO UPDATE SET last_value = last_value + 1",
        [entity],
    )?;
    let value: i64 = conn.query_row(
        "SELECT last_value FROM number_sequences WHERE entity = ?1",
        [entity],
        |row| row.get(0),
    )?;
    Ok(format!("{prefix}-{value:06}"))
}
