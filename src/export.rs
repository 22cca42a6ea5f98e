use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::models::EntityKind;

// ---------------------------------------------------------------------------
// Sheet shapes
// ---------------------------------------------------------------------------

struct Sheet {
    headers: &'static [&'static str],
    rows: Vec<Vec<String>>,
}

const CAMPAIGN_HEADERS: &[&str] = &[
    "number",
    "title",
    "description",
    "target_revenue_amount",
    "sales_team",
    "date_start",
    "date_finish",
    "status",
    "created_by",
];

const DETAIL_HEADERS: &[&str] = &[
    "number",
    "campaign_number",
    "title",
    "description",
    "amount",
    "date",
    "status",
    "created_by",
];

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Writes every stored row of one entity kind as a delimited file and
/// returns the row count.
pub fn export_entity(
    conn: &Connection,
    kind: EntityKind,
    path: &Path,
    separator: char,
) -> Result<usize> {
    let sheet = match kind {
        EntityKind::Campaign => campaign_sheet(conn)?,
        EntityKind::Expense => detail_sheet(conn, "expenses", "expense_date")?,
        EntityKind::Budget => detail_sheet(conn, "budgets", "budget_date")?,
    };
    write_sheet(&sheet, path, separator)?;
    Ok(sheet.rows.len())
}

fn campaign_sheet(conn: &Connection) -> Result<Sheet> {
    let mut stmt = conn.prepare(
        "SELECT c.number, c.title, c.description, c.target_revenue_amount, t.name,
                c.date_start, c.date_finish, c.status, c.created_by
         FROM campaigns c
         LEFT JOIN sales_teams t ON t.id = c.sales_team_id
         ORDER BY c.number",
    )?;
    let rows = stmt
        .query_map([], |row| {
            let amount: Option<f64> = row.get(3)?;
            Ok(vec![
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                amount.map(|a| format!("{a:.2}")).unwrap_or_default(),
                row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                row.get::<_, Option<String>>(7)?.unwrap_or_default(),
                row.get::<_, Option<String>>(8)?.unwrap_or_default(),
            ])
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Sheet { headers: CAMPAIGN_HEADERS, rows })
}

fn detail_sheet(conn: &Connection, table: &str, date_column: &str) -> Result<Sheet> {
    let mut stmt = conn.prepare(&format!(
        "SELECT e.number, c.number, e.title, e.description, e.amount,
                e.{date_column}, e.status, e.created_by
         FROM {table} e
         JOIN campaigns c ON c.id = e.campaign_id
         ORDER BY e.number"
    ))?;
    let rows = stmt
        .query_map([], |row| {
            let amount: f64 = row.get(4)?;
            Ok(vec![
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                format!("{amount:.2}"),
                row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                row.get::<_, Option<String>>(6)?.unwrap_or_default(),
                row.get::<_, Option<String>>(7)?.unwrap_or_default(),
            ])
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Sheet { headers: DETAIL_HEADERS, rows })
}

fn write_sheet(sheet: &Sheet, path: &Path, separator: char) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(separator as u8)
        .from_path(path)?;
    wtr.write_record(sheet.headers)?;
    for row in &sheet.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}
