use comfy_table::{Cell, Table};

use crate::cli::colorize_status;
use crate::db::get_connection;
use crate::error::{MaribelError, Result};
use crate::fmt::{money, short_date};
use crate::models::EntityKind;
use crate::settings::get_data_dir;

pub fn run(kind: &str) -> Result<()> {
    let kind = EntityKind::from_name(kind)?;
    let (table_name, date_column) = match kind {
        EntityKind::Expense => ("expenses", "expense_date"),
        EntityKind::Budget => ("budgets", "budget_date"),
        EntityKind::Campaign => {
            return Err(MaribelError::UnknownKind("campaign".to_string()));
        }
    };

    let conn = get_connection(&get_data_dir().join("maribel.db"))?;
    let mut stmt = conn.prepare(&format!(
        "SELECT e.number, c.number, e.title, e.amount, e.{date_column}, e.status
         FROM {table_name} e
         JOIN campaigns c ON c.id = e.campaign_id
         ORDER BY e.number"
    ))?;
    let rows: Vec<(String, String, String, f64, Option<String>, Option<String>)> = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec!["Number", "Campaign", "Title", "Amount", "Date", "Status"]);
    for (number, campaign, title, amount, date, status) in rows {
        table.add_row(vec![
            Cell::new(number),
            Cell::new(campaign),
            Cell::new(title),
            Cell::new(money(amount)),
            Cell::new(date.as_deref().map(short_date).unwrap_or_default()),
            Cell::new(colorize_status(&status.unwrap_or_default())),
        ]);
    }
    println!("{}s\n{table}", kind.label());
    Ok(())
}
