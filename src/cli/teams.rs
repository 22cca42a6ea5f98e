use comfy_table::{Cell, Table};

use crate::db::get_connection;
use crate::error::Result;
use crate::settings::get_data_dir;

pub fn run() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("maribel.db"))?;
    let mut stmt = conn.prepare(
        "SELECT t.name, t.description, COUNT(c.id)
         FROM sales_teams t
         LEFT JOIN campaigns c ON c.sales_team_id = t.id
         GROUP BY t.id
         ORDER BY t.name",
    )?;
    let rows: Vec<(String, Option<String>, i64)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec!["Name", "Description", "Campaigns"]);
    for (name, description, campaigns) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(description.unwrap_or_default()),
            Cell::new(campaigns),
        ]);
    }
    println!("Sales Teams\n{table}");
    Ok(())
}
