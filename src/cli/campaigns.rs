use comfy_table::{Cell, Table};

use crate::cli::colorize_status;
use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::{money, short_date};
use crate::settings::get_data_dir;

type CampaignRow = (
    String,
    String,
    Option<f64>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

pub fn run() -> Result<()> {
    let conn = get_connection(&get_data_dir().join("maribel.db"))?;
    let mut stmt = conn.prepare(
        "SELECT c.number, c.title, c.target_revenue_amount, t.name,
                c.date_start, c.date_finish, c.status
         FROM campaigns c
         LEFT JOIN sales_teams t ON t.id = c.sales_team_id
         ORDER BY c.number",
    )?;
    let rows: Vec<CampaignRow> = stmt
        .query_map([], |row| {
            Ok((
                row.get(0)?,
                row.get(1)?,
                row.get(2)?,
                row.get(3)?,
                row.get(4)?,
                row.get(5)?,
                row.get(6)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut table = Table::new();
    table.set_header(vec![
        "Number", "Title", "Target Revenue", "Sales Team", "Start", "Finish", "Status",
    ]);
    for (number, title, revenue, team, start, finish, status) in rows {
        table.add_row(vec![
            Cell::new(number),
            Cell::new(title),
            Cell::new(revenue.map(money).unwrap_or_default()),
            Cell::new(team.unwrap_or_default()),
            Cell::new(start.as_deref().map(short_date).unwrap_or_default()),
            Cell::new(finish.as_deref().map(short_date).unwrap_or_default()),
            Cell::new(colorize_status(&status.unwrap_or_default())),
        ]);
    }
    println!("Campaigns\n{table}");
    Ok(())
}
