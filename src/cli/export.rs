use std::path::PathBuf;

use crate::db::get_connection;
use crate::error::Result;
use crate::export::export_entity;
use crate::models::EntityKind;
use crate::pipeline::parse_separator;
use crate::settings::{get_data_dir, load_settings};

fn default_path(table: &str) -> PathBuf {
    let date = chrono::Local::now().format("%Y-%m-%d").to_string();
    get_data_dir().join("exports").join(format!("{table}-{date}.csv"))
}

pub fn run(entity: &str, output: Option<String>, separator: Option<&str>) -> Result<()> {
    let kind = EntityKind::from_name(entity)?;
    let raw = separator.map(str::to_string).unwrap_or_else(|| load_settings().separator);
    let separator = parse_separator(&raw)?;
    let conn = get_connection(&get_data_dir().join("maribel.db"))?;

    let path = output.map(PathBuf::from).unwrap_or_else(|| default_path(kind.table()));
    let count = export_entity(&conn, kind, &path, separator)?;

    println!("Wrote {} ({count} rows)", path.display());
    Ok(())
}
