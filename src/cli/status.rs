use crate::db::get_connection;
use crate::error::Result;
use crate::fmt::format_bytes;
use crate::settings::load_settings;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = std::path::PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join("maribel.db");

    println!("User:       {}", if settings.user_name.is_empty() { "(not set)" } else { &settings.user_name });
    println!("Separator:  '{}'", settings.separator);
    println!("Data dir:   {}", data_dir.display());
    println!("Database:   {}", db_path.display());

    if db_path.exists() {
        let size = std::fs::metadata(&db_path)?.len();
        println!("DB size:    {}", format_bytes(size));

        let conn = get_connection(&db_path)?;

        let campaigns: i64 = conn.query_row("SELECT count(*) FROM campaigns", [], |r| r.get(0))?;
        let expenses: i64 = conn.query_row("SELECT count(*) FROM expenses", [], |r| r.get(0))?;
        let budgets: i64 = conn.query_row("SELECT count(*) FROM budgets", [], |r| r.get(0))?;
        let teams: i64 = conn.query_row("SELECT count(*) FROM sales_teams", [], |r| r.get(0))?;

        println!();
        println!("Campaigns:    {campaigns}");
        println!("Expenses:     {expenses}");
        println!("Budgets:      {budgets}");
        println!("Sales teams:  {teams}");
    } else {
        println!();
        println!("Database not found. Run `maribel init` to set up.");
    }

    Ok(())
}
