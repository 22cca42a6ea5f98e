use rusqlite::Connection;
use uuid::Uuid;

use crate::error::Result;
use crate::models::SalesTeam;

struct SeedTeam {
    name: &'static str,
    description: &'static str,
}

const SEED_TEAMS: &[SeedTeam] = &[
    SeedTeam { name: "Field Sales", description: "Regional reps and on-site demos" },
    SeedTeam { name: "Inside Sales", description: "Phone and email pipeline" },
    SeedTeam { name: "Key Accounts", description: "Named enterprise accounts" },
    SeedTeam { name: "Partnerships", description: "Reseller and co-marketing deals" },
];

/// Seed bootstrap for the sales-team pool. Inserts the sample teams with
/// fresh ids; teams already present by name are left alone, so running it
/// twice adds nothing.
pub fn seed_sales_teams(conn: &Connection) -> Result<usize> {
    let mut inserted = 0;
    for team in SEED_TEAMS {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM sales_teams WHERE name = ?1)",
            [team.name],
            |r| r.get(0),
        )?;
        if exists {
            continue;
        }
        let entity = SalesTeam {
            id: Uuid::new_v4().to_string(),
            name: team.name.to_string(),
            description: Some(team.description.to_string()),
        };
        conn.execute(
            "INSERT INTO sales_teams (id, name, description) VALUES (?1, ?2, ?3)",
            rusqlite::params![entity.id, entity.name, entity.description],
        )?;
        inserted += 1;
    }
    Ok(inserted)
}
