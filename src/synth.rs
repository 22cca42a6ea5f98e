use chrono::{Duration, NaiveDateTime};
use rand::Rng;
use rusqlite::Connection;

use crate::db::list_sales_team_ids;
use crate::error::{MaribelError, Result};
use crate::models::{BudgetStatus, CampaignStatus, EntityKind, ExpenseStatus};
use crate::seeder::seed_sales_teams;

// ---------------------------------------------------------------------------
// Status synthesis
// ---------------------------------------------------------------------------

// Candidate statuses with draw weights. Only nonzero weights are drawable;
// the zero entries keep the full lifecycle visible next to its odds.
const CAMPAIGN_WEIGHTS: &[(CampaignStatus, u32)] = &[
    (CampaignStatus::Draft, 0),
    (CampaignStatus::Cancelled, 0),
    (CampaignStatus::Confirmed, 4),
    (CampaignStatus::OnProgress, 0),
    (CampaignStatus::OnHold, 0),
    (CampaignStatus::Finished, 0),
    (CampaignStatus::Archived, 0),
];

const EXPENSE_WEIGHTS: &[(ExpenseStatus, u32)] = &[
    (ExpenseStatus::Draft, 0),
    (ExpenseStatus::Cancelled, 0),
    (ExpenseStatus::Confirmed, 4),
    (ExpenseStatus::Archived, 0),
];

const BUDGET_WEIGHTS: &[(BudgetStatus, u32)] = &[
    (BudgetStatus::Draft, 0),
    (BudgetStatus::Cancelled, 0),
    (BudgetStatus::Confirmed, 3),
    (BudgetStatus::Archived, 0),
];

pub fn campaign_status(rng: &mut impl Rng) -> CampaignStatus {
    weighted_pick(CAMPAIGN_WEIGHTS, rng)
}

pub fn expense_status(rng: &mut impl Rng) -> ExpenseStatus {
    weighted_pick(EXPENSE_WEIGHTS, rng)
}

pub fn budget_status(rng: &mut impl Rng) -> BudgetStatus {
    weighted_pick(BUDGET_WEIGHTS, rng)
}

/// Uniform draw in `[0, total)` walked against cumulative weights. A zero
/// total falls back to the first candidate.
fn weighted_pick<T: Copy>(table: &[(T, u32)], rng: &mut impl Rng) -> T {
    let total: u32 = table.iter().map(|(_, w)| w).sum();
    if total == 0 {
        return table[0].0;
    }
    let mut draw = rng.gen_range(0..total);
    for (candidate, weight) in table {
        if draw < *weight {
            return *candidate;
        }
        draw -= *weight;
    }
    table[0].0
}

// ---------------------------------------------------------------------------
// Default-value generators
// ---------------------------------------------------------------------------

pub fn description_for(kind: EntityKind, title: &str) -> String {
    format!("{} Description for {}", kind.label(), title)
}

/// Random multiple of 10,000, up to 900,000.
pub fn target_revenue(rng: &mut impl Rng) -> f64 {
    10000.0 * (rng.gen::<f64>() * 89.0 + 1.0).ceil()
}

/// Uniform whole-day offset within `[start, end]`. Callers pass
/// `start <= end`.
pub fn random_date_between(
    start: NaiveDateTime,
    end: NaiveDateTime,
    rng: &mut impl Rng,
) -> NaiveDateTime {
    let days = (end - start).num_days();
    start + Duration::days(rng.gen_range(0..=days))
}

/// Pick an owning sales team uniformly from the durable pool, seeding the
/// pool first when it is empty.
pub fn pick_sales_team(conn: &Connection, rng: &mut impl Rng) -> Result<String> {
    let mut ids = list_sales_team_ids(conn)?;
    if ids.is_empty() {
        seed_sales_teams(conn)?;
        ids = list_sales_team_ids(conn)?;
    }
    if ids.is_empty() {
        return Err(MaribelError::Internal(
            "sales team pool empty after seeding".to_string(),
        ));
    }
    let pick = rng.gen_range(0..ids.len());
    Ok(ids.swap_remove(pick))
}
