use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use rand::Rng;
use rusqlite::{params, Connection};

use crate::builder::{build_campaign, build_detail, EntityBatch};
use crate::error::{MaribelError, Result};
use crate::models::{Budget, Campaign, CampaignRecord, DetailRecord, Expense};
use crate::parser::{order_files, parse_file};

// ---------------------------------------------------------------------------
// Request and outcome
// ---------------------------------------------------------------------------

/// One ingestion call. `original_names` carries the caller-facing display
/// name for each path, in the same order, so errors cite the name the user
/// recognizes rather than a temp path.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub file_paths: Vec<PathBuf>,
    pub original_names: Vec<String>,
    pub created_by: Option<String>,
    pub separator: String,
}

#[derive(Debug)]
pub struct BatchOutcome {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct BatchCounts {
    pub campaigns: usize,
    pub expenses: usize,
    pub budgets: usize,
}

// ---------------------------------------------------------------------------
// Caller-facing operation
// ---------------------------------------------------------------------------

/// Runs a whole batch inside one transaction and reports the outcome as a
/// message instead of an error. Validation failures of any kind come back
/// as `success: false`; only internal inconsistencies and storage failures
/// propagate.
pub fn process_batch(conn: &mut Connection, request: &BatchRequest) -> Result<BatchOutcome> {
    let mut rng = rand::thread_rng();
    process_batch_with(conn, request, &mut rng)
}

pub fn process_batch_with(
    conn: &mut Connection,
    request: &BatchRequest,
    rng: &mut impl Rng,
) -> Result<BatchOutcome> {
    let tx = conn.transaction()?;
    match run_batch(&tx, request, rng) {
        Ok(counts) => {
            tx.commit()?;
            Ok(BatchOutcome {
                success: true,
                message: format!(
                    "Loaded {} campaigns, {} expenses, {} budgets",
                    counts.campaigns, counts.expenses, counts.budgets
                ),
            })
        }
        Err(e) => {
            tx.rollback()?;
            if matches!(e, MaribelError::Internal(_)) {
                return Err(e);
            }
            Ok(BatchOutcome { success: false, message: format!("Error: {e}") })
        }
    }
}

// ---------------------------------------------------------------------------
// Batch pipeline
// ---------------------------------------------------------------------------

/// Order, parse, build, persist. Caller owns the transaction; everything
/// here, sequence numbers included, rolls back with it.
pub fn run_batch(
    conn: &Connection,
    request: &BatchRequest,
    rng: &mut impl Rng,
) -> Result<BatchCounts> {
    let separator = parse_separator(&request.separator)?;
    if request.file_paths.len() != request.original_names.len() {
        return Err(MaribelError::Internal(
            "file path and display name counts differ".to_string(),
        ));
    }

    let ordered = order_files(&request.file_paths, separator)?;
    if ordered.is_empty() {
        return Err(MaribelError::FileListEmpty);
    }

    let mut campaign_records: Vec<CampaignRecord> = Vec::new();
    let mut detail_records: Vec<DetailRecord> = Vec::new();
    for path in &ordered {
        let name = display_name_for(request, path)?;
        let parsed = parse_file(path, name, separator)?;
        campaign_records.extend(parsed.campaigns);
        detail_records.extend(parsed.details);
    }

    // Every campaign across every file is built before the first detail,
    // so a detail may reference a campaign from any file in the batch.
    let mut batch = EntityBatch::default();
    for record in &campaign_records {
        build_campaign(conn, record, &mut batch, rng)
            .map_err(|e| record_error(&record.source_file, record.line, e))?;
    }
    for record in &detail_records {
        build_detail(conn, record, &mut batch, rng)
            .map_err(|e| record_error(&record.source_file, record.line, e))?;
    }

    stamp_creator(&mut batch, request.created_by.as_deref());
    insert_batch(conn, &batch)?;

    Ok(BatchCounts {
        campaigns: batch.campaigns.len(),
        expenses: batch.expenses.len(),
        budgets: batch.budgets.len(),
    })
}

pub fn parse_separator(raw: &str) -> Result<char> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c),
        _ => Err(MaribelError::Separator(raw.to_string())),
    }
}

fn display_name_for<'a>(request: &'a BatchRequest, path: &Path) -> Result<&'a str> {
    request
        .file_paths
        .iter()
        .position(|p| p == path)
        .and_then(|i| request.original_names.get(i))
        .map(String::as_str)
        .ok_or_else(|| {
            MaribelError::Internal(format!("no display name for {}", path.display()))
        })
}

fn record_error(file: &str, line: usize, source: MaribelError) -> MaribelError {
    // Record context is for data errors; internal failures keep their shape
    // so the outcome boundary can tell them apart.
    if matches!(source, MaribelError::Internal(_)) {
        return source;
    }
    MaribelError::Record {
        file: file.to_string(),
        line,
        source: Box::new(source),
    }
}

fn stamp_creator(batch: &mut EntityBatch, created_by: Option<&str>) {
    let creator = created_by.map(str::to_string);
    for campaign in &mut batch.campaigns {
        campaign.created_by = creator.clone();
    }
    for expense in &mut batch.expenses {
        expense.created_by = creator.clone();
    }
    for budget in &mut batch.budgets {
        budget.created_by = creator.clone();
    }
}

// ---------------------------------------------------------------------------
// Persistence
// ---------------------------------------------------------------------------

fn insert_batch(conn: &Connection, batch: &EntityBatch) -> Result<()> {
    for campaign in &batch.campaigns {
        insert_campaign(conn, campaign)?;
    }
    for budget in &batch.budgets {
        insert_budget(conn, budget)?;
    }
    for expense in &batch.expenses {
        insert_expense(conn, expense)?;
    }
    Ok(())
}

fn insert_campaign(conn: &Connection, campaign: &Campaign) -> Result<()> {
    conn.execute(
        "INSERT INTO campaigns (id, number, title, description, target_revenue_amount,
             sales_team_id, date_start, date_finish, status, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            campaign.id,
            campaign.number,
            campaign.title,
            campaign.description,
            campaign.target_revenue_amount,
            campaign.sales_team_id,
            datetime_text(campaign.date_start),
            datetime_text(campaign.date_finish),
            campaign.status.map(|s| s.as_str()),
            campaign.created_by,
        ],
    )?;
    Ok(())
}

fn insert_expense(conn: &Connection, expense: &Expense) -> Result<()> {
    conn.execute(
        "INSERT INTO expenses (id, number, campaign_id, title, description, amount,
             expense_date, status, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            expense.id,
            expense.number,
            expense.campaign_id,
            expense.title,
            expense.description,
            expense.amount,
            datetime_text(expense.date),
            expense.status.map(|s| s.as_str()),
            expense.created_by,
        ],
    )?;
    Ok(())
}

fn insert_budget(conn: &Connection, budget: &Budget) -> Result<()> {
    conn.execute(
        "INSERT INTO budgets (id, number, campaign_id, title, description, amount,
             budget_date, status, created_by)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            budget.id,
            budget.number,
            budget.campaign_id,
            budget.title,
            budget.description,
            budget.amount,
            datetime_text(budget.date),
            budget.status.map(|s| s.as_str()),
            budget.created_by,
        ],
    )?;
    Ok(())
}

fn datetime_text(value: Option<NaiveDateTime>) -> Option<String> {
    value.map(|v| v.format("%Y-%m-%d %H:%M:%S").to_string())
}
