use chrono::{Local, Months, NaiveDateTime};
use rand::Rng;
use rusqlite::Connection;

use crate::coerce::{coerce, FieldType, FieldValue};
use crate::db::find_campaign_ids_by_number;
use crate::error::{MaribelError, Result};
use crate::models::{Budget, Campaign, CampaignRecord, DetailRecord, EntityKind, Expense};
use crate::sequence::next_number;
use crate::synth;

// ---------------------------------------------------------------------------
// Field tables
// ---------------------------------------------------------------------------

/// CSV-facing fields per entity shape: canonical name, target type, and
/// whether a blank value fails the row. Record fields with no table entry
/// are ignored.
struct FieldSpec {
    name: &'static str,
    ty: FieldType,
    required: bool,
}

const CAMPAIGN_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "number", ty: FieldType::Text, required: true },
    FieldSpec { name: "title", ty: FieldType::Text, required: true },
];

const DETAIL_FIELDS: &[FieldSpec] = &[
    FieldSpec { name: "title", ty: FieldType::Text, required: true },
    FieldSpec { name: "amount", ty: FieldType::Float, required: true },
    FieldSpec { name: "date", ty: FieldType::DateTime, required: true },
];

fn field_spec(table: &'static [FieldSpec], name: &str) -> Option<&'static FieldSpec> {
    table.iter().find(|spec| spec.name == name)
}

fn field_format(field: &str, source: MaribelError) -> MaribelError {
    MaribelError::FieldFormat {
        field: field.to_string(),
        source: Box::new(source),
    }
}

// ---------------------------------------------------------------------------
// Batch accumulator
// ---------------------------------------------------------------------------

/// Entities built for one batch. Owned by a single request and dropped with
/// it, so nothing leaks across batches.
#[derive(Debug, Default)]
pub struct EntityBatch {
    pub campaigns: Vec<Campaign>,
    pub expenses: Vec<Expense>,
    pub budgets: Vec<Budget>,
}

// ---------------------------------------------------------------------------
// Campaign building
// ---------------------------------------------------------------------------

pub fn build_campaign(
    conn: &Connection,
    record: &CampaignRecord,
    batch: &mut EntityBatch,
    rng: &mut impl Rng,
) -> Result<()> {
    let mut campaign = Campaign::new();

    for (name, raw) in record.fields() {
        let Some(spec) = field_spec(CAMPAIGN_FIELDS, name) else {
            continue;
        };
        if raw.trim().is_empty() {
            if spec.required {
                return Err(MaribelError::MissingField(name.to_string()));
            }
            continue;
        }
        let value = coerce(raw, spec.ty).map_err(|e| field_format(name, e))?;
        apply_campaign_field(&mut campaign, name, value);
    }

    // A second campaign with the same number would make detail resolution
    // ambiguous within the batch.
    if batch.campaigns.iter().any(|c| c.number.eq_ignore_ascii_case(&campaign.number)) {
        return Err(MaribelError::DuplicateNumber(campaign.number));
    }

    if campaign.description.is_none() {
        campaign.description =
            Some(synth::description_for(EntityKind::Campaign, &campaign.title));
    }
    if campaign.target_revenue_amount.is_none() {
        campaign.target_revenue_amount = Some(synth::target_revenue(rng));
    }
    if campaign.sales_team_id.is_none() {
        campaign.sales_team_id = Some(synth::pick_sales_team(conn, rng)?);
    }
    if campaign.date_start.is_none() {
        let now = Local::now().naive_local();
        campaign.date_start = Some(synth::random_date_between(now - Months::new(6), now, rng));
    }
    if campaign.date_finish.is_none() {
        campaign.date_finish = campaign.date_start.map(|start| start + Months::new(2));
    }
    if campaign.status.is_none() {
        campaign.status = Some(synth::campaign_status(rng));
    }

    batch.campaigns.push(campaign);
    Ok(())
}

fn apply_campaign_field(campaign: &mut Campaign, name: &str, value: FieldValue) {
    match name {
        "number" => {
            if let Some(v) = value.into_text() {
                campaign.number = v;
            }
        }
        "title" => {
            if let Some(v) = value.into_text() {
                campaign.title = v;
            }
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Detail building
// ---------------------------------------------------------------------------

pub fn build_detail(
    conn: &Connection,
    record: &DetailRecord,
    batch: &mut EntityBatch,
    rng: &mut impl Rng,
) -> Result<()> {
    let kind = detail_kind(&record.kind)?;

    if record.campaign_number.trim().is_empty() {
        return Err(MaribelError::MissingField("campaignnumber".to_string()));
    }
    let campaign_id = resolve_campaign_id(conn, batch, &record.campaign_number)?;

    let values = coerce_detail_values(record)?;
    if values.amount <= 0.0 {
        return Err(MaribelError::InvalidAmount {
            field: "amount".to_string(),
            value: values.amount.to_string(),
        });
    }

    let prefix = kind.number_prefix().ok_or_else(|| {
        MaribelError::Internal("detail kind without a sequence prefix".to_string())
    })?;
    let number = next_number(conn, kind.label(), prefix)?;

    match kind {
        EntityKind::Expense => {
            let mut expense = Expense::new();
            expense.number = number;
            expense.campaign_id = campaign_id;
            expense.title = values.title;
            expense.description = Some(synth::description_for(kind, &expense.title));
            expense.amount = values.amount;
            expense.date = values.date;
            expense.status = Some(synth::expense_status(rng));
            batch.expenses.push(expense);
        }
        EntityKind::Budget => {
            let mut budget = Budget::new();
            budget.number = number;
            budget.campaign_id = campaign_id;
            budget.title = values.title;
            budget.description = Some(synth::description_for(kind, &budget.title));
            budget.amount = values.amount;
            budget.date = values.date;
            budget.status = Some(synth::budget_status(rng));
            batch.budgets.push(budget);
        }
        EntityKind::Campaign => {
            return Err(MaribelError::Internal(
                "campaign record routed through detail building".to_string(),
            ));
        }
    }

    Ok(())
}

fn detail_kind(raw: &str) -> Result<EntityKind> {
    match raw.trim().to_lowercase().as_str() {
        "expense" => Ok(EntityKind::Expense),
        "budget" => Ok(EntityKind::Budget),
        other => Err(MaribelError::UnknownType(other.to_string())),
    }
}

/// Durable-first resolution: a stored campaign with this number wins over
/// one built earlier in the same batch.
fn resolve_campaign_id(conn: &Connection, batch: &EntityBatch, number: &str) -> Result<String> {
    let number = number.trim();
    let durable = find_campaign_ids_by_number(conn, number)?;
    if let Some(id) = durable.into_iter().next() {
        return Ok(id);
    }
    batch
        .campaigns
        .iter()
        .find(|c| c.number.eq_ignore_ascii_case(number))
        .map(|c| c.id.clone())
        .ok_or_else(|| MaribelError::UnknownReference(number.to_string()))
}

struct DetailValues {
    title: String,
    amount: f64,
    date: Option<NaiveDateTime>,
}

fn coerce_detail_values(record: &DetailRecord) -> Result<DetailValues> {
    let mut values = DetailValues { title: String::new(), amount: 0.0, date: None };

    for (name, raw) in record.fields() {
        let Some(spec) = field_spec(DETAIL_FIELDS, name) else {
            continue;
        };
        if raw.trim().is_empty() {
            if spec.required {
                return Err(MaribelError::MissingField(name.to_string()));
            }
            continue;
        }
        let value = match coerce(raw, spec.ty) {
            Ok(v) => v,
            Err(MaribelError::OutOfRange(v)) if name == "amount" => {
                return Err(MaribelError::InvalidAmount {
                    field: "amount".to_string(),
                    value: v,
                });
            }
            Err(e) => return Err(field_format(name, e)),
        };
        match name {
            "title" => {
                if let Some(v) = value.into_text() {
                    values.title = v;
                }
            }
            "amount" => {
                if let Some(v) = value.into_float() {
                    values.amount = v;
                }
            }
            "date" => values.date = value.into_datetime(),
            _ => {}
        }
    }

    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{get_connection, init_db};
    use crate::models::CampaignStatus;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    fn campaign_record(number: &str, title: &str) -> CampaignRecord {
        CampaignRecord {
            number: number.to_string(),
            title: title.to_string(),
            source_file: "campaigns.csv".to_string(),
            line: 2,
        }
    }

    fn detail_record(campaign_number: &str, kind: &str, amount: &str, date: &str) -> DetailRecord {
        DetailRecord {
            campaign_number: campaign_number.to_string(),
            title: "Trade Show Booth".to_string(),
            kind: kind.to_string(),
            date: date.to_string(),
            amount: amount.to_string(),
            source_file: "details.csv".to_string(),
            line: 2,
        }
    }

    fn insert_campaign_row(conn: &Connection, id: &str, number: &str) {
        conn.execute(
            "INSERT INTO campaigns (id, number, title) VALUES (?1, ?2, 'Stored')",
            [id, number],
        )
        .unwrap();
    }

    #[test]
    fn test_build_campaign_fills_missing_fields() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();

        build_campaign(&conn, &campaign_record("C100", "Spring Push"), &mut batch, &mut rng())
            .unwrap();

        let campaign = &batch.campaigns[0];
        assert_eq!(campaign.number, "C100");
        assert_eq!(campaign.title, "Spring Push");
        assert_eq!(
            campaign.description.as_deref(),
            Some("Campaign Description for Spring Push")
        );
        let revenue = campaign.target_revenue_amount.unwrap();
        assert!((10_000.0..=900_000.0).contains(&revenue));
        assert_eq!(revenue % 10_000.0, 0.0);
        assert!(campaign.sales_team_id.is_some());
        assert_eq!(campaign.status, Some(CampaignStatus::Confirmed));
    }

    #[test]
    fn test_build_campaign_finish_follows_start_by_two_months() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();

        build_campaign(&conn, &campaign_record("C100", "Spring Push"), &mut batch, &mut rng())
            .unwrap();

        let campaign = &batch.campaigns[0];
        let start = campaign.date_start.unwrap();
        assert_eq!(campaign.date_finish, Some(start + Months::new(2)));
        let now = Local::now().naive_local();
        assert!(start <= now);
        assert!(start >= now - Months::new(6));
    }

    #[test]
    fn test_build_campaign_rejects_blank_number() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();

        let err = build_campaign(&conn, &campaign_record("  ", "Spring Push"), &mut batch, &mut rng())
            .unwrap_err();
        assert!(matches!(err, MaribelError::MissingField(f) if f == "number"));
    }

    #[test]
    fn test_build_campaign_rejects_blank_title() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();

        let err = build_campaign(&conn, &campaign_record("C100", ""), &mut batch, &mut rng())
            .unwrap_err();
        assert!(matches!(err, MaribelError::MissingField(f) if f == "title"));
    }

    #[test]
    fn test_build_campaign_rejects_duplicate_number_in_batch() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();
        let mut rng = rng();

        build_campaign(&conn, &campaign_record("C100", "First"), &mut batch, &mut rng).unwrap();
        let err = build_campaign(&conn, &campaign_record("c100", "Second"), &mut batch, &mut rng)
            .unwrap_err();

        assert!(matches!(err, MaribelError::DuplicateNumber(n) if n == "c100"));
        assert_eq!(batch.campaigns.len(), 1);
    }

    #[test]
    fn test_build_detail_expense() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();
        insert_campaign_row(&conn, "camp-1", "C100");

        build_detail(
            &conn,
            &detail_record("C100", "expense", "1500.00", "2024-03-01"),
            &mut batch,
            &mut rng(),
        )
        .unwrap();

        let expense = &batch.expenses[0];
        assert_eq!(expense.number, "EXP-000001");
        assert_eq!(expense.campaign_id, "camp-1");
        assert_eq!(expense.amount, 1500.0);
        assert_eq!(
            expense.date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(
            expense.description.as_deref(),
            Some("Expense Description for Trade Show Booth")
        );
        assert!(expense.status.is_some());
        assert!(batch.budgets.is_empty());
    }

    #[test]
    fn test_build_detail_budget() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();
        insert_campaign_row(&conn, "camp-1", "C100");

        build_detail(
            &conn,
            &detail_record("C100", "Budget", "9000", "2024-03-01"),
            &mut batch,
            &mut rng(),
        )
        .unwrap();

        let budget = &batch.budgets[0];
        assert_eq!(budget.number, "BUD-000001");
        assert_eq!(budget.campaign_id, "camp-1");
        assert!(batch.expenses.is_empty());
    }

    #[test]
    fn test_build_detail_unknown_type() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();

        let err = build_detail(
            &conn,
            &detail_record("C100", "invoice", "10", "2024-03-01"),
            &mut batch,
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, MaribelError::UnknownType(t) if t == "invoice"));
    }

    #[test]
    fn test_build_detail_unknown_campaign() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();

        let err = build_detail(
            &conn,
            &detail_record("C999", "expense", "10", "2024-03-01"),
            &mut batch,
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, MaribelError::UnknownReference(n) if n == "C999"));
    }

    #[test]
    fn test_build_detail_blank_campaign_number() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();

        let err = build_detail(
            &conn,
            &detail_record("  ", "expense", "10", "2024-03-01"),
            &mut batch,
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, MaribelError::MissingField(f) if f == "campaignnumber"));
    }

    #[test]
    fn test_resolve_prefers_stored_campaign_over_batch() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();
        insert_campaign_row(&conn, "durable-id", "C100");
        build_campaign(&conn, &campaign_record("C100", "In Batch"), &mut batch, &mut rng())
            .unwrap();

        let id = resolve_campaign_id(&conn, &batch, "C100").unwrap();
        assert_eq!(id, "durable-id");
    }

    #[test]
    fn test_resolve_matches_batch_case_insensitively() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();
        build_campaign(&conn, &campaign_record("C100", "In Batch"), &mut batch, &mut rng())
            .unwrap();

        let id = resolve_campaign_id(&conn, &batch, "c100").unwrap();
        assert_eq!(id, batch.campaigns[0].id);
    }

    #[test]
    fn test_build_detail_rejects_zero_amount() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();
        insert_campaign_row(&conn, "camp-1", "C100");

        let err = build_detail(
            &conn,
            &detail_record("C100", "expense", "0", "2024-03-01"),
            &mut batch,
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, MaribelError::InvalidAmount { field, .. } if field == "amount"));
    }

    #[test]
    fn test_build_detail_rejects_negative_amount() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();
        insert_campaign_row(&conn, "camp-1", "C100");

        let err = build_detail(
            &conn,
            &detail_record("C100", "expense", "-5", "2024-03-01"),
            &mut batch,
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, MaribelError::InvalidAmount { field, .. } if field == "amount"));
    }

    #[test]
    fn test_build_detail_rejects_unparseable_amount() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();
        insert_campaign_row(&conn, "camp-1", "C100");

        let err = build_detail(
            &conn,
            &detail_record("C100", "expense", "abc", "2024-03-01"),
            &mut batch,
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, MaribelError::FieldFormat { field, .. } if field == "amount"));
    }

    #[test]
    fn test_build_detail_rejects_unparseable_date() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();
        insert_campaign_row(&conn, "camp-1", "C100");

        let err = build_detail(
            &conn,
            &detail_record("C100", "expense", "10", "next tuesday"),
            &mut batch,
            &mut rng(),
        )
        .unwrap_err();
        assert!(matches!(err, MaribelError::FieldFormat { field, .. } if field == "date"));
    }

    #[test]
    fn test_build_detail_accepts_grouped_decimal_amount() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();
        insert_campaign_row(&conn, "camp-1", "C100");

        build_detail(
            &conn,
            &detail_record("C100", "expense", "1 234,56", "2024-03-01"),
            &mut batch,
            &mut rng(),
        )
        .unwrap();
        assert_eq!(batch.expenses[0].amount, 1234.56);
    }

    #[test]
    fn test_detail_numbers_increment_across_builds() {
        let (_dir, conn) = test_db();
        let mut batch = EntityBatch::default();
        let mut rng = rng();
        insert_campaign_row(&conn, "camp-1", "C100");

        for _ in 0..2 {
            build_detail(
                &conn,
                &detail_record("C100", "expense", "10", "2024-03-01"),
                &mut batch,
                &mut rng,
            )
            .unwrap();
        }
        build_detail(
            &conn,
            &detail_record("C100", "budget", "10", "2024-03-01"),
            &mut batch,
            &mut rng,
        )
        .unwrap();

        assert_eq!(batch.expenses[0].number, "EXP-000001");
        assert_eq!(batch.expenses[1].number, "EXP-000002");
        assert_eq!(batch.budgets[0].number, "BUD-000001");
    }
}
