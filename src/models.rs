use chrono::NaiveDateTime;
use uuid::Uuid;

use crate::error::{MaribelError, Result};

// ---------------------------------------------------------------------------
// Entity kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Campaign,
    Expense,
    Budget,
}

impl EntityKind {
    /// Case-insensitive name lookup, the string boundary for callers that
    /// address kinds by name (export, sequence tags).
    pub fn from_name(name: &str) -> Result<Self> {
        match name.trim().to_lowercase().as_str() {
            "campaign" => Ok(Self::Campaign),
            "expense" => Ok(Self::Expense),
            "budget" => Ok(Self::Budget),
            other => Err(MaribelError::UnknownKind(other.to_string())),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Campaign => "Campaign",
            Self::Expense => "Expense",
            Self::Budget => "Budget",
        }
    }

    /// Sequence-number prefix for detail kinds. Campaign numbers come from
    /// the input file, never from the sequence table.
    pub fn number_prefix(&self) -> Option<&'static str> {
        match self {
            Self::Campaign => None,
            Self::Expense => Some("EXP"),
            Self::Budget => Some("BUD"),
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Self::Campaign => "campaigns",
            Self::Expense => "expenses",
            Self::Budget => "budgets",
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle statuses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CampaignStatus {
    Draft,
    Cancelled,
    Confirmed,
    OnProgress,
    OnHold,
    Finished,
    Archived,
}

impl CampaignStatus {
    /// Parse an ordinal ("2") or a case-insensitive name ("confirmed").
    pub fn parse(raw: &str) -> Option<Self> {
        const ALL: &[CampaignStatus] = &[
            CampaignStatus::Draft,
            CampaignStatus::Cancelled,
            CampaignStatus::Confirmed,
            CampaignStatus::OnProgress,
            CampaignStatus::OnHold,
            CampaignStatus::Finished,
            CampaignStatus::Archived,
        ];
        parse_status(raw, ALL, |s| s.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Cancelled => "Cancelled",
            Self::Confirmed => "Confirmed",
            Self::OnProgress => "OnProgress",
            Self::OnHold => "OnHold",
            Self::Finished => "Finished",
            Self::Archived => "Archived",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseStatus {
    Draft,
    Cancelled,
    Confirmed,
    Archived,
}

impl ExpenseStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        const ALL: &[ExpenseStatus] = &[
            ExpenseStatus::Draft,
            ExpenseStatus::Cancelled,
            ExpenseStatus::Confirmed,
            ExpenseStatus::Archived,
        ];
        parse_status(raw, ALL, |s| s.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Cancelled => "Cancelled",
            Self::Confirmed => "Confirmed",
            Self::Archived => "Archived",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    Draft,
    Cancelled,
    Confirmed,
    Archived,
}

impl BudgetStatus {
    pub fn parse(raw: &str) -> Option<Self> {
        const ALL: &[BudgetStatus] = &[
            BudgetStatus::Draft,
            BudgetStatus::Cancelled,
            BudgetStatus::Confirmed,
            BudgetStatus::Archived,
        ];
        parse_status(raw, ALL, |s| s.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Cancelled => "Cancelled",
            Self::Confirmed => "Confirmed",
            Self::Archived => "Archived",
        }
    }
}

/// Shared ordinal-then-name lookup. Variant order is the ordinal order, so
/// `"2"` and `"confirmed"` resolve to the same status.
fn parse_status<T: Copy>(raw: &str, all: &[T], name: impl Fn(&T) -> &'static str) -> Option<T> {
    let raw = raw.trim();
    if let Ok(ordinal) = raw.parse::<i64>() {
        return usize::try_from(ordinal).ok().and_then(|i| all.get(i)).copied();
    }
    all.iter().find(|s| name(s).eq_ignore_ascii_case(raw)).copied()
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Campaign {
    pub id: String,
    pub number: String,
    pub title: String,
    pub description: Option<String>,
    pub target_revenue_amount: Option<f64>,
    pub sales_team_id: Option<String>,
    pub date_start: Option<NaiveDateTime>,
    pub date_finish: Option<NaiveDateTime>,
    pub status: Option<CampaignStatus>,
    pub created_by: Option<String>,
}

impl Campaign {
    /// Fresh entity with a provisional key; the key becomes the durable id
    /// on commit, which is what lets same-batch details reference it.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            number: String::new(),
            title: String::new(),
            description: None,
            target_revenue_amount: None,
            sales_team_id: None,
            date_start: None,
            date_finish: None,
            status: None,
            created_by: None,
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Expense {
    pub id: String,
    pub number: String,
    pub campaign_id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub date: Option<NaiveDateTime>,
    pub status: Option<ExpenseStatus>,
    pub created_by: Option<String>,
}

impl Expense {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            number: String::new(),
            campaign_id: String::new(),
            title: String::new(),
            description: None,
            amount: 0.0,
            date: None,
            status: None,
            created_by: None,
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct Budget {
    pub id: String,
    pub number: String,
    pub campaign_id: String,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub date: Option<NaiveDateTime>,
    pub status: Option<BudgetStatus>,
    pub created_by: Option<String>,
}

impl Budget {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            number: String::new(),
            campaign_id: String::new(),
            title: String::new(),
            description: None,
            amount: 0.0,
            date: None,
            status: None,
            created_by: None,
        }
    }
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct SalesTeam {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Intermediate records
// ---------------------------------------------------------------------------

/// Pre-entity shape for one campaign-file row. All values raw strings.
#[derive(Debug, Clone)]
pub struct CampaignRecord {
    pub number: String,
    pub title: String,
    pub source_file: String,
    pub line: usize,
}

impl CampaignRecord {
    pub fn fields(&self) -> [(&'static str, &str); 2] {
        [("number", &self.number), ("title", &self.title)]
    }
}

/// Pre-entity shape for one detail-file row. `kind` holds the raw `type`
/// column and routes the row to Expense or Budget.
#[derive(Debug, Clone)]
pub struct DetailRecord {
    pub campaign_number: String,
    pub title: String,
    pub kind: String,
    pub date: String,
    pub amount: String,
    pub source_file: String,
    pub line: usize,
}

impl DetailRecord {
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("campaignnumber", &self.campaign_number),
            ("title", &self.title),
            ("type", &self.kind),
            ("amount", &self.amount),
            ("date", &self.date),
        ]
    }
}
