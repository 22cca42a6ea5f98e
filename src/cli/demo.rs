use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{Datelike, Local, Months};

use crate::db::get_connection;
use crate::error::Result;
use crate::pipeline::{process_batch, BatchRequest};
use crate::settings::load_settings;

const DEMO_CAMPAIGNS: &[(&str, &str)] = &[
    ("DM-100", "Spring Product Launch"),
    ("DM-200", "Trade Show Circuit"),
    ("DM-300", "Holiday Retargeting"),
];

/// One detail row for the demo files. `months_ago` anchors the date near
/// the current month; days stay at 28 or below so every month works.
struct DemoDetail {
    campaign: &'static str,
    title: &'static str,
    kind: &'static str,
    months_ago: u32,
    day: u32,
    amount: f64,
}

const DEMO_DETAILS: &[DemoDetail] = &[
    DemoDetail { campaign: "DM-100", title: "Launch media budget", kind: "budget", months_ago: 3, day: 5, amount: 25000.00 },
    DemoDetail { campaign: "DM-100", title: "Launch event venue", kind: "expense", months_ago: 3, day: 12, amount: 4800.00 },
    DemoDetail { campaign: "DM-100", title: "Influencer fees", kind: "expense", months_ago: 2, day: 18, amount: 2350.75 },
    DemoDetail { campaign: "DM-200", title: "Booth construction", kind: "expense", months_ago: 2, day: 9, amount: 7600.00 },
    DemoDetail { campaign: "DM-200", title: "Quarterly show budget", kind: "budget", months_ago: 1, day: 3, amount: 40000.00 },
    DemoDetail { campaign: "DM-200", title: "Travel and lodging", kind: "expense", months_ago: 1, day: 21, amount: 3120.40 },
    DemoDetail { campaign: "DM-300", title: "Ad platform budget", kind: "budget", months_ago: 0, day: 2, amount: 18000.00 },
    DemoDetail { campaign: "DM-300", title: "Creative refresh", kind: "expense", months_ago: 0, day: 11, amount: 1490.00 },
    DemoDetail { campaign: "DM-300", title: "Audience data license", kind: "expense", months_ago: 0, day: 15, amount: 980.25 },
];

fn campaigns_csv() -> String {
    let mut out = String::from("campaign_number,campaign_title\n");
    for (number, title) in DEMO_CAMPAIGNS {
        let _ = writeln!(out, "{number},{title}");
    }
    out
}

fn details_csv() -> String {
    let today = Local::now().date_naive();
    let mut out = String::from("campaign_number,title,type,date,amount\n");
    for detail in DEMO_DETAILS {
        let target = today - Months::new(detail.months_ago);
        let _ = writeln!(
            out,
            "{},{},{},{:04}-{:02}-{:02},{:.2}",
            detail.campaign,
            detail.title,
            detail.kind,
            target.year(),
            target.month(),
            detail.day,
            detail.amount,
        );
    }
    out
}

pub fn run() -> Result<()> {
    let settings = load_settings();
    let data_dir = PathBuf::from(&settings.data_dir);
    let db_path = data_dir.join("maribel.db");

    if !db_path.exists() {
        eprintln!("No database found. Run `maribel init` first.");
        std::process::exit(1);
    }

    let mut conn = get_connection(&db_path)?;

    // Idempotency guard
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM campaigns WHERE number = ?1)",
        [DEMO_CAMPAIGNS[0].0],
        |r| r.get(0),
    )?;
    if exists {
        println!("Demo data already loaded (campaign '{}' exists).", DEMO_CAMPAIGNS[0].0);
        return Ok(());
    }

    let imports = data_dir.join("imports");
    std::fs::create_dir_all(&imports)?;
    let campaigns_path = imports.join("demo-campaigns.csv");
    let details_path = imports.join("demo-details.csv");
    std::fs::write(&campaigns_path, campaigns_csv())?;
    std::fs::write(&details_path, details_csv())?;

    let request = BatchRequest {
        file_paths: vec![campaigns_path, details_path],
        original_names: vec!["demo-campaigns.csv".to_string(), "demo-details.csv".to_string()],
        created_by: Some("Demo".to_string()),
        separator: ",".to_string(),
    };
    let outcome = process_batch(&mut conn, &request)?;
    if !outcome.success {
        eprintln!("{}", outcome.message);
        std::process::exit(1);
    }

    println!("Demo data loaded!");
    println!("  {}", outcome.message);
    println!();
    println!("Try these next:");
    println!("  maribel campaigns");
    println!("  maribel details expense");
    println!("  maribel teams");
    println!("  maribel export campaign");
    println!("  maribel status");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaigns_csv_shape() {
        let csv = campaigns_csv();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("campaign_number,campaign_title"));
        assert_eq!(lines.count(), DEMO_CAMPAIGNS.len());
        assert!(csv.contains("DM-100,Spring Product Launch"));
    }

    #[test]
    fn test_details_csv_shape() {
        let csv = details_csv();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("campaign_number,title,type,date,amount"));
        assert_eq!(lines.count(), DEMO_DETAILS.len());
        assert!(csv.contains("25000.00"));
        assert!(csv.contains(",budget,"));
        assert!(csv.contains(",expense,"));
    }

    #[test]
    fn test_details_reference_demo_campaigns() {
        let numbers: Vec<&str> = DEMO_CAMPAIGNS.iter().map(|(n, _)| *n).collect();
        for detail in DEMO_DETAILS {
            assert!(numbers.contains(&detail.campaign), "orphan detail: {}", detail.title);
        }
    }
}
