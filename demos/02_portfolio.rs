/// portfolio - dashboard totals over a batch of loans loaded from json
use microloan_engine::chrono::NaiveDate;
use microloan_engine::{LoanEngine, LoanRecord, PortfolioSummary};

const LOANS: &str = r#"[
    {
        "terms": { "principal": "250000", "monthly_interest_rate": "0.15", "term_months": 1, "origination_date": "2024-04-01" },
        "history": { "total_payments_received": "287500", "payments_made": 1 }
    },
    {
        "terms": { "principal": "5000000", "monthly_interest_rate": "0.15", "term_months": 12, "origination_date": "2024-01-10" },
        "history": { "total_payments_received": "1500000" }
    },
    {
        "terms": { "principal": "100000", "monthly_interest_rate": "0.20", "term_months": 2, "origination_date": "2024-01-05" },
        "history": { "total_payments_received": "40000", "has_overdue_records": true }
    },
    {
        "terms": { "principal": "80000", "monthly_interest_rate": "0.17", "term_months": 3, "origination_date": "2024-05-01" }
    }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let engine = LoanEngine::default();
    let records: Vec<LoanRecord> = serde_json::from_str(LOANS)?;
    let today = NaiveDate::from_ymd_opt(2024, 6, 1).ok_or("bad date")?;

    let mut evaluations = Vec::new();
    for (loan_id, result) in engine.evaluate_all(&records, today) {
        match result {
            Ok(evaluation) => evaluations.push(evaluation),
            Err(e) => println!("loan {} skipped: {}", loan_id, e),
        }
    }

    let summary = PortfolioSummary::from_evaluations(&evaluations);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}
