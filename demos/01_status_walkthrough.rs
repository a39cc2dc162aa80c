/// status walkthrough - follow one loan through its lifecycle with controlled time
use chrono::{Duration, TimeZone, Utc};
use microloan_engine::chrono::NaiveDate;
use microloan_engine::{
    LoanEngine, LoanRecord, LoanTerms, Money, PaymentHistory, Rate, SafeTimeProvider, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    println!("=== status walkthrough ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
    ));
    let controller = time.test_control().unwrap();
    let engine = LoanEngine::default();

    let terms = LoanTerms::new(
        Money::from_major(250_000),
        Rate::from_percentage(15),
        1,
        NaiveDate::from_ymd_opt(2024, 1, 15).ok_or("bad date")?,
    );
    let mut record = LoanRecord::new(terms, PaymentHistory::new());

    // 1. freshly disbursed
    let eval = engine.evaluate(&record, &time)?;
    println!("1. disbursed: {} owes {}", eval.status, eval.outstanding_balance);

    // 2. one month and five days later, nothing paid
    controller.advance(Duration::days(36));
    let eval = engine.evaluate(&record, &time)?;
    println!(
        "2. {}: {} days overdue, {} cycles, open overdue record: {}",
        eval.status,
        eval.days_overdue,
        eval.overdue_cycles.len(),
        eval.overdue_record_required
    );

    // the persistence layer opens the record and a partial payment arrives
    record.history = PaymentHistory::with_payments(Money::from_major(200_000), 0)
        .with_overdue_records(true);
    let eval = engine.evaluate(&record, &time)?;
    println!("3. partial payment: {} owes {}", eval.status, eval.outstanding_balance);

    // 4. paid in full but the overdue record is still open: no profit yet
    controller.advance(Duration::days(10));
    record.history = PaymentHistory::with_payments(Money::from_major(287_500), 1)
        .with_overdue_records(true);
    let eval = engine.evaluate(&record, &time)?;
    println!(
        "4. paid, record open: {} realized profit {} warnings {:?}",
        eval.status, eval.realized_profit, eval.warnings
    );

    // 5. record closed
    record.history.has_overdue_records = false;
    let eval = engine.evaluate(&record, &time)?;
    println!(
        "5. closed: {} realized profit {} total profit {}",
        eval.status, eval.realized_profit, eval.total_profit
    );

    Ok(())
}
