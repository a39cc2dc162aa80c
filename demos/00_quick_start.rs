/// quick start - price a loan and print its evaluation
use microloan_engine::chrono::NaiveDate;
use microloan_engine::{LoanEngine, LoanRecord, LoanTerms, Money, PaymentHistory, Rate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let engine = LoanEngine::default();

    // 500,000 over 6 months at 12% per month
    let terms = LoanTerms::new(
        Money::from_major(500_000),
        Rate::from_percentage(12),
        6,
        NaiveDate::from_ymd_opt(2024, 3, 1).ok_or("bad date")?,
    );
    let record = LoanRecord::new(terms, PaymentHistory::new());

    let schedule = engine.schedule(&record)?;
    for entry in &schedule.entries {
        println!(
            "#{:<2} {}  payment {:>12}  interest {:>12}  principal {:>12}  balance {:>12}",
            entry.payment_number,
            entry.due_date,
            entry.scheduled_payment.round_currency(),
            entry.interest_portion.round_currency(),
            entry.principal_portion.round_currency(),
            entry.remaining_balance_after.round_currency(),
        );
    }

    let evaluation = engine.evaluate_now(&record)?;
    println!("{}", serde_json::to_string_pretty(&evaluation.to_json()?)?);

    Ok(())
}
