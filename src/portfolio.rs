use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::engine::LoanEvaluation;
use crate::types::LoanStatus;

/// per-status totals for the admin dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusBucket {
    pub loans: u32,
    pub outstanding: Money,
    pub realized_profit: Money,
}

/// portfolio-wide aggregates over evaluated loans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub loan_count: u32,
    pub total_principal: Money,
    pub total_outstanding: Money,
    pub total_projected_profit: Money,
    pub total_realized_profit: Money,
    pub total_profit: Money,
    pub overdue_loans: u32,
    pub overdue_records_required: u32,
    pub by_status: BTreeMap<LoanStatus, StatusBucket>,
}

impl PortfolioSummary {
    pub fn from_evaluations<'a, I>(evaluations: I) -> Self
    where
        I: IntoIterator<Item = &'a LoanEvaluation>,
    {
        let mut summary = PortfolioSummary {
            by_status: LoanStatus::ALL
                .iter()
                .map(|s| (*s, StatusBucket::default()))
                .collect(),
            ..PortfolioSummary::default()
        };

        for eval in evaluations {
            summary.add(eval);
        }

        tracing::debug!(
            loans = summary.loan_count,
            overdue = summary.overdue_loans,
            outstanding = %summary.total_outstanding,
            "portfolio summarized"
        );

        summary
    }

    fn add(&mut self, eval: &LoanEvaluation) {
        self.loan_count += 1;
        self.total_principal += eval.principal;
        self.total_outstanding += eval.outstanding_balance;
        self.total_projected_profit += eval.projected_profit;
        self.total_realized_profit += eval.realized_profit;
        self.total_profit += eval.total_profit;

        if eval.is_overdue() {
            self.overdue_loans += 1;
        }
        if eval.overdue_record_required {
            self.overdue_records_required += 1;
        }

        let bucket = self.by_status.entry(eval.status).or_default();
        bucket.loans += 1;
        bucket.outstanding += eval.outstanding_balance;
        bucket.realized_profit += eval.realized_profit;
    }

    pub fn bucket(&self, status: LoanStatus) -> Option<&StatusBucket> {
        self.by_status.get(&status)
    }

    /// share of loans past due, as a fraction
    pub fn overdue_ratio(&self) -> Decimal {
        if self.loan_count == 0 {
            return Decimal::ZERO;
        }
        Decimal::from(self.overdue_loans) / Decimal::from(self.loan_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::engine::LoanEngine;
    use crate::state::{LoanRecord, PaymentHistory};
    use crate::terms::LoanTerms;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(principal: i64, history: PaymentHistory) -> LoanRecord {
        let terms = LoanTerms::new(
            Money::from_major(principal),
            Rate::from_percentage(10),
            1,
            date(2024, 1, 1),
        );
        LoanRecord::new(terms, history)
    }

    #[test]
    fn test_empty_portfolio() {
        let none: Vec<LoanEvaluation> = Vec::new();
        let summary = PortfolioSummary::from_evaluations(&none);
        assert_eq!(summary.loan_count, 0);
        assert_eq!(summary.overdue_ratio(), Decimal::ZERO);
        assert_eq!(summary.by_status.len(), 4);
        assert_eq!(summary.bucket(LoanStatus::Active).unwrap().loans, 0);
    }

    #[test]
    fn test_mixed_portfolio() {
        let engine = LoanEngine::default();
        let records = vec![
            // active, not yet due
            loan(100_000, PaymentHistory::new()),
            // repaid with 10k interest
            loan(100_000, PaymentHistory::with_payments(Money::from_major(110_000), 1)),
            // past due with 20k unpaid
            loan(200_000, PaymentHistory::with_payments(Money::from_major(200_000), 0)),
        ];

        let mut evaluations = Vec::new();
        for (i, record) in records.iter().enumerate() {
            let on = if i == 2 { date(2024, 3, 1) } else { date(2024, 1, 20) };
            evaluations.push(engine.evaluate_on(record, on).unwrap());
        }

        let summary = PortfolioSummary::from_evaluations(&evaluations);
        assert_eq!(summary.loan_count, 3);
        assert_eq!(summary.total_principal, Money::from_major(400_000));
        assert_eq!(summary.total_outstanding, Money::from_major(130_000));
        assert_eq!(summary.total_projected_profit, Money::from_major(40_000));
        assert_eq!(summary.total_realized_profit, Money::from_major(10_000));
        assert_eq!(summary.overdue_loans, 1);
        assert_eq!(summary.overdue_records_required, 1);
        assert_eq!(summary.overdue_ratio().round_dp(4), dec!(0.3333));

        let closed = summary.bucket(LoanStatus::Closed).unwrap();
        assert_eq!(closed.loans, 1);
        assert_eq!(closed.realized_profit, Money::from_major(10_000));

        let overdue = summary.bucket(LoanStatus::PendingOverdue).unwrap();
        assert_eq!(overdue.outstanding, Money::from_major(20_000));
    }
}
