use chrono::NaiveDate;

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::payments::amortization::{AmortizationCalculator, AmortizationSchedule};
use crate::state::PaymentHistory;
use crate::terms::{validate_amounts, LoanTerms};
use crate::types::LoanStatus;
use crate::warnings::Warning;

/// derives outstanding balances from terms and repayment aggregates
#[derive(Debug, Clone)]
pub struct BalanceProjector {
    calculator: AmortizationCalculator,
    tolerance: Money,
}

impl BalanceProjector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            calculator: AmortizationCalculator::new(config),
            tolerance: config.balance_tolerance,
        }
    }

    /// schedule balance after `payments_made` installments
    pub fn outstanding_balance(&self, terms: &LoanTerms, payments_made: u32) -> Result<Money> {
        validate_amounts(terms.principal, terms.monthly_interest_rate, terms.term_months)?;
        self.calculator.check_term(terms.term_months)?;

        if payments_made == 0 {
            return Ok(terms.principal);
        }
        if payments_made >= terms.term_months {
            return Ok(Money::ZERO);
        }

        let schedule = self.calculator.schedule(terms)?;
        Ok(schedule.balance_after(payments_made))
    }

    /// balance when only payment totals are known; closed loans owe nothing
    pub fn outstanding_from_ledger(
        &self,
        principal: Money,
        projected_profit: Money,
        total_payments_received: Money,
        status: LoanStatus,
    ) -> Money {
        match status {
            LoanStatus::Closed => Money::ZERO,
            LoanStatus::Active | LoanStatus::Defaulted | LoanStatus::PendingOverdue => {
                (principal + projected_profit - total_payments_received).non_negative()
            }
        }
    }

    /// principal not yet repaid according to the history
    pub fn principal_remaining(&self, terms: &LoanTerms, history: &PaymentHistory) -> Money {
        (terms.principal - history.principal_paid).non_negative()
    }

    /// scheduled balance once every installment due on or before `date` is paid
    pub fn scheduled_balance_on(&self, schedule: &AmortizationSchedule, date: NaiveDate) -> Money {
        schedule.balance_after(schedule.installments_due_by(date))
    }

    /// compare the ledger derivation with a replay of the schedule
    ///
    /// The ledger's interest term is the interest fallen due over the installments
    /// paid, so a history that follows the schedule reproduces the replayed balance.
    pub fn reconcile(
        &self,
        schedule: &AmortizationSchedule,
        history: &PaymentHistory,
    ) -> Option<Warning> {
        let k = history.payments_made.min(schedule.term_months);
        let replayed = schedule.balance_after(k);
        let from_ledger = self.outstanding_from_ledger(
            schedule.principal,
            schedule.interest_through(k),
            history.total_payments_received,
            LoanStatus::Active,
        );

        if replayed.approx_eq(from_ledger, self.tolerance) {
            return None;
        }

        Some(Warning::inconsistent(format!(
            "ledger balance {} diverges from scheduled balance {} after {} payments",
            from_ledger.round_currency(),
            replayed.round_currency(),
            k
        )))
    }
}

impl Default for BalanceProjector {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;
    use crate::errors::LoanError;
    use crate::interest::ProfitLedger;
    use rust_decimal_macros::dec;

    fn terms(principal: i64, pct: u32, months: u32) -> LoanTerms {
        LoanTerms::new(
            Money::from_major(principal),
            Rate::from_percentage(pct),
            months,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        )
    }

    #[test]
    fn test_outstanding_bounds() {
        let projector = BalanceProjector::default();
        let t = terms(100_000, 12, 12);

        assert_eq!(projector.outstanding_balance(&t, 0).unwrap(), t.principal);
        assert_eq!(projector.outstanding_balance(&t, 12).unwrap(), Money::ZERO);
        assert_eq!(projector.outstanding_balance(&t, 40).unwrap(), Money::ZERO);
    }

    #[test]
    fn test_outstanding_is_non_increasing() {
        let projector = BalanceProjector::default();
        for t in [terms(100_000, 12, 12), terms(75_000, 20, 60), terms(3_000, 0, 5)] {
            let mut previous = projector.outstanding_balance(&t, 0).unwrap();
            for k in 1..=t.term_months {
                let current = projector.outstanding_balance(&t, k).unwrap();
                assert!(current <= previous, "balance rose at payment {k}");
                previous = current;
            }
        }
    }

    #[test]
    fn test_outstanding_propagates_invalid_terms() {
        let projector = BalanceProjector::default();
        let mut t = terms(100_000, 12, 12);
        t.principal = Money::ZERO;
        assert!(projector.outstanding_balance(&t, 3).is_err());
    }

    #[test]
    fn test_outstanding_rejects_invalid_terms_at_boundaries() {
        let projector = BalanceProjector::default();

        let mut negative = terms(1_000, 12, 12);
        negative.principal = Money::from_major(-5_000);
        assert!(matches!(
            projector.outstanding_balance(&negative, 0),
            Err(LoanError::InvalidPrincipal { .. })
        ));
        assert!(projector.outstanding_balance(&negative, 12).is_err());

        let mut no_term = terms(1_000, 12, 12);
        no_term.term_months = 0;
        assert!(projector.outstanding_balance(&no_term, 0).unwrap_err().is_invalid_terms());
        assert!(projector.outstanding_balance(&no_term, 5).unwrap_err().is_invalid_terms());

        let mut bad_rate = terms(1_000, 12, 12);
        bad_rate.monthly_interest_rate = Rate::from_decimal(dec!(1.5));
        assert!(matches!(
            projector.outstanding_balance(&bad_rate, 0),
            Err(LoanError::InvalidRate { .. })
        ));

        let too_long = terms(1_000, 12, 72);
        assert!(projector.outstanding_balance(&too_long, 72).unwrap_err().is_invalid_terms());
    }

    #[test]
    fn test_ledger_derivation() {
        let projector = BalanceProjector::default();
        let principal = Money::from_major(250_000);
        let profit = Money::from_major(37_500);

        assert_eq!(
            projector.outstanding_from_ledger(principal, profit, Money::ZERO, LoanStatus::Active),
            Money::from_major(287_500)
        );
        assert_eq!(
            projector.outstanding_from_ledger(principal, profit, Money::from_major(300_000), LoanStatus::Active),
            Money::ZERO
        );
        // closed status is authoritative even when arithmetic says otherwise
        assert_eq!(
            projector.outstanding_from_ledger(principal, profit, Money::from_major(1_000), LoanStatus::Closed),
            Money::ZERO
        );
    }

    #[test]
    fn test_derivations_agree_for_scheduled_history() {
        let projector = BalanceProjector::default();
        let calc = AmortizationCalculator::default();

        for t in [terms(100_000, 12, 12), terms(5_000_000, 15, 12), terms(40_000, 10, 24)] {
            let schedule = calc.schedule(&t).unwrap();
            for k in 0..=t.term_months {
                let history = PaymentHistory::with_payments(schedule.paid_through(k), k)
                    .with_principal_paid(schedule.principal_through(k));

                let replayed = projector.outstanding_balance(&t, k).unwrap();
                let from_ledger = projector.outstanding_from_ledger(
                    t.principal,
                    schedule.interest_through(k),
                    history.total_payments_received,
                    LoanStatus::Active,
                );

                assert!(replayed.approx_eq(from_ledger, Money::ONE), "k = {k}");
                assert!(replayed.approx_eq(projector.principal_remaining(&t, &history), Money::ONE));
                assert!(projector.reconcile(&schedule, &history).is_none());
            }
        }
    }

    #[test]
    fn test_single_month_loan_matches_flat_projection() {
        // with one installment the annuity interest equals the flat projected profit
        let projector = BalanceProjector::default();
        let t = terms(250_000, 15, 1);
        let projected = ProfitLedger::new().projected_profit(&t);

        for (k, received) in [(0, Money::ZERO), (1, Money::from_major(287_500))] {
            let replayed = projector.outstanding_balance(&t, k).unwrap();
            let ledger = projector.outstanding_from_ledger(t.principal, projected, received, LoanStatus::Active);
            if k == 1 {
                assert_eq!(replayed, ledger);
            } else {
                assert_eq!(ledger - replayed, projected);
            }
        }
    }

    #[test]
    fn test_reconcile_flags_divergence() {
        let projector = BalanceProjector::default();
        let schedule = AmortizationCalculator::default()
            .schedule(&terms(100_000, 12, 12))
            .unwrap();

        // three installments recorded but only one installment's worth received
        let history = PaymentHistory::with_payments(schedule.paid_through(1), 3);
        let warning = projector.reconcile(&schedule, &history).unwrap();
        assert!(matches!(warning, Warning::InconsistentState { .. }));
    }

    #[test]
    fn test_scheduled_balance_on_date() {
        let projector = BalanceProjector::default();
        let schedule = AmortizationCalculator::default()
            .schedule(&terms(100_000, 12, 12))
            .unwrap();

        let before_first = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();
        assert_eq!(projector.scheduled_balance_on(&schedule, before_first), schedule.principal);

        let after_third = NaiveDate::from_ymd_opt(2024, 4, 20).unwrap();
        assert_eq!(projector.scheduled_balance_on(&schedule, after_third), schedule.balance_after(3));

        let at_maturity = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(projector.scheduled_balance_on(&schedule, at_maturity), Money::ZERO);
    }

    #[test]
    fn test_principal_remaining_clamps() {
        let projector = BalanceProjector::default();
        let t = terms(1_000, 10, 3);
        let history = PaymentHistory::new().with_principal_paid(Money::from_decimal(dec!(1200)));
        assert_eq!(projector.principal_remaining(&t, &history), Money::ZERO);
    }
}
