use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::interest::flat_interest;
use crate::state::PaymentHistory;
use crate::terms::LoanTerms;
use crate::types::LoanStatus;

/// profit figures for one loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfitSummary {
    pub projected_profit: Money,
    pub realized_profit: Money,
    pub total_profit: Money,
}

/// profit recognition rules
///
/// Profit is projected on a flat basis (`principal × rate × term`) and is only
/// recognized once a loan is closed or defaulted with no open overdue record.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfitLedger;

impl ProfitLedger {
    pub fn new() -> Self {
        Self
    }

    /// interest expected over the full term, independent of repayment behavior
    pub fn projected_profit(&self, terms: &LoanTerms) -> Money {
        flat_interest(terms.principal, terms.monthly_interest_rate, terms.term_months)
    }

    /// profit actually recognized for the given status
    pub fn realized_profit(
        &self,
        principal: Money,
        projected_profit: Money,
        status: LoanStatus,
        total_payments_received: Money,
        has_overdue_records: bool,
    ) -> Money {
        // an open overdue record blocks recognition whatever the label says
        if has_overdue_records {
            return Money::ZERO;
        }

        let realized = match status {
            LoanStatus::Closed | LoanStatus::Defaulted => {
                (total_payments_received - principal).non_negative()
            }
            LoanStatus::Active | LoanStatus::PendingOverdue => Money::ZERO,
        };

        tracing::debug!(
            %status,
            %projected_profit,
            %realized,
            "realized profit computed"
        );

        realized
    }

    /// realized profit plus fees, which are only recognized at closure
    pub fn total_profit(
        &self,
        realized_profit: Money,
        status: LoanStatus,
        additional_fees: Money,
    ) -> Money {
        match status {
            LoanStatus::Closed => realized_profit + additional_fees,
            LoanStatus::Active | LoanStatus::Defaulted | LoanStatus::PendingOverdue => {
                realized_profit
            }
        }
    }

    /// all three figures for a loan under a resolved status
    pub fn summarize(
        &self,
        terms: &LoanTerms,
        history: &PaymentHistory,
        status: LoanStatus,
    ) -> ProfitSummary {
        let projected_profit = self.projected_profit(terms);
        let realized_profit = self.realized_profit(
            terms.principal,
            projected_profit,
            status,
            history.total_payments_received,
            history.has_overdue_records,
        );
        let total_profit = self.total_profit(realized_profit, status, history.additional_fees);

        ProfitSummary {
            projected_profit,
            realized_profit,
            total_profit,
        }
    }
}
