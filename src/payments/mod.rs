pub mod amortization;
pub mod balance;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::state::PaymentHistory;

pub use amortization::{AmortizationCalculator, AmortizationSchedule, ScheduleEntry};
pub use balance::BalanceProjector;

/// how far a loan's repayments are behind its schedule on a given date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepaymentProgress {
    pub installments_due: u32,
    pub installments_paid: u32,
    pub amount_due: Money,
    pub amount_received: Money,
    /// scheduled amount due but not received
    pub arrears: Money,
}

impl RepaymentProgress {
    pub fn on(schedule: &AmortizationSchedule, history: &PaymentHistory, date: NaiveDate) -> Self {
        let installments_due = schedule.installments_due_by(date);
        let amount_due = schedule.paid_through(installments_due);
        let amount_received = history.total_payments_received;

        Self {
            installments_due,
            installments_paid: history.payments_made,
            amount_due,
            amount_received,
            arrears: (amount_due - amount_received).non_negative(),
        }
    }

    pub fn is_behind(&self) -> bool {
        self.arrears.is_positive()
    }

    /// installments due but not recorded as paid
    pub fn missed_installments(&self) -> u32 {
        self.installments_due.saturating_sub(self.installments_paid)
    }
}
