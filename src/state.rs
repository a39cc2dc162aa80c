use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::terms::LoanTerms;
use crate::types::{LoanId, LoanStatus};

/// repayment aggregates maintained by the persistence layer, read-only here
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentHistory {
    pub total_payments_received: Money,
    pub principal_paid: Money,
    pub additional_fees: Money,
    /// an overdue record is open for this loan
    pub has_overdue_records: bool,
    pub payments_made: u32,
}

impl PaymentHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// history of a loan that has received `payments` totalling `received`
    pub fn with_payments(received: Money, payments: u32) -> Self {
        Self {
            total_payments_received: received,
            payments_made: payments,
            ..Self::default()
        }
    }

    pub fn with_principal_paid(mut self, amount: Money) -> Self {
        self.principal_paid = amount;
        self
    }

    pub fn with_fees(mut self, amount: Money) -> Self {
        self.additional_fees = amount;
        self
    }

    pub fn with_overdue_records(mut self, open: bool) -> Self {
        self.has_overdue_records = open;
        self
    }

    /// interest portion of what has been received so far
    pub fn interest_received(&self) -> Money {
        (self.total_payments_received - self.principal_paid).non_negative()
    }
}

/// everything the engine needs about one loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    #[serde(default = "Uuid::new_v4")]
    pub loan_id: LoanId,
    pub terms: LoanTerms,
    #[serde(default)]
    pub history: PaymentHistory,
    /// administrative override; only `Defaulted` is honored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manual_status: Option<LoanStatus>,
}

impl LoanRecord {
    pub fn new(terms: LoanTerms, history: PaymentHistory) -> Self {
        Self {
            loan_id: Uuid::new_v4(),
            terms,
            history,
            manual_status: None,
        }
    }

    pub fn with_id(mut self, loan_id: LoanId) -> Self {
        self.loan_id = loan_id;
        self
    }

    /// mark the loan as defaulted by an administrator
    pub fn mark_defaulted(mut self) -> Self {
        self.manual_status = Some(LoanStatus::Defaulted);
        self
    }
}
