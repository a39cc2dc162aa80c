use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::LoanStatus;
use crate::warnings::{Checked, Warning, Warnings};

/// facts the status is derived from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusInputs {
    pub outstanding_balance: Money,
    pub has_overdue_records: bool,
    pub due_date: NaiveDate,
    pub current_date: NaiveDate,
    /// status set outside the resolver, if any
    pub manual_status: Option<LoanStatus>,
}

/// which rule produced the status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusReason {
    Repaid,
    OpenOverdueRecord,
    PastDue,
    /// zero balance with an open overdue record
    ContradictoryClosure,
    Performing,
    AdministrativeOverride,
}

/// resolved status plus what the overdue-record collaborator should do about it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusResolution {
    pub status: LoanStatus,
    pub reason: StatusReason,
    /// a new overdue record should be opened for this loan
    pub overdue_record_required: bool,
}

/// derives the canonical loan status; first matching rule wins
#[derive(Debug, Clone, Copy, Default)]
pub struct LoanStatusResolver;

impl LoanStatusResolver {
    pub fn new() -> Self {
        Self
    }

    pub fn resolve(&self, inputs: &StatusInputs) -> Checked<StatusResolution> {
        let mut warnings = Warnings::new();

        if let Some(manual) = inputs.manual_status {
            if manual.is_administrative() {
                return Checked::clean(StatusResolution {
                    status: manual,
                    reason: StatusReason::AdministrativeOverride,
                    overdue_record_required: false,
                });
            }
            if manual.is_closed() && inputs.has_overdue_records {
                warnings.emit(Warning::inconsistent(
                    "loan recorded as closed while an overdue record is open",
                ));
            }
        }

        let mut balance = inputs.outstanding_balance;
        if balance.is_negative() {
            warnings.emit(Warning::inconsistent(format!(
                "negative outstanding balance {}",
                balance
            )));
            balance = Money::ZERO;
        }

        let past_due = inputs.current_date > inputs.due_date;
        let owes = balance.is_positive();

        let (status, reason) = if balance.is_zero() && !inputs.has_overdue_records {
            (LoanStatus::Closed, StatusReason::Repaid)
        } else if inputs.has_overdue_records && owes {
            (LoanStatus::PendingOverdue, StatusReason::OpenOverdueRecord)
        } else if past_due && owes {
            (LoanStatus::PendingOverdue, StatusReason::PastDue)
        } else if balance.is_zero() {
            warnings.emit(Warning::inconsistent(
                "zero outstanding balance with an open overdue record",
            ));
            (LoanStatus::Closed, StatusReason::ContradictoryClosure)
        } else {
            (LoanStatus::Active, StatusReason::Performing)
        };

        tracing::debug!(%status, ?reason, %balance, past_due, "loan status resolved");

        Checked::with_warnings(
            StatusResolution {
                status,
                reason,
                overdue_record_required: reason == StatusReason::PastDue,
            },
            warnings,
        )
    }
}
