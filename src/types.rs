use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::LoanError;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// canonical loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// disbursed and performing
    Active,
    /// fully repaid with no open overdue record
    #[serde(alias = "completed")]
    Closed,
    /// written down by an administrator
    Defaulted,
    /// balance outstanding past due, or an overdue record is open
    #[serde(alias = "overdue")]
    PendingOverdue,
}

impl LoanStatus {
    pub const ALL: [LoanStatus; 4] = [
        LoanStatus::Active,
        LoanStatus::Closed,
        LoanStatus::Defaulted,
        LoanStatus::PendingOverdue,
    ];

    /// closed loans are settled; the balance is authoritative zero
    pub fn is_closed(&self) -> bool {
        matches!(self, LoanStatus::Closed)
    }

    /// statuses that can only be set by an administrator
    pub fn is_administrative(&self) -> bool {
        matches!(self, LoanStatus::Defaulted)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "active",
            LoanStatus::Closed => "closed",
            LoanStatus::Defaulted => "defaulted",
            LoanStatus::PendingOverdue => "pending_overdue",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = LoanError;

    /// parse a persisted status label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "active" => Ok(LoanStatus::Active),
            "closed" | "completed" => Ok(LoanStatus::Closed),
            "defaulted" => Ok(LoanStatus::Defaulted),
            "pending_overdue" | "pendingoverdue" | "overdue" => Ok(LoanStatus::PendingOverdue),
            _ => Err(LoanError::UnknownStatus {
                label: s.to_string(),
            }),
        }
    }
}

/// tie-break rule when a rate sits exactly between two tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    #[default]
    Lower,
    Higher,
}
