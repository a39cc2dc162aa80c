use thiserror::Error;

use crate::decimal::{Money, Rate};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoanError {
    #[error("invalid loan terms: {message}")]
    InvalidTerms {
        message: String,
    },

    #[error("invalid principal: {principal}")]
    InvalidPrincipal {
        principal: Money,
    },

    #[error("invalid interest rate: {rate}")]
    InvalidRate {
        rate: Rate,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("unknown loan status: {label}")]
    UnknownStatus {
        label: String,
    },
}

impl LoanError {
    /// whether the error describes unusable loan terms (surfaced as form validation)
    pub fn is_invalid_terms(&self) -> bool {
        matches!(
            self,
            LoanError::InvalidTerms { .. }
                | LoanError::InvalidPrincipal { .. }
                | LoanError::InvalidRate { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
