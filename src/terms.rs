use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};

/// immutable loan terms fixed at disbursal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub monthly_interest_rate: Rate,
    pub term_months: u32,
    pub origination_date: NaiveDate,
    /// explicit final due date; the maturity date is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

impl LoanTerms {
    pub fn new(
        principal: Money,
        monthly_interest_rate: Rate,
        term_months: u32,
        origination_date: NaiveDate,
    ) -> Self {
        Self {
            principal,
            monthly_interest_rate,
            term_months,
            origination_date,
            due_date: None,
        }
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// structural validation: principal, term and rate range
    pub fn validate(&self, config: &EngineConfig) -> Result<()> {
        validate_amounts(self.principal, self.monthly_interest_rate, self.term_months)?;

        if self.term_months > config.max_term_months {
            return Err(LoanError::InvalidTerms {
                message: format!(
                    "term of {} months exceeds the product maximum of {}",
                    self.term_months, config.max_term_months
                ),
            });
        }

        if let Some(due) = self.due_date {
            if due < self.origination_date {
                return Err(LoanError::InvalidDate {
                    message: format!(
                        "due date {} precedes origination date {}",
                        due, self.origination_date
                    ),
                });
            }
        }

        Ok(())
    }

    /// date of the final scheduled installment
    pub fn maturity_date(&self) -> NaiveDate {
        installment_date(self.origination_date, self.term_months)
    }

    /// the date the loan must be repaid by
    pub fn due_date(&self) -> NaiveDate {
        self.due_date.unwrap_or_else(|| self.maturity_date())
    }
}

/// principal > 0, term >= 1, rate in [0, 1)
pub(crate) fn validate_amounts(principal: Money, rate: Rate, term_months: u32) -> Result<()> {
    if !principal.is_positive() {
        return Err(LoanError::InvalidPrincipal { principal });
    }

    if term_months == 0 {
        return Err(LoanError::InvalidTerms {
            message: "term must be at least one month".to_string(),
        });
    }

    validate_rate_range(rate)
}

pub(crate) fn validate_rate_range(rate: Rate) -> Result<()> {
    let r = rate.as_decimal();
    if r < Decimal::ZERO || r >= Decimal::ONE {
        return Err(LoanError::InvalidRate { rate });
    }
    Ok(())
}

/// date of installment `n`: same day of month as origination, clamped to month end
pub fn installment_date(origination: NaiveDate, n: u32) -> NaiveDate {
    origination
        .checked_add_months(Months::new(n))
        .unwrap_or_else(|| last_representable(origination))
}

fn last_representable(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), 12, 31).unwrap_or(NaiveDate::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn terms() -> LoanTerms {
        LoanTerms::new(
            Money::from_major(250_000),
            Rate::from_percentage(15),
            3,
            date(2024, 1, 31),
        )
    }

    #[test]
    fn test_valid_terms() {
        assert!(terms().validate(&EngineConfig::default()).is_ok());
    }

    #[test]
    fn test_rejects_bad_principal_and_term() {
        let config = EngineConfig::default();

        let mut t = terms();
        t.principal = Money::ZERO;
        assert!(matches!(t.validate(&config), Err(LoanError::InvalidPrincipal { .. })));

        let mut t = terms();
        t.term_months = 0;
        assert!(matches!(t.validate(&config), Err(LoanError::InvalidTerms { .. })));

        let mut t = terms();
        t.term_months = 61;
        assert!(matches!(t.validate(&config), Err(LoanError::InvalidTerms { .. })));
    }

    #[test]
    fn test_rejects_rate_outside_unit_interval() {
        let config = EngineConfig::default();

        let mut t = terms();
        t.monthly_interest_rate = Rate::from_decimal(dec!(-0.01));
        assert!(matches!(t.validate(&config), Err(LoanError::InvalidRate { .. })));

        t.monthly_interest_rate = Rate::ONE;
        assert!(matches!(t.validate(&config), Err(LoanError::InvalidRate { .. })));

        // off-tier but in range is not a structural error
        t.monthly_interest_rate = Rate::from_decimal(dec!(0.17));
        assert!(t.validate(&config).is_ok());
    }

    #[test]
    fn test_due_date_defaults_to_maturity() {
        let t = terms();
        // jan 31 + 3 months clamps to apr 30
        assert_eq!(t.maturity_date(), date(2024, 4, 30));
        assert_eq!(t.due_date(), date(2024, 4, 30));

        let t = terms().with_due_date(date(2024, 3, 1));
        assert_eq!(t.due_date(), date(2024, 3, 1));
    }

    #[test]
    fn test_due_date_before_origination_rejected() {
        let t = terms().with_due_date(date(2023, 12, 1));
        assert!(matches!(
            t.validate(&EngineConfig::default()),
            Err(LoanError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_installment_dates_clamp_to_month_end() {
        let origination = date(2024, 1, 31);
        assert_eq!(installment_date(origination, 1), date(2024, 2, 29));
        assert_eq!(installment_date(origination, 2), date(2024, 3, 31));
    }
}
