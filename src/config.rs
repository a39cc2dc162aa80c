use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::TieBreak;

/// sanctioned monthly rate tiers, kept sorted ascending and deduplicated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Rate>", into = "Vec<Rate>")]
pub struct RateTiers {
    tiers: Vec<Rate>,
}

impl RateTiers {
    pub fn new(mut tiers: Vec<Rate>) -> Self {
        tiers.sort();
        tiers.dedup();
        Self { tiers }
    }

    /// 10%, 12%, 15% and 20% per month
    pub fn standard() -> Self {
        Self::new(vec![
            Rate::from_decimal(dec!(0.10)),
            Rate::from_decimal(dec!(0.12)),
            Rate::from_decimal(dec!(0.15)),
            Rate::from_decimal(dec!(0.20)),
        ])
    }

    pub fn contains(&self, rate: Rate) -> bool {
        self.tiers.binary_search(&rate).is_ok()
    }

    pub fn as_slice(&self) -> &[Rate] {
        &self.tiers
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    pub fn lowest(&self) -> Option<Rate> {
        self.tiers.first().copied()
    }

    pub fn highest(&self) -> Option<Rate> {
        self.tiers.last().copied()
    }
}

impl Default for RateTiers {
    fn default() -> Self {
        Self::standard()
    }
}

impl From<Vec<Rate>> for RateTiers {
    fn from(tiers: Vec<Rate>) -> Self {
        Self::new(tiers)
    }
}

impl From<RateTiers> for Vec<Rate> {
    fn from(tiers: RateTiers) -> Self {
        tiers.tiers
    }
}

/// engine configuration, passed explicitly to every component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rate_tiers: RateTiers,
    pub tie_break: TieBreak,
    /// longest term the product offers
    pub max_term_months: u32,
    /// length of one overdue cycle
    pub cycle_length_days: u32,
    /// upper bound on projected overdue cycles
    pub max_overdue_cycles: u32,
    /// allowed drift between balance derivations
    pub balance_tolerance: Money,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rate_tiers: RateTiers::standard(),
            tie_break: TieBreak::Lower,
            max_term_months: 60,
            cycle_length_days: 30,
            max_overdue_cycles: 120,
            balance_tolerance: Money::ONE,
        }
    }
}

impl EngineConfig {
    /// parse from json; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).map_err(|e| LoanError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rate_tiers.is_empty() {
            return Err(LoanError::InvalidConfiguration {
                message: "at least one rate tier is required".to_string(),
            });
        }

        if let Some(bad) = self
            .rate_tiers
            .as_slice()
            .iter()
            .find(|r| r.as_decimal() < Decimal::ZERO || r.as_decimal() >= Decimal::ONE)
        {
            return Err(LoanError::InvalidConfiguration {
                message: format!("rate tier {} is outside [0, 1)", bad.as_decimal()),
            });
        }

        if self.max_term_months == 0 {
            return Err(LoanError::InvalidConfiguration {
                message: "max_term_months must be at least 1".to_string(),
            });
        }

        if self.cycle_length_days == 0 {
            return Err(LoanError::InvalidConfiguration {
                message: "cycle_length_days must be at least 1".to_string(),
            });
        }

        if self.max_overdue_cycles == 0 {
            return Err(LoanError::InvalidConfiguration {
                message: "max_overdue_cycles must be at least 1".to_string(),
            });
        }

        if self.balance_tolerance.is_negative() {
            return Err(LoanError::InvalidConfiguration {
                message: "balance_tolerance cannot be negative".to_string(),
            });
        }

        Ok(())
    }
}
