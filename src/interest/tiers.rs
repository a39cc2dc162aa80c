use std::cmp::Ordering;

use crate::config::{EngineConfig, RateTiers};
use crate::decimal::Rate;
use crate::errors::{LoanError, Result};
use crate::terms::validate_rate_range;
use crate::types::TieBreak;
use crate::warnings::{Checked, Warning, Warnings};

/// outcome of checking a rate against the sanctioned tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateCheck {
    /// rate is one of the tiers
    Sanctioned(Rate),
    /// rate is in range but off-tier; `nearest` is the suggested replacement
    OffPolicy { rate: Rate, nearest: Rate },
}

impl RateCheck {
    pub fn is_sanctioned(&self) -> bool {
        matches!(self, RateCheck::Sanctioned(_))
    }

    /// the rate as submitted
    pub fn submitted(&self) -> Rate {
        match self {
            RateCheck::Sanctioned(rate) => *rate,
            RateCheck::OffPolicy { rate, .. } => *rate,
        }
    }
}

/// validates and normalizes monthly rates against the product's tiers
#[derive(Debug, Clone)]
pub struct RateValidator {
    tiers: RateTiers,
    tie_break: TieBreak,
}

impl RateValidator {
    pub fn new(tiers: RateTiers, tie_break: TieBreak) -> Self {
        Self { tiers, tie_break }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.rate_tiers.clone(), config.tie_break)
    }

    pub fn tiers(&self) -> &RateTiers {
        &self.tiers
    }

    /// true iff `rate` is one of the sanctioned tiers
    pub fn validate(&self, rate: Rate) -> bool {
        self.tiers.contains(rate)
    }

    /// tier closest to `rate`; equidistant rates resolve per the tie-break rule
    pub fn nearest(&self, rate: Rate) -> Rate {
        let mut best: Option<Rate> = None;

        // tiers are sorted ascending, so the first of two equidistant tiers is the lower
        for &tier in self.tiers.as_slice() {
            best = match best {
                None => Some(tier),
                Some(current) => match tier.distance(rate).cmp(&current.distance(rate)) {
                    Ordering::Less => Some(tier),
                    Ordering::Equal if self.tie_break == TieBreak::Higher => Some(tier),
                    _ => Some(current),
                },
            };
        }

        best.unwrap_or(rate)
    }

    /// range-check `rate` and classify it; off-tier rates are reported, never substituted
    pub fn check(&self, rate: Rate) -> Result<Checked<RateCheck>> {
        validate_rate_range(rate)?;

        if self.validate(rate) {
            return Ok(Checked::clean(RateCheck::Sanctioned(rate)));
        }

        let nearest = self.nearest(rate);
        let mut warnings = Warnings::new();
        warnings.emit(Warning::OffPolicyRate { rate, nearest });

        Ok(Checked::with_warnings(
            RateCheck::OffPolicy { rate, nearest },
            warnings,
        ))
    }

    /// the rate to persist: sanctioned rates pass through, off-tier rates are
    /// coerced to the nearest tier only when `accept_nearest` is set
    pub fn normalize(&self, rate: Rate, accept_nearest: bool) -> Result<Rate> {
        match self.check(rate)?.value {
            RateCheck::Sanctioned(rate) => Ok(rate),
            RateCheck::OffPolicy { nearest, .. } if accept_nearest => {
                tracing::debug!(%rate, %nearest, "coercing off-policy rate to nearest tier");
                Ok(nearest)
            }
            RateCheck::OffPolicy { .. } => Err(LoanError::InvalidRate { rate }),
        }
    }
}

impl Default for RateValidator {
    fn default() -> Self {
        Self::new(RateTiers::standard(), TieBreak::Lower)
    }
}
