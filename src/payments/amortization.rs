use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::interest::compound_factor;
use crate::terms::{installment_date, validate_amounts, LoanTerms};

/// one installment of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub payment_number: u32,
    pub due_date: NaiveDate,
    pub scheduled_payment: Money,
    pub principal_portion: Money,
    pub interest_portion: Money,
    pub remaining_balance_after: Money,
    pub cumulative_interest: Money,
    pub cumulative_principal: Money,
}

/// full schedule for one set of loan terms, ordered by payment number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub principal: Money,
    pub monthly_rate: Rate,
    pub term_months: u32,
    pub monthly_payment: Money,
    pub entries: Vec<ScheduleEntry>,
    pub total_interest: Money,
    pub total_paid: Money,
}

impl AmortizationSchedule {
    /// entry for a 1-based payment number
    pub fn entry(&self, payment_number: u32) -> Option<&ScheduleEntry> {
        if payment_number == 0 {
            return None;
        }
        self.entries.get((payment_number - 1) as usize)
    }

    /// remaining balance once `payments_made` installments are paid
    pub fn balance_after(&self, payments_made: u32) -> Money {
        if payments_made == 0 {
            return self.principal;
        }
        self.entry(payments_made)
            .map(|e| e.remaining_balance_after)
            .unwrap_or(Money::ZERO)
    }

    /// interest fallen due over the first `payments_made` installments
    pub fn interest_through(&self, payments_made: u32) -> Money {
        self.last_entry_within(payments_made)
            .map(|e| e.cumulative_interest)
            .unwrap_or(Money::ZERO)
    }

    /// principal repaid over the first `payments_made` installments
    pub fn principal_through(&self, payments_made: u32) -> Money {
        self.last_entry_within(payments_made)
            .map(|e| e.cumulative_principal)
            .unwrap_or(Money::ZERO)
    }

    /// sum of scheduled payments over the first `payments_made` installments
    pub fn paid_through(&self, payments_made: u32) -> Money {
        self.entries
            .iter()
            .take(payments_made as usize)
            .map(|e| e.scheduled_payment)
            .sum()
    }

    /// number of installments due on or before `date`
    pub fn installments_due_by(&self, date: NaiveDate) -> u32 {
        self.entries.iter().filter(|e| e.due_date <= date).count() as u32
    }

    /// first installment due strictly after `date`
    pub fn next_due_after(&self, date: NaiveDate) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.due_date > date)
    }

    pub fn final_entry(&self) -> Option<&ScheduleEntry> {
        self.entries.last()
    }

    fn last_entry_within(&self, payments_made: u32) -> Option<&ScheduleEntry> {
        let n = payments_made.min(self.entries.len() as u32);
        self.entry(n)
    }
}

/// annuity calculator for fixed monthly installments
#[derive(Debug, Clone)]
pub struct AmortizationCalculator {
    max_term_months: u32,
}

impl AmortizationCalculator {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_term_months: config.max_term_months,
        }
    }

    /// installment `P·r(1+r)^n / ((1+r)^n − 1)`, or `P / n` at a zero rate
    pub fn monthly_payment(&self, principal: Money, monthly_rate: Rate, term_months: u32) -> Result<Money> {
        validate_amounts(principal, monthly_rate, term_months)?;
        self.check_term(term_months)?;
        Ok(annuity_payment(principal, monthly_rate, term_months))
    }

    /// monthly payment times term, less principal
    pub fn total_interest(&self, terms: &LoanTerms) -> Result<Money> {
        let payment = self.monthly_payment(terms.principal, terms.monthly_interest_rate, terms.term_months)?;
        Ok(payment * Decimal::from(terms.term_months) - terms.principal)
    }

    /// flat total-rate installment `P × (1 + r) / n` used by the seeded loan fixtures
    pub fn flat_installment(&self, principal: Money, rate: Rate, term_months: u32) -> Result<Money> {
        validate_amounts(principal, rate, term_months)?;
        let total = principal * (Decimal::ONE + rate.as_decimal());
        Ok(total / Decimal::from(term_months))
    }

    /// full installment schedule
    pub fn schedule(&self, terms: &LoanTerms) -> Result<AmortizationSchedule> {
        let principal = terms.principal;
        let rate = terms.monthly_interest_rate;
        let term_months = terms.term_months;
        let payment = self.monthly_payment(principal, rate, term_months)?;

        let mut entries = Vec::with_capacity(term_months as usize);
        let mut balance = principal;
        let mut cumulative_interest = Money::ZERO;
        let mut cumulative_principal = Money::ZERO;

        for i in 1..=term_months {
            let interest_portion = balance * rate.as_decimal();
            let principal_portion = (payment - interest_portion).min(balance).non_negative();
            let remaining = (balance - principal_portion).non_negative();

            cumulative_interest += interest_portion;
            cumulative_principal += principal_portion;

            entries.push(ScheduleEntry {
                payment_number: i,
                due_date: installment_date(terms.origination_date, i),
                scheduled_payment: payment,
                principal_portion,
                interest_portion,
                remaining_balance_after: remaining,
                cumulative_interest,
                cumulative_principal,
            });

            balance = remaining;
        }

        // absorb rounding drift so the final balance is exactly zero
        if let Some(last) = entries.last_mut() {
            let leftover = last.remaining_balance_after;
            if !leftover.is_zero() {
                last.principal_portion += leftover;
                last.scheduled_payment = last.principal_portion + last.interest_portion;
                last.cumulative_principal += leftover;
                last.remaining_balance_after = Money::ZERO;
            }
        }

        let total_interest: Money = entries.iter().map(|e| e.interest_portion).sum();
        let total_paid: Money = entries.iter().map(|e| e.scheduled_payment).sum();

        tracing::debug!(
            %principal,
            %rate,
            term_months,
            %payment,
            %total_interest,
            "amortization schedule generated"
        );

        Ok(AmortizationSchedule {
            principal,
            monthly_rate: rate,
            term_months,
            monthly_payment: payment,
            entries,
            total_interest,
            total_paid,
        })
    }

    pub(crate) fn check_term(&self, term_months: u32) -> Result<()> {
        if term_months > self.max_term_months {
            return Err(LoanError::InvalidTerms {
                message: format!(
                    "term of {} months exceeds the product maximum of {}",
                    term_months, self.max_term_months
                ),
            });
        }
        Ok(())
    }
}

impl Default for AmortizationCalculator {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

/// annuity installment; inputs must already be validated
fn annuity_payment(principal: Money, rate: Rate, months: u32) -> Money {
    if rate.is_zero() {
        return principal / Decimal::from(months);
    }

    let r = rate.as_decimal();
    let compound = compound_factor(rate, months);
    let numerator = principal.as_decimal() * r * compound;
    let denominator = compound - Decimal::ONE;

    Money::from_decimal(numerator / denominator)
}
