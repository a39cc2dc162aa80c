use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::Result;
use crate::payments::AmortizationCalculator;
use crate::terms::LoanTerms;
use crate::warnings::{Checked, Warning, Warnings};

/// one projected period of missed payment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueCycle {
    pub cycle_number: u32,
    pub cycle_due_date: NaiveDate,
    pub cycle_amount: Money,
    pub days_overdue_at_cycle: u32,
}

/// overdue breakdown for display and export; recomputed on every query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueReport {
    pub days_overdue: u32,
    pub cycles: Vec<OverdueCycle>,
}

impl OverdueReport {
    pub fn is_overdue(&self) -> bool {
        self.days_overdue > 0
    }

    /// sum of all cycle amounts
    pub fn total_cycle_amount(&self) -> Money {
        self.cycles.iter().map(|c| c.cycle_amount).sum()
    }
}

/// computes days overdue and the cycle breakdown of missed periods
#[derive(Debug, Clone)]
pub struct OverdueTracker {
    calculator: AmortizationCalculator,
    cycle_length_days: u32,
    max_cycles: u32,
}

impl OverdueTracker {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            calculator: AmortizationCalculator::new(config),
            cycle_length_days: config.cycle_length_days.max(1),
            max_cycles: config.max_overdue_cycles.max(1),
        }
    }

    /// whole days past `due_date`; zero once nothing is outstanding
    pub fn days_overdue(
        &self,
        due_date: NaiveDate,
        current_date: NaiveDate,
        outstanding_balance: Money,
    ) -> u32 {
        if !outstanding_balance.is_positive() {
            return 0;
        }
        days_between(due_date, current_date)
    }

    /// cycles stepping back from `due_date` one cycle length at a time
    ///
    /// The count is `days_overdue / cycle_length + 1`, so a loan on or before its
    /// due date still yields one cycle at zero days; [`OverdueTracker::report`]
    /// drops cycles for loans that are not overdue. Each cycle's days overdue is
    /// measured independently against `current_date`.
    pub fn cycles(
        &self,
        terms: &LoanTerms,
        due_date: NaiveDate,
        current_date: NaiveDate,
    ) -> Result<Checked<Vec<OverdueCycle>>> {
        let cycle_amount = self.calculator.monthly_payment(
            terms.principal,
            terms.monthly_interest_rate,
            terms.term_months,
        )?;

        let days = days_between(due_date, current_date);
        let mut warnings = Warnings::new();
        let requested = days / self.cycle_length_days + 1;
        let count = if requested > self.max_cycles {
            warnings.emit(Warning::OverdueCyclesCapped {
                requested,
                cap: self.max_cycles,
            });
            self.max_cycles
        } else {
            requested
        };

        let cycles = (0..count)
            .map(|i| {
                let offset = Duration::days(i64::from(i) * i64::from(self.cycle_length_days));
                let cycle_due_date = due_date - offset;
                OverdueCycle {
                    cycle_number: i + 1,
                    cycle_due_date,
                    cycle_amount,
                    days_overdue_at_cycle: days_between(cycle_due_date, current_date),
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(days, count, "overdue cycles projected");

        Ok(Checked::with_warnings(cycles, warnings))
    }

    /// days overdue and cycles together
    pub fn report(
        &self,
        terms: &LoanTerms,
        due_date: NaiveDate,
        current_date: NaiveDate,
        outstanding_balance: Money,
    ) -> Result<Checked<OverdueReport>> {
        let days_overdue = self.days_overdue(due_date, current_date, outstanding_balance);
        if days_overdue == 0 {
            return Ok(Checked::clean(OverdueReport {
                days_overdue,
                cycles: Vec::new(),
            }));
        }

        let checked = self.cycles(terms, due_date, current_date)?;
        Ok(Checked::with_warnings(
            OverdueReport {
                days_overdue,
                cycles: checked.value,
            },
            checked.warnings,
        ))
    }
}

impl Default for OverdueTracker {
    fn default() -> Self {
        Self::new(&EngineConfig::default())
    }
}

fn days_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let days = (to - from).num_days();
    u32::try_from(days.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Rate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn terms() -> LoanTerms {
        LoanTerms::new(
            Money::from_major(100_000),
            Rate::from_percentage(10),
            1,
            date(2024, 1, 1),
        )
    }

    #[test]
    fn test_days_overdue() {
        let tracker = OverdueTracker::default();
        let due = date(2024, 3, 1);
        let balance = Money::from_major(100_000);

        assert_eq!(tracker.days_overdue(due, date(2024, 6, 4), balance), 95);
        assert_eq!(tracker.days_overdue(due, date(2024, 3, 1), balance), 0);
        assert_eq!(tracker.days_overdue(due, date(2024, 2, 1), balance), 0);
    }

    #[test]
    fn test_zero_balance_is_never_overdue() {
        let tracker = OverdueTracker::default();
        assert_eq!(tracker.days_overdue(date(2020, 1, 1), date(2024, 1, 1), Money::ZERO), 0);
        assert_eq!(
            tracker.days_overdue(date(2020, 1, 1), date(2024, 1, 1), Money::from_major(-10)),
            0
        );
    }

    #[test]
    fn test_cycles_for_95_days() {
        let tracker = OverdueTracker::default();
        let current = date(2024, 6, 4);
        let due = current - Duration::days(95);

        let cycles = tracker.cycles(&terms(), due, current).unwrap();
        assert!(!cycles.has_warnings());

        let cycles = cycles.value;
        assert_eq!(cycles.len(), 4);
        assert_eq!(cycles[0].cycle_number, 1);
        assert_eq!(cycles[0].cycle_due_date, due);
        assert_eq!(cycles[0].days_overdue_at_cycle, 95);
        assert_eq!(cycles[1].cycle_due_date, due - Duration::days(30));
        assert_eq!(cycles[1].days_overdue_at_cycle, 125);
        assert_eq!(cycles[3].days_overdue_at_cycle, 185);
        assert!(cycles.iter().all(|c| c.cycle_amount == Money::from_major(110_000)));
    }

    #[test]
    fn test_cycle_boundaries() {
        let tracker = OverdueTracker::default();
        let due = date(2024, 1, 1);

        let one_day = tracker.cycles(&terms(), due, due + Duration::days(1)).unwrap().value;
        assert_eq!(one_day.len(), 1);

        let thirty = tracker.cycles(&terms(), due, due + Duration::days(30)).unwrap().value;
        assert_eq!(thirty.len(), 2);

        let on_due_date = tracker.cycles(&terms(), due, due).unwrap().value;
        assert_eq!(on_due_date.len(), 1);
        assert_eq!(on_due_date[0].cycle_due_date, due);
        assert_eq!(on_due_date[0].days_overdue_at_cycle, 0);

        let before_due = tracker.cycles(&terms(), due, due - Duration::days(10)).unwrap().value;
        assert_eq!(before_due.len(), 1);
        assert_eq!(before_due[0].days_overdue_at_cycle, 0);
    }

    #[test]
    fn test_cycles_capped_for_corrupt_due_date() {
        let tracker = OverdueTracker::default();
        let current = date(2024, 1, 1);
        let due = date(1900, 1, 1);

        let checked = tracker.cycles(&terms(), due, current).unwrap();
        assert_eq!(checked.value.len(), 120);
        assert!(matches!(
            checked.warnings.as_slice(),
            [Warning::OverdueCyclesCapped { cap: 120, .. }]
        ));
    }

    #[test]
    fn test_cycles_reject_invalid_terms() {
        let tracker = OverdueTracker::default();
        let mut t = terms();
        t.term_months = 0;
        assert!(tracker.cycles(&t, date(2024, 1, 1), date(2024, 5, 1)).is_err());
    }

    #[test]
    fn test_report_recomputes_with_current_date() {
        let tracker = OverdueTracker::default();
        let due = date(2024, 3, 1);
        let balance = Money::from_major(50_000);

        let early = tracker.report(&terms(), due, date(2024, 3, 11), balance).unwrap().value;
        let later = tracker.report(&terms(), due, date(2024, 4, 15), balance).unwrap().value;

        assert_eq!(early.days_overdue, 10);
        assert_eq!(early.cycles.len(), 1);
        assert_eq!(later.days_overdue, 45);
        assert_eq!(later.cycles.len(), 2);
        assert_eq!(later.total_cycle_amount(), Money::from_major(220_000));

        let not_yet_due = tracker.report(&terms(), due, due, balance).unwrap().value;
        assert!(!not_yet_due.is_overdue());
        assert!(not_yet_due.cycles.is_empty());

        let settled = tracker.report(&terms(), due, date(2024, 4, 15), Money::ZERO).unwrap().value;
        assert!(!settled.is_overdue());
        assert!(settled.cycles.is_empty());
    }
}
