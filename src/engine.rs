use chrono::NaiveDate;
use hourglass_rs::{SafeTimeProvider, TimeSource};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::decimal::Money;
use crate::errors::{LoanError, Result};
use crate::interest::{ProfitLedger, RateValidator};
use crate::overdue::{OverdueCycle, OverdueTracker};
use crate::payments::{
    AmortizationCalculator, AmortizationSchedule, BalanceProjector, RepaymentProgress,
};
use crate::state::LoanRecord;
use crate::status::{LoanStatusResolver, StatusInputs, StatusReason};
use crate::types::{LoanId, LoanStatus};
use crate::warnings::{Warning, Warnings};

/// every derived figure for one loan on one date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanEvaluation {
    pub loan_id: LoanId,
    pub evaluated_on: NaiveDate,
    pub due_date: NaiveDate,
    pub principal: Money,
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub projected_profit: Money,
    pub outstanding_balance: Money,
    /// balance the schedule expects after the recorded installments
    pub scheduled_balance: Money,
    pub principal_remaining: Money,
    pub status: LoanStatus,
    pub status_reason: StatusReason,
    pub overdue_record_required: bool,
    pub days_overdue: u32,
    pub overdue_cycles: Vec<OverdueCycle>,
    pub realized_profit: Money,
    pub total_profit: Money,
    pub next_due_date: Option<NaiveDate>,
    pub progress: RepaymentProgress,
    pub warnings: Vec<Warning>,
}

impl LoanEvaluation {
    pub fn is_overdue(&self) -> bool {
        self.days_overdue > 0
    }

    /// json for the api layer
    pub fn to_json(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(|e| LoanError::CalculationError {
            message: e.to_string(),
        })
    }
}

/// the single entry point collaborators call to derive loan figures
#[derive(Debug, Clone)]
pub struct LoanEngine {
    config: EngineConfig,
    validator: RateValidator,
    calculator: AmortizationCalculator,
    projector: BalanceProjector,
    tracker: OverdueTracker,
    resolver: LoanStatusResolver,
    ledger: ProfitLedger,
}

impl LoanEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_validated(config))
    }

    fn with_validated(config: EngineConfig) -> Self {
        Self {
            validator: RateValidator::from_config(&config),
            calculator: AmortizationCalculator::new(&config),
            projector: BalanceProjector::new(&config),
            tracker: OverdueTracker::new(&config),
            resolver: LoanStatusResolver::new(),
            ledger: ProfitLedger::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn rate_validator(&self) -> &RateValidator {
        &self.validator
    }

    /// payment schedule for a loan's terms
    pub fn schedule(&self, record: &LoanRecord) -> Result<AmortizationSchedule> {
        record.terms.validate(&self.config)?;
        self.calculator.schedule(&record.terms)
    }

    /// evaluate using the system clock
    pub fn evaluate_now(&self, record: &LoanRecord) -> Result<LoanEvaluation> {
        let time = SafeTimeProvider::new(TimeSource::System);
        self.evaluate(record, &time)
    }

    /// evaluate as of the provider's current date
    pub fn evaluate(&self, record: &LoanRecord, time_provider: &SafeTimeProvider) -> Result<LoanEvaluation> {
        self.evaluate_on(record, time_provider.now().date_naive())
    }

    /// run the full derivation pipeline as of `current_date`
    pub fn evaluate_on(&self, record: &LoanRecord, current_date: NaiveDate) -> Result<LoanEvaluation> {
        let terms = &record.terms;
        let history = &record.history;
        let mut warnings = Warnings::new();

        terms.validate(&self.config)?;
        // off-tier rates are priced as submitted; coercion is the caller's call
        self.validator
            .check(terms.monthly_interest_rate)?
            .into_value(&mut warnings);

        let schedule = self.calculator.schedule(terms)?;
        let total_interest = self.calculator.total_interest(terms)?;
        let projected_profit = self.ledger.projected_profit(terms);
        let due_date = terms.due_date();

        // recorded installments pin the balance to the schedule; totals alone fall back to the ledger
        let owed = if history.payments_made > 0 {
            self.projector.outstanding_balance(terms, history.payments_made)?
        } else {
            self.projector.outstanding_from_ledger(
                terms.principal,
                projected_profit,
                history.total_payments_received,
                LoanStatus::Active,
            )
        };

        let resolution = self
            .resolver
            .resolve(&StatusInputs {
                outstanding_balance: owed,
                has_overdue_records: history.has_overdue_records,
                due_date,
                current_date,
                manual_status: record.manual_status,
            })
            .into_value(&mut warnings);
        let status = resolution.status;

        let outstanding_balance = if status.is_closed() {
            Money::ZERO
        } else {
            owed
        };

        let overdue = self
            .tracker
            .report(terms, due_date, current_date, outstanding_balance)?
            .into_value(&mut warnings);

        let profit = self.ledger.summarize(terms, history, status);

        if history.payments_made > 0 {
            if let Some(warning) = self.projector.reconcile(&schedule, history) {
                warnings.emit(warning);
            }
        }

        let scheduled_balance = schedule.balance_after(history.payments_made.min(terms.term_months));

        tracing::debug!(
            loan_id = %record.loan_id,
            %status,
            %outstanding_balance,
            days_overdue = overdue.days_overdue,
            "loan evaluated"
        );

        Ok(LoanEvaluation {
            loan_id: record.loan_id,
            evaluated_on: current_date,
            due_date,
            principal: terms.principal,
            monthly_payment: schedule.monthly_payment,
            total_interest,
            projected_profit: profit.projected_profit,
            outstanding_balance,
            scheduled_balance,
            principal_remaining: self.projector.principal_remaining(terms, history),
            status,
            status_reason: resolution.reason,
            overdue_record_required: resolution.overdue_record_required,
            days_overdue: overdue.days_overdue,
            overdue_cycles: overdue.cycles,
            realized_profit: profit.realized_profit,
            total_profit: profit.total_profit,
            next_due_date: schedule.next_due_after(current_date).map(|e| e.due_date),
            progress: RepaymentProgress::on(&schedule, history, current_date),
            warnings: warnings.into_vec(),
        })
    }

    /// evaluate many loans; a failing loan does not stop the others
    pub fn evaluate_all<'a, I>(&self, records: I, current_date: NaiveDate) -> Vec<(LoanId, Result<LoanEvaluation>)>
    where
        I: IntoIterator<Item = &'a LoanRecord>,
    {
        records
            .into_iter()
            .map(|record| (record.loan_id, self.evaluate_on(record, current_date)))
            .collect()
    }
}

impl Default for LoanEngine {
    fn default() -> Self {
        Self::with_validated(EngineConfig::default())
    }
}
