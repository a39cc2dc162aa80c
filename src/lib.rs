pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod interest;
pub mod overdue;
pub mod payments;
pub mod portfolio;
pub mod state;
pub mod status;
pub mod terms;
pub mod types;
pub mod warnings;

// re-export key types
pub use config::{EngineConfig, RateTiers};
pub use decimal::{Money, Rate};
pub use engine::{LoanEngine, LoanEvaluation};
pub use errors::{LoanError, Result};
pub use interest::{ProfitLedger, ProfitSummary, RateCheck, RateValidator};
pub use overdue::{OverdueCycle, OverdueReport, OverdueTracker};
pub use payments::{
    AmortizationCalculator, AmortizationSchedule, BalanceProjector, RepaymentProgress,
    ScheduleEntry,
};
pub use portfolio::{PortfolioSummary, StatusBucket};
pub use state::{LoanRecord, PaymentHistory};
pub use status::{LoanStatusResolver, StatusInputs, StatusReason, StatusResolution};
pub use terms::LoanTerms;
pub use types::{LoanId, LoanStatus, TieBreak};
pub use warnings::{Checked, Warning, Warnings};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
