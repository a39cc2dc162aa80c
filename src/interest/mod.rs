pub mod profit;
pub mod tiers;

use rust_decimal::Decimal;

use crate::decimal::{Money, Rate};

pub use profit::{ProfitLedger, ProfitSummary};
pub use tiers::{RateCheck, RateValidator};

/// simple interest on `principal` for `months` periods at a monthly rate
pub fn flat_interest(principal: Money, rate: Rate, months: u32) -> Money {
    principal * (rate.as_decimal() * Decimal::from(months))
}

/// growth factor `(1 + r)^n`, computed by repeated multiplication
pub fn compound_factor(rate: Rate, periods: u32) -> Decimal {
    let base = Decimal::ONE + rate.as_decimal();
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor *= base;
    }
    factor
}
