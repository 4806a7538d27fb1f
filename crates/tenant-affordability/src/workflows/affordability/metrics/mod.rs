mod cushion;
mod debt;
mod income;
mod savings;
pub(crate) mod stats;

pub use cushion::{CushionEstimate, MonthEndBalance};
pub use income::IncomeAnalysis;

pub(crate) use cushion::estimate_cushion;
pub(crate) use debt::debt_to_income_ratio;
pub(crate) use income::analyze_income;
pub(crate) use savings::behavioral_savings_rate;
