//! Optional single-number score some callers layer on top of a report. It is not part of
//! [`AffordabilityReport`](super::AffordabilityReport) itself.

use super::metrics::stats::round2;
use super::AffordabilityReport;

/// Disposable-income ratio scaled to 0-10: `(income - expenses) / income * 10`.
pub fn disposable_income_score(monthly_income: f64, monthly_expenses: f64) -> f64 {
    if monthly_income.is_nan() || monthly_income <= 0.0 || !monthly_expenses.is_finite() {
        return 0.0;
    }
    let ratio = (monthly_income - monthly_expenses) / monthly_income;
    round2((ratio * 10.0).clamp(0.0, 10.0))
}

/// Composite score using the report's monthly debt service as the expense figure.
pub fn score_from_report(report: &AffordabilityReport) -> f64 {
    let monthly_debt = report.average_monthly_income * report.enhanced_dti_ratio / 100.0;
    disposable_income_score(report.average_monthly_income, monthly_debt)
}
