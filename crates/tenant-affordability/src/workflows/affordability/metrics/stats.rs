use chrono::{Datelike, Months, NaiveDate};

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator); zero for fewer than two values.
pub(crate) fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}

/// Round half away from zero to two decimals. Non-finite input becomes zero.
pub(crate) fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Fractional months between two dates. Zero when the dates coincide.
pub(crate) fn months_between(first: NaiveDate, last: NaiveDate, days_per_month: f64) -> f64 {
    if days_per_month <= 0.0 {
        return 0.0;
    }
    let span_days = (last - first).num_days().max(0) as f64;
    span_days / days_per_month
}

/// First day of a trailing window of `months` calendar months ending at `now`.
pub(crate) fn window_start(now: NaiveDate, months: u32) -> NaiveDate {
    now.checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN)
}

pub(crate) fn within_window(date: NaiveDate, now: NaiveDate, months: u32) -> bool {
    date >= window_start(now, months) && date <= now
}

/// Last day of each of the `count` months preceding `now`'s month, most recent first.
pub(crate) fn month_end_boundaries(now: NaiveDate, count: u32) -> Vec<NaiveDate> {
    let Some(first_of_month) = now.with_day(1) else {
        return Vec::new();
    };

    (0..count)
        .filter_map(|offset| {
            first_of_month
                .checked_sub_months(Months::new(offset))
                .and_then(|start| start.pred_opt())
        })
        .collect()
}
