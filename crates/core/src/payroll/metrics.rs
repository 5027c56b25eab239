//! Per-worker payroll breakdown and activity trend

use chrono::{Duration, NaiveDate};
use payline_domain::constants::{
    COMMISSION_RATE_PERCENT, TAX_RATE_PERCENT, TREND_THRESHOLD_PERCENT, TREND_WINDOW_DAYS,
};
use payline_domain::{ActivitySnapshot, ActivityTrend, EmployeeMetrics, PayrollSummary, TimeRecord};
use rust_decimal::Decimal;

fn percent_of(amount: Decimal, percent: u32) -> Decimal {
    amount * Decimal::from(percent) / Decimal::ONE_HUNDRED
}

/// Gross, tax, commission and net pay for a worker's summary plus the
/// activity snapshot over `records` (the worker's full history).
pub fn employee_metrics(
    summary: &PayrollSummary,
    records: &[TimeRecord],
    today: NaiveDate,
) -> EmployeeMetrics {
    let gross_pay = summary.total_pay;
    let tax_amount = percent_of(gross_pay, TAX_RATE_PERCENT);
    let commission_amount = percent_of(gross_pay, COMMISSION_RATE_PERCENT);

    EmployeeMetrics {
        worker_id: summary.worker_id,
        period: summary.period.clone(),
        total_hours: summary.total_hours,
        hourly_rate: summary.hourly_rate,
        gross_pay,
        tax_amount,
        commission_amount,
        net_pay: gross_pay - tax_amount - commission_amount,
        tax_rate_percent: Decimal::from(TAX_RATE_PERCENT),
        commission_rate_percent: Decimal::from(COMMISSION_RATE_PERCENT),
        activity: activity_snapshot(records, today),
    }
}

pub fn activity_snapshot(records: &[TimeRecord], today: NaiveDate) -> ActivitySnapshot {
    let first_entry = records.iter().map(|r| r.date).min();
    let last_entry = records.iter().map(|r| r.date).max();

    let (Some(first), Some(last)) = (first_entry, last_entry) else {
        return ActivitySnapshot::default();
    };

    let span_days = (last - first).num_days() + 1;
    let total: f64 = records.iter().map(|r| r.hours).sum();

    ActivitySnapshot {
        average_hours_per_day: total / span_days as f64,
        first_entry,
        last_entry,
        trend: activity_trend(records, today),
    }
}

/// Compare the trailing window `[today-6, today]` with the one before it.
pub fn activity_trend(records: &[TimeRecord], today: NaiveDate) -> ActivityTrend {
    let trailing_start = today - Duration::days(TREND_WINDOW_DAYS - 1);
    let prior_start = today - Duration::days(2 * TREND_WINDOW_DAYS - 1);
    let prior_end = today - Duration::days(TREND_WINDOW_DAYS);

    let hours_between = |from: NaiveDate, to: NaiveDate| -> f64 {
        records.iter().filter(|r| r.date >= from && r.date <= to).map(|r| r.hours).sum()
    };

    let trailing = hours_between(trailing_start, today);
    let prior = hours_between(prior_start, prior_end);
    let threshold = f64::from(TREND_THRESHOLD_PERCENT) / 100.0;

    if trailing > prior * (1.0 + threshold) {
        ActivityTrend::Increasing
    } else if trailing < prior * (1.0 - threshold) {
        ActivityTrend::Decreasing
    } else {
        ActivityTrend::Stable
    }
}
