//! Payroll aggregation and valuation

pub mod aggregator;
pub mod metrics;

pub use aggregator::{build_summaries, period_label, PayrollAggregator, RateTable};
pub use metrics::{activity_snapshot, activity_trend, employee_metrics};
