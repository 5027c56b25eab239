//! Time record validation rules

use chrono::NaiveDate;
use payline_domain::constants::{MAX_RECORD_HOURS, MIN_RECORD_HOURS};
use payline_domain::NewTimeRecord;

pub const WORKER_REQUIRED: &str = "EmployeeId is required.";
pub const HOURS_OUT_OF_RANGE: &str = "Hours must be between 0–24.";
pub const DATE_IN_FUTURE: &str = "Date cannot be in the future.";

/// Every rule, in evaluation order.
pub const RULES: [&str; 3] = [WORKER_REQUIRED, HOURS_OUT_OF_RANGE, DATE_IN_FUTURE];

/// Check a candidate record against every rule.
///
/// Returns the violated rules in order; an empty list means the record is
/// valid. `today` is the caller's notion of the current day.
pub fn validate(record: &NewTimeRecord, today: NaiveDate) -> Vec<String> {
    let mut violations = Vec::new();

    if record.worker_id <= 0 {
        violations.push(WORKER_REQUIRED.to_string());
    }

    // NaN fails both comparisons and is rejected.
    if !(MIN_RECORD_HOURS..=MAX_RECORD_HOURS).contains(&record.hours) {
        violations.push(HOURS_OUT_OF_RANGE.to_string());
    }

    if record.date > today {
        violations.push(DATE_IN_FUTURE.to_string());
    }

    violations
}

pub fn is_valid(record: &NewTimeRecord, today: NaiveDate) -> bool {
    validate(record, today).is_empty()
}
