use lazy_static::lazy_static;
use prometheus::{register_counter_vec, CounterVec};

use crate::error::AppResult;

lazy_static! {
    pub static ref ANNOUNCEMENT_OPERATIONS: CounterVec = register_counter_vec!(
        "announcements_operations_total",
        "Announcement operations by kind and outcome",
        &["operation", "outcome"]
    ).unwrap();
}

/// Count one finished operation, labelled with its outcome.
pub fn record<T>(operation: &str, result: &AppResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    ANNOUNCEMENT_OPERATIONS
        .with_label_values(&[operation, outcome])
        .inc();
}
