//! Metrics definitions for the authentication service.
//!
//! All metrics follow Prometheus naming conventions:
//! - `auth_` prefix for this service
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - login `status`: success, not_found, mismatch, timeout, error
//! - signup `status`: success, duplicate, invalid, timeout, error

use metrics::{counter, histogram};
use std::time::Duration;

/// Record a login attempt outcome and duration.
///
/// Metrics: `auth_login_duration_seconds`, `auth_login_total`
pub fn record_login(status: &str, duration: Duration) {
    histogram!("auth_login_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("auth_login_total", "status" => status.to_string()).increment(1);
}

/// Record a signup attempt outcome.
///
/// Metric: `auth_signup_total`
pub fn record_signup(status: &str) {
    counter!("auth_signup_total", "status" => status.to_string()).increment(1);
}
