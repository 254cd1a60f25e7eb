#![forbid(unsafe_code)]

//! Core risk engine for ASCVD (atherosclerotic cardiovascular disease) estimates.
//!
//! This crate provides:
//! - Ten-year risk from the Pooled Cohort Equations
//! - Lifetime risk from risk-factor burden tiers
//! - Optimal-profile baselines for a given age and sex
//! - Projected risk reduction under interventions
//! - Combined reports, CSV batch scoring, config and logging setup
//!
//! All estimators are pure functions: `None` means the profile falls outside
//! what the model covers, never that something went wrong.

pub mod types;
pub mod error;
pub mod coefficients;
pub mod config;
pub mod logging;
pub mod ten_year;
pub mod lifetime;
pub mod optimal;
pub mod projection;
pub mod report;
pub mod batch;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use ten_year::{compute_ten_year_score, ten_year_breakdown, TenYearBreakdown};
pub use lifetime::{classify_lifetime_tier, compute_lifetime_risk, LifetimeTier};
pub use optimal::{compute_lowest_lifetime, compute_lowest_ten_year, compute_lowest_ten_year_for};
pub use projection::{compute_potential_risk, compute_potential_risk_with, Intervention};
pub use report::RiskReport;
pub use batch::{score_csv, score_csv_file, BatchSummary};
