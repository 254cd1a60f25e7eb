//! Lowest achievable risk for an age and sex.
//!
//! Both estimators are re-run against a fixed "ideal" profile; the result is
//! the floor that projected risk reductions are clamped to.

use crate::{compute_lifetime_risk, compute_ten_year_score, ClinicalProfile, Race, RiskResult, Sex};

pub const OPTIMAL_SYSTOLIC_BP: f64 = 90.0;
pub const OPTIMAL_TOTAL_CHOLESTEROL: f64 = 130.0;
pub const OPTIMAL_HDL: f64 = 100.0;

impl ClinicalProfile {
    /// Profile with every modifiable factor at its optimal value
    pub fn optimal(age: u32, sex: Sex, race: Race) -> Self {
        Self {
            age,
            sex,
            race,
            total_cholesterol: OPTIMAL_TOTAL_CHOLESTEROL,
            hdl_cholesterol: OPTIMAL_HDL,
            systolic_blood_pressure: OPTIMAL_SYSTOLIC_BP,
            on_hypertension_treatment: false,
            smoker: false,
            diabetic: false,
        }
    }
}

/// Lowest ten-year risk for age/sex, using the default race grouping
pub fn compute_lowest_ten_year(age: u32, sex: Sex) -> RiskResult {
    compute_lowest_ten_year_for(age, sex, Race::default())
}

/// Lowest ten-year risk for an explicit race grouping
pub fn compute_lowest_ten_year_for(age: u32, sex: Sex, race: Race) -> RiskResult {
    compute_ten_year_score(&ClinicalProfile::optimal(age, sex, race))
}

/// Lowest lifetime risk for age/sex
pub fn compute_lowest_lifetime(age: u32, sex: Sex) -> RiskResult {
    compute_lifetime_risk(&ClinicalProfile::optimal(age, sex, Race::default()))
}
