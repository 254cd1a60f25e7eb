//! Ten-year ASCVD risk from the Pooled Cohort Equations.
//!
//! The estimate follows the published model:
//! - Log-transform age, cholesterol, HDL and systolic pressure
//! - Build the 13-term predictor vector (treated/untreated SBP split, age interactions)
//! - Dot it with the race/sex quadrant coefficients
//! - Risk = 1 - S0^exp(lp - mean_lp)

use crate::coefficients::{CohortCoefficients, Quadrant};
use crate::types::round_tenth;
use crate::{ClinicalProfile, RiskResult};
use serde::Serialize;

/// Youngest age the ten-year model supports
pub const MIN_AGE: u32 = 40;
/// Oldest age the ten-year model supports
pub const MAX_AGE: u32 = 79;

/// Transformed risk factors that enter the linear predictor
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PredictorTerms {
    pub ln_age: f64,
    pub ln_age_squared: f64,
    pub ln_total_cholesterol: f64,
    pub ln_age_x_ln_total_cholesterol: f64,
    pub ln_hdl: f64,
    pub ln_age_x_ln_hdl: f64,
    pub ln_treated_sbp: f64,
    pub ln_age_x_ln_treated_sbp: f64,
    pub ln_untreated_sbp: f64,
    pub ln_age_x_ln_untreated_sbp: f64,
    pub smoker: f64,
    pub ln_age_x_smoker: f64,
    pub diabetic: f64,
}

impl PredictorTerms {
    /// Build the predictor vector for a profile with scorable measurements
    pub fn from_profile(profile: &ClinicalProfile) -> Self {
        let ln_age = f64::from(profile.age).ln();
        let ln_total_cholesterol = profile.total_cholesterol.ln();
        let ln_hdl = profile.hdl_cholesterol.ln();
        let ln_sbp = profile.systolic_blood_pressure.ln();

        // Exactly one of the two SBP terms is non-zero
        let (ln_treated_sbp, ln_untreated_sbp) = if profile.on_hypertension_treatment {
            (ln_sbp, 0.0)
        } else {
            (0.0, ln_sbp)
        };
        let smoker = indicator(profile.smoker);

        Self {
            ln_age,
            ln_age_squared: ln_age * ln_age,
            ln_total_cholesterol,
            ln_age_x_ln_total_cholesterol: ln_age * ln_total_cholesterol,
            ln_hdl,
            ln_age_x_ln_hdl: ln_age * ln_hdl,
            ln_treated_sbp,
            ln_age_x_ln_treated_sbp: ln_age * ln_treated_sbp,
            ln_untreated_sbp,
            ln_age_x_ln_untreated_sbp: ln_age * ln_untreated_sbp,
            smoker,
            ln_age_x_smoker: ln_age * smoker,
            diabetic: indicator(profile.diabetic),
        }
    }

    /// Weighted sum of the terms under one quadrant's coefficients
    pub fn linear_predictor(&self, c: &CohortCoefficients) -> f64 {
        c.ln_age * self.ln_age
            + c.ln_age_squared * self.ln_age_squared
            + c.ln_total_cholesterol * self.ln_total_cholesterol
            + c.ln_age_x_ln_total_cholesterol * self.ln_age_x_ln_total_cholesterol
            + c.ln_hdl * self.ln_hdl
            + c.ln_age_x_ln_hdl * self.ln_age_x_ln_hdl
            + c.ln_treated_sbp * self.ln_treated_sbp
            + c.ln_age_x_ln_treated_sbp * self.ln_age_x_ln_treated_sbp
            + c.ln_untreated_sbp * self.ln_untreated_sbp
            + c.ln_age_x_ln_untreated_sbp * self.ln_age_x_ln_untreated_sbp
            + c.smoker * self.smoker
            + c.ln_age_x_smoker * self.ln_age_x_smoker
            + c.diabetic * self.diabetic
    }
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Intermediate values of a ten-year estimate
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TenYearBreakdown {
    pub quadrant: Quadrant,
    pub terms: PredictorTerms,
    pub linear_predictor: f64,
    /// Unrounded event probability in [0, 1]
    pub probability: f64,
}

impl TenYearBreakdown {
    /// Probability as a percentage, rounded to one decimal place
    pub fn percent(&self) -> f64 {
        round_tenth(self.probability * 100.0)
    }
}

/// Compute every intermediate of the ten-year model
///
/// Returns `None` when the age is outside [40, 79] or when a measurement
/// that enters a logarithm is not a positive finite number.
pub fn ten_year_breakdown(profile: &ClinicalProfile) -> Option<TenYearBreakdown> {
    if !(MIN_AGE..=MAX_AGE).contains(&profile.age) {
        tracing::debug!(
            "Age {} outside ten-year range [{}, {}]",
            profile.age,
            MIN_AGE,
            MAX_AGE
        );
        return None;
    }

    if !profile.has_scorable_measurements() {
        tracing::debug!("Profile has non-positive measurements, no ten-year score");
        return None;
    }

    let quadrant = Quadrant::of(profile.race, profile.sex);
    let coefficients = quadrant.coefficients();
    let terms = PredictorTerms::from_profile(profile);
    let linear_predictor = terms.linear_predictor(coefficients);
    let probability = 1.0
        - coefficients
            .baseline_survival
            .powf((linear_predictor - coefficients.mean_linear_predictor).exp());

    Some(TenYearBreakdown {
        quadrant,
        terms,
        linear_predictor,
        probability,
    })
}

/// Ten-year risk of a first ASCVD event as a percentage
pub fn compute_ten_year_score(profile: &ClinicalProfile) -> RiskResult {
    ten_year_breakdown(profile).map(|b| b.percent())
}
