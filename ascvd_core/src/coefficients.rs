//! Constant coefficient tables for the ten-year and lifetime models.
//!
//! The ten-year tables are the race/sex-specific Cox model fits published
//! with the 2013 ACC/AHA Pooled Cohort Equations. Terms a quadrant does not
//! use carry a coefficient of zero so every quadrant shares one formula.

use crate::{Race, Sex};
use serde::Serialize;

/// Coefficients for one (race, sex) quadrant of the ten-year model
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CohortCoefficients {
    /// Baseline 10-year survival at mean risk
    pub baseline_survival: f64,
    /// Mean linear predictor of the reference cohort
    pub mean_linear_predictor: f64,
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

pub const BLACK_FEMALE: CohortCoefficients = CohortCoefficients {
    baseline_survival: 0.95334,
    mean_linear_predictor: 86.6081,
    ln_age: 17.1141,
    ln_age_squared: 0.0,
    ln_total_cholesterol: 0.9396,
    ln_age_x_ln_total_cholesterol: 0.0,
    ln_hdl: -18.9196,
    ln_age_x_ln_hdl: 4.4748,
    ln_treated_sbp: 29.2907,
    ln_age_x_ln_treated_sbp: -6.4321,
    ln_untreated_sbp: 27.8197,
    ln_age_x_ln_untreated_sbp: -6.0873,
    smoker: 0.6908,
    ln_age_x_smoker: 0.0,
    diabetic: 0.8738,
};

pub const OTHER_FEMALE: CohortCoefficients = CohortCoefficients {
    baseline_survival: 0.96652,
    mean_linear_predictor: -29.1817,
    ln_age: -29.799,
    ln_age_squared: 4.884,
    ln_total_cholesterol: 13.54,
    ln_age_x_ln_total_cholesterol: -3.114,
    ln_hdl: -13.578,
    ln_age_x_ln_hdl: 3.149,
    ln_treated_sbp: 2.019,
    ln_age_x_ln_treated_sbp: 0.0,
    ln_untreated_sbp: 1.957,
    ln_age_x_ln_untreated_sbp: 0.0,
    smoker: 7.574,
    ln_age_x_smoker: -1.665,
    diabetic: 0.661,
};

pub const BLACK_MALE: CohortCoefficients = CohortCoefficients {
    baseline_survival: 0.89536,
    mean_linear_predictor: 19.5425,
    ln_age: 2.469,
    ln_age_squared: 0.0,
    ln_total_cholesterol: 0.302,
    ln_age_x_ln_total_cholesterol: 0.0,
    ln_hdl: -0.307,
    ln_age_x_ln_hdl: 0.0,
    ln_treated_sbp: 1.916,
    ln_age_x_ln_treated_sbp: 0.0,
    ln_untreated_sbp: 1.809,
    ln_age_x_ln_untreated_sbp: 0.0,
    smoker: 0.549,
    ln_age_x_smoker: 0.0,
    diabetic: 0.645,
};

pub const OTHER_MALE: CohortCoefficients = CohortCoefficients {
    baseline_survival: 0.91436,
    mean_linear_predictor: 61.1816,
    ln_age: 12.344,
    ln_age_squared: 0.0,
    ln_total_cholesterol: 11.853,
    ln_age_x_ln_total_cholesterol: -2.664,
    ln_hdl: -7.99,
    ln_age_x_ln_hdl: 1.769,
    ln_treated_sbp: 1.797,
    ln_age_x_ln_treated_sbp: 0.0,
    ln_untreated_sbp: 1.764,
    ln_age_x_ln_untreated_sbp: 0.0,
    smoker: 7.837,
    ln_age_x_smoker: -1.795,
    diabetic: 0.658,
};

/// One of the four race/sex strata of the ten-year model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quadrant {
    BlackFemale,
    OtherFemale,
    BlackMale,
    OtherMale,
}

impl Quadrant {
    pub fn of(race: Race, sex: Sex) -> Self {
        match (race, sex) {
            (Race::Black, Sex::Female) => Quadrant::BlackFemale,
            (Race::Other, Sex::Female) => Quadrant::OtherFemale,
            (Race::Black, Sex::Male) => Quadrant::BlackMale,
            (Race::Other, Sex::Male) => Quadrant::OtherMale,
        }
    }

    pub fn coefficients(self) -> &'static CohortCoefficients {
        match self {
            Quadrant::BlackFemale => &BLACK_FEMALE,
            Quadrant::OtherFemale => &OTHER_FEMALE,
            Quadrant::BlackMale => &BLACK_MALE,
            Quadrant::OtherMale => &OTHER_MALE,
        }
    }
}

/// Lifetime risk percentages for each risk-factor tier
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LifetimeRiskTable {
    pub two_or_more_major: f64,
    pub one_major: f64,
    pub elevated_only: f64,
    pub not_optimal: f64,
    pub all_optimal: f64,
}

pub const LIFETIME_FEMALE: LifetimeRiskTable = LifetimeRiskTable {
    two_or_more_major: 50.0,
    one_major: 39.0,
    elevated_only: 39.0,
    not_optimal: 27.0,
    all_optimal: 8.0,
};

pub const LIFETIME_MALE: LifetimeRiskTable = LifetimeRiskTable {
    two_or_more_major: 69.0,
    one_major: 50.0,
    elevated_only: 46.0,
    not_optimal: 36.0,
    all_optimal: 5.0,
};

impl LifetimeRiskTable {
    pub fn for_sex(sex: Sex) -> &'static LifetimeRiskTable {
        match sex {
            Sex::Female => &LIFETIME_FEMALE,
            Sex::Male => &LIFETIME_MALE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quadrant_dispatch() {
        assert_eq!(Quadrant::of(Race::Black, Sex::Female), Quadrant::BlackFemale);
        assert_eq!(Quadrant::of(Race::Other, Sex::Male), Quadrant::OtherMale);
        assert_eq!(
            Quadrant::of(Race::Black, Sex::Male).coefficients().baseline_survival,
            0.89536
        );
        assert_eq!(
            Quadrant::of(Race::Other, Sex::Female)
                .coefficients()
                .mean_linear_predictor,
            -29.1817
        );
    }

    #[test]
    fn test_only_other_female_uses_age_squared() {
        for quadrant in [Quadrant::BlackFemale, Quadrant::BlackMale, Quadrant::OtherMale] {
            assert_eq!(quadrant.coefficients().ln_age_squared, 0.0);
        }
        assert_eq!(OTHER_FEMALE.ln_age_squared, 4.884);
    }

    #[test]
    fn test_lifetime_tables_are_ordered() {
        for table in [LIFETIME_FEMALE, LIFETIME_MALE] {
            assert!(table.two_or_more_major >= table.one_major);
            assert!(table.one_major >= table.elevated_only);
            assert!(table.elevated_only >= table.not_optimal);
            assert!(table.not_optimal >= table.all_optimal);
        }
    }
}
