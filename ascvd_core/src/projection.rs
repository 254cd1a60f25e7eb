//! Projected risk reduction under a set of interventions.
//!
//! Each recognized intervention removes an absolute amount from the current
//! score. The amounts are summed (order does not matter) and the result is
//! clamped so the remaining risk never drops below the optimal baseline.

use crate::optimal::{compute_lowest_lifetime, compute_lowest_ten_year_for};
use crate::types::round_tenth;
use crate::{compute_lifetime_risk, compute_ten_year_score, ClinicalProfile, Horizon, RiskResult};
use serde::Serialize;
use std::fmt;

/// Relative reduction from starting a statin
pub const STATIN_REDUCTION: f64 = 0.25;
/// Relative reduction from daily aspirin
pub const ASPIRIN_REDUCTION: f64 = 0.10;
/// Relative reduction from quitting smoking
pub const SMOKING_CESSATION_REDUCTION: f64 = 0.15;
/// Remaining relative risk per 10 mmHg drop in systolic pressure
pub const SBP_RISK_PER_10_MMHG: f64 = 0.7;
/// Systolic pressure that blood-pressure treatment targets
pub const SBP_TARGET: f64 = 140.0;

/// A treatment or lifestyle change the projector knows how to apply
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Intervention {
    #[serde(rename = "statin")]
    Statin,
    #[serde(rename = "sysBP")]
    BloodPressure,
    #[serde(rename = "aspirin")]
    Aspirin,
    #[serde(rename = "smoker")]
    SmokingCessation,
}

impl Intervention {
    pub const ALL: [Intervention; 4] = [
        Intervention::Statin,
        Intervention::BloodPressure,
        Intervention::Aspirin,
        Intervention::SmokingCessation,
    ];

    /// Look up an intervention by its tag; tags are case-sensitive
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "statin" => Some(Intervention::Statin),
            "sysBP" => Some(Intervention::BloodPressure),
            "aspirin" => Some(Intervention::Aspirin),
            "smoker" => Some(Intervention::SmokingCessation),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Intervention::Statin => "statin",
            Intervention::BloodPressure => "sysBP",
            Intervention::Aspirin => "aspirin",
            Intervention::SmokingCessation => "smoker",
        }
    }

    /// Absolute reduction this intervention takes off `score`
    ///
    /// The blood-pressure term goes negative when the reading is already
    /// below target, i.e. it projects an increase. That is kept as-is.
    pub fn reduction(self, score: f64, profile: &ClinicalProfile) -> f64 {
        match self {
            Intervention::Statin => score * STATIN_REDUCTION,
            Intervention::BloodPressure => {
                let steps = (profile.systolic_blood_pressure - SBP_TARGET) / 10.0;
                score - score * SBP_RISK_PER_10_MMHG.powf(steps)
            }
            Intervention::Aspirin => score * ASPIRIN_REDUCTION,
            Intervention::SmokingCessation => score * SMOKING_CESSATION_REDUCTION,
        }
    }
}

impl fmt::Display for Intervention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Resolve tags to interventions, dropping any that are not recognized
pub fn parse_interventions<S: AsRef<str>>(tags: &[S]) -> Vec<Intervention> {
    tags.iter()
        .filter_map(|tag| {
            let tag = tag.as_ref();
            let parsed = Intervention::from_tag(tag);
            if parsed.is_none() {
                tracing::debug!("Ignoring unrecognized intervention tag '{}'", tag);
            }
            parsed
        })
        .collect()
}

/// Score and floor for a horizon
fn score_and_floor(horizon: Horizon, profile: &ClinicalProfile) -> (RiskResult, RiskResult) {
    match horizon {
        Horizon::Ten => (
            compute_ten_year_score(profile),
            compute_lowest_ten_year_for(profile.age, profile.sex, profile.race),
        ),
        Horizon::Lifetime => (
            compute_lifetime_risk(profile),
            compute_lowest_lifetime(profile.age, profile.sex),
        ),
    }
}

/// Potential absolute risk reduction from a list of intervention tags
///
/// Unrecognized tags contribute nothing. Returns `None` when the profile
/// cannot be scored for the chosen horizon.
pub fn compute_potential_risk<S: AsRef<str>>(
    tags: &[S],
    horizon: Horizon,
    profile: &ClinicalProfile,
) -> RiskResult {
    compute_potential_risk_with(&parse_interventions(tags), horizon, profile)
}

/// Potential absolute risk reduction from typed interventions
pub fn compute_potential_risk_with(
    interventions: &[Intervention],
    horizon: Horizon,
    profile: &ClinicalProfile,
) -> RiskResult {
    let (score, floor) = score_and_floor(horizon, profile);
    let score = score?;
    // Both estimators share the age range with their floor
    let floor = floor?;

    let reduced: f64 = interventions
        .iter()
        .map(|i| i.reduction(score, profile))
        .sum();

    if round_tenth(score - reduced) <= floor {
        tracing::debug!(
            "Projected risk {:.1} reaches floor {:.1}, clamping",
            score - reduced,
            floor
        );
        Some(round_tenth(score - floor))
    } else {
        Some(round_tenth(reduced))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Race, Sex};

    fn reference_profile() -> ClinicalProfile {
        ClinicalProfile {
            age: 55,
            sex: Sex::Male,
            race: Race::Other,
            total_cholesterol: 213.0,
            hdl_cholesterol: 50.0,
            systolic_blood_pressure: 120.0,
            on_hypertension_treatment: false,
            smoker: false,
            diabetic: false,
        }
    }

    fn high_risk_profile() -> ClinicalProfile {
        ClinicalProfile {
            age: 60,
            total_cholesterol: 240.0,
            hdl_cholesterol: 40.0,
            systolic_blood_pressure: 150.0,
            on_hypertension_treatment: true,
            smoker: true,
            diabetic: true,
            ..reference_profile()
        }
    }

    fn young_smoker() -> ClinicalProfile {
        ClinicalProfile {
            age: 45,
            total_cholesterol: 250.0,
            hdl_cholesterol: 45.0,
            systolic_blood_pressure: 150.0,
            smoker: true,
            ..reference_profile()
        }
    }

    #[test]
    fn test_tags_round_trip() {
        for intervention in Intervention::ALL {
            assert_eq!(Intervention::from_tag(intervention.tag()), Some(intervention));
        }
        assert_eq!(Intervention::from_tag("Statin"), None);
        assert_eq!(Intervention::from_tag("exercise"), None);
    }

    #[test]
    fn test_single_statin_ten_year() {
        assert_eq!(
            compute_potential_risk(&["statin"], Horizon::Ten, &reference_profile()),
            Some(1.4)
        );
    }

    #[test]
    fn test_unknown_tags_are_ignored() {
        let profile = reference_profile();
        assert_eq!(
            compute_potential_risk(&["statin", "bogus", "STATIN"], Horizon::Ten, &profile),
            compute_potential_risk(&["statin"], Horizon::Ten, &profile)
        );
        assert_eq!(
            parse_interventions(&["yoga", "aspirin"]),
            vec![Intervention::Aspirin]
        );
    }

    #[test]
    fn test_all_interventions_ten_year() {
        let tags = ["statin", "sysBP", "aspirin", "smoker"];
        assert_eq!(
            compute_potential_risk(&tags, Horizon::Ten, &high_risk_profile()),
            Some(37.0)
        );
    }

    #[test]
    fn test_order_does_not_matter() {
        let profile = high_risk_profile();
        let forward = compute_potential_risk(&["statin", "sysBP", "aspirin"], Horizon::Ten, &profile);
        let reverse = compute_potential_risk(&["aspirin", "sysBP", "statin"], Horizon::Ten, &profile);
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_repeat_calls_are_bit_identical() {
        let tags = ["statin", "sysBP", "aspirin", "smoker"];
        for horizon in [Horizon::Ten, Horizon::Lifetime] {
            let profile = young_smoker();
            let a = compute_potential_risk(&tags, horizon, &profile).unwrap();
            let b = compute_potential_risk(&tags, horizon, &profile).unwrap();
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_lifetime_default_interventions() {
        assert_eq!(
            compute_potential_risk(&["statin", "sysBP"], Horizon::Lifetime, &young_smoker()),
            Some(38.0)
        );
    }

    #[test]
    fn test_clamped_to_floor() {
        let profile = ClinicalProfile {
            systolic_blood_pressure: 170.0,
            ..young_smoker()
        };
        // 69% lifetime risk, floor 5%: every reduction together overshoots
        assert_eq!(compute_lifetime_risk(&profile), Some(69.0));
        let tags = ["statin", "sysBP", "aspirin", "smoker"];
        assert_eq!(
            compute_potential_risk(&tags, Horizon::Lifetime, &profile),
            Some(64.0)
        );
    }

    #[test]
    fn test_low_sbp_projects_an_increase() {
        let profile = ClinicalProfile {
            sex: Sex::Female,
            total_cholesterol: 190.0,
            systolic_blood_pressure: 120.0,
            smoker: false,
            ..young_smoker()
        };
        assert_eq!(
            compute_potential_risk(&["sysBP"], Horizon::Lifetime, &profile),
            Some(-28.1)
        );
    }

    #[test]
    fn test_empty_interventions_reduce_nothing() {
        for horizon in [Horizon::Ten, Horizon::Lifetime] {
            let no_tags: [&str; 0] = [];
            assert_eq!(
                compute_potential_risk(&no_tags, horizon, &ClinicalProfile {
                    age: 50,
                    ..high_risk_profile()
                }),
                Some(0.0)
            );
        }
        let optimal = ClinicalProfile::optimal(45, Sex::Male, Race::Other);
        assert_eq!(
            compute_potential_risk_with(&[], Horizon::Lifetime, &optimal),
            Some(0.0)
        );
    }

    #[test]
    fn test_out_of_range_is_none() {
        let old = ClinicalProfile {
            age: 65,
            ..reference_profile()
        };
        assert_eq!(compute_potential_risk(&["statin"], Horizon::Lifetime, &old), None);
        assert!(compute_potential_risk(&["statin"], Horizon::Ten, &old).is_some());

        let young = ClinicalProfile {
            age: 30,
            ..reference_profile()
        };
        assert_eq!(compute_potential_risk(&["statin"], Horizon::Ten, &young), None);
    }

    #[test]
    fn test_remaining_risk_never_below_floor() {
        let tag_sets: [&[&str]; 4] = [
            &["statin"],
            &["statin", "sysBP"],
            &["statin", "sysBP", "aspirin", "smoker"],
            &["statin", "statin", "statin", "statin", "statin"],
        ];
        for age in (40..=70).step_by(5) {
            for race in [Race::Black, Race::Other] {
                for sex in [Sex::Male, Sex::Female] {
                    for sbp in [125.0, 145.0, 175.0] {
                        let profile = ClinicalProfile {
                            age,
                            race,
                            sex,
                            systolic_blood_pressure: sbp,
                            ..high_risk_profile()
                        };
                        let score = compute_ten_year_score(&profile).unwrap();
                        let floor = compute_lowest_ten_year_for(age, sex, race).unwrap();
                        for tags in tag_sets {
                            let reduction =
                                compute_potential_risk(tags, Horizon::Ten, &profile).unwrap();
                            assert!(
                                score - reduction >= floor - 0.1 - 1e-9,
                                "remaining {} under floor {} for {:?} {:?}",
                                score - reduction,
                                floor,
                                tags,
                                profile
                            );
                        }
                    }
                }
            }
        }
    }
}
