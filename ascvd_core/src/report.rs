//! Combined risk report for a single profile.

use crate::lifetime::classify_lifetime_tier;
use crate::projection::parse_interventions;
use crate::{
    compute_lifetime_risk, compute_lowest_lifetime, compute_lowest_ten_year_for,
    compute_potential_risk_with, compute_ten_year_score, ClinicalProfile, Horizon, Intervention,
    LifetimeTier, RiskResult,
};
use serde::Serialize;
use std::fmt;

/// Every estimate for one profile, as shown to a user
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskReport {
    pub profile: ClinicalProfile,
    pub ten_year_risk: RiskResult,
    pub lifetime_risk: RiskResult,
    pub lifetime_tier: Option<LifetimeTier>,
    pub lowest_ten_year_risk: RiskResult,
    pub lowest_lifetime_risk: RiskResult,
    pub horizon: Horizon,
    pub interventions: Vec<Intervention>,
    pub potential_risk_reduction: RiskResult,
}

impl RiskReport {
    /// Run every estimator against `profile`
    ///
    /// Unrecognized intervention tags are dropped, same as the projector.
    pub fn build<S: AsRef<str>>(profile: &ClinicalProfile, tags: &[S], horizon: Horizon) -> Self {
        let interventions = parse_interventions(tags);
        let lifetime_risk = compute_lifetime_risk(profile);

        Self {
            profile: *profile,
            ten_year_risk: compute_ten_year_score(profile),
            lifetime_risk,
            lifetime_tier: lifetime_risk.and_then(|_| classify_lifetime_tier(profile)),
            lowest_ten_year_risk: compute_lowest_ten_year_for(profile.age, profile.sex, profile.race),
            lowest_lifetime_risk: compute_lowest_lifetime(profile.age, profile.sex),
            horizon,
            potential_risk_reduction: compute_potential_risk_with(&interventions, horizon, profile),
            interventions,
        }
    }
}

struct Percent(RiskResult);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{:.1}%", value),
            None => write!(f, "n/a"),
        }
    }
}

impl fmt::Display for RiskReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.profile;
        writeln!(
            f,
            "Profile: {} y/o {} ({}), TC {} mg/dL, HDL {} mg/dL, SBP {} mmHg",
            p.age, p.sex, p.race, p.total_cholesterol, p.hdl_cholesterol, p.systolic_blood_pressure
        )?;
        writeln!(f, "  10-year ASCVD risk:      {}", Percent(self.ten_year_risk))?;
        writeln!(f, "  Lowest 10-year risk:     {}", Percent(self.lowest_ten_year_risk))?;
        match self.lifetime_tier {
            Some(tier) => writeln!(
                f,
                "  Lifetime ASCVD risk:     {} ({})",
                Percent(self.lifetime_risk),
                tier
            )?,
            None => writeln!(f, "  Lifetime ASCVD risk:     {}", Percent(self.lifetime_risk))?,
        }
        writeln!(f, "  Lowest lifetime risk:    {}", Percent(self.lowest_lifetime_risk))?;

        let applied: Vec<&str> = self.interventions.iter().map(|i| i.tag()).collect();
        let applied = if applied.is_empty() {
            "none".to_string()
        } else {
            applied.join(", ")
        };
        write!(
            f,
            "  Potential reduction ({}, {}): {}",
            self.horizon,
            applied,
            Percent(self.potential_risk_reduction)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Race, Sex};

    fn young_smoker() -> ClinicalProfile {
        ClinicalProfile {
            age: 45,
            sex: Sex::Male,
            race: Race::Other,
            total_cholesterol: 250.0,
            hdl_cholesterol: 45.0,
            systolic_blood_pressure: 150.0,
            on_hypertension_treatment: false,
            smoker: true,
            diabetic: false,
        }
    }

    #[test]
    fn test_report_collects_every_estimate() {
        let profile = young_smoker();
        let report = RiskReport::build(&profile, &["statin", "sysBP"], Horizon::Lifetime);

        assert_eq!(report.ten_year_risk, compute_ten_year_score(&profile));
        assert_eq!(report.lifetime_risk, Some(69.0));
        assert_eq!(report.lifetime_tier, Some(LifetimeTier::TwoOrMoreMajor));
        assert_eq!(report.lowest_lifetime_risk, Some(5.0));
        assert_eq!(
            report.interventions,
            vec![Intervention::Statin, Intervention::BloodPressure]
        );
        assert_eq!(report.potential_risk_reduction, Some(38.0));
    }

    #[test]
    fn test_report_outside_lifetime_range() {
        let profile = ClinicalProfile {
            age: 70,
            ..young_smoker()
        };
        let report = RiskReport::build(&profile, &["statin", "unknown"], Horizon::Lifetime);

        assert!(report.ten_year_risk.is_some());
        assert_eq!(report.lifetime_risk, None);
        assert_eq!(report.lifetime_tier, None);
        assert_eq!(report.potential_risk_reduction, None);
        assert_eq!(report.interventions, vec![Intervention::Statin]);

        let text = report.to_string();
        assert!(text.contains("Lifetime ASCVD risk:     n/a"));
        assert!(text.contains("Potential reduction (lifetime, statin): n/a"));
    }

    #[test]
    fn test_report_json_shape() {
        let report = RiskReport::build(&young_smoker(), &["statin"], Horizon::Ten);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["lifetime_tier"], "major2");
        assert_eq!(json["horizon"], "ten");
        assert_eq!(json["interventions"][0], "statin");
        assert_eq!(json["profile"]["sex"], "male");
        assert!(json["ten_year_risk"].is_number());
    }

    #[test]
    fn test_report_text() {
        let report = RiskReport::build(&young_smoker(), &["statin", "sysBP"], Horizon::Lifetime);
        let text = report.to_string();
        assert!(text.starts_with("Profile: 45 y/o male (other)"));
        assert!(text.contains("Lifetime ASCVD risk:     69.0% (major2)"));
        assert!(text.contains("Potential reduction (lifetime, statin, sysBP): 38.0%"));
    }
}
