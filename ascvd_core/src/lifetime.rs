//! Lifetime ASCVD risk from risk-factor burden tiers.
//!
//! Profiles aged 20-59 are sorted into one of five tiers by how many major
//! risk factors they carry and how far their cholesterol and blood pressure
//! sit from optimal. Each tier maps to a sex-specific lifetime percentage.

use crate::coefficients::LifetimeRiskTable;
use crate::{ClinicalProfile, RiskResult};
use serde::Serialize;
use std::fmt;

/// Youngest age the lifetime model supports
pub const MIN_AGE: u32 = 20;
/// Oldest age the lifetime model supports
pub const MAX_AGE: u32 = 59;

/// Risk-factor burden tier, worst first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum LifetimeTier {
    /// Two or more major risk factors
    #[serde(rename = "major2")]
    TwoOrMoreMajor,
    /// Exactly one major risk factor
    #[serde(rename = "major1")]
    OneMajor,
    /// No major factors but elevated cholesterol or blood pressure
    #[serde(rename = "elevated")]
    Elevated,
    /// Not elevated, but not optimal either
    #[serde(rename = "notOptimal")]
    NotOptimal,
    /// Every factor optimal
    #[serde(rename = "allOptimal")]
    AllOptimal,
}

impl LifetimeTier {
    pub fn label(self) -> &'static str {
        match self {
            LifetimeTier::TwoOrMoreMajor => "major2",
            LifetimeTier::OneMajor => "major1",
            LifetimeTier::Elevated => "elevated",
            LifetimeTier::NotOptimal => "notOptimal",
            LifetimeTier::AllOptimal => "allOptimal",
        }
    }

    pub fn percent(self, table: &LifetimeRiskTable) -> f64 {
        match self {
            LifetimeTier::TwoOrMoreMajor => table.two_or_more_major,
            LifetimeTier::OneMajor => table.one_major,
            LifetimeTier::Elevated => table.elevated_only,
            LifetimeTier::NotOptimal => table.not_optimal,
            LifetimeTier::AllOptimal => table.all_optimal,
        }
    }
}

impl fmt::Display for LifetimeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Number of major risk factors present
///
/// SBP >= 160 and being on treatment are counted separately, so a treated
/// patient with a high reading contributes two.
pub fn major_risk_factor_count(profile: &ClinicalProfile) -> u32 {
    let tc = profile.total_cholesterol;
    let sbp = profile.systolic_blood_pressure;

    u32::from(tc >= 240.0)
        + u32::from(sbp >= 160.0)
        + u32::from(profile.on_hypertension_treatment)
        + u32::from(profile.smoker)
        + u32::from(profile.diabetic)
}

/// Assign a profile to its lifetime tier
///
/// Every flag is evaluated independently and the worst applicable tier
/// wins. Returns `None` when no tier applies; for finite readings the
/// tiers cover every case, so in practice this means a NaN slipped in.
pub fn classify_lifetime_tier(profile: &ClinicalProfile) -> Option<LifetimeTier> {
    let tc = profile.total_cholesterol;
    let sbp = profile.systolic_blood_pressure;
    let untreated = !profile.on_hypertension_treatment;

    let major = major_risk_factor_count(profile);
    let elevated = major == 0
        && ((200.0..240.0).contains(&tc) || ((140.0..160.0).contains(&sbp) && untreated));
    let all_optimal = major == 0 && tc < 180.0 && sbp < 120.0 && untreated;
    let not_optimal = major == 0
        && !elevated
        && ((180.0..200.0).contains(&tc) || ((120.0..140.0).contains(&sbp) && untreated));

    if major > 1 {
        Some(LifetimeTier::TwoOrMoreMajor)
    } else if major == 1 {
        Some(LifetimeTier::OneMajor)
    } else if elevated {
        Some(LifetimeTier::Elevated)
    } else if not_optimal {
        Some(LifetimeTier::NotOptimal)
    } else if all_optimal {
        Some(LifetimeTier::AllOptimal)
    } else {
        None
    }
}

/// Lifetime risk of ASCVD as a percentage
pub fn compute_lifetime_risk(profile: &ClinicalProfile) -> RiskResult {
    if !(MIN_AGE..=MAX_AGE).contains(&profile.age) {
        tracing::debug!(
            "Age {} outside lifetime range [{}, {}]",
            profile.age,
            MIN_AGE,
            MAX_AGE
        );
        return None;
    }

    if !profile.has_scorable_measurements() {
        tracing::debug!("Profile has non-positive measurements, no lifetime score");
        return None;
    }

    let table = LifetimeRiskTable::for_sex(profile.sex);
    match classify_lifetime_tier(profile) {
        Some(tier) => Some(tier.percent(table)),
        None => {
            tracing::debug!("No lifetime tier matched, scoring as 0");
            Some(0.0)
        }
    }
}
