//! Core domain types for the ASCVD risk engine.
//!
//! This module defines the fundamental types used throughout the engine:
//! - Demographic enums (sex, race) that select coefficient tables
//! - The clinical profile fed to every estimator
//! - Risk horizons and smoking status parsing

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A risk percentage in [0, 100] rounded to one decimal place, or `None`
/// when the profile falls outside the model's supported range.
pub type RiskResult = Option<f64>;

// ============================================================================
// Demographics
// ============================================================================

/// Biological sex, used to pick coefficient and lifetime tables
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

/// Race grouping used by the Pooled Cohort Equations
///
/// The ten-year model only distinguishes African American from everyone
/// else; the lifetime model ignores race entirely.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Race {
    Black,
    #[default]
    Other,
}

impl FromStr for Sex {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Sex::Male),
            "female" | "f" => Ok(Sex::Female),
            other => Err(Error::invalid(
                "sex",
                format!("unknown value '{}' (expected male or female)", other),
            )),
        }
    }
}

impl FromStr for Race {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "black" | "aa" | "african_american" | "african-american" => Ok(Race::Black),
            "other" | "white" => Ok(Race::Other),
            other => Err(Error::invalid(
                "race",
                format!("unknown value '{}' (expected black or other)", other),
            )),
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "male"),
            Sex::Female => write!(f, "female"),
        }
    }
}

impl fmt::Display for Race {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Race::Black => write!(f, "black"),
            Race::Other => write!(f, "other"),
        }
    }
}

// ============================================================================
// Smoking status and yes/no flags
// ============================================================================

/// Smoking history as collected on intake forms
///
/// Only current smokers count as smokers for scoring purposes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SmokingStatus {
    Never,
    Former,
    Current,
}

impl SmokingStatus {
    pub fn is_smoker(self) -> bool {
        self == SmokingStatus::Current
    }
}

impl FromStr for SmokingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "never" => Ok(SmokingStatus::Never),
            "former" => Ok(SmokingStatus::Former),
            "current" => Ok(SmokingStatus::Current),
            other => Err(Error::invalid(
                "smoking",
                format!("unknown value '{}' (expected never, former or current)", other),
            )),
        }
    }
}

/// Parse a yes/no style flag
pub fn parse_flag(field: &'static str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" => Ok(false),
        other => Err(Error::invalid(
            field,
            format!("expected yes or no, got '{}'", other),
        )),
    }
}

/// Parse a smoker column that may hold either a smoking status or a yes/no flag
pub fn parse_smoker(value: &str) -> Result<bool> {
    match value.parse::<SmokingStatus>() {
        Ok(status) => Ok(status.is_smoker()),
        Err(_) => parse_flag("smoker", value),
    }
}

// ============================================================================
// Horizon
// ============================================================================

/// Which estimator a projection is computed against
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    Ten,
    Lifetime,
}

impl FromStr for Horizon {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ten" | "ten-year" | "ten_year" | "10" => Ok(Horizon::Ten),
            "lifetime" => Ok(Horizon::Lifetime),
            other => Err(Error::invalid(
                "horizon",
                format!("unknown value '{}' (expected ten or lifetime)", other),
            )),
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Horizon::Ten => write!(f, "ten"),
            Horizon::Lifetime => write!(f, "lifetime"),
        }
    }
}

// ============================================================================
// Clinical profile
// ============================================================================

/// The risk factors every estimator reads
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClinicalProfile {
    /// Age in whole years
    pub age: u32,
    pub sex: Sex,
    #[serde(default)]
    pub race: Race,
    /// Total cholesterol, mg/dL
    pub total_cholesterol: f64,
    /// HDL cholesterol, mg/dL
    pub hdl_cholesterol: f64,
    /// Systolic blood pressure, mmHg
    pub systolic_blood_pressure: f64,
    #[serde(default)]
    pub on_hypertension_treatment: bool,
    #[serde(default)]
    pub smoker: bool,
    #[serde(default)]
    pub diabetic: bool,
}

impl ClinicalProfile {
    /// True when every value that enters a logarithm is usable
    pub fn has_scorable_measurements(&self) -> bool {
        self.age > 0
            && is_positive(self.total_cholesterol)
            && is_positive(self.hdl_cholesterol)
            && is_positive(self.systolic_blood_pressure)
    }

    /// Strict validation for callers that want a hard error instead of `None`
    ///
    /// Age ranges are not checked here: an out-of-range age is a valid
    /// profile that a given model simply does not cover.
    pub fn validate(&self) -> Result<()> {
        if self.age == 0 {
            return Err(Error::invalid("age", "must be greater than zero"));
        }
        check_positive("total_cholesterol", self.total_cholesterol)?;
        check_positive("hdl_cholesterol", self.hdl_cholesterol)?;
        check_positive("systolic_blood_pressure", self.systolic_blood_pressure)?;
        Ok(())
    }

    /// Parse a JSON profile, filling a missing `race` with `default_race`
    pub fn from_json(contents: &str, default_race: Race) -> Result<Self> {
        let record: ProfileRecord = serde_json::from_str(contents)?;
        Ok(ClinicalProfile {
            age: record.age,
            sex: record.sex,
            race: record.race.unwrap_or(default_race),
            total_cholesterol: record.total_cholesterol,
            hdl_cholesterol: record.hdl_cholesterol,
            systolic_blood_pressure: record.systolic_blood_pressure,
            on_hypertension_treatment: record.on_hypertension_treatment,
            smoker: record.smoker,
            diabetic: record.diabetic,
        })
    }
}

/// On-disk profile shape; race stays optional until a default is known
#[derive(Deserialize)]
struct ProfileRecord {
    age: u32,
    sex: Sex,
    #[serde(default)]
    race: Option<Race>,
    total_cholesterol: f64,
    hdl_cholesterol: f64,
    systolic_blood_pressure: f64,
    #[serde(default)]
    on_hypertension_treatment: bool,
    #[serde(default)]
    smoker: bool,
    #[serde(default)]
    diabetic: bool,
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn check_positive(field: &'static str, value: f64) -> Result<()> {
    if is_positive(value) {
        Ok(())
    } else {
        Err(Error::invalid(
            field,
            format!("must be a positive number, got {}", value),
        ))
    }
}

/// Round to one decimal place, halves rounding toward positive infinity
pub(crate) fn round_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
