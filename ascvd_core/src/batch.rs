//! CSV batch scoring.
//!
//! Each input row is one profile. Every row produces an output row: rows
//! that cannot be parsed or validated carry an `error` column instead of
//! scores, so one bad line never sinks a whole file.

use crate::types::{parse_flag, parse_smoker};
use crate::{ClinicalProfile, Config, Error, Race, Result, RiskReport};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// A row of the input CSV, kept as text so each field can report its own error
#[derive(Debug, Deserialize)]
struct InputRow {
    #[serde(default)]
    id: Option<String>,
    age: String,
    sex: String,
    #[serde(default)]
    race: Option<String>,
    total_cholesterol: String,
    hdl: String,
    systolic_bp: String,
    bp_treatment: String,
    smoker: String,
    diabetic: String,
}

impl InputRow {
    fn to_profile(&self, default_race: Race) -> Result<ClinicalProfile> {
        let race = match self.race.as_deref().map(str::trim) {
            Some(race) if !race.is_empty() => race.parse()?,
            _ => default_race,
        };

        let profile = ClinicalProfile {
            age: parse_number("age", &self.age)?,
            sex: self.sex.parse()?,
            race,
            total_cholesterol: parse_number("total_cholesterol", &self.total_cholesterol)?,
            hdl_cholesterol: parse_number("hdl", &self.hdl)?,
            systolic_blood_pressure: parse_number("systolic_bp", &self.systolic_bp)?,
            on_hypertension_treatment: parse_flag("bp_treatment", &self.bp_treatment)?,
            smoker: parse_smoker(&self.smoker)?,
            diabetic: parse_flag("diabetic", &self.diabetic)?,
        };
        profile.validate()?;
        Ok(profile)
    }
}

fn parse_number<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput {
            field,
            reason: format!("'{}' is not a number", value.trim()),
        })
}

/// A row in the CSV output
#[derive(Debug, Default, Serialize)]
struct OutputRow {
    id: String,
    ten_year_risk: Option<f64>,
    lifetime_risk: Option<f64>,
    lifetime_tier: Option<&'static str>,
    lowest_ten_year_risk: Option<f64>,
    lowest_lifetime_risk: Option<f64>,
    potential_risk_reduction: Option<f64>,
    error: Option<String>,
}

impl OutputRow {
    fn scored(id: String, report: &RiskReport) -> Self {
        Self {
            id,
            ten_year_risk: report.ten_year_risk,
            lifetime_risk: report.lifetime_risk,
            lifetime_tier: report.lifetime_tier.map(|t| t.label()),
            lowest_ten_year_risk: report.lowest_ten_year_risk,
            lowest_lifetime_risk: report.lowest_lifetime_risk,
            potential_risk_reduction: report.potential_risk_reduction,
            error: None,
        }
    }

    fn rejected(id: String, error: &Error) -> Self {
        Self {
            id,
            error: Some(error.to_string()),
            ..Self::default()
        }
    }
}

/// Counts from a batch run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub scored: usize,
    pub rejected: usize,
}

impl BatchSummary {
    pub fn total(&self) -> usize {
        self.scored + self.rejected
    }
}

/// Score every profile in `input`, writing one result row per input row
pub fn score_csv<R: Read, W: Write>(input: R, output: W, config: &Config) -> Result<BatchSummary> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut writer = csv::Writer::from_writer(output);
    let mut summary = BatchSummary::default();

    let tags = &config.projection.interventions;
    let horizon = config.projection.horizon;

    for (index, row) in reader.deserialize::<InputRow>().enumerate() {
        let line = index + 1;
        let (id, profile) = match row {
            Ok(row) => {
                let id = row
                    .id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| line.to_string());
                let profile = row.to_profile(config.defaults.race);
                (id, profile)
            }
            Err(e) => (line.to_string(), Err(Error::from(e))),
        };

        let out = match profile {
            Ok(profile) => {
                summary.scored += 1;
                OutputRow::scored(id, &RiskReport::build(&profile, tags, horizon))
            }
            Err(e) => {
                tracing::warn!("Rejected row {} ({}): {}", line, id, e);
                summary.rejected += 1;
                OutputRow::rejected(id, &e)
            }
        };
        writer.serialize(out)?;
    }

    writer.flush()?;
    tracing::info!(
        "Scored {} rows ({} rejected)",
        summary.scored,
        summary.rejected
    );
    Ok(summary)
}

/// Score a CSV file into another CSV file
///
/// The output is written to a temp file beside `output_path` and renamed
/// into place once complete, so a failed run never leaves a partial file.
pub fn score_csv_file(input_path: &Path, output_path: &Path, config: &Config) -> Result<BatchSummary> {
    let input = std::fs::File::open(input_path)?;

    let parent = match output_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent)?;
    let temp = NamedTempFile::new_in(parent)?;

    let summary = score_csv(std::io::BufReader::new(input), temp.as_file(), config)?;
    temp.as_file().sync_all()?;
    temp.persist(output_path).map_err(|e| Error::Io(e.error))?;

    tracing::info!("Wrote batch results to {:?}", output_path);
    Ok(summary)
}
