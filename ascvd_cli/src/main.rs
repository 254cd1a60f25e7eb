use ascvd_core::config::OutputFormat;
use ascvd_core::*;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ascvd")]
#[command(about = "ASCVD cardiovascular risk calculator", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override config file location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Ten-year risk from the Pooled Cohort Equations (ages 40-79)
    TenYear {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Show the quadrant and linear predictor behind the score
        #[arg(long)]
        explain: bool,
    },

    /// Lifetime risk from risk-factor tiers (ages 20-59)
    Lifetime {
        #[command(flatten)]
        profile: ProfileArgs,
    },

    /// Lowest achievable risk for an age and sex
    Optimal {
        #[arg(long)]
        age: u32,

        #[arg(long)]
        sex: Sex,

        #[arg(long)]
        race: Option<Race>,
    },

    /// Projected risk reduction from interventions (statin, sysBP, aspirin, smoker)
    Project {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Risk horizon to project against (ten or lifetime)
        #[arg(long, default_value = "ten")]
        horizon: Horizon,

        /// Intervention tag; repeat for several
        #[arg(long = "intervention", short = 'i', action = ArgAction::Append)]
        interventions: Vec<String>,
    },

    /// Every estimate for one profile
    Report {
        #[command(flatten)]
        profile: ProfileArgs,

        /// Override the configured projection horizon
        #[arg(long)]
        horizon: Option<Horizon>,

        /// Override the configured interventions; repeat for several
        #[arg(long = "intervention", short = 'i', action = ArgAction::Append)]
        interventions: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Score a CSV file of profiles into a CSV of results
    Batch {
        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        output: PathBuf,
    },
}

/// Clinical inputs, either as flags or from a JSON profile file
#[derive(Args)]
struct ProfileArgs {
    /// Read the profile from a JSON file
    #[arg(long, conflicts_with_all = [
        "age", "sex", "race", "total_cholesterol", "hdl", "systolic_bp",
        "bp_treatment", "smoking", "diabetic",
    ])]
    profile: Option<PathBuf>,

    /// Age in years
    #[arg(long, required_unless_present = "profile")]
    age: Option<u32>,

    /// male or female
    #[arg(long, required_unless_present = "profile")]
    sex: Option<Sex>,

    /// black or other (defaults to the configured race)
    #[arg(long)]
    race: Option<Race>,

    /// Total cholesterol, mg/dL
    #[arg(long, required_unless_present = "profile")]
    total_cholesterol: Option<f64>,

    /// HDL cholesterol, mg/dL
    #[arg(long, required_unless_present = "profile")]
    hdl: Option<f64>,

    /// Systolic blood pressure, mmHg
    #[arg(long, required_unless_present = "profile")]
    systolic_bp: Option<f64>,

    /// On blood pressure medication (yes/no)
    #[arg(long, default_value = "no", value_parser = parse_yes_no, action = ArgAction::Set)]
    bp_treatment: bool,

    /// never, former or current
    #[arg(long, default_value = "never")]
    smoking: SmokingStatus,

    /// Diabetic (yes/no)
    #[arg(long, default_value = "no", value_parser = parse_yes_no, action = ArgAction::Set)]
    diabetic: bool,
}

fn parse_yes_no(value: &str) -> std::result::Result<bool, String> {
    parse_flag("flag", value).map_err(|e| e.to_string())
}

fn missing(field: &'static str) -> Error {
    Error::InvalidInput {
        field,
        reason: "is required".into(),
    }
}

impl ProfileArgs {
    fn resolve(&self, config: &Config) -> Result<ClinicalProfile> {
        let profile = match &self.profile {
            Some(path) => load_profile(path, config.defaults.race)?,
            None => ClinicalProfile {
                age: self.age.ok_or_else(|| missing("age"))?,
                sex: self.sex.ok_or_else(|| missing("sex"))?,
                race: self.race.unwrap_or(config.defaults.race),
                total_cholesterol: self
                    .total_cholesterol
                    .ok_or_else(|| missing("total_cholesterol"))?,
                hdl_cholesterol: self.hdl.ok_or_else(|| missing("hdl"))?,
                systolic_blood_pressure: self.systolic_bp.ok_or_else(|| missing("systolic_bp"))?,
                on_hypertension_treatment: self.bp_treatment,
                smoker: self.smoking.is_smoker(),
                diabetic: self.diabetic,
            },
        };

        profile.validate()?;
        tracing::debug!("Resolved profile: {:?}", profile);
        Ok(profile)
    }
}

fn load_profile(path: &Path, default_race: Race) -> Result<ClinicalProfile> {
    let contents = std::fs::read_to_string(path)?;
    let profile = ClinicalProfile::from_json(&contents, default_race)?;
    tracing::debug!("Loaded profile from {:?}", path);
    Ok(profile)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep stdout clean unless asked
    ascvd_core::logging::init_with_level(if cli.verbose { "debug" } else { "warn" });

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    match cli.command {
        Commands::TenYear { profile, explain } => cmd_ten_year(&profile.resolve(&config)?, explain),
        Commands::Lifetime { profile } => cmd_lifetime(&profile.resolve(&config)?),
        Commands::Optimal { age, sex, race } => {
            cmd_optimal(age, sex, race.unwrap_or(config.defaults.race))
        }
        Commands::Project {
            profile,
            horizon,
            interventions,
        } => cmd_project(&profile.resolve(&config)?, horizon, &interventions),
        Commands::Report {
            profile,
            horizon,
            interventions,
            json,
        } => {
            let profile = profile.resolve(&config)?;
            let horizon = horizon.unwrap_or(config.projection.horizon);
            let interventions = if interventions.is_empty() {
                config.projection.interventions.clone()
            } else {
                interventions
            };
            let json = json || config.output.format == OutputFormat::Json;
            cmd_report(&profile, horizon, &interventions, json)
        }
        Commands::Batch { input, output } => cmd_batch(&input, &output, &config),
    }
}

fn format_risk(risk: RiskResult, age: u32, min_age: u32, max_age: u32) -> String {
    match risk {
        Some(value) => format!("{:.1}%", value),
        None => format!("n/a (age {} outside {}-{})", age, min_age, max_age),
    }
}

fn cmd_ten_year(profile: &ClinicalProfile, explain: bool) -> Result<()> {
    let breakdown = ten_year_breakdown(profile);
    println!(
        "10-year ASCVD risk: {}",
        format_risk(
            breakdown.map(|b| b.percent()),
            profile.age,
            ten_year::MIN_AGE,
            ten_year::MAX_AGE
        )
    );

    if explain {
        if let Some(b) = breakdown {
            let coefficients = b.quadrant.coefficients();
            println!("  Quadrant:          {:?}", b.quadrant);
            println!("  Linear predictor:  {:.4}", b.linear_predictor);
            println!("  Cohort mean:       {:.4}", coefficients.mean_linear_predictor);
            println!("  Baseline survival: {}", coefficients.baseline_survival);
            println!("  Probability:       {:.6}", b.probability);
        }
    }
    Ok(())
}

fn cmd_lifetime(profile: &ClinicalProfile) -> Result<()> {
    let risk = compute_lifetime_risk(profile);
    let text = format_risk(risk, profile.age, lifetime::MIN_AGE, lifetime::MAX_AGE);
    match risk.and_then(|_| classify_lifetime_tier(profile)) {
        Some(tier) => println!("Lifetime ASCVD risk: {} ({})", text, tier),
        None => println!("Lifetime ASCVD risk: {}", text),
    }
    Ok(())
}

fn cmd_optimal(age: u32, sex: Sex, race: Race) -> Result<()> {
    println!(
        "Lowest 10-year risk:  {}",
        format_risk(
            compute_lowest_ten_year_for(age, sex, race),
            age,
            ten_year::MIN_AGE,
            ten_year::MAX_AGE
        )
    );
    println!(
        "Lowest lifetime risk: {}",
        format_risk(
            compute_lowest_lifetime(age, sex),
            age,
            lifetime::MIN_AGE,
            lifetime::MAX_AGE
        )
    );
    Ok(())
}

fn cmd_project(profile: &ClinicalProfile, horizon: Horizon, tags: &[String]) -> Result<()> {
    for tag in tags {
        if Intervention::from_tag(tag).is_none() {
            tracing::warn!("Unknown intervention '{}' ignored", tag);
        }
    }

    let (min_age, max_age) = match horizon {
        Horizon::Ten => (ten_year::MIN_AGE, ten_year::MAX_AGE),
        Horizon::Lifetime => (lifetime::MIN_AGE, lifetime::MAX_AGE),
    };
    let reduction = compute_potential_risk(tags, horizon, profile);
    println!(
        "Potential risk reduction ({}): {}",
        horizon,
        format_risk(reduction, profile.age, min_age, max_age)
    );
    Ok(())
}

fn cmd_report(
    profile: &ClinicalProfile,
    horizon: Horizon,
    tags: &[String],
    json: bool,
) -> Result<()> {
    let report = RiskReport::build(profile, tags, horizon);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

fn cmd_batch(input: &Path, output: &Path, config: &Config) -> Result<()> {
    let summary = score_csv_file(input, output, config)?;

    println!(
        "✓ Scored {} profiles ({} rejected)",
        summary.scored, summary.rejected
    );
    println!("  Output: {}", output.display());
    Ok(())
}
