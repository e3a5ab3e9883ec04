//! BetterRest CLI - Command-line harness for the bedtime engine
//!
//! Commands:
//! - estimate: Recommend a bedtime for one set of inputs
//! - model: Show metadata of the model that would be loaded
//! - doctor: Diagnose model loading and configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveTime;
use tracing_subscriber::EnvFilter;

use betterrest::config::MODEL_PATH_ENV;
use betterrest::display::{
    cups_label, hours_label, render_bedtime, ClockStyle, InputBounds, BEDTIME_HEADLINE,
};
use betterrest::types::{DEFAULT_COFFEE_CUPS, DEFAULT_SLEEP_HOURS};
use betterrest::{
    BedtimeEngine, EngineConfig, EngineState, EstimationInput, WakeTime, BETTERREST_VERSION,
    PRODUCER_NAME,
};

/// BetterRest - Recommend a bedtime from wake time, sleep goal and coffee intake
#[derive(Parser)]
#[command(name = "betterrest")]
#[command(version = BETTERREST_VERSION)]
#[command(about = "Estimate an ideal bedtime", long_about = None)]
struct Cli {
    /// Model artifact to load (overrides BETTERREST_MODEL_PATH)
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recommend a bedtime for one set of inputs
    Estimate {
        /// Desired wake-up time (HH:MM)
        #[arg(long, default_value = "07:00", value_parser = parse_wake)]
        wake: NaiveTime,

        /// Desired amount of sleep in hours
        #[arg(long, default_value_t = DEFAULT_SLEEP_HOURS)]
        sleep: f64,

        /// Daily coffee intake in cups
        #[arg(long, default_value_t = DEFAULT_COFFEE_CUPS)]
        coffee: i32,

        /// Clock style for the printed time
        #[arg(long, default_value = "24h")]
        clock: Clock,

        /// Accept values outside the form's ranges
        #[arg(long)]
        allow_out_of_range: bool,

        /// Output the full estimation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show metadata of the model that would be loaded
    Model {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose model loading and configuration
    Doctor {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum Clock {
    /// 24-hour clock (22:44)
    #[value(name = "24h")]
    TwentyFour,
    /// 12-hour clock (10:44 PM)
    #[value(name = "12h")]
    Twelve,
}

impl From<Clock> for ClockStyle {
    fn from(clock: Clock) -> Self {
        match clock {
            Clock::TwentyFour => ClockStyle::TwentyFourHour,
            Clock::Twelve => ClockStyle::TwelveHour,
        }
    }
}

fn parse_wake(s: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|e| format!("expected HH:MM ({})", e))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), BetterRestCliError> {
    let mut config = EngineConfig::from_env();
    if let Some(path) = cli.model {
        config = config.with_model_path(path);
    }

    match cli.command {
        Commands::Estimate {
            wake,
            sleep,
            coffee,
            clock,
            allow_out_of_range,
            json,
        } => {
            let input = EstimationInput::new(WakeTime::from(wake), sleep, coffee);
            cmd_estimate(&config, input, clock.into(), allow_out_of_range, json)
        }
        Commands::Model { json } => cmd_model(&config, json),
        Commands::Doctor { json } => cmd_doctor(&config, json),
    }
}

fn cmd_estimate(
    config: &EngineConfig,
    input: EstimationInput,
    style: ClockStyle,
    allow_out_of_range: bool,
    json: bool,
) -> Result<(), BetterRestCliError> {
    if !allow_out_of_range {
        let violations = InputBounds::default().check(&input);
        if !violations.is_empty() {
            return Err(BetterRestCliError::OutOfRange(
                violations.iter().map(|v| v.to_string()).collect(),
            ));
        }
    }

    let engine = BedtimeEngine::from_config(config)?;

    if json {
        let report = engine.report(&input)?;
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let result = engine.estimate(&input);
    let text = render_bedtime(Some(&result), style);

    if atty::is(atty::Stream::Stdout) {
        println!(
            "Wake at {}, {} of sleep, {}",
            input.wake,
            hours_label(input.sleep_hours),
            cups_label(input.coffee_cups)
        );
        println!("{}", BEDTIME_HEADLINE);
        println!("{}", text);
    } else {
        println!("{}", text);
    }

    result.map(|_| ()).map_err(BetterRestCliError::from)
}

fn cmd_model(config: &EngineConfig, json: bool) -> Result<(), BetterRestCliError> {
    let source = config.model_source();
    let engine = BedtimeEngine::from_source(&source)?;
    let info = engine.model_info().ok_or(BetterRestCliError::ModelUnavailable)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Model");
        println!("=====");
        println!("Source:   {}", source.describe());
        println!("Name:     {}", info.name);
        println!("Version:  {}", info.version);
        println!("Output:   {}", info.output_unit.as_str());
        println!("Features: {}", info.features.join(", "));
    }

    Ok(())
}

fn cmd_doctor(config: &EngineConfig, json: bool) -> Result<(), BetterRestCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "version".to_string(),
        status: CheckStatus::Ok,
        message: format!("BetterRest version {}", BETTERREST_VERSION),
    });

    let source = config.model_source();
    checks.push(DoctorCheck {
        name: "model_source".to_string(),
        status: CheckStatus::Ok,
        message: match &config.model_path {
            Some(_) => format!(
                "Model path {} (from --model or {})",
                source.describe(),
                MODEL_PATH_ENV
            ),
            None => "Packaged model".to_string(),
        },
    });

    let engine = BedtimeEngine::load_or_unusable(&source);
    match engine.state() {
        EngineState::Ready => {
            let model = engine
                .model_info()
                .map(|info| format!("{} {}", info.name, info.version))
                .unwrap_or_default();
            checks.push(DoctorCheck {
                name: "model".to_string(),
                status: CheckStatus::Ok,
                message: format!("Model loaded ({})", model),
            });

            let check = match engine.estimate(&EstimationInput::default()) {
                Ok(bedtime) => DoctorCheck {
                    name: "estimate".to_string(),
                    status: CheckStatus::Ok,
                    message: format!("Default inputs give a bedtime of {}", bedtime),
                },
                Err(e) => DoctorCheck {
                    name: "estimate".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Default inputs failed: {}", e),
                },
            };
            checks.push(check);
        }
        EngineState::Unusable => {
            checks.push(DoctorCheck {
                name: "model".to_string(),
                status: CheckStatus::Error,
                message: engine
                    .unusable_reason()
                    .unwrap_or("Model failed to load")
                    .to_string(),
            });
        }
    }

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: BETTERREST_VERSION.to_string(),
        engine_state: engine.state(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("BetterRest Doctor Report");
        println!("========================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("Engine:   {}", report.engine_state.as_str());
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(BetterRestCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Error types

#[derive(Debug)]
enum BetterRestCliError {
    Init(betterrest::InitializationError),
    Estimate(betterrest::EstimationError),
    Json(serde_json::Error),
    OutOfRange(Vec<String>),
    ModelUnavailable,
    DoctorFailed,
}

impl From<betterrest::InitializationError> for BetterRestCliError {
    fn from(e: betterrest::InitializationError) -> Self {
        BetterRestCliError::Init(e)
    }
}

impl From<betterrest::EstimationError> for BetterRestCliError {
    fn from(e: betterrest::EstimationError) -> Self {
        BetterRestCliError::Estimate(e)
    }
}

impl From<serde_json::Error> for BetterRestCliError {
    fn from(e: serde_json::Error) -> Self {
        BetterRestCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<BetterRestCliError> for CliError {
    fn from(e: BetterRestCliError) -> Self {
        match e {
            BetterRestCliError::Init(e) => CliError {
                code: "MODEL_LOAD_ERROR".to_string(),
                message: e.to_string(),
                hint: Some(format!(
                    "Check --model or {}, or unset it to use the packaged model",
                    MODEL_PATH_ENV
                )),
            },
            BetterRestCliError::Estimate(e) => CliError {
                code: "ESTIMATION_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'betterrest doctor' for details".to_string()),
            },
            BetterRestCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            BetterRestCliError::OutOfRange(violations) => CliError {
                code: "OUT_OF_RANGE".to_string(),
                message: violations.join("; "),
                hint: Some("Pass --allow-out-of-range to estimate anyway".to_string()),
            },
            BetterRestCliError::ModelUnavailable => CliError {
                code: "MODEL_UNAVAILABLE".to_string(),
                message: "Engine has no loaded model".to_string(),
                hint: Some("Run 'betterrest doctor' for details".to_string()),
            },
            BetterRestCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    engine_state: EngineState,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Error,
}
