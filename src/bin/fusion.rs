//! Fusion CLI - Command-line interface for Interview Fusion
//!
//! Commands:
//! - evaluate: Score an interview request into a report
//! - validate: Check a request without scoring it
//! - doctor: Diagnose engine version and configuration
//! - schema: Describe request and report formats

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use interview_fusion::ai_detection::AiDetector;
use interview_fusion::config::EngineConfig;
use interview_fusion::encoder::{ReportEncoder, REPORT_VERSION};
use interview_fusion::personality::SeededTraitSimulator;
use interview_fusion::pipeline::{replay_classifier, Evaluator};
use interview_fusion::types::EvaluationRequest;
use interview_fusion::{EvaluationError, ENGINE_VERSION, PRODUCER_NAME};

/// Fusion - Signal fusion and suspicion scoring for recorded interviews
#[derive(Parser)]
#[command(name = "fusion")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score recorded interview answers into an evaluation report", long_about = None)]
struct Cli {
    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate an interview request into a report
    Evaluate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Engine configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        format: OutputFormat,

        /// Render scores as percentage strings instead of the report envelope
        #[arg(long)]
        display: bool,
    },

    /// Validate an interview request without scoring it
    Validate {
        /// Input file path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Engine configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose engine version and configuration
    Doctor {
        /// Check a configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Evaluation request
    Input,
    /// Report envelope
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

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

fn init_logging(verbose: bool) {
    let env = env_logger::Env::default().default_filter_or("warn");
    let mut builder = env_logger::Builder::from_env(env);
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn run(cli: Cli) -> Result<(), FusionCliError> {
    match cli.command {
        Commands::Evaluate {
            input,
            output,
            config,
            format,
            display,
        } => cmd_evaluate(&input, &output, config.as_deref(), format, display),

        Commands::Validate {
            input,
            config,
            json,
        } => cmd_validate(&input, config.as_deref(), json),

        Commands::Doctor { config, json } => cmd_doctor(config.as_deref(), json),

        Commands::Schema { schema_type } => cmd_schema(schema_type),
    }
}

fn cmd_evaluate(
    input: &Path,
    output: &Path,
    config: Option<&Path>,
    format: OutputFormat,
    display: bool,
) -> Result<(), FusionCliError> {
    let request = read_request(input)?;
    let evaluator = build_evaluator(load_config(config)?, &request)?;
    let result = evaluator.evaluate(&request)?;

    let encoder = ReportEncoder::new();
    let value = if display {
        encoder.display(&result)?
    } else {
        serde_json::to_value(encoder.encode(&result))?
    };
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(&value)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&value)?,
    };

    if output.to_string_lossy() == "-" {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        writeln!(handle, "{rendered}")?;
    } else {
        fs::write(output, rendered + "\n")?;
    }
    Ok(())
}

fn cmd_validate(input: &Path, config: Option<&Path>, json: bool) -> Result<(), FusionCliError> {
    let request = read_request(input)?;
    let evaluator = build_evaluator(load_config(config)?, &request)?;
    let outcome = evaluator.validate_request(&request);

    let report = ValidationReport {
        applied_role: request.applied_role.clone(),
        questions: request.questions.len(),
        valid: outcome.is_ok(),
        error: outcome.as_ref().err().map(|e| e.to_string()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Applied role: {}", report.applied_role);
        println!("Questions:    {}", report.questions);
        match &report.error {
            None => println!("Result:       valid"),
            Some(err) => println!("Result:       invalid ({err})"),
        }
    }

    outcome.map_err(|_| FusionCliError::ValidationFailed)
}

fn cmd_doctor(config: Option<&Path>, json: bool) -> Result<(), FusionCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Engine version {ENGINE_VERSION}"),
    });

    checks.push(DoctorCheck {
        name: "report_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Report format: {REPORT_VERSION}"),
    });

    match config {
        None => {
            let defaults = EngineConfig::default();
            checks.push(DoctorCheck {
                name: "config".to_string(),
                status: CheckStatus::Ok,
                message: format!(
                    "Built-in defaults ({} questions, {} roles)",
                    defaults.question_count,
                    defaults.roles.len()
                ),
            });
        }
        Some(path) if !path.exists() => checks.push(DoctorCheck {
            name: "config".to_string(),
            status: CheckStatus::Warning,
            message: "Config file does not exist".to_string(),
        }),
        Some(path) => {
            let check = match fs::read_to_string(path) {
                Ok(content) => match EngineConfig::from_json(&content) {
                    Ok(cfg) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Ok,
                        message: format!(
                            "Config valid ({} questions, roles: {})",
                            cfg.question_count,
                            cfg.roles.keys().cloned().collect::<Vec<_>>().join(", ")
                        ),
                    },
                    Err(e) => DoctorCheck {
                        name: "config".to_string(),
                        status: CheckStatus::Error,
                        message: e.to_string(),
                    },
                },
                Err(e) => DoctorCheck {
                    name: "config".to_string(),
                    status: CheckStatus::Error,
                    message: format!("Cannot read config file: {e}"),
                },
            };
            checks.push(check);
        }
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (use -i - to read the request)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Fusion Doctor Report");
        println!("====================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
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
        Err(FusionCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType) -> Result<(), FusionCliError> {
    match schema_type {
        SchemaType::Input => {
            println!("Evaluation request");
            println!();
            println!("- applied_role: role identifier (software_engineer, associate_software_engineer, it_intern)");
            println!("- questions: exactly 5 entries, each with");
            println!("  - question_id: unique, non-empty");
            println!("  - video_id: stable recording identity (seeds trait simulation)");
            println!("  - keywords: non-empty list of expected concepts");
            println!("  - transcript: answer text (optional; absent means no answer)");
            println!("  - ai_probability: classifier output in [0, 1] (optional; absent means Error)");
            println!("  - traits: {{ Openness, Conscientiousness, Extraversion, Agreeableness, Neuroticism }} (optional)");
            println!("  - frames: per-frame input, one of");
            println!("    {{ kind: observation, eyes_open, gaze_on_camera }}");
            println!("    {{ kind: landmarks, pitch, yaw, roll, left_ear, right_ear }}");
            println!("    {{ kind: no_face }}");
        }
        SchemaType::Output => {
            println!("Report envelope: {REPORT_VERSION}");
            println!();
            println!("- report_version, computed_at_utc, success");
            println!("- producer: {{ name, version, instance_id }}");
            println!("- result:");
            println!("  - question_results: [{{ question_id, score, keywords_found, keywords_missing, feedback, transcription }}]");
            println!("  - career_scores: {{ role: 0-100 }}");
            println!("  - eye_track_per_question: [{{ question, score: \"NN%\" }}]");
            println!("  - overall_eye_tracking_score, personality_traits");
            println!("  - ai_detection_results: {{ answer_analysis, suspicion_factors, behavioral_suspicion_score,");
            println!("      ai_answer_ratio, overall_suspicion_score, is_suspicious, applied_role }}");
            println!("  - final_evaluation: {{ content_score, eye_contact_score, personality_score,");
            println!("      ai_suspicion_score, base_score, final_score }}");
        }
    }

    Ok(())
}

// Helper functions

fn read_input(input: &Path) -> Result<String, FusionCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

fn read_request(input: &Path) -> Result<EvaluationRequest, FusionCliError> {
    let data = read_input(input)?;
    if data.trim().is_empty() {
        return Err(FusionCliError::EmptyInput);
    }
    Ok(serde_json::from_str(&data)?)
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig, FusionCliError> {
    match path {
        Some(path) => Ok(EngineConfig::from_json(&fs::read_to_string(path)?)?),
        None => Ok(EngineConfig::default()),
    }
}

fn build_evaluator(
    config: EngineConfig,
    request: &EvaluationRequest,
) -> Result<Evaluator, FusionCliError> {
    let detector = Arc::new(AiDetector::new(
        replay_classifier(request),
        config.detection.clone(),
    ));
    Ok(Evaluator::new(
        config,
        detector,
        Arc::new(SeededTraitSimulator),
    )?)
}

// Error types

#[derive(Debug)]
enum FusionCliError {
    Io(io::Error),
    Json(serde_json::Error),
    Evaluation(EvaluationError),
    EmptyInput,
    ValidationFailed,
    DoctorFailed,
}

impl From<io::Error> for FusionCliError {
    fn from(e: io::Error) -> Self {
        FusionCliError::Io(e)
    }
}

impl From<serde_json::Error> for FusionCliError {
    fn from(e: serde_json::Error) -> Self {
        FusionCliError::Json(e)
    }
}

impl From<EvaluationError> for FusionCliError {
    fn from(e: EvaluationError) -> Self {
        FusionCliError::Evaluation(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<FusionCliError> for CliError {
    fn from(e: FusionCliError) -> Self {
        match e {
            FusionCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            FusionCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'fusion schema input' for the request format".to_string()),
            },
            FusionCliError::Evaluation(EvaluationError::Config(msg)) => CliError {
                code: "CONFIG_ERROR".to_string(),
                message: msg,
                hint: Some("Run 'fusion doctor --config <file>' to check it".to_string()),
            },
            FusionCliError::Evaluation(e) if e.is_input_error() => CliError {
                code: "INPUT_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'fusion validate' for details".to_string()),
            },
            FusionCliError::Evaluation(e) => CliError {
                code: "EVALUATION_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            FusionCliError::EmptyInput => CliError {
                code: "EMPTY_INPUT".to_string(),
                message: "No request found in input".to_string(),
                hint: Some("Ensure input file is not empty".to_string()),
            },
            FusionCliError::ValidationFailed => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: "Request failed validation".to_string(),
                hint: Some("Fix validation errors and retry".to_string()),
            },
            FusionCliError::DoctorFailed => CliError {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    applied_role: String,
    questions: usize,
    valid: bool,
    error: Option<String>,
}

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
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
    Warning,
    Error,
}
