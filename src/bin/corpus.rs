//! Corpus CLI - Command-line interface for Synheart Corpus
//!
//! Commands:
//! - assemble: Build a dataset from a directory of subject recordings
//! - validate: Validate a recording file against corpus.recording.v1
//! - quest: Parse a questionnaire file and report its rows
//! - doctor: Diagnose dataset layout and configuration
//! - schema: Print schema information

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use synheart_corpus::assembler::DatasetAssembler;
use synheart_corpus::config::{PipelineConfig, SUBJECT_PREFIX};
use synheart_corpus::export::{
    example_records, format_examples, ExportFormat, ManifestBuilder,
};
use synheart_corpus::questionnaire::{QuestionnaireExtractor, PANAS_VOCABULARY};
use synheart_corpus::schema::RecordingFile;
use synheart_corpus::types::{ChannelKind, DeviceSelection};
use synheart_corpus::{CorpusError, CORPUS_VERSION, PRODUCER_NAME, SCHEMA_VERSION};

/// Corpus - Offline dataset builder for wearable stress/affect recordings
#[derive(Parser)]
#[command(name = "corpus")]
#[command(author = "Synheart AI Inc")]
#[command(version = CORPUS_VERSION)]
#[command(about = "Build model-ready datasets from wearable recordings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a dataset from a directory of subject recordings
    Assemble {
        /// Root directory containing subject directories
        #[arg(short, long)]
        root: PathBuf,

        /// Output file for example records (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Write the dataset manifest to this file
        #[arg(long)]
        manifest: Option<PathBuf>,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        output_format: OutputFormat,

        /// Comma-separated channel names (default: all channels)
        #[arg(long)]
        channels: Option<String>,

        /// Device selection
        #[arg(long, default_value = "both")]
        devices: DeviceArg,

        /// Window length in seconds
        #[arg(long)]
        window_seconds: Option<f64>,

        /// Stride between windows in seconds
        #[arg(long)]
        stride_seconds: Option<f64>,

        /// Target sample rate in Hz
        #[arg(long)]
        target_rate: Option<f64>,
    },

    /// Validate a recording file
    Validate {
        /// Recording file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a questionnaire file and report its rows
    Quest {
        /// Questionnaire file path
        #[arg(short, long)]
        input: PathBuf,

        /// Output report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Diagnose dataset layout and configuration
    Doctor {
        /// Dataset root directory to check
        #[arg(long)]
        root: Option<PathBuf>,

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
    /// Newline-delimited JSON (one example per line)
    Ndjson,
    /// JSON array of examples
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

impl From<OutputFormat> for ExportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Ndjson => ExportFormat::Ndjson,
            OutputFormat::Json => ExportFormat::Json,
            OutputFormat::JsonPretty => ExportFormat::JsonPretty,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum DeviceArg {
    Chest,
    Wrist,
    Both,
}

impl From<DeviceArg> for DeviceSelection {
    fn from(arg: DeviceArg) -> Self {
        match arg {
            DeviceArg::Chest => DeviceSelection::Chest,
            DeviceArg::Wrist => DeviceSelection::Wrist,
            DeviceArg::Both => DeviceSelection::Both,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (corpus.recording.v1)
    Input,
    /// Output schema (corpus.dataset.v1)
    Output,
}

fn main() -> ExitCode {
    env_logger::init();
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

fn run(cli: Cli) -> Result<(), CorpusCliError> {
    match cli.command {
        Commands::Assemble {
            root,
            output,
            manifest,
            output_format,
            channels,
            devices,
            window_seconds,
            stride_seconds,
            target_rate,
        } => cmd_assemble(
            &root,
            &output,
            manifest.as_deref(),
            output_format,
            channels.as_deref(),
            devices,
            window_seconds,
            stride_seconds,
            target_rate,
        ),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Quest { input, json } => cmd_quest(&input, json),

        Commands::Doctor { root, json } => cmd_doctor(root.as_deref(), json),

        Commands::Schema { schema_type } => cmd_schema(schema_type),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_assemble(
    root: &Path,
    output: &Path,
    manifest_path: Option<&Path>,
    output_format: OutputFormat,
    channels: Option<&str>,
    devices: DeviceArg,
    window_seconds: Option<f64>,
    stride_seconds: Option<f64>,
    target_rate: Option<f64>,
) -> Result<(), CorpusCliError> {
    let mut config = PipelineConfig {
        devices: devices.into(),
        ..PipelineConfig::default()
    };
    if let Some(spec) = channels {
        config.channels = parse_channel_list(spec)?;
    }
    if let Some(seconds) = window_seconds {
        config.window_seconds = seconds;
    }
    if let Some(seconds) = stride_seconds {
        config.stride_seconds = seconds;
    }
    if let Some(rate) = target_rate {
        config.target_rate_hz = rate;
    }

    let assembly = DatasetAssembler::new(config.clone()).assemble(root)?;

    if assembly.dataset.is_empty() {
        return Err(CorpusCliError::NoExamples);
    }

    let records = example_records(&assembly.dataset);
    let output_data = format_examples(&records, output_format.into())?;
    if output.to_string_lossy() == "-" {
        print!("{output_data}");
    } else {
        fs::write(output, output_data)?;
    }

    if let Some(path) = manifest_path {
        let manifest =
            ManifestBuilder::new().build(&assembly, &config, &root.to_string_lossy());
        fs::write(path, serde_json::to_string_pretty(&manifest)?)?;
    }

    let skipped = assembly
        .outcomes
        .iter()
        .filter(|o| o.skipped.is_some())
        .count();
    eprintln!(
        "{} windows from {} subjects ({} skipped)",
        assembly.dataset.len(),
        assembly.outcomes.len() - skipped,
        skipped
    );

    Ok(())
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), CorpusCliError> {
    let record = RecordingFile::from_path(input)?;
    let result = record.validate();

    let report = ValidationReport {
        file: input.to_string_lossy().to_string(),
        subject_id: record.subject_id.clone(),
        labels: record.labels.len(),
        valid: result.is_ok(),
        error: result.as_ref().err().map(|e| e.to_string()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("File:    {}", report.file);
        println!("Subject: {}", report.subject_id);
        println!("Labels:  {}", report.labels);
        match &report.error {
            None => println!("Status:  valid"),
            Some(error) => println!("Status:  invalid ({error})"),
        }
    }

    result.map_err(CorpusCliError::from)
}

fn cmd_quest(input: &Path, json: bool) -> Result<(), CorpusCliError> {
    let parsed = QuestionnaireExtractor::parse_file(input)?;

    if json {
        let report = serde_json::json!({
            "file": input.to_string_lossy(),
            "responses": parsed.responses,
            "row_errors": parsed.row_errors,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Questionnaire Report");
        println!("====================");
        println!("Rows:   {}", parsed.responses.len());
        println!("Errors: {}", parsed.row_errors.len());
        for (i, response) in parsed.responses.iter().enumerate() {
            let preview: Vec<String> = PANAS_VOCABULARY
                .iter()
                .take(4)
                .zip(&response.scores)
                .map(|(name, score)| format!("{name}={score}"))
                .collect();
            println!("  condition {}: {} ...", i + 1, preview.join(" "));
        }
        for error in &parsed.row_errors {
            println!("  line {}: {}", error.line, error.message);
        }
    }

    Ok(())
}

fn cmd_doctor(root: Option<&Path>, json: bool) -> Result<(), CorpusCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "corpus_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Corpus version {CORPUS_VERSION}"),
    });

    checks.push(DoctorCheck {
        name: "schema_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Input schema: {SCHEMA_VERSION}"),
    });

    match PipelineConfig::default().validate() {
        Ok(()) => checks.push(DoctorCheck {
            name: "default_config".to_string(),
            status: CheckStatus::Ok,
            message: "Default pipeline configuration is usable".to_string(),
        }),
        Err(e) => checks.push(DoctorCheck {
            name: "default_config".to_string(),
            status: CheckStatus::Error,
            message: e.to_string(),
        }),
    }

    if let Some(root) = root {
        if root.is_dir() {
            let subjects = fs::read_dir(root)?
                .filter_map(|entry| entry.ok())
                .filter(|entry| {
                    entry.path().is_dir()
                        && entry
                            .file_name()
                            .to_str()
                            .is_some_and(|n| n.starts_with(SUBJECT_PREFIX))
                })
                .count();
            let status = if subjects > 0 {
                CheckStatus::Ok
            } else {
                CheckStatus::Warning
            };
            checks.push(DoctorCheck {
                name: "dataset_root".to_string(),
                status,
                message: format!("{subjects} subject directories under {}", root.display()),
            });
        } else {
            checks.push(DoctorCheck {
                name: "dataset_root".to_string(),
                status: CheckStatus::Error,
                message: format!("{} is not a directory", root.display()),
            });
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
            message: "stdin is a pipe".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: CORPUS_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Corpus Doctor Report");
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
        Err(CorpusCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType) -> Result<(), CorpusCliError> {
    match schema_type {
        SchemaType::Input => {
            println!("Input Schema: {SCHEMA_VERSION}");
            println!();
            println!("A recording file holds one subject's session:");
            println!();
            println!("- schema_version: \"{SCHEMA_VERSION}\"");
            println!("- subject_id: subject directory name (e.g. \"S2\")");
            println!("- chest / wrist: device blocks, each mapping channel names");
            println!("  (EDA, TEMP, RESP, ECG, ACC, EMG, BVP) to sample arrays;");
            println!("  1-D series or row-major 2-D arrays (e.g. 3-axis ACC)");
            println!("- labels: per-sample condition labels at the chest rate;");
            println!("  0 marks samples outside any defined condition");
            println!();
            println!("Chest channels and the label series must have equal length.");
        }
        SchemaType::Output => {
            println!("Output Schema: corpus.dataset.v1");
            println!();
            println!("Example records (ndjson or JSON array):");
            println!();
            println!("- subject_id: source subject");
            println!("- label: majority condition label of the window");
            println!("- target: self-report vector rescaled to [0, 1]");
            println!("- window: [rows x columns] standardized signal slice");
            println!();
            println!("Manifest: {{ dataset_version, producer, provenance, config,");
            println!("            subjects (per-subject outcomes), total_windows }}");
        }
    }

    Ok(())
}

// Helper functions

fn parse_channel_list(spec: &str) -> Result<Vec<ChannelKind>, CorpusCliError> {
    let mut channels = Vec::new();
    for name in spec.split(',') {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        match ChannelKind::from_name(name) {
            Some(channel) => channels.push(channel),
            None => return Err(CorpusCliError::UnknownChannel(name.to_string())),
        }
    }
    Ok(channels)
}

// Error types

#[derive(Debug)]
enum CorpusCliError {
    Io(std::io::Error),
    Corpus(CorpusError),
    Json(serde_json::Error),
    UnknownChannel(String),
    NoExamples,
    DoctorFailed,
}

impl From<std::io::Error> for CorpusCliError {
    fn from(e: std::io::Error) -> Self {
        CorpusCliError::Io(e)
    }
}

impl From<CorpusError> for CorpusCliError {
    fn from(e: CorpusError) -> Self {
        CorpusCliError::Corpus(e)
    }
}

impl From<serde_json::Error> for CorpusCliError {
    fn from(e: serde_json::Error) -> Self {
        CorpusCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CorpusCliError> for CliError {
    fn from(e: CorpusCliError) -> Self {
        match e {
            CorpusCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CorpusCliError::Corpus(e) => CliError {
                code: "CORPUS_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Run 'corpus validate' on the offending recording".to_string()),
            },
            CorpusCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CorpusCliError::UnknownChannel(name) => CliError {
                code: "UNKNOWN_CHANNEL".to_string(),
                message: format!("unknown channel '{name}'"),
                hint: Some("Valid channels: EDA, TEMP, RESP, ECG, ACC, EMG, BVP".to_string()),
            },
            CorpusCliError::NoExamples => CliError {
                code: "NO_EXAMPLES".to_string(),
                message: "No windows survived assembly".to_string(),
                hint: Some("Check subject directories and sentinel coverage".to_string()),
            },
            CorpusCliError::DoctorFailed => CliError {
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
    file: String,
    subject_id: String,
    labels: usize,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
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
