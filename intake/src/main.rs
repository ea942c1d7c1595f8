//! Contact intake CLI.
//!
//! Drives the intake controller from the command line: validate a candidate
//! submission, run a full submit cycle against the configured sink, or render
//! the accessible form markup for a given state.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use intake::controller::{IntakeController, SubmitOutcome, Timings};
use intake::core::focus::focus_target;
use intake::core::options::{BUDGET_OPTIONS, PROJECT_TYPE_OPTIONS, SelectOption};
use intake::core::types::{ErrorMap, Field, SubmissionRecord};
use intake::core::validator::validate_record;
use intake::exit_codes;
use intake::io::clock::TokioClock;
use intake::io::config::{DEFAULT_CONFIG_PATH, IntakeConfig, load_config, write_config};
use intake::io::render::FormRenderer;
use intake::io::sink::ConfiguredSink;
use intake::logging;

#[derive(Parser)]
#[command(
    name = "intake",
    version,
    about = "Contact form intake: validation and submission lifecycle"
)]
struct Cli {
    /// Config file (TOML).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default config file if missing.
    Init {
        /// Overwrite an existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Check a submission and print its field errors as JSON.
    Validate {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Validate and deliver a submission to the configured sink.
    Submit {
        #[command(flatten)]
        fields: FieldArgs,
    },
    /// Print the contact form markup for the given values.
    Render {
        #[command(flatten)]
        fields: FieldArgs,
        /// Render the state after a submit attempt.
        #[arg(long)]
        submit: bool,
    },
    /// List the budget and project type choices.
    Options,
}

#[derive(Args, Debug, Clone)]
struct FieldArgs {
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    /// Budget range code (optional).
    #[arg(long, default_value = "")]
    budget: String,
    /// Project type code, e.g. `new-website`.
    #[arg(long, default_value = "")]
    project_type: String,
    #[arg(long, default_value = "")]
    message: String,
}

impl From<FieldArgs> for SubmissionRecord {
    fn from(args: FieldArgs) -> Self {
        Self {
            name: args.name,
            email: args.email,
            budget: args.budget,
            project_type: args.project_type,
            message: args.message,
        }
    }
}

#[derive(Serialize)]
struct ValidationReport {
    valid: bool,
    errors: ErrorMap,
    focus: Option<Field>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OptionsReport {
    budget: &'static [SelectOption],
    project_type: &'static [SelectOption],
}

type CliController = IntakeController<ConfiguredSink, TokioClock>;

fn main() {
    logging::init();
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_codes::INVALID
        }
    };
    std::process::exit(code);
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    match cli.command {
        Command::Init { force } => cmd_init(&cli.config, force),
        Command::Validate { fields } => cmd_validate(fields.into()),
        Command::Submit { fields } => cmd_submit(&cli.config, fields.into()),
        Command::Render { fields, submit } => cmd_render(&cli.config, fields.into(), submit),
        Command::Options => cmd_options(),
    }
}

fn cmd_init(config_path: &Path, force: bool) -> Result<i32> {
    if !force && config_path.exists() {
        info!(path = %config_path.display(), "config already present");
        return Ok(exit_codes::OK);
    }
    write_config(config_path, &IntakeConfig::default())?;
    Ok(exit_codes::OK)
}

fn cmd_validate(record: SubmissionRecord) -> Result<i32> {
    let errors = validate_record(&record);
    let report = ValidationReport {
        valid: errors.is_empty(),
        focus: focus_target(&errors),
        errors,
    };
    print_json(&report)?;
    Ok(if report.valid {
        exit_codes::OK
    } else {
        exit_codes::INVALID
    })
}

fn cmd_submit(config_path: &Path, record: SubmissionRecord) -> Result<i32> {
    let ctrl = controller_for(config_path, &record)?;
    let outcome = block_on_submit(&ctrl)?;
    print_json(&outcome)?;
    Ok(exit_code_for(&outcome))
}

fn cmd_render(config_path: &Path, record: SubmissionRecord, submit: bool) -> Result<i32> {
    let ctrl = controller_for(config_path, &record)?;
    if submit {
        block_on_submit(&ctrl)?;
    }
    let html = FormRenderer::new()?.render(&ctrl.snapshot())?;
    println!("{}", html);
    Ok(exit_codes::OK)
}

fn cmd_options() -> Result<i32> {
    print_json(&OptionsReport {
        budget: BUDGET_OPTIONS,
        project_type: PROJECT_TYPE_OPTIONS,
    })?;
    Ok(exit_codes::OK)
}

/// Build a controller from config and type `record` into it.
fn controller_for(config_path: &Path, record: &SubmissionRecord) -> Result<CliController> {
    let cfg = load_config(config_path)?;
    let ctrl = IntakeController::new(
        ConfiguredSink::from_config(&cfg.sink),
        TokioClock,
        Timings::from(&cfg),
    );
    for field in Field::ALL {
        ctrl.set_field(field, record.get(field));
    }
    Ok(ctrl)
}

/// Run one submit cycle on a single-threaded runtime.
fn block_on_submit(ctrl: &CliController) -> Result<SubmitOutcome> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build tokio runtime")?;
    Ok(runtime.block_on(ctrl.submit()))
}

fn exit_code_for(outcome: &SubmitOutcome) -> i32 {
    match outcome {
        SubmitOutcome::Delivered => exit_codes::OK,
        SubmitOutcome::Failed { .. } => exit_codes::SINK_FAILED,
        SubmitOutcome::Invalid { .. } | SubmitOutcome::Rejected { .. } => exit_codes::INVALID,
    }
}

/// Print `value` as pretty JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serialize json")?;
    println!("{}", payload);
    Ok(())
}
