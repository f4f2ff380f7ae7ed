//! riskcast CLI, the main entry point.
//!
//! Commands:
//! - `ask`      Plan, retrieve, forecast and evaluate two models
//! - `query`    One model, optionally grounded in a project
//! - `compare`  Two models, same grounded prompt, no scoring
//! - `agent`    Tool-assisted answer (project lookup, calculator)
//! - `doc`      Question answering over a text or PDF document
//! - `evals`    Judge-graded answers to fixed cases, per model
//! - `logs`     Per-stage latency and errors from the event log
//! - `doctor`   Diagnose configuration and gateway health

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing::Instrument;

mod app;
mod commands;

#[derive(Parser)]
#[command(
    name = "riskcast",
    about = "riskcast: grounded risk forecasting over project milestones",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to ~/.riskcast/config.toml)
    #[arg(short, long, global = true, env = "RISKCAST_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default config file
    Onboard,

    /// Run the full pipeline: plan, retrieve, forecast, evaluate
    Ask {
        prompt: String,
        #[arg(short, long)]
        project: Option<String>,
        /// First model (forecaster and evaluator)
        #[arg(long)]
        model_a: Option<String>,
        /// Second model (evaluator only)
        #[arg(long)]
        model_b: Option<String>,
        /// Print per-stage latency and error counts to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Ask one model, grounded in a project when one is given
    Query {
        prompt: String,
        #[arg(short, long)]
        project: Option<String>,
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Ask two models the same grounded prompt
    Compare {
        prompt: String,
        #[arg(short, long)]
        project: Option<String>,
        #[arg(long)]
        model_a: Option<String>,
        #[arg(long)]
        model_b: Option<String>,
    },

    /// Answer a task with the project lookup and calculator tools
    Agent {
        task: String,
        #[arg(short, long)]
        project: Option<String>,
        #[arg(short, long)]
        model: Option<String>,
    },

    /// Ask questions about a text or PDF document
    Doc {
        path: PathBuf,
        /// Repeat to ask several questions over one index
        #[arg(short, long = "question", required = true)]
        questions: Vec<String>,
        #[arg(short, long)]
        model: Option<String>,
        /// Chunks retrieved per question
        #[arg(short, long)]
        k: Option<usize>,
        /// Print the answer as it streams
        #[arg(long)]
        stream: bool,
    },

    /// Run eval cases against models and grade each answer with a judge
    Evals {
        /// JSON array of {"input", "expected"} (defaults to the built-in cases)
        #[arg(long)]
        cases: Option<PathBuf>,
        /// Repeat to evaluate several models (defaults to models.default_model)
        #[arg(short, long = "model")]
        models: Vec<String>,
        /// Grading model (defaults to models.judge_model)
        #[arg(long)]
        judge: Option<String>,
    },

    /// Rank a project's milestones against a query (no model calls)
    Retrieve {
        project: String,
        query: String,
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Show how a prompt would be routed
    Plan { prompt: String },

    /// Evaluate an arithmetic expression
    Calc { expression: String },

    /// List known projects
    Projects,

    /// List the agent's tools with their argument schemas
    Tools,

    /// Summarize the pipeline event log
    Logs {
        /// Event log to read (defaults to logging.events_path)
        #[arg(long)]
        path: Option<PathBuf>,
        /// Print every event instead of the summary
        #[arg(long)]
        raw: bool,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Diagnose configuration and gateway health
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Print the default config file path
    Path,
    /// Check the configuration for problems
    Validate,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    match cli.log_format {
        LogFormat::Text => builder.with_target(false).init(),
        LogFormat::Json => builder.json().init(),
    }

    let span = tracing::info_span!("riskcast", request_id = %uuid::Uuid::new_v4());
    run(cli).instrument(span).await
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Onboard => commands::onboard::run(config_path).await?,
        Commands::Ask {
            prompt,
            project,
            model_a,
            model_b,
            stats,
        } => commands::ask::run(config_path, prompt, project, model_a, model_b, stats).await?,
        Commands::Query { prompt, project, model } => {
            commands::query::run(config_path, prompt, project, model).await?
        }
        Commands::Compare {
            prompt,
            project,
            model_a,
            model_b,
        } => commands::query::compare(config_path, prompt, project, model_a, model_b).await?,
        Commands::Agent { task, project, model } => {
            commands::agent::run(config_path, task, project, model).await?
        }
        Commands::Doc {
            path,
            questions,
            model,
            k,
            stream,
        } => commands::doc::run(config_path, &path, questions, model, k, stream).await?,
        Commands::Evals { cases, models, judge } => {
            commands::evals::run(config_path, cases.as_deref(), models, judge).await?
        }
        Commands::Retrieve { project, query, top_k } => {
            commands::retrieve::run(config_path, &project, &query, top_k).await?
        }
        Commands::Plan { prompt } => commands::retrieve::plan(&prompt)?,
        Commands::Calc { expression } => commands::calc::run(&expression)?,
        Commands::Projects => commands::retrieve::projects(config_path).await?,
        Commands::Tools => commands::retrieve::tools(config_path).await?,
        Commands::Logs { path, raw } => commands::logs::run(config_path, path, raw).await?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_cmd::show(config_path).await?,
            ConfigAction::Path => commands::config_cmd::path(config_path).await?,
            ConfigAction::Validate => commands::config_cmd::validate(config_path).await?,
        },
        Commands::Doctor => commands::doctor::run(config_path).await?,
    }

    Ok(())
}
