//! CLI entry point for the job market insight dashboard.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dotenv::dotenv;
use insight_learning::{ForestConfig, Predictor, ProgressUpdate, Trainer, TrainingConfig};
use insight_processing::{Field, RawInputs, Target, class_samples};
use job_insight_lib::commands::{self, PageResponse, field_options, salary_input, with_defaults};
use job_insight_lib::{
    AppConfig, AppContext, ClassToggle, DashboardError, DataContext, DisplayFilters, Navigation,
    Page, TableView, render_page,
};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, error, info};

#[derive(Parser, Debug)]
#[command(
    author = "Job Insight Team",
    version,
    about = "AI-Powered Job Market Insight dashboard",
    long_about = "Explore the AI-Powered Job Market Insights dataset and classify salary \
                  category, automation risk and job growth projection with random forests.\n\n\
                  ENVIRONMENT VARIABLES:\n  \
                  JOB_INSIGHT_DATA      Path to the job market CSV (default: data/AI.csv)\n  \
                  JOB_INSIGHT_MODELS    Directory of trained classifiers (default: models)\n\n\
                  EXAMPLES:\n  \
                  # Train and save the three classifiers\n  \
                  job-insight train\n\n  \
                  # Show a page\n  \
                  job-insight page eda\n\n  \
                  # Predict with some inputs and list the Stable growth rows\n  \
                  job-insight page prediction --job-title 'Data Scientist' --salary 120000 \
                  --show growth=Stable"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the job market CSV
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Directory holding the trained classifiers
    #[arg(long, global = true)]
    models: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output JSON to stdout instead of text
    ///
    /// Disables all logs; only the response (or the error) is printed.
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Train the three classifiers and save them to the model directory
    Train(TrainArgs),
    /// Render one dashboard page
    Page(PageArgs),
    /// Predict salary category, automation risk and job growth
    Predict(PredictArgs),
    /// Salary category of a salary in USD
    Bucket {
        salary: f64,
    },
    /// Rows of the table where a column equals a value
    Samples {
        /// Column name, e.g. Job_Growth_Projection or job-growth-projection
        field: Field,
        value: String,
        /// Maximum number of rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Values accepted by each prediction input
    Options,
}

#[derive(Args, Debug)]
struct TrainArgs {
    /// Number of trees per forest
    #[arg(long, default_value = "100")]
    trees: usize,

    /// Maximum tree depth (unlimited when omitted)
    #[arg(long)]
    max_depth: Option<usize>,

    /// Seed for bootstrap sampling, feature sampling and the train/test split
    #[arg(long, default_value = "42")]
    seed: u64,
}

#[derive(Args, Debug)]
struct PageArgs {
    /// about, dataset, eda, data_cleaning, machine_learning, prediction or conclusion
    #[arg(default_value = "about")]
    page: Page,

    /// Prediction page: show the whole dataset
    #[arg(long)]
    show_dataset: bool,

    /// Prediction page: show five rows of every class
    #[arg(long)]
    show_all_classes: bool,

    /// Prediction page: list the rows of a class, e.g. `growth=Stable`
    #[arg(long = "show", value_name = "TARGET=CLASS")]
    classes: Vec<ClassToggle>,

    #[command(flatten)]
    inputs: InputArgs,
}

#[derive(Args, Debug)]
struct PredictArgs {
    /// Only predict this target (automation, growth or salary)
    #[arg(long)]
    target: Option<Target>,

    #[command(flatten)]
    inputs: InputArgs,
}

/// Prediction inputs; omitted fields take their defaults.
#[derive(Args, Debug, Clone, Default)]
struct InputArgs {
    #[arg(long)]
    job_title: Option<String>,
    #[arg(long)]
    industry: Option<String>,
    #[arg(long)]
    company_size: Option<String>,
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    ai_adoption_level: Option<String>,
    #[arg(long)]
    automation_risk: Option<String>,
    #[arg(long)]
    required_skills: Option<String>,
    #[arg(long)]
    remote_friendly: Option<String>,
    #[arg(long)]
    job_growth_projection: Option<String>,
    /// Annual salary in USD (0 to 5000000)
    #[arg(long)]
    salary: Option<f64>,
}

impl InputArgs {
    fn to_inputs(&self) -> job_insight_lib::Result<RawInputs> {
        let values = [
            (Field::JobTitle, &self.job_title),
            (Field::Industry, &self.industry),
            (Field::CompanySize, &self.company_size),
            (Field::Location, &self.location),
            (Field::AiAdoptionLevel, &self.ai_adoption_level),
            (Field::AutomationRisk, &self.automation_risk),
            (Field::RequiredSkills, &self.required_skills),
            (Field::RemoteFriendly, &self.remote_friendly),
            (Field::JobGrowthProjection, &self.job_growth_projection),
        ];
        let mut inputs = RawInputs::new();
        for (field, value) in values {
            if let Some(value) = value {
                inputs.set(field, value.clone());
            }
        }
        match self.salary {
            Some(salary) => Ok(inputs.with_salary(salary_input(salary)?)),
            None => Ok(inputs),
        }
    }
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled so stdout
/// only carries the JSON response.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.quiet, cli.json);

    // Load environment variables from .env file
    dotenv().ok();

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(err) if cli.json => {
            let payload = match err.downcast_ref::<DashboardError>() {
                Some(dashboard) => serde_json::to_value(dashboard)?,
                None => serde_json::json!({ "code": "INTERNAL", "message": format!("{err:#}") }),
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
            std::process::exit(1);
        }
        Err(err) => {
            error!("{err:#}");
            Err(err)
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = AppConfig::from_env();
    if let Some(data) = &cli.data {
        config = config.with_data_path(data);
    }
    if let Some(models) = &cli.models {
        config = config.with_models_dir(models);
    }
    debug!("Configuration: {:?}", config);

    match &cli.command {
        Command::Train(args) => run_train(cli, &config, args),
        Command::Page(args) => run_page(cli, config, args),
        Command::Predict(args) => run_predict(cli, config, args),
        Command::Bucket { salary } => {
            let bucket = Predictor::bucket_salary(*salary).map_err(DashboardError::from)?;
            let label = bucket.label().unwrap_or_default();
            emit(cli.json, &serde_json::json!({ "salary": salary, "category": label }), || {
                format!("{salary:.2} USD -> {label}\n")
            })
        }
        Command::Samples {
            field,
            value,
            limit,
        } => {
            let data = DataContext::load(&config)?;
            let rows = class_samples(&data.dataset, *field, value, *limit)
                .map_err(DashboardError::from)?;
            let table = TableView::from_dataframe(&rows, None);
            emit(cli.json, &table, || table.render())
        }
        Command::Options => {
            let ctx = AppContext::load(config)?;
            let options = field_options(&ctx);
            emit(cli.json, &options, || {
                options
                    .iter()
                    .map(|o| {
                        format!(
                            "{} (default: {})\n  {}\n",
                            o.field,
                            o.default.as_deref().unwrap_or("-"),
                            o.options.join(", ")
                        )
                    })
                    .collect()
            })
        }
    }
}

// ============================================================================
// COMMANDS
// ============================================================================

fn run_train(cli: &Cli, config: &AppConfig, args: &TrainArgs) -> Result<()> {
    let forest = ForestConfig::builder()
        .n_trees(args.trees)
        .max_depth(args.max_depth)
        .random_seed(args.seed)
        .build()
        .map_err(DashboardError::from)?;
    let training = TrainingConfig::builder()
        .forest(forest)
        .split_seed(args.seed)
        .build()
        .map_err(DashboardError::from)?;

    let quiet = cli.quiet || cli.json;
    let trainer = Trainer::builder()
        .config(training)
        .on_progress(move |update: ProgressUpdate| {
            if quiet {
                return;
            }
            let target = update.current_target.as_deref().unwrap_or("all");
            info!(
                "[{}] {:>3.0}% {} - {}",
                update.stage.as_str(),
                update.progress * 100.0,
                target,
                update.message
            );
        })
        .build()
        .map_err(DashboardError::from)?;

    let data = DataContext::load(config)?;
    info!(
        "Training on {} rows from {}",
        data.dataset.len(),
        config.data_path.display()
    );
    let (_, response) = commands::train_models(&data, &trainer, &config.models_dir)
        .with_context(|| format!("Training into {}", config.models_dir.display()))?;
    emit(cli.json, &response, || response.render_text())
}

fn run_page(cli: &Cli, config: AppConfig, args: &PageArgs) -> Result<()> {
    let mut nav = Navigation::new(args.page);
    let filters = args.classes.iter().cloned().fold(
        DisplayFilters::new()
            .with_dataset(args.show_dataset)
            .with_all_classes(args.show_all_classes),
        DisplayFilters::with_class,
    );
    if !filters.is_empty() && !nav.set_filters(filters) {
        return Err(DashboardError::InvalidSelection(format!(
            "display filters only apply to the {} page",
            Page::Prediction
        ))
        .into());
    }

    let inputs = args.inputs.to_inputs()?;

    // The about page needs neither data nor models.
    let response = if args.page == Page::About {
        PageResponse::About(commands::about())
    } else {
        let ctx = AppContext::load(config)?;
        render_page(&ctx, &nav, &inputs)?
    };
    emit(cli.json, &response, || response.render_text())
}

fn run_predict(cli: &Cli, config: AppConfig, args: &PredictArgs) -> Result<()> {
    let ctx = AppContext::load(config)?;
    let inputs = with_defaults(&ctx, &args.inputs.to_inputs()?);

    match args.target {
        Some(target) => {
            let prediction = ctx
                .predictor()
                .predict(target, &inputs)
                .map_err(DashboardError::from)?;
            emit(cli.json, &prediction, || {
                format!("{}: {}\n", target.title(), prediction.label)
            })
        }
        None => {
            let response = commands::prediction_page(&ctx, inputs, &DisplayFilters::new())?;
            emit(cli.json, &response, || response.render_text())
        }
    }
}

/// Print `value` as pretty JSON, or the text produced by `text`.
fn emit<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", text());
    }
    Ok(())
}
