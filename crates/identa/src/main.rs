use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use identa::config::Config;
use identa::render;
use identa::{EvaluationForm, EvaluationStore, FormController, InputPolicy, JsonFileStorage};

#[derive(Parser)]
#[command(name = "identa")]
#[command(about = "Identa - identity evaluation scoring\nScore experiences and keep a history of evaluations")]
#[command(version)]
struct Cli {
  /// Configuration file (defaults to identa.json in the working directory)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
  #[default]
  Pretty,
  Json,
}

#[derive(Subcommand)]
enum Commands {
  /// Score an experience and add it to the history
  Evaluate {
    /// How many people share the experience (m)
    #[arg(allow_hyphen_values = true)]
    universality: String,
    /// How many times it happened (t)
    #[arg(allow_hyphen_values = true)]
    frequency: String,
    /// How many months it lasted (d)
    #[arg(allow_hyphen_values = true)]
    duration: String,
    /// How many months ago it happened (p)
    #[arg(allow_hyphen_values = true)]
    months_ago: String,
    /// Person being evaluated
    #[arg(short, long, default_value = "")]
    name: String,
    /// Input validation policy (overrides the config file)
    #[arg(short, long)]
    policy: Option<InputPolicy>,
  },
  /// Show all evaluations, most recent first
  History {
    #[arg(short, long, default_value = "pretty")]
    format: OutputFormat,
  },
  /// Show a single evaluation
  Show {
    id: i64,
  },
  /// Delete an evaluation
  Delete {
    id: i64,
  },
  /// Delete every evaluation
  Clear {
    /// Required, there is no undo
    #[arg(short, long)]
    force: bool,
  },
}

fn init_logging(verbose: bool) {
  let default = if verbose { "identa=debug" } else { "identa=warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();
}

fn load_config(path: Option<&PathBuf>) -> Result<Config> {
  let config = match path {
    Some(path) => Config::load_from_file(path)?,
    None => Config::load()?,
  };
  Ok(config)
}

fn open_store(config: &Config) -> Result<EvaluationStore<JsonFileStorage>> {
  let storage = config.storage().context("Failed to locate evaluation storage")?;
  tracing::debug!(path = %storage.path().display(), "using evaluation storage");
  Ok(EvaluationStore::new(storage).with_corruption_policy(config.corruption_policy))
}

fn print_panel(title: &str, body: &str) {
  println!("{}", format!("=== {title} ===").purple().bold());
  print!("{body}");
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let config = load_config(cli.config.as_ref())?;
  let mut store = open_store(&config)?;

  match cli.command {
    Commands::Evaluate { universality, frequency, duration, months_ago, name, policy } => {
      let policy = policy.unwrap_or(config.input_policy);
      let mut form = EvaluationForm::new(name, universality, frequency, duration, months_ago);
      let mut controller = FormController::new(store, policy);

      let submission = controller.submit(&mut form)?;

      print_panel("Evaluation", &submission.score_panel);
      println!("{} Saved evaluation {}", "✓".green(), submission.evaluation.id.to_string().yellow());
      println!();
      print_panel("History", &submission.history_panel);
    }
    Commands::History { format } => match format {
      OutputFormat::Pretty => {
        let controller = FormController::new(store, config.input_policy);
        print_panel("History", &controller.load()?);
      }
      OutputFormat::Json => {
        let history = store.list()?;
        println!("{}", render::render_history_json(&history)?);
      }
    },
    Commands::Show { id } => match store.get(id)? {
      Some(evaluation) => print!("{}", render::render_evaluation(&evaluation)),
      None => bail!("Evaluation {id} not found"),
    },
    Commands::Delete { id } => {
      let mut controller = FormController::new(store, config.input_policy);
      let history = controller.delete(id)?;
      print_panel("History", &history);
    }
    Commands::Clear { force } => {
      if !force {
        let count = store.list()?.len();
        bail!("Refusing to delete {count} evaluations without --force");
      }
      let removed = store.clear()?;
      println!("{} Deleted {} evaluations", "✓".green(), removed);
    }
  }

  Ok(())
}
