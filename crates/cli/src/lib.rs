pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use cosden_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat, LoggingConfig};

use crate::commands::plan::PlanArgs;
use crate::commands::recommend::RecommendArgs;
use crate::commands::simulate::SimulateArgs;

#[derive(Debug, Parser)]
#[command(
    name = "cosden",
    about = "CosDen cosmetic stack planner CLI",
    long_about = "Recommend and simulate cosmetic-only product stacks by age and goal, plan from free text, and inspect configuration.",
    after_help = "Examples:\n  cosden catalog\n  cosden recommend --age 30 --goal event_maximize --tone cool\n  cosden simulate --age 30 --codes A2,C2,E1,F1\n  cosden plan --age 32 --text \"big photoshoot tomorrow, cool white\"\n  cosden config"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to a cosden.toml config file (must exist when given)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Catalog TOML file overriding catalog.path")]
    catalog: Option<PathBuf>,
    #[arg(long, global = true, help = "Log level override (trace|debug|info|warn|error)")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List the products in the active catalog")]
    Catalog,
    #[command(about = "Recommend an ordered product stack for an age and goal")]
    Recommend {
        #[arg(long, help = "Age in years")]
        age: u32,
        #[arg(long, help = "daily_maintenance|event_maximize|gentle_start|mineral_support")]
        goal: String,
        #[arg(long, help = "Preferred tone shift (cool|warm|neutral)")]
        tone: Option<String>,
        #[arg(long, help = "Maximum number of products (defaults to planner.default_max_steps)")]
        max_steps: Option<usize>,
        #[arg(long, help = "Hours until the event")]
        event_hours: Option<u32>,
    },
    #[command(about = "Simulate the aggregated cosmetic effect of an explicit stack")]
    Simulate {
        #[arg(long, help = "Age in years")]
        age: u32,
        #[arg(long, value_delimiter = ',', required = true, help = "Comma-separated product codes, in order")]
        codes: Vec<String>,
    },
    #[command(about = "Interpret a free-text request into a cosmetic-only plan")]
    Plan {
        #[arg(long, help = "Age in years")]
        age: u32,
        #[arg(long, help = "Free-text description of the cosmetic goal")]
        text: String,
        #[arg(long, help = "Preferred tone shift (cool|warm|neutral)")]
        tone: Option<String>,
        #[arg(long, help = "Bias toward shorter, gentler stacks")]
        sensitive: bool,
        #[arg(long, help = "Hours until the event")]
        event_hours: Option<u32>,
        #[arg(long, help = "Free-form cosmetic notes")]
        notes: Option<String>,
    },
    #[command(about = "Inspect effective configuration values with source attribution and redaction")]
    Config,
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let options = LoadOptions {
        require_file: cli.config.is_some(),
        config_path: cli.config,
        overrides: ConfigOverrides {
            catalog_path: cli.catalog,
            log_level: cli.log_level,
            ..ConfigOverrides::default()
        },
    };

    if let Ok(config) = AppConfig::load(options.clone()) {
        init_logging(&config.logging);
    }

    let result = match cli.command {
        Command::Catalog => commands::catalog::run(&options),
        Command::Recommend { age, goal, tone, max_steps, event_hours } => {
            commands::recommend::run(
                &options,
                &RecommendArgs { age, goal, tone, max_steps, event_hours },
            )
        }
        Command::Simulate { age, codes } => {
            commands::simulate::run(&options, &SimulateArgs { age, codes })
        }
        Command::Plan { age, text, tone, sensitive, event_hours, notes } => commands::plan::run(
            &options,
            &PlanArgs { age, text, tone, sensitive, event_hours, notes },
        ),
        Command::Config => commands::config::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only the JSON command result.
fn init_logging(logging: &LoggingConfig) {
    use tracing::Level;
    use LogFormat::*;

    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder =
        tracing_subscriber::fmt().with_writer(std::io::stderr).with_target(false).with_max_level(log_level);

    match logging.format {
        Compact => builder.compact().init(),
        Pretty => builder.pretty().init(),
        Json => builder.json().init(),
    }
}
