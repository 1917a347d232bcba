//! gum - main entry point
//!
//! Loads gum.yml, builds the plan for the host platform, and validates and
//! runs it.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use gum::cli::{Cli, Commands, LogLevel};
use gum::{
    Action, ActionContext, ActionHandler, ActionRegistry, CommandRunner, DependencyCycle,
    DryRunRunner, GumConfig, GumError, Platform, PlanEntry, ProcessGuard, SystemRunner,
};

/// Initialize the tracing subscriber; RUST_LOG takes precedence over `--log-level`
fn init_logger(level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.log_level);
    debug!("CLI arguments parsed: {:?}", cli);

    // Terminate bash children on SIGINT/SIGTERM
    if let Err(e) = gum::process_guard::init_signal_handlers() {
        warn!("Failed to initialize signal handlers: {}", e);
    }
    let _guard = ProcessGuard::new();

    let runner: Arc<dyn CommandRunner> = if cli.dry_run {
        info!("Dry-run mode: installing commands will be logged, not executed");
        Arc::new(DryRunRunner::default())
    } else {
        Arc::new(SystemRunner)
    };

    let outcome = match cli.command {
        Commands::Up { dir } => up(&dir, runner),
        Commands::Validate { dir } => validate(&dir, runner),
        Commands::Plan {
            dir,
            platform,
            json,
        } => plan(&dir, platform, json, runner),
        Commands::Actions => {
            list_actions(runner);
            Ok(())
        }
    };

    // User errors get a plain report and exit 1; anything else bubbles up
    if let Err(e) = &outcome {
        let user_error = matches!(
            e.downcast_ref::<GumError>(),
            Some(GumError::ValidationFailed(_) | GumError::Config(_))
        );
        if user_error {
            error!("{}", e);
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
    outcome
}

fn host_platform() -> Result<Platform> {
    Platform::current().context("Failed to detect host platform")
}

/// Load gum.yml from `dir` and resolve it into root actions.
fn load_roots(
    dir: &Path,
    runner: Arc<dyn CommandRunner>,
    platform: Platform,
) -> Result<Vec<Action>> {
    let context = ActionContext::from_env(runner, dir, platform);
    let registry = ActionRegistry::builtin(&context);

    let (path, config) = GumConfig::load_from_dir(dir)?;
    info!("Using {}", path.display());
    config.validate(&registry)?;
    Ok(config.root_actions(&registry)?)
}

fn up(dir: &Path, runner: Arc<dyn CommandRunner>) -> Result<()> {
    let platform = host_platform()?;
    let roots = load_roots(dir, runner, platform)?;

    let handler = ActionHandler::new(&roots, platform);
    debug!("{}", handler.plan().summary());
    handler.validate()?;

    let summary = handler.run()?;
    println!("✓ Up to date: {}", summary);
    Ok(())
}

fn validate(dir: &Path, runner: Arc<dyn CommandRunner>) -> Result<()> {
    let platform = host_platform()?;
    let roots = load_roots(dir, runner, platform)?;

    let handler = ActionHandler::new(&roots, platform);
    handler.validate()?;
    println!(
        "✓ gum.yml is valid ({} action(s) planned for {})",
        handler.plan().len(),
        platform
    );
    Ok(())
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    platform: Platform,
    actions: Vec<PlanEntry>,
    cycles: &'a [DependencyCycle],
}

fn plan(
    dir: &Path,
    platform: Option<Platform>,
    json: bool,
    runner: Arc<dyn CommandRunner>,
) -> Result<()> {
    let platform = match platform {
        Some(p) => p,
        None => host_platform()?,
    };
    let roots = load_roots(dir, runner, platform)?;
    let handler = ActionHandler::new(&roots, platform);
    let plan = handler.plan();

    if json {
        let output = PlanOutput {
            platform,
            actions: plan.entries(),
            cycles: plan.cycles(),
        };
        let text = serde_json::to_string_pretty(&output).context("Failed to serialize plan")?;
        println!("{}", text);
    } else {
        println!("{}", plan.summary());
    }
    Ok(())
}

fn list_actions(runner: Arc<dyn CommandRunner>) {
    let platform = Platform::current().unwrap_or(Platform::Linux);
    let context = ActionContext::from_env(runner, ".", platform);
    let registry = ActionRegistry::builtin(&context);

    for name in registry.public_names() {
        let Some(action) = registry.get(name) else {
            continue;
        };
        let deps: Vec<String> = action
            .dependencies()
            .iter()
            .map(|d| d.identifier().to_string())
            .collect();
        if deps.is_empty() {
            println!("{:<10} [{}]", name, action.platforms());
        } else {
            println!(
                "{:<10} [{}] needs {}",
                name,
                action.platforms(),
                deps.join(", ")
            );
        }
    }
}
