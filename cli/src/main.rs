//! CLI entrypoint for dealdesk
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod commands;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use commands::{CallArgs, Cli, Command};
use dealdesk_application::{ToolFactory, ToolSchemaPort};
use dealdesk_domain::{CallingContext, crm_tool_spec};
use dealdesk_infrastructure::{
    ConfigLoader, FileConfig, InMemoryStore, JsonSchemaToolConverter, JsonlToolAuditLogger,
    SeedData, Severity,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {e}"))?
    };

    match cli.command {
        Command::ListTools { read_only } => list_tools(read_only),
        Command::ShowConfig => show_config(&config, cli.no_config),
        Command::Call(args) => call(&config, args).await,
    }
}

fn list_tools(read_only: bool) -> Result<()> {
    let spec = crm_tool_spec();
    let converter = JsonSchemaToolConverter;
    let schemas = if read_only {
        converter.read_only_tools_schema(&spec)
    } else {
        converter.all_tools_schema(&spec)
    };
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}

fn show_config(config: &FileConfig, no_config: bool) -> Result<()> {
    if no_config {
        println!("# configuration files disabled (--no-config)");
    } else {
        let sources = ConfigLoader::config_sources();
        if sources.is_empty() {
            println!("# no configuration files found, using defaults");
        }
        for source in sources {
            println!("# loaded: {}", source);
        }
    }
    for issue in config.validate() {
        let level = match issue.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        println!("# {}: {}", level, issue.message);
    }
    println!();
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

async fn call(config: &FileConfig, args: CallArgs) -> Result<()> {
    for issue in config.validate() {
        if issue.severity == Severity::Warning {
            warn!("{}", issue.message);
        }
    }
    if config.has_errors() {
        bail!("Configuration is invalid, run `dealdesk show-config` for details");
    }

    let input: Value = serde_json::from_str(&args.args)
        .with_context(|| format!("Tool arguments are not valid JSON: {}", args.args))?;

    // === Dependency Injection ===
    let store = match &args.seed {
        Some(path) => InMemoryStore::from_seed(SeedData::from_path(path)?),
        None => InMemoryStore::new(),
    };
    let mut factory = ToolFactory::new(Arc::new(store)).with_config(config.to_tools_config());
    if let Some(path) = &config.audit.log_path
        && let Some(logger) = JsonlToolAuditLogger::new(path)
    {
        factory = factory.with_audit_logger(Arc::new(logger));
    }

    let mut context = CallingContext::new(&args.org, &args.owner);
    if let Some(board) = &args.board {
        context = context.with_board(board);
    }
    if let Some(deal) = &args.deal {
        context = context.with_deal(deal);
    }
    if let Some(label) = &args.won_label {
        context = context.with_won_stage_label(label);
    }
    let acting_user = args.user.clone().unwrap_or_else(|| args.owner.clone());
    let tools = factory.create_tools(context, acting_user)?;

    info!(tool = %args.tool, org = %args.org, "Executing tool call");
    let result = tools.execute_json(&args.tool, input).await;
    println!("{}", serde_json::to_string_pretty(&result.to_json())?);

    if !result.is_success() {
        drop(tools);
        std::process::exit(1);
    }
    Ok(())
}
