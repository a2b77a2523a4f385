//! Command-line interface for govflow.
//!
//! Provides commands for driving the demo event run, submitting ad-hoc
//! events, seeding the registry, and inspecting the catalog and the
//! resolved configuration.

use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::adapters::{GovernanceClient, NarrativeClient, RegistryClient};
use crate::catalog;
use crate::config;
use crate::core::analysis::AnalyzedOutcome;
use crate::core::{Orchestrator, RunMode};
use crate::domain::{EventOutcome, OutcomeStatus, RunStats};

/// govflow - event-simulation and evaluation orchestrator
#[derive(Parser, Debug)]
#[command(name = "govflow")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the demo event sequence through the decision service
    Run {
        /// Cycle the catalog into a long run instead of once through
        #[arg(long)]
        live: bool,

        /// Number of events in a live run (default from config)
        #[arg(short, long)]
        count: Option<usize>,

        /// Seed demo agents and policies first
        #[arg(long)]
        seed: bool,

        /// Request a narrative analysis once the run finishes
        #[arg(long)]
        analyze: bool,

        /// Skip the service health pre-flight
        #[arg(long)]
        no_health_check: bool,
    },

    /// Evaluate a single ad-hoc event
    Submit {
        /// Input file (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Seed demo agents and policies into the governance registry
    Seed,

    /// List the demo event catalog
    Events,

    /// Show resolved configuration (debug)
    Config,
}

impl Cli {
    /// Execute the parsed command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Run {
                live,
                count,
                seed,
                analyze,
                no_health_check,
            } => cmd_run(live, count, seed, analyze, no_health_check).await,
            Commands::Submit { input } => cmd_submit(input).await,
            Commands::Seed => cmd_seed().await,
            Commands::Events => cmd_events(),
            Commands::Config => cmd_config(),
        }
    }
}

/// Build the orchestrator and registry client from the resolved config
fn build_clients() -> Result<(Arc<Orchestrator>, RegistryClient)> {
    let cfg = config::config()?;

    let governance = Arc::new(GovernanceClient::new(&cfg.adapter_url, cfg.timeout()));
    let narrative = Arc::new(NarrativeClient::new(
        &cfg.analysis_url,
        &cfg.analysis_model,
        cfg.analysis_api_key.clone().unwrap_or_default(),
        cfg.timeout(),
    ));
    let registry = RegistryClient::new(&cfg.governance_url, cfg.timeout());

    let orchestrator =
        Arc::new(Orchestrator::new(governance, narrative).with_pacing(cfg.pace(), cfg.live_pace()));

    Ok((orchestrator, registry))
}

async fn cmd_run(
    live: bool,
    count: Option<usize>,
    seed: bool,
    analyze: bool,
    no_health_check: bool,
) -> Result<()> {
    let cfg = config::config()?;
    let (orchestrator, registry) = build_clients()?;

    if !no_health_check {
        check_services(&registry).await?;
    }

    if seed {
        seed_registry(&registry).await;
    }

    let catalog = catalog::demo_events();
    let mode = if live {
        RunMode::Extended {
            total: count.unwrap_or(cfg.live_count),
        }
    } else {
        RunMode::Bounded
    };

    println!(
        "🚀 Dispatching {} events through the governance pipeline (Ctrl+C to stop)...\n",
        match mode {
            RunMode::Bounded => catalog.len(),
            RunMode::Extended { total } => total,
        }
    );

    // Run in a task so Ctrl+C can request cooperative cancellation; the
    // event in flight still completes and records its outcome.
    let mut runner = {
        let orchestrator = orchestrator.clone();
        let catalog = catalog.clone();
        tokio::spawn(async move { orchestrator.run(&catalog, mode).await })
    };

    let report = tokio::select! {
        result = &mut runner => result.context("Runner task failed")??,
        _ = tokio::signal::ctrl_c() => {
            println!("\n⏹  Stopping after the event in flight...");
            orchestrator.cancel();
            (&mut runner).await.context("Runner task failed")??
        }
    };

    for (i, outcome) in orchestrator.outcomes().iter().enumerate() {
        print_outcome(i + 1, outcome);
    }
    print_stats(&report.stats, report.dispatched, report.cancelled);

    if analyze {
        println!("\n📊 Requesting batch analysis...");
        let analyzed = orchestrator
            .request_analysis()
            .await
            .context("Batch analysis failed")?;
        print_report(&analyzed);
    }

    Ok(())
}

async fn cmd_submit(input: Option<PathBuf>) -> Result<()> {
    let raw = read_input(input)?;
    let (orchestrator, _) = build_clients()?;

    let outcome = orchestrator.submit_ad_hoc(&raw).await?;
    print_outcome(1, &outcome);

    Ok(())
}

async fn cmd_seed() -> Result<()> {
    let (_, registry) = build_clients()?;
    seed_registry(&registry).await;
    Ok(())
}

fn cmd_events() -> Result<()> {
    println!("Demo event catalog:\n");
    for (i, event) in catalog::demo_events().iter().enumerate() {
        let event_type = event
            .payload
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or("-");
        println!("  [{:02}] {:<10} {}", i + 1, event.tag, event.label);
        println!("       {} → {}", event.source, event_type);
    }
    Ok(())
}

fn cmd_config() -> Result<()> {
    let cfg = config::config()?;
    println!("Resolved configuration:");
    println!("  governance_url : {}", cfg.governance_url);
    println!("  adapter_url    : {}", cfg.adapter_url);
    println!("  analysis_url   : {}", cfg.analysis_url);
    println!("  analysis_model : {}", cfg.analysis_model);
    println!(
        "  analysis_key   : {}",
        if cfg.analysis_api_key.is_some() { "(set)" } else { "(unset)" }
    );
    println!("  timeout        : {}s", cfg.timeout_seconds);
    println!("  pace           : {}ms / {}ms live", cfg.pace_ms, cfg.live_pace_ms);
    println!("  live_count     : {}", cfg.live_count);
    match &cfg.config_file {
        Some(path) => println!("  config_file    : {}", path.display()),
        None => println!("  config_file    : (none)"),
    }
    Ok(())
}

/// Verify the governance services answer their health routes
async fn check_services(registry: &RegistryClient) -> Result<()> {
    let cfg = config::config()?;
    let governance = GovernanceClient::new(&cfg.adapter_url, cfg.timeout());

    registry.health().await.with_context(|| {
        format!("Governance API is not reachable at {}", cfg.governance_url)
    })?;
    governance.health().await.with_context(|| {
        format!("SAP adapter is not reachable at {}", cfg.adapter_url)
    })?;

    println!("✅ Services healthy");
    Ok(())
}

/// Best-effort seeding of demo agents and policies
async fn seed_registry(registry: &RegistryClient) {
    println!("📋 Seeding demo agents and policies...");
    let agents = registry.seed_agents(&catalog::demo_agents()).await;
    let policies = registry.seed_policies(&catalog::demo_policies()).await;
    println!(
        "   agents: {} ok, {} failed — policies: {} ok, {} failed",
        agents.succeeded(),
        agents.failed,
        policies.succeeded(),
        policies.failed
    );
}

/// Read input from a file or stdin
fn read_input(input: Option<PathBuf>) -> Result<String> {
    match input {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

fn status_marker(status: OutcomeStatus) -> &'static str {
    match status {
        OutcomeStatus::Pending => "…",
        OutcomeStatus::Running => "⏳",
        OutcomeStatus::Approved => "✅",
        OutcomeStatus::Blocked => "🚫",
        OutcomeStatus::Escalated => "⚠️",
        OutcomeStatus::Error => "❌",
    }
}

fn print_outcome(number: usize, outcome: &EventOutcome) {
    let marker = status_marker(outcome.status);
    print!("[{:02}] {} {:?}", number, marker, outcome.status);

    if let Some(confidence) = outcome.confidence {
        print!(" ({:.0}% confidence)", confidence * 100.0);
    }
    println!("  {} [{}]", outcome.label, outcome.tag);

    if let Some(workflow) = &outcome.workflow_decision {
        let review = match outcome.requires_human_review {
            Some(true) => "🔔 human review required",
            _ => "🤖 autonomous",
        };
        println!("     SAP: {} — {}", workflow, review);
    }
    if let Some(reasoning) = &outcome.reasoning {
        println!("     Reasoning: {}", truncate(reasoning, 120));
    }
    if !outcome.violations.is_empty() {
        println!("     ⚔️  Policy violations: {}", outcome.violations.join(", "));
    }
    if let Some(error) = &outcome.error {
        println!("     Error: {}", error);
    }
}

fn print_stats(stats: &RunStats, dispatched: usize, cancelled: bool) {
    println!(
        "\n{} events dispatched{} — ✅ {} approved, 🚫 {} blocked, ⚠️ {} escalated",
        dispatched,
        if cancelled { " (cancelled)" } else { "" },
        stats.approved,
        stats.blocked,
        stats.escalated
    );
}

fn print_report(analyzed: &[AnalyzedOutcome]) {
    for (i, entry) in analyzed.iter().enumerate() {
        let outcome = &entry.outcome;
        println!(
            "\n─── [{:02}] {} {} [{}] ───",
            i + 1,
            status_marker(outcome.status),
            outcome.label,
            outcome.tag
        );
        match &entry.narrative {
            Some(narrative) => {
                println!("  What happened  : {}", narrative.what_happened);
                println!("  Why            : {}", narrative.why_verdict);
                println!("  Business impact: {}", narrative.business_impact);
                println!("  Next steps     : {}", narrative.next_steps);
            }
            None => println!("  (no narrative returned for this event)"),
        }
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let prefix: String = text.chars().take(max).collect();
        format!("{}...", prefix)
    }
}
