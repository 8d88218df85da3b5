use crate::infra::{load_policy, FileSnapshotStore};
use clap::Args;
use lifecycle_trigger::config::AppConfig;
use lifecycle_trigger::error::AppError;
use lifecycle_trigger::lifecycle::{
    BatchImporter, BatchReport, DecisionEngine, IdentityId, LifecycleTriggerService,
    TriggerEvaluation, TriggerOutcome,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct DecideArgs {
    /// JSON snapshot store keyed by identity id
    #[arg(long)]
    pub(crate) store: PathBuf,
    /// Identity to evaluate
    #[arg(long)]
    pub(crate) identity: String,
    /// Lifecycle process name (joiner, mover, leaver)
    #[arg(long)]
    pub(crate) process: String,
    /// Policy document overriding LIFECYCLE_POLICY_PATH
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV export of identity snapshots
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Policy document overriding LIFECYCLE_POLICY_PATH
    #[arg(long)]
    pub(crate) policy: Option<PathBuf>,
    /// Print the full report as JSON instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct DecideResponse<'a> {
    #[serde(flatten)]
    evaluation: &'a TriggerEvaluation,
    outcome: TriggerOutcome,
}

pub(crate) fn run_decide(config: &AppConfig, args: DecideArgs) -> Result<(), AppError> {
    let DecideArgs {
        store,
        identity,
        process,
        policy,
    } = args;

    let policy = load_policy(&config.policy, policy)?;
    let store = FileSnapshotStore::from_path(store)?;
    let service = LifecycleTriggerService::new(Arc::new(store), Arc::new(policy));

    let evaluation = service.evaluate(&IdentityId(identity), &process)?;
    info!(
        identity = %evaluation.identity,
        process = %evaluation.process_name,
        action = evaluation.action.label(),
        "trigger decision evaluated"
    );

    let response = DecideResponse {
        evaluation: &evaluation,
        outcome: evaluation.outcome(),
    };
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

pub(crate) fn run_batch(config: &AppConfig, args: BatchArgs) -> Result<(), AppError> {
    let BatchArgs { csv, policy, json } = args;

    let engine = DecisionEngine::new(load_policy(&config.policy, policy)?);
    let report = BatchImporter::from_path(&csv, &engine)?;
    info!(
        rows = report.decisions.len(),
        source = %csv.display(),
        "identity batch evaluated"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_batch_summary(&report);
    }
    Ok(())
}

fn render_batch_summary(report: &BatchReport) {
    println!("Lifecycle trigger batch");
    println!("- {} identities evaluated", report.decisions.len());
    for (action, count) in &report.tallies {
        println!("  - {}: {}", action, count);
    }

    let marked: Vec<_> = report.marked_skipped().map(|id| id.0.as_str()).collect();
    if marked.is_empty() {
        println!("- No identities to mark as skipped");
    } else {
        println!("- Mark as skipped: {}", marked.join(", "));
    }
}
