//! Execution engine - applies planned changes with bounded parallelism

use crate::context::{ConfirmCallback, ProgressCallback};
use crate::planner::{Action, ExecutionPlan, PlannedChange};
use crate::resource::Lifecycle;
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary};
use anyhow::Result;
use rayon::prelude::*;

/// How the recorded state for an address changes after execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateUpdate<S> {
    /// Keep whatever was recorded before
    Unchanged,
    /// Record this snapshot
    Set(S),
    /// Forget the address
    Remove,
}

/// Outcome of one planned change
#[derive(Debug, Clone)]
pub struct ChangeOutcome<S> {
    pub address: String,
    pub action: Action,
    pub result: ApplyResult,
    pub state: StateUpdate<S>,
}

/// Everything an execution produced
#[derive(Debug, Clone)]
pub struct ExecuteReport<S> {
    pub summary: ExecuteSummary,
    pub outcomes: Vec<ChangeOutcome<S>>,
}

impl<S> Default for ExecuteReport<S> {
    fn default() -> Self {
        Self {
            summary: ExecuteSummary::default(),
            outcomes: Vec::new(),
        }
    }
}

/// Execute a plan with the given options and callbacks
///
/// Changes to different addresses are independent and run on a pool of
/// `opts.jobs` threads. Each change itself runs sequentially.
///
/// # Type Parameters
/// * `L` - Lifecycle of the planned resources
/// * `P` - Progress callback type
/// * `C` - Confirm callback type
pub fn execute<L, P, C>(
    lifecycle: &L,
    plan: &ExecutionPlan<L::Config, L::State>,
    opts: &ExecuteOptions,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteReport<L::State>>
where
    L: Lifecycle + ?Sized,
    P: ProgressCallback,
    C: ConfirmCallback,
{
    let pending: Vec<&PlannedChange<L::Config, L::State>> = plan.pending().collect();

    if pending.is_empty() {
        return Ok(ExecuteReport::default());
    }

    if opts.dry_run {
        return Ok(skip_all(&pending, "Dry run"));
    }

    if !confirm.confirm("Apply these changes?")? {
        return Ok(skip_all(&pending, "Declined"));
    }

    progress.on_batch_start(pending.len());

    let outcomes = if opts.jobs <= 1 || pending.len() == 1 {
        let mut outcomes = Vec::with_capacity(pending.len());
        for change in &pending {
            let outcome = apply_change(lifecycle, change);
            progress.on_change_complete(&outcome.address, outcome.action, &outcome.result);
            outcomes.push(outcome);
        }
        outcomes
    } else {
        let outcomes = execute_parallel(lifecycle, &pending, opts.jobs)?;
        // The callback is not thread-safe, so results are reported after the batch
        for outcome in &outcomes {
            progress.on_change_complete(&outcome.address, outcome.action, &outcome.result);
        }
        outcomes
    };

    progress.on_batch_complete();

    let mut summary = ExecuteSummary::default();
    for outcome in &outcomes {
        summary.add_result(&outcome.result);
    }

    Ok(ExecuteReport { summary, outcomes })
}

/// Execute changes in parallel using rayon
fn execute_parallel<L>(
    lifecycle: &L,
    pending: &[&PlannedChange<L::Config, L::State>],
    jobs: usize,
) -> Result<Vec<ChangeOutcome<L::State>>>
where
    L: Lifecycle + ?Sized,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create thread pool: {}", e))?;

    Ok(pool.install(|| {
        pending
            .par_iter()
            .map(|change| apply_change(lifecycle, change))
            .collect()
    }))
}

fn skip_all<C, S>(pending: &[&PlannedChange<C, S>], reason: &str) -> ExecuteReport<S> {
    let outcomes: Vec<ChangeOutcome<S>> = pending
        .iter()
        .map(|c| ChangeOutcome {
            address: c.address.clone(),
            action: c.action,
            result: ApplyResult::Skipped {
                reason: reason.to_string(),
            },
            state: StateUpdate::Unchanged,
        })
        .collect();

    ExecuteReport {
        summary: ExecuteSummary {
            skipped: outcomes.len(),
            ..Default::default()
        },
        outcomes,
    }
}

/// Apply a single planned change
///
/// Never fails: errors become `ApplyResult::Failed`, and any state the
/// lifecycle can salvage from the error is still recorded.
pub fn apply_change<L>(
    lifecycle: &L,
    change: &PlannedChange<L::Config, L::State>,
) -> ChangeOutcome<L::State>
where
    L: Lifecycle + ?Sized,
{
    let (result, state) = match (change.action, &change.desired, &change.prior) {
        (Action::NoOp, _, _) => (ApplyResult::NoChange, StateUpdate::Unchanged),
        (Action::Create, Some(desired), _) => match lifecycle.create(desired) {
            Ok(state) => (ApplyResult::Created, StateUpdate::Set(state)),
            Err(e) => failed(lifecycle, &e, StateUpdate::Unchanged),
        },
        (Action::Update, Some(desired), Some(prior)) => match lifecycle.update(desired, prior) {
            Ok(state) => (ApplyResult::Modified, StateUpdate::Set(state)),
            Err(e) => failed(lifecycle, &e, StateUpdate::Unchanged),
        },
        (Action::Replace, Some(desired), Some(prior)) => match lifecycle.delete(prior) {
            Err(e) => failed(lifecycle, &e, StateUpdate::Unchanged),
            Ok(()) => match lifecycle.create(desired) {
                Ok(state) => (ApplyResult::Replaced, StateUpdate::Set(state)),
                // The old object is gone either way
                Err(e) => failed(lifecycle, &e, StateUpdate::Remove),
            },
        },
        (Action::Delete, _, Some(prior)) => match lifecycle.delete(prior) {
            Ok(()) => (ApplyResult::Removed, StateUpdate::Remove),
            Err(e) => failed(lifecycle, &e, StateUpdate::Unchanged),
        },
        (action, _, _) => (
            ApplyResult::Failed {
                error: format!("cannot {action}: plan is missing desired or prior state"),
            },
            StateUpdate::Unchanged,
        ),
    };

    match &result {
        ApplyResult::Failed { error } => {
            log::warn!("{} {}: {}", change.action, change.address, error);
        }
        _ => log::debug!("{} {}: {:?}", change.action, change.address, result),
    }

    ChangeOutcome {
        address: change.address.clone(),
        action: change.action,
        result,
        state,
    }
}

fn failed<L>(
    lifecycle: &L,
    error: &L::Error,
    otherwise: StateUpdate<L::State>,
) -> (ApplyResult, StateUpdate<L::State>)
where
    L: Lifecycle + ?Sized,
{
    let state = lifecycle
        .salvage(error)
        .map_or(otherwise, StateUpdate::Set);
    (
        ApplyResult::Failed {
            error: error.to_string(),
        },
        state,
    )
}
