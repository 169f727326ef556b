//! Execution engine - applies independent tasks with parallelism

use crate::context::ProgressCallback;
use crate::planner::{ExecutionPlan, Operation, Task};
use crate::resource::Reconciler;
use crate::state::LocalState;
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary};
use anyhow::Result;
use rayon::prelude::*;

/// Outcome of a single task
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    /// Engine address of the resource
    pub address: String,
    /// Operation that ran
    pub operation: Operation,
    /// What happened
    pub result: ApplyResult,
    /// State after the task; unchanged from the input on failure
    pub state: LocalState,
}

/// Outcomes of all tasks, in plan order, plus a summary
#[derive(Debug, Clone, Default)]
pub struct ExecuteReport {
    pub outcomes: Vec<TaskOutcome>,
    pub summary: ExecuteSummary,
}

impl ExecuteReport {
    /// Find the outcome for an address
    pub fn outcome(&self, address: &str) -> Option<&TaskOutcome> {
        self.outcomes.iter().find(|o| o.address == address)
    }
}

/// Execute a plan with the given options and progress callback
///
/// Tasks are independent: a failure is recorded in its outcome and never
/// stops sibling tasks.
///
/// # Arguments
/// * `plan` - The execution plan to run
/// * `opts` - Execution options (dry_run, jobs)
/// * `progress` - Progress callback
pub fn execute<P: ProgressCallback>(
    plan: ExecutionPlan,
    opts: &ExecuteOptions,
    progress: &mut P,
) -> Result<ExecuteReport> {
    if plan.is_empty() {
        return Ok(ExecuteReport::default());
    }

    if opts.dry_run {
        let outcomes = plan
            .tasks
            .into_iter()
            .map(|task| TaskOutcome {
                address: task.address,
                operation: task.operation,
                result: ApplyResult::Skipped {
                    reason: "Dry run".to_string(),
                },
                state: task.state,
            })
            .collect();
        return Ok(report(outcomes));
    }

    progress.on_batch_start(plan.len());
    let outcomes = if opts.jobs <= 1 || plan.len() == 1 {
        execute_sequential(plan.tasks, progress)
    } else {
        execute_parallel(plan.tasks, opts.jobs, progress)?
    };
    progress.on_batch_complete();

    Ok(report(outcomes))
}

/// Execute a plan without progress reporting
pub fn execute_simple(plan: ExecutionPlan, opts: &ExecuteOptions) -> Result<ExecuteReport> {
    use crate::context::NoProgress;

    execute(plan, opts, &mut NoProgress)
}

fn report(outcomes: Vec<TaskOutcome>) -> ExecuteReport {
    let mut summary = ExecuteSummary::default();
    for outcome in &outcomes {
        summary.add_result(&outcome.result);
    }
    ExecuteReport { outcomes, summary }
}

fn execute_sequential<P: ProgressCallback>(
    tasks: Vec<Task>,
    progress: &mut P,
) -> Vec<TaskOutcome> {
    let mut outcomes = Vec::with_capacity(tasks.len());
    for task in tasks {
        progress.on_task_start(&task.address, &task.operation);
        let outcome = run_task(task);
        progress.on_task_complete(&outcome.address, &outcome.result);
        outcomes.push(outcome);
    }
    outcomes
}

/// Execute tasks in parallel using rayon
fn execute_parallel<P: ProgressCallback>(
    tasks: Vec<Task>,
    jobs: usize,
    progress: &mut P,
) -> Result<Vec<TaskOutcome>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(jobs)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create thread pool: {}", e))?;

    // Progress callbacks are not thread-safe; report after the batch.
    let outcomes: Vec<TaskOutcome> = pool.install(|| tasks.into_par_iter().map(run_task).collect());

    for outcome in &outcomes {
        progress.on_task_complete(&outcome.address, &outcome.result);
    }

    Ok(outcomes)
}

/// Run one task against a working copy of its state
///
/// The copy is only kept when the reconciler succeeds, so a failed
/// operation can never leave the state half-updated.
fn run_task(task: Task) -> TaskOutcome {
    let Task {
        address,
        reconciler,
        operation,
        state,
    } = task;

    let mut working = state.clone();
    match apply(reconciler.as_ref(), &operation, &mut working) {
        Ok(result) => TaskOutcome {
            address,
            operation,
            result,
            state: working,
        },
        Err(e) => TaskOutcome {
            address,
            operation,
            result: ApplyResult::Failed {
                error: format!("{e:#}"),
            },
            state,
        },
    }
}

fn apply(
    reconciler: &dyn Reconciler,
    operation: &Operation,
    state: &mut LocalState,
) -> Result<ApplyResult> {
    match operation {
        Operation::Create => {
            reconciler.create(state)?;
            Ok(ApplyResult::Created)
        }
        Operation::Read => {
            reconciler.read(state)?;
            Ok(if state.is_present() {
                ApplyResult::Refreshed
            } else {
                ApplyResult::Gone
            })
        }
        Operation::Update => {
            if !state.has_changes() {
                return Ok(ApplyResult::NoChange);
            }
            reconciler.update(state)
        }
        Operation::Delete => {
            reconciler.delete(state)?;
            Ok(ApplyResult::Deleted)
        }
        Operation::Import(import_id) => {
            reconciler.import(state, import_id)?;
            Ok(if state.is_present() {
                ApplyResult::Imported
            } else {
                ApplyResult::Gone
            })
        }
    }
}
