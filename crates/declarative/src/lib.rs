//! # Declarative
//!
//! A framework for declarative resource reconciliation.
//!
//! This crate provides the engine-facing abstractions for keeping a local
//! projection of remote objects in sync with declared configuration.
//!
//! ## Core Concepts
//!
//! - **LocalState**: a resource's id plus two attribute snapshots (last
//!   synchronized and desired); changes are their difference
//! - **Reconciler**: per-entity-type state machine (create, read, update,
//!   delete, import) that talks to the remote system
//! - **ExecutionPlan**: independent tasks, each an operation on one state
//! - **Executor**: applies tasks with parallelism, never leaving a state
//!   half-updated
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{
//!     Attributes, ExecuteOptions, ExecutionPlan, LocalState, Reconciler, execute_simple,
//! };
//! use std::sync::Arc;
//!
//! let reconciler: Arc<dyn Reconciler> = provider.resource("service_tag")?;
//!
//! let mut plan = ExecutionPlan::new();
//! plan.add_resource("service_tag.env", reconciler, LocalState::from_config(config), false);
//!
//! let report = execute_simple(plan, &ExecuteOptions::default())?;
//! assert!(report.summary.is_success());
//! ```

pub mod context;
pub mod diff;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod state;
pub mod types;

// Re-export main types at crate root
pub use context::{LogProgress, NoProgress, ProgressCallback};
pub use diff::{AttributeDiff, DiffSummary, diff_attributes};
pub use executor::{ExecuteReport, TaskOutcome, execute, execute_simple};
pub use planner::{ExecutionPlan, Operation, Task};
pub use resource::{BoxedReconciler, Reconciler, ReconcilerExt};
pub use state::{LAST_UPDATED, LocalState, format_last_updated};
pub use types::{
    ApplyResult, AttrValue, Attributes, ExecuteOptions, ExecuteSummary, ReconcilerKind,
};
