//! Execution planner - decides which operation each resource needs

use crate::diff::{AttributeDiff, diff_attributes};
use crate::resource::Reconciler;
use crate::state::LocalState;
use crate::types::ReconcilerKind;
use std::fmt;
use std::sync::Arc;

/// One lifecycle operation on a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    /// Import from an opaque import string
    Import(String),
}

impl Operation {
    /// Pick the operation that converges a state
    ///
    /// Returns `None` when there is nothing to do (destroying an
    /// already absent resource).
    pub fn plan(state: &LocalState, destroy: bool) -> Option<Self> {
        match (destroy, state.is_present()) {
            (true, true) => Some(Self::Delete),
            (true, false) => None,
            (false, false) => Some(Self::Create),
            (false, true) if state.has_changes() => Some(Self::Update),
            (false, true) => Some(Self::Read),
        }
    }

    /// Pick the operation for a reconciler of the given kind
    ///
    /// A data source owns nothing remote: it is always read, and
    /// destroying one has nothing to do.
    pub fn plan_for(kind: ReconcilerKind, state: &LocalState, destroy: bool) -> Option<Self> {
        match kind {
            ReconcilerKind::DataSource if destroy => None,
            ReconcilerKind::DataSource => Some(Self::Read),
            ReconcilerKind::Resource => Self::plan(state, destroy),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Read => write!(f, "read"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
            Self::Import(id) => write!(f, "import {id}"),
        }
    }
}

/// A single unit of work: one operation on one resource's state
#[derive(Debug, Clone)]
pub struct Task {
    /// Engine address of the resource (e.g. "service_tag.env")
    pub address: String,
    /// Reconciler for the resource's type
    pub reconciler: Arc<dyn Reconciler>,
    /// Operation to run
    pub operation: Operation,
    /// State the operation works on
    pub state: LocalState,
}

impl Task {
    pub fn new(
        address: impl Into<String>,
        reconciler: Arc<dyn Reconciler>,
        operation: Operation,
        state: LocalState,
    ) -> Self {
        Self {
            address: address.into(),
            reconciler,
            operation,
            state,
        }
    }

    /// Attribute changes this task would send, for reporting
    pub fn pending_changes(&self) -> Vec<AttributeDiff> {
        match self.operation {
            Operation::Create | Operation::Update => diff_attributes(&self.state),
            _ => Vec::new(),
        }
    }
}

/// An execution plan of independent tasks
#[derive(Debug, Default)]
pub struct ExecutionPlan {
    pub tasks: Vec<Task>,
}

impl ExecutionPlan {
    /// Create a new empty plan
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Add a task with an explicit operation
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Add a resource, planning its operation from its state
    ///
    /// Returns `false` when the resource needs nothing.
    pub fn add_resource(
        &mut self,
        address: impl Into<String>,
        reconciler: Arc<dyn Reconciler>,
        state: LocalState,
        destroy: bool,
    ) -> bool {
        match Operation::plan_for(reconciler.kind(), &state, destroy) {
            Some(operation) => {
                self.tasks
                    .push(Task::new(address, reconciler, operation, state));
                true
            }
            None => false,
        }
    }

    /// Filter plan to only include tasks matching a predicate
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: Fn(&Task) -> bool,
    {
        Self {
            tasks: self.tasks.into_iter().filter(|t| predicate(t)).collect(),
        }
    }

    /// Filter plan to tasks whose reconciler has the given type name
    pub fn filter_by_type(self, type_name: Option<&str>) -> Self {
        match type_name {
            None => self,
            Some(name) => self.filter(|t| t.reconciler.type_name() == name),
        }
    }

    /// Total number of tasks in the plan
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if plan is empty
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttrValue, Attributes};
    use anyhow::Result;

    #[derive(Debug)]
    struct Noop(&'static str);

    impl Reconciler for Noop {
        fn type_name(&self) -> &'static str {
            self.0
        }

        fn read(&self, _state: &mut LocalState) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Debug)]
    struct Lookup;

    impl Reconciler for Lookup {
        fn type_name(&self) -> &'static str {
            "lookup"
        }

        fn kind(&self) -> ReconcilerKind {
            ReconcilerKind::DataSource
        }

        fn read(&self, _state: &mut LocalState) -> Result<()> {
            Ok(())
        }
    }

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), AttrValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_plan_create_when_absent() {
        let state = LocalState::from_config(attrs(&[("key", "env")]));
        assert_eq!(Operation::plan(&state, false), Some(Operation::Create));
    }

    #[test]
    fn test_plan_update_when_changed() {
        let mut state = LocalState::synced("t1", attrs(&[("key", "env")]));
        state.configure(attrs(&[("key", "team")]));
        assert_eq!(Operation::plan(&state, false), Some(Operation::Update));
    }

    #[test]
    fn test_plan_read_when_in_sync() {
        let state = LocalState::synced("t1", attrs(&[("key", "env")]));
        assert_eq!(Operation::plan(&state, false), Some(Operation::Read));
    }

    #[test]
    fn test_plan_destroy() {
        let present = LocalState::synced("t1", Attributes::new());
        assert_eq!(Operation::plan(&present, true), Some(Operation::Delete));
        assert_eq!(Operation::plan(&LocalState::new(), true), None);
    }

    #[test]
    fn test_plan_data_source_is_always_read() {
        let fresh = LocalState::from_config(attrs(&[("filter.value", "Security")]));
        let mut read_before = LocalState::synced("c1", attrs(&[("filter.value", "Security")]));
        read_before.configure(attrs(&[("filter.value", "Reliability")]));

        for state in [&fresh, &read_before] {
            assert_eq!(
                Operation::plan_for(ReconcilerKind::DataSource, state, false),
                Some(Operation::Read)
            );
            assert_eq!(Operation::plan_for(ReconcilerKind::DataSource, state, true), None);
        }
        assert_eq!(
            Operation::plan_for(ReconcilerKind::Resource, &fresh, false),
            Some(Operation::Create)
        );
    }

    #[test]
    fn test_add_data_source_plans_read() {
        let mut plan = ExecutionPlan::new();
        assert!(plan.add_resource("lookup.one", Arc::new(Lookup), LocalState::new(), false));
        assert!(!plan.add_resource("lookup.two", Arc::new(Lookup), LocalState::new(), true));

        assert_eq!(plan.len(), 1);
        assert_eq!(plan.tasks[0].operation, Operation::Read);
    }

    #[test]
    fn test_filter_by_type() {
        let mut plan = ExecutionPlan::new();
        plan.add_resource("a.one", Arc::new(Noop("a")), LocalState::new(), false);
        plan.add_resource("b.one", Arc::new(Noop("b")), LocalState::new(), false);
        assert!(!plan.add_resource("b.two", Arc::new(Noop("b")), LocalState::new(), true));

        let plan = plan.filter_by_type(Some("b"));
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.tasks[0].address, "b.one");
    }

    #[test]
    fn test_pending_changes_only_for_writes() {
        let state = LocalState::from_config(attrs(&[("key", "env")]));
        let create = Task::new("x", Arc::new(Noop("x")), Operation::Create, state.clone());
        let read = Task::new("x", Arc::new(Noop("x")), Operation::Read, state);
        assert_eq!(create.pending_changes().len(), 1);
        assert!(read.pending_changes().is_empty());
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Import("a:b".into()).to_string(), "import a:b");
        assert_eq!(Operation::Delete.to_string(), "delete");
    }
}
