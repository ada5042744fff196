use crate::{
    error::Result,
    solver::{engine::VariableId, semantics::DomainSemantics, solution::Solution},
};

/// Scheduling priority for a constraint's revisions.
///
/// Cheap constraints that prune aggressively (e.g. the automaton constraint)
/// run before the rest, which keeps the propagation work-list short.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConstraintPriority {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone)]
pub struct ConstraintDescriptor {
    pub name: String,
    pub description: String,
}

/// A rule the solver must satisfy.
///
/// Constraints participate in propagation through [`Constraint::revise`]:
/// given a target variable, return a new solution with that variable's
/// domain pruned, or `None` when nothing could be removed. Returning a
/// solution with an empty domain signals a contradiction to the engine.
pub trait Constraint<S: DomainSemantics>: std::fmt::Debug {
    /// The variables this constraint ranges over.
    fn variables(&self) -> &[VariableId];

    fn descriptor(&self) -> ConstraintDescriptor;

    fn priority(&self) -> ConstraintPriority {
        ConstraintPriority::Normal
    }

    fn revise(
        &self,
        target_var: &VariableId,
        solution: &Solution<S>,
    ) -> Result<Option<Solution<S>>>;
}
