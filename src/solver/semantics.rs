use crate::solver::{constraint::Constraint, value::ValueEquality};

/// The "frontend" trait connecting a concrete problem domain to the generic
/// solver engine.
///
/// An implementation tells the engine what a value is, how variables are
/// tagged with domain-specific meaning, and how declarative constraint
/// definitions become runnable [`Constraint`] objects.
pub trait DomainSemantics: 'static + Clone {
    /// The concrete type for a value in a variable's domain.
    type Value: ValueEquality;

    /// A tag attached to each variable carrying semantic information.
    /// Heuristics can use it to treat different classes of variables
    /// differently (e.g. branch on decision variables before derived ones).
    type VariableMetadata: Clone + std::fmt::Debug + Eq + std::hash::Hash + 'static;

    /// The declarative description of a single constraint, typically an enum
    /// with one variant per constraint kind.
    type ConstraintDefinition: std::fmt::Debug;

    /// Turns a constraint definition into executable pruning logic.
    fn build_constraint(
        &self,
        definition: &Self::ConstraintDefinition,
    ) -> Box<dyn Constraint<Self>>;
}
