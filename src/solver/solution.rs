use std::sync::Arc;

use im::{HashMap, HashSet, OrdSet};

use crate::solver::{
    engine::VariableId,
    semantics::DomainSemantics,
    value::{ValueEquality, ValueOrdering},
};

pub type Domain<V> = Box<dyn DomainRepresentation<V>>;
pub type Domains<V> = HashMap<VariableId, Domain<V>>;

/// A single, immutable state in the solver's search space.
///
/// A `Solution` maps every variable to its current domain of possible
/// values. Domains are persistent (`im`) structures, so cloning a solution
/// is cheap; pruning produces a new `Solution` rather than mutating the old
/// one, which makes backtracking trivial.
#[derive(Clone, Debug)]
pub struct Solution<S: DomainSemantics> {
    /// Current domain of possible values for every variable.
    pub domains: Domains<S::Value>,
    /// Semantic tags for variables, shared across all solution states.
    pub metadata: HashMap<VariableId, S::VariableMetadata>,
    /// Read-only access to the problem's semantics.
    pub semantics: Arc<S>,
}

impl<S: DomainSemantics> Solution<S> {
    pub fn new(
        domains: Domains<S::Value>,
        metadata: HashMap<VariableId, S::VariableMetadata>,
        semantics: Arc<S>,
    ) -> Self {
        Self {
            domains,
            metadata,
            semantics,
        }
    }

    /// A copy of this state with the given domains, keeping metadata and
    /// semantics shared.
    pub fn clone_with_domains(&self, domains: Domains<S::Value>) -> Self {
        Self {
            domains,
            metadata: self.metadata.clone(),
            semantics: self.semantics.clone(),
        }
    }

    /// True when every variable's domain is a singleton.
    pub fn is_complete(&self) -> bool {
        self.domains.values().all(|domain| domain.is_singleton())
    }
}

/// Storage-agnostic interface to a variable's domain.
///
/// The solver only ever talks to this trait, so problem frontends can plug
/// in whatever representation suits their value type.
pub trait DomainRepresentation<V: ValueEquality>: std::fmt::Debug {
    /// Number of values currently possible.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn is_singleton(&self) -> bool {
        self.len() == 1
    }

    /// The single remaining value, if the domain is a singleton.
    fn get_singleton_value(&self) -> Option<V>;

    fn iter(&self) -> Box<dyn Iterator<Item = &V> + '_>;

    /// A new domain keeping only the values accepted by `f`.
    fn retain(&self, f: &dyn Fn(&V) -> bool) -> Box<dyn DomainRepresentation<V>>;

    fn clone_box(&self) -> Box<dyn DomainRepresentation<V>>;

    /// A new domain holding the intersection with `other`.
    fn intersect(&self, other: &dyn DomainRepresentation<V>) -> Box<dyn DomainRepresentation<V>>;

    fn get_min_value(&self) -> Option<V>
    where
        V: ValueOrdering;

    fn get_max_value(&self) -> Option<V>
    where
        V: ValueOrdering;
}

impl<V: ValueEquality> Clone for Box<dyn DomainRepresentation<V>> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// A [`DomainRepresentation`] backed by an `im::OrdSet`.
///
/// Iteration order is ascending, which keeps value enumeration during search
/// deterministic. Preferred for integer domains.
#[derive(Clone, Debug)]
pub struct OrdSetDomain<V: ValueOrdering>(pub OrdSet<V>);

impl<V: ValueOrdering> OrdSetDomain<V> {
    pub fn new(values: OrdSet<V>) -> Self {
        Self(values)
    }
}

impl<V: ValueOrdering> DomainRepresentation<V> for OrdSetDomain<V> {
    fn len(&self) -> usize {
        self.0.len()
    }

    fn get_singleton_value(&self) -> Option<V> {
        if self.len() == 1 {
            self.0.get_min().cloned()
        } else {
            None
        }
    }

    fn iter(&self) -> Box<dyn Iterator<Item = &V> + '_> {
        Box::new(self.0.iter())
    }

    fn retain(&self, f: &dyn Fn(&V) -> bool) -> Box<dyn DomainRepresentation<V>> {
        let new_set = self.0.iter().filter(|v| f(v)).cloned().collect();
        Box::new(Self(new_set))
    }

    fn clone_box(&self) -> Box<dyn DomainRepresentation<V>> {
        Box::new(self.clone())
    }

    fn intersect(&self, other: &dyn DomainRepresentation<V>) -> Box<dyn DomainRepresentation<V>> {
        let other_values: HashSet<V> = other.iter().cloned().collect();
        let new_inner = self
            .0
            .iter()
            .filter(|v| other_values.contains(v))
            .cloned()
            .collect();
        Box::new(Self(new_inner))
    }

    fn get_min_value(&self) -> Option<V>
    where
        V: ValueOrdering,
    {
        self.0.get_min().cloned()
    }

    fn get_max_value(&self) -> Option<V>
    where
        V: ValueOrdering,
    {
        self.0.get_max().cloned()
    }
}
