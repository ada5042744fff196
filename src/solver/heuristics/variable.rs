//! Strategies for choosing which unassigned variable to branch on next.

use std::cell::RefCell;

use rand::seq::IteratorRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::solver::{engine::VariableId, semantics::DomainSemantics, solution::Solution};

/// A strategy for picking the next variable to assign during search.
///
/// A good choice here dominates solver performance; "fail-first" orderings
/// that tackle the most constrained variable early tend to prune best.
pub trait VariableSelectionHeuristic<S: DomainSemantics> {
    /// Picks an unassigned variable, or `None` when every domain is a
    /// singleton.
    fn select_variable(&self, solution: &Solution<S>) -> Option<VariableId>;
}

/// Selects the unassigned variable with the smallest [`VariableId`].
/// Deterministic and cheap; mostly useful as a baseline.
pub struct SelectFirstHeuristic;

impl<S: DomainSemantics> VariableSelectionHeuristic<S> for SelectFirstHeuristic {
    fn select_variable(&self, solution: &Solution<S>) -> Option<VariableId> {
        solution
            .domains
            .iter()
            .filter(|(_, domain)| domain.len() > 1)
            .min_by_key(|(var_id, _)| *var_id)
            .map(|(var_id, _)| *var_id)
    }
}

/// Minimum Remaining Values: selects the unassigned variable with the
/// smallest domain, breaking ties by [`VariableId`] for determinism.
pub struct MinimumRemainingValuesHeuristic;

impl<S: DomainSemantics> VariableSelectionHeuristic<S> for MinimumRemainingValuesHeuristic {
    fn select_variable(&self, solution: &Solution<S>) -> Option<VariableId> {
        solution
            .domains
            .iter()
            .filter(|(_, domain)| domain.len() > 1)
            .min_by(|(var_a, domain_a), (var_b, domain_b)| {
                (domain_a.len(), *var_a).cmp(&(domain_b.len(), *var_b))
            })
            .map(|(var_id, _)| *var_id)
    }
}

/// Selects an unassigned variable uniformly at random from a seeded
/// generator, so runs remain reproducible. Useful for stress tests and
/// restart-style experimentation.
pub struct RandomVariableHeuristic {
    rng: RefCell<ChaCha8Rng>,
}

impl RandomVariableHeuristic {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: RefCell::new(ChaCha8Rng::seed_from_u64(seed)),
        }
    }
}

impl<S: DomainSemantics> VariableSelectionHeuristic<S> for RandomVariableHeuristic {
    fn select_variable(&self, solution: &Solution<S>) -> Option<VariableId> {
        solution
            .domains
            .iter()
            .filter(|(_, domain)| domain.len() > 1)
            .map(|(var_id, _)| *var_id)
            .choose(&mut *self.rng.borrow_mut())
    }
}
