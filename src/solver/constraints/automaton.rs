//! A finite-automaton (regular) constraint over a sequence of variables.

use std::collections::HashSet;

use crate::{
    error::Result,
    solver::{
        constraint::{Constraint, ConstraintDescriptor, ConstraintPriority},
        engine::VariableId,
        semantics::DomainSemantics,
        solution::Solution,
    },
};

/// Forces a sequence of symbol variables to trace a valid path through a
/// transition table, from a designated start state to a designated accept
/// state.
///
/// Filtering is the classic layered-graph reachability of the `regular`
/// constraint: states reachable forward from the start are intersected with
/// states that can still reach the accept state backward, and any symbol not
/// on a surviving edge is pruned from its position's domain. Runs at high
/// priority because one revision can rule out most of a position's domain.
#[derive(Debug, Clone)]
pub struct AutomatonConstraint<S: DomainSemantics> {
    sequence: Vec<VariableId>,
    transitions: Vec<(S::Value, S::Value, S::Value)>,
    start: S::Value,
    accept: S::Value,
}

impl<S: DomainSemantics> AutomatonConstraint<S> {
    /// `transitions` holds `(state_in, symbol, state_out)` edges.
    pub fn new(
        sequence: Vec<VariableId>,
        transitions: Vec<(S::Value, S::Value, S::Value)>,
        start: S::Value,
        accept: S::Value,
    ) -> Self {
        Self {
            sequence,
            transitions,
            start,
            accept,
        }
    }

    fn symbol_domains(&self, solution: &Solution<S>) -> Vec<HashSet<S::Value>> {
        self.sequence
            .iter()
            .map(|var| {
                solution
                    .domains
                    .get(var)
                    .unwrap()
                    .iter()
                    .cloned()
                    .collect()
            })
            .collect()
    }
}

impl<S: DomainSemantics + std::fmt::Debug> Constraint<S> for AutomatonConstraint<S> {
    fn variables(&self) -> &[VariableId] {
        &self.sequence
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: "AutomatonConstraint".to_string(),
            description: format!(
                "path {:?} -> {:?} over {} symbols, {} transitions",
                self.start,
                self.accept,
                self.sequence.len(),
                self.transitions.len()
            ),
        }
    }

    fn priority(&self) -> ConstraintPriority {
        ConstraintPriority::High
    }

    fn revise(
        &self,
        target_var: &VariableId,
        solution: &Solution<S>,
    ) -> Result<Option<Solution<S>>> {
        let Some(position) = self.sequence.iter().position(|v| v == target_var) else {
            return Ok(None);
        };
        let n = self.sequence.len();
        let domains = self.symbol_domains(solution);

        // States reachable from the start after consuming t symbols.
        let mut forward: Vec<HashSet<S::Value>> = Vec::with_capacity(n + 1);
        forward.push([self.start.clone()].into_iter().collect());
        for t in 0..n {
            let mut next = HashSet::new();
            for (state_in, symbol, state_out) in &self.transitions {
                if forward[t].contains(state_in) && domains[t].contains(symbol) {
                    next.insert(state_out.clone());
                }
            }
            forward.push(next);
        }

        // States that can still reach the accept state from position t.
        let mut backward: Vec<HashSet<S::Value>> = vec![HashSet::new(); n + 1];
        backward[n].insert(self.accept.clone());
        for t in (0..n).rev() {
            let mut prev = HashSet::new();
            for (state_in, symbol, state_out) in &self.transitions {
                if backward[t + 1].contains(state_out) && domains[t].contains(symbol) {
                    prev.insert(state_in.clone());
                }
            }
            backward[t] = prev;
        }

        // A symbol survives only if it sits on an edge of a surviving path.
        let mut supported: HashSet<S::Value> = HashSet::new();
        for (state_in, symbol, state_out) in &self.transitions {
            if forward[position].contains(state_in) && backward[position + 1].contains(state_out) {
                supported.insert(symbol.clone());
            }
        }

        let target_domain = solution.domains.get(target_var).unwrap();
        let original_size = target_domain.len();
        let new_domain = target_domain.retain(&|v| supported.contains(v));

        if new_domain.len() < original_size {
            let new_domains = solution.domains.update(*target_var, new_domain);
            Ok(Some(solution.clone_with_domains(new_domains)))
        } else {
            Ok(None)
        }
    }
}
