use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use crate::{
    error::Result,
    solver::{
        constraint::Constraint,
        heuristics::{value::ValueOrderingHeuristic, variable::VariableSelectionHeuristic},
        semantics::DomainSemantics,
        solution::{OrdSetDomain, Solution},
        work_list::WorkList,
    },
};

pub type VariableId = u32;
pub type ConstraintId = usize;

#[derive(Debug, Default, Clone)]
pub struct PerConstraintStats {
    pub revisions: u64,
    pub prunings: u64,
    pub time_spent_micros: u64,
}

#[derive(Debug, Default, Clone)]
pub struct SearchStats {
    pub nodes_visited: u64,
    pub backtracks: u64,
    pub constraint_stats: HashMap<ConstraintId, PerConstraintStats>,
}

/// Result of a deadline-bounded solve.
///
/// `Exhausted` is a proof: the whole search space was explored and no
/// assignment satisfies the constraints. `DeadlineReached` proves nothing
/// either way, and the two must never be conflated.
#[derive(Debug)]
pub enum SearchOutcome<S: DomainSemantics> {
    Satisfied(Solution<S>),
    Exhausted,
    DeadlineReached,
}

enum Propagation<S: DomainSemantics> {
    Pruned(Solution<S>),
    Contradiction,
    DeadlineReached,
}

enum SearchResult<S: DomainSemantics> {
    Found(Solution<S>),
    Exhausted,
    DeadlineReached,
}

/// The constraint-satisfaction engine: AC-3 propagation interleaved with
/// backtracking search.
///
/// The engine is problem-agnostic. It takes the constraints and the initial
/// variable domains, repeatedly revises domains until arc-consistent, and
/// branches on an unassigned variable chosen by the configured heuristic.
/// An optional deadline bounds the wall-clock time of the whole search.
pub struct SolverEngine<S: DomainSemantics> {
    variable_heuristic: Box<dyn VariableSelectionHeuristic<S>>,
    value_heuristic: Box<dyn ValueOrderingHeuristic<S>>,
}

impl<S: DomainSemantics + std::fmt::Debug> SolverEngine<S>
where
    S::Value: Ord,
{
    pub fn new(
        variable_heuristic: Box<dyn VariableSelectionHeuristic<S>>,
        value_heuristic: Box<dyn ValueOrderingHeuristic<S>>,
    ) -> Self {
        Self {
            variable_heuristic,
            value_heuristic,
        }
    }

    /// Solves without a time bound.
    ///
    /// Returns `Ok((Some(solution), stats))` on success and
    /// `Ok((None, stats))` when the problem is proven unsatisfiable.
    pub fn solve(
        &self,
        constraints: &[Box<dyn Constraint<S>>],
        initial_solution: Solution<S>,
    ) -> Result<(Option<Solution<S>>, SearchStats)> {
        let (outcome, stats) = self.solve_with_deadline(constraints, initial_solution, None)?;
        let solution = match outcome {
            SearchOutcome::Satisfied(solution) => Some(solution),
            SearchOutcome::Exhausted => None,
            // Unreachable without a deadline, but harmless to map.
            SearchOutcome::DeadlineReached => None,
        };
        Ok((solution, stats))
    }

    /// Solves, giving up once `deadline` passes.
    pub fn solve_with_deadline(
        &self,
        constraints: &[Box<dyn Constraint<S>>],
        initial_solution: Solution<S>,
        deadline: Option<Instant>,
    ) -> Result<(SearchOutcome<S>, SearchStats)> {
        let mut stats = SearchStats::default();

        let mut dependency_graph: HashMap<VariableId, Vec<ConstraintId>> = HashMap::new();
        for (i, constraint) in constraints.iter().enumerate() {
            for var_id in constraint.variables() {
                dependency_graph.entry(*var_id).or_default().push(i);
            }
        }

        let propagated = self.arc_consistency(
            constraints,
            &dependency_graph,
            initial_solution,
            &mut stats,
            deadline,
        )?;
        let solution = match propagated {
            Propagation::Contradiction => return Ok((SearchOutcome::Exhausted, stats)),
            Propagation::DeadlineReached => return Ok((SearchOutcome::DeadlineReached, stats)),
            Propagation::Pruned(solution) => solution,
        };
        if solution.is_complete() {
            return Ok((SearchOutcome::Satisfied(solution), stats));
        }

        let result = self.search(constraints, &dependency_graph, solution, &mut stats, deadline)?;
        debug!(
            nodes = stats.nodes_visited,
            backtracks = stats.backtracks,
            "search finished"
        );
        let outcome = match result {
            SearchResult::Found(solution) => SearchOutcome::Satisfied(solution),
            SearchResult::Exhausted => SearchOutcome::Exhausted,
            SearchResult::DeadlineReached => SearchOutcome::DeadlineReached,
        };
        Ok((outcome, stats))
    }

    fn search(
        &self,
        constraints: &[Box<dyn Constraint<S>>],
        dependency_graph: &HashMap<VariableId, Vec<ConstraintId>>,
        solution: Solution<S>,
        stats: &mut SearchStats,
        deadline: Option<Instant>,
    ) -> Result<SearchResult<S>> {
        if deadline_passed(deadline) {
            return Ok(SearchResult::DeadlineReached);
        }
        stats.nodes_visited += 1;

        if solution.is_complete() {
            return Ok(SearchResult::Found(solution));
        }

        let Some(var_to_branch) = self.variable_heuristic.select_variable(&solution) else {
            // No branchable variable left; the heuristic saw only singletons.
            return Ok(SearchResult::Found(solution));
        };

        for value in self.value_heuristic.order_values(var_to_branch, &solution) {
            let new_domain = Box::new(OrdSetDomain::new(im::ordset![value]));
            let new_domains = solution.domains.update(var_to_branch, new_domain);
            let guess = solution.clone_with_domains(new_domains);

            match self.arc_consistency(constraints, dependency_graph, guess, stats, deadline)? {
                Propagation::DeadlineReached => return Ok(SearchResult::DeadlineReached),
                Propagation::Contradiction => {}
                Propagation::Pruned(propagated) => {
                    match self.search(constraints, dependency_graph, propagated, stats, deadline)? {
                        SearchResult::Exhausted => {}
                        found_or_timeout => return Ok(found_or_timeout),
                    }
                }
            }
            stats.backtracks += 1;
        }

        Ok(SearchResult::Exhausted)
    }

    /// Establishes arc-consistency with the AC-3 algorithm.
    fn arc_consistency(
        &self,
        constraints: &[Box<dyn Constraint<S>>],
        dependency_graph: &HashMap<VariableId, Vec<ConstraintId>>,
        initial_solution: Solution<S>,
        stats: &mut SearchStats,
        deadline: Option<Instant>,
    ) -> Result<Propagation<S>> {
        let mut solution = initial_solution;

        let mut worklist = WorkList::new();
        for (constraint_id, constraint) in constraints.iter().enumerate() {
            for var_id in constraint.variables() {
                worklist.push_back(constraint.priority(), *var_id, constraint_id);
            }
        }

        while let Some((target_var, constraint_id)) = worklist.pop_front() {
            if deadline_passed(deadline) {
                return Ok(Propagation::DeadlineReached);
            }

            let constraint = &constraints[constraint_id];
            let constraint_stats = stats.constraint_stats.entry(constraint_id).or_default();
            let start_time = Instant::now();
            constraint_stats.revisions += 1;

            let revised = constraint.revise(&target_var, &solution)?;
            stats
                .constraint_stats
                .entry(constraint_id)
                .or_default()
                .time_spent_micros += start_time.elapsed().as_micros() as u64;

            if let Some(new_solution) = revised {
                let old_domain_size = solution.domains.get(&target_var).map_or(0, |d| d.len());
                let new_domain_size = new_solution.domains.get(&target_var).map_or(0, |d| d.len());

                if new_domain_size == 0 {
                    return Ok(Propagation::Contradiction);
                }

                if new_domain_size < old_domain_size {
                    stats
                        .constraint_stats
                        .entry(constraint_id)
                        .or_default()
                        .prunings += 1;
                    solution = new_solution;

                    // Re-check every constraint touching the shrunken variable.
                    if let Some(dependent_constraints) = dependency_graph.get(&target_var) {
                        for &dep_constraint_id in dependent_constraints {
                            let dep = &constraints[dep_constraint_id];
                            for &neighbor_var in dep.variables() {
                                if neighbor_var != target_var {
                                    worklist.push_back(
                                        dep.priority(),
                                        neighbor_var,
                                        dep_constraint_id,
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }

        Ok(Propagation::Pruned(solution))
    }
}

fn deadline_passed(deadline: Option<Instant>) -> bool {
    deadline.is_some_and(|d| Instant::now() >= d)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use im::HashMap;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::{
        constraints::all_different::AllDifferentConstraint,
        heuristics::{value::IdentityValueHeuristic, variable::MinimumRemainingValuesHeuristic},
        solution::DomainRepresentation,
        value::StandardValue,
    };

    #[derive(Debug, Clone)]
    struct TestSemantics;

    impl DomainSemantics for TestSemantics {
        type Value = StandardValue;
        type VariableMetadata = ();
        type ConstraintDefinition = ();

        fn build_constraint(&self, _definition: &()) -> Box<dyn Constraint<Self>> {
            unimplemented!("engine tests construct constraints directly")
        }
    }

    fn engine() -> SolverEngine<TestSemantics> {
        SolverEngine::new(
            Box::new(MinimumRemainingValuesHeuristic),
            Box::new(IdentityValueHeuristic),
        )
    }

    fn int_domain(values: &[i64]) -> Box<dyn DomainRepresentation<StandardValue>> {
        Box::new(OrdSetDomain::new(
            values.iter().map(|i| StandardValue::Int(*i)).collect(),
        ))
    }

    fn pigeonhole(vars: u32, values: i64) -> (Vec<Box<dyn Constraint<TestSemantics>>>, Solution<TestSemantics>) {
        let all: Vec<VariableId> = (0..vars).collect();
        let mut domains = HashMap::new();
        for v in &all {
            domains.insert(*v, int_domain(&(0..values).collect::<Vec<_>>()));
        }
        let constraints: Vec<Box<dyn Constraint<TestSemantics>>> =
            vec![Box::new(AllDifferentConstraint::new(all))];
        let solution = Solution::new(domains, HashMap::new(), Arc::new(TestSemantics));
        (constraints, solution)
    }

    #[test]
    fn satisfiable_problem_is_solved() {
        let (constraints, initial) = pigeonhole(3, 3);
        let (solution, _stats) = engine().solve(&constraints, initial).unwrap();
        let solution = solution.unwrap();
        assert!(solution.is_complete());

        let values: std::collections::HashSet<_> = (0..3u32)
            .map(|v| solution.domains.get(&v).unwrap().get_singleton_value().unwrap())
            .collect();
        assert_eq!(values.len(), 3);
    }

    #[test]
    fn unsatisfiable_problem_is_proven_exhausted() {
        // Four mutually distinct variables over three values.
        let (constraints, initial) = pigeonhole(4, 3);
        let (outcome, _stats) = engine()
            .solve_with_deadline(&constraints, initial, None)
            .unwrap();
        assert!(matches!(outcome, SearchOutcome::Exhausted));
    }

    #[test]
    fn expired_deadline_reports_deadline_reached() {
        let (constraints, initial) = pigeonhole(10, 10);
        let deadline = Instant::now() - Duration::from_millis(1);
        let (outcome, _stats) = engine()
            .solve_with_deadline(&constraints, initial, Some(deadline))
            .unwrap();
        assert!(matches!(outcome, SearchOutcome::DeadlineReached));
    }
}
