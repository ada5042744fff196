//! The element constraint: `result == array[index]` with a variable index.

use std::collections::HashSet;

use crate::{
    error::Result,
    solver::{
        constraint::{Constraint, ConstraintDescriptor},
        engine::VariableId,
        semantics::DomainSemantics,
        solution::Solution,
        value::ValueIndexing,
    },
};

use crate::error::SolverError;

/// Indexes into an array of variables with another variable.
///
/// Propagation:
/// - the result keeps only values present in some still-selectable slot;
/// - the index keeps only slots whose domain intersects the result's;
/// - a slot is pruned against the result only once the index has committed
///   to it.
///
/// An index value that is not a usable non-negative integer is a modelling
/// defect and surfaces as [`SolverError::MalformedConstraint`]; an integer
/// that merely falls outside the array is an ordinary unsupported value and
/// is pruned.
#[derive(Debug, Clone)]
pub struct ElementConstraint<S: DomainSemantics>
where
    S::Value: ValueIndexing,
{
    array: Vec<VariableId>,
    index: VariableId,
    result: VariableId,
    all_vars: Vec<VariableId>,
    _phantom: std::marker::PhantomData<S>,
}

impl<S: DomainSemantics> ElementConstraint<S>
where
    S::Value: ValueIndexing,
{
    pub fn new(array: Vec<VariableId>, index: VariableId, result: VariableId) -> Self {
        let mut all_vars = array.clone();
        all_vars.push(index);
        all_vars.push(result);
        Self {
            array,
            index,
            result,
            all_vars,
            _phantom: std::marker::PhantomData,
        }
    }

    /// The array slots the index variable can still select.
    fn selectable_slots(&self, solution: &Solution<S>) -> Result<Vec<usize>> {
        let mut slots = Vec::new();
        for value in solution.domains.get(&self.index).unwrap().iter() {
            let idx = value.as_index().ok_or_else(|| {
                SolverError::MalformedConstraint(format!(
                    "element index ?{} holds non-index value {:?}",
                    self.index, value
                ))
            })?;
            if idx < self.array.len() {
                slots.push(idx);
            }
        }
        Ok(slots)
    }
}

impl<S: DomainSemantics + std::fmt::Debug> Constraint<S> for ElementConstraint<S>
where
    S::Value: ValueIndexing,
{
    fn variables(&self) -> &[VariableId] {
        &self.all_vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        ConstraintDescriptor {
            name: "ElementConstraint".to_string(),
            description: format!(
                "?{} == [{}][?{}]",
                self.result,
                self.array
                    .iter()
                    .map(|v| format!("?{}", v))
                    .collect::<Vec<_>>()
                    .join(", "),
                self.index
            ),
        }
    }

    fn revise(
        &self,
        target_var: &VariableId,
        solution: &Solution<S>,
    ) -> Result<Option<Solution<S>>> {
        let target_domain = solution.domains.get(target_var).unwrap();
        let original_size = target_domain.len();
        let result_values: HashSet<S::Value> = solution
            .domains
            .get(&self.result)
            .unwrap()
            .iter()
            .cloned()
            .collect();

        let new_domain = if *target_var == self.result {
            let mut supported: HashSet<S::Value> = HashSet::new();
            for slot in self.selectable_slots(solution)? {
                for value in solution.domains.get(&self.array[slot]).unwrap().iter() {
                    supported.insert(value.clone());
                }
            }
            target_domain.retain(&|v| supported.contains(v))
        } else if *target_var == self.index {
            target_domain.retain(&|v| match v.as_index() {
                Some(idx) if idx < self.array.len() => solution
                    .domains
                    .get(&self.array[idx])
                    .unwrap()
                    .iter()
                    .any(|slot_value| result_values.contains(slot_value)),
                _ => false,
            })
        } else {
            // A slot can only be tied to the result once the index commits.
            let Some(position) = self.array.iter().position(|v| v == target_var) else {
                return Ok(None);
            };
            match self.selectable_slots(solution)?.as_slice() {
                [only] if *only == position => {
                    target_domain.retain(&|v| result_values.contains(v))
                }
                _ => return Ok(None),
            }
        };

        if new_domain.len() < original_size {
            let new_domains = solution.domains.update(*target_var, new_domain);
            Ok(Some(solution.clone_with_domains(new_domains)))
        } else {
            Ok(None)
        }
    }
}
