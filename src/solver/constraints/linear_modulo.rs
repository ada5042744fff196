//! A constraint enforcing `result == (constant + Σ coeff·term) mod modulus`.

use std::collections::HashSet;

use crate::{
    error::Result,
    solver::{
        constraint::{Constraint, ConstraintDescriptor},
        engine::VariableId,
        semantics::DomainSemantics,
        solution::Solution,
        value::{ValueArithmetic, ValueOrdering},
    },
};

/// Ties a result variable to a linear combination of term variables,
/// reduced to the least non-negative residue modulo a constant.
///
/// This single constraint covers all the modular arithmetic a rotation-and-
/// permutation model needs: `(c − x) mod n`, `(x + c·y) mod n`,
/// `(x − y) mod n` are all instances. Propagation is support-based: a value
/// survives only if some assignment of the other variables realises it.
/// Domains here are small enumerated sets, so exhaustive support checking is
/// affordable.
#[derive(Debug, Clone)]
pub struct LinearModuloConstraint<S: DomainSemantics>
where
    S::Value: ValueArithmetic + ValueOrdering,
{
    result: VariableId,
    terms: Vec<(S::Value, VariableId)>,
    constant: S::Value,
    modulus: S::Value,
    all_vars: Vec<VariableId>,
}

impl<S: DomainSemantics> LinearModuloConstraint<S>
where
    S::Value: ValueArithmetic + ValueOrdering,
{
    pub fn new(
        result: VariableId,
        terms: Vec<(S::Value, VariableId)>,
        constant: S::Value,
        modulus: S::Value,
    ) -> Self {
        let mut all_vars: Vec<VariableId> = terms.iter().map(|(_, v)| *v).collect();
        all_vars.push(result);
        Self {
            result,
            terms,
            constant,
            modulus,
            all_vars,
        }
    }

    fn evaluate(&self, term_values: &[S::Value]) -> S::Value {
        let mut acc = self.constant.clone();
        for ((coeff, _), value) in self.terms.iter().zip(term_values) {
            acc = acc.add(&coeff.mul(value));
        }
        acc.rem_euclid(&self.modulus)
    }

    fn term_domains(&self, solution: &Solution<S>) -> Vec<Vec<S::Value>> {
        self.terms
            .iter()
            .map(|(_, var)| {
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

/// Depth-first enumeration of one value per domain; stops early once
/// `check` accepts a full assignment.
fn exists_assignment<V: Clone>(
    domains: &[Vec<V>],
    partial: &mut Vec<V>,
    check: &mut dyn FnMut(&[V]) -> bool,
) -> bool {
    if partial.len() == domains.len() {
        return check(partial);
    }
    let depth = partial.len();
    for value in &domains[depth] {
        partial.push(value.clone());
        let found = exists_assignment(domains, partial, check);
        partial.pop();
        if found {
            return true;
        }
    }
    false
}

impl<S: DomainSemantics + std::fmt::Debug> Constraint<S> for LinearModuloConstraint<S>
where
    S::Value: ValueArithmetic + ValueOrdering,
{
    fn variables(&self) -> &[VariableId] {
        &self.all_vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        let terms_str = self
            .terms
            .iter()
            .map(|(c, v)| format!("{:?}·?{}", c, v))
            .collect::<Vec<_>>()
            .join(" + ");
        ConstraintDescriptor {
            name: "LinearModuloConstraint".to_string(),
            description: format!(
                "?{} == ({:?} + {}) mod {:?}",
                self.result, self.constant, terms_str, self.modulus
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
        let term_domains = self.term_domains(solution);

        let new_domain = if *target_var == self.result {
            // Keep only residues some term assignment can realise.
            let mut reachable: HashSet<S::Value> = HashSet::new();
            let mut partial = Vec::with_capacity(self.terms.len());
            exists_assignment(&term_domains, &mut partial, &mut |assignment| {
                reachable.insert(self.evaluate(assignment));
                false // keep enumerating
            });
            target_domain.retain(&|v| reachable.contains(v))
        } else {
            let Some(position) = self.terms.iter().position(|(_, v)| v == target_var) else {
                return Ok(None);
            };
            let result_values: HashSet<S::Value> = solution
                .domains
                .get(&self.result)
                .unwrap()
                .iter()
                .cloned()
                .collect();

            // A term value survives if the other terms can complete it to a
            // residue still present in the result's domain.
            target_domain.retain(&|candidate| {
                let mut pinned = term_domains.clone();
                pinned[position] = vec![candidate.clone()];
                let mut partial = Vec::with_capacity(pinned.len());
                exists_assignment(&pinned, &mut partial, &mut |assignment| {
                    result_values.contains(&self.evaluate(assignment))
                })
            })
        };

        if new_domain.len() < original_size {
            let new_domains = solution.domains.update(*target_var, new_domain);
            Ok(Some(solution.clone_with_domains(new_domains)))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use im::HashMap;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::solver::{
        solution::{DomainRepresentation, OrdSetDomain},
        value::StandardValue,
    };

    #[derive(Debug, Clone)]
    struct TestSemantics;

    impl DomainSemantics for TestSemantics {
        type Value = StandardValue;
        type VariableMetadata = ();
        type ConstraintDefinition = ();

        fn build_constraint(&self, _definition: &()) -> Box<dyn Constraint<Self>> {
            unimplemented!("not needed for constraint unit tests")
        }
    }

    fn domain(values: &[i64]) -> Box<dyn DomainRepresentation<StandardValue>> {
        Box::new(OrdSetDomain::new(
            values.iter().map(|i| StandardValue::Int(*i)).collect(),
        ))
    }

    fn int(i: i64) -> StandardValue {
        StandardValue::Int(i)
    }

    fn values_of(solution: &Solution<TestSemantics>, var: VariableId) -> Vec<i64> {
        solution
            .domains
            .get(&var)
            .unwrap()
            .iter()
            .map(|v| match v {
                StandardValue::Int(i) => *i,
                other => panic!("unexpected value {:?}", other),
            })
            .collect()
    }

    /// corrected = (2 − rotation) mod 4, rotation ∈ {0..3}.
    #[test]
    fn sector_correction_result_is_pruned_to_reachable_residues() {
        let rotation: VariableId = 0;
        let corrected: VariableId = 1;
        let constraint = LinearModuloConstraint::<TestSemantics>::new(
            corrected,
            vec![(int(-1), rotation)],
            int(2),
            int(4),
        );

        let domains = im::hashmap! {
            rotation => domain(&[0, 1]),
            corrected => domain(&[0, 1, 2, 3]),
        };
        let solution = Solution::new(domains, HashMap::new(), Arc::new(TestSemantics));

        let revised = constraint.revise(&corrected, &solution).unwrap().unwrap();
        assert_eq!(values_of(&revised, corrected), vec![1, 2]);
    }

    /// Negative intermediate values still reduce to [0, modulus).
    #[test]
    fn difference_reduces_to_non_negative_residue() {
        let a: VariableId = 0;
        let b: VariableId = 1;
        let delta: VariableId = 2;
        let constraint = LinearModuloConstraint::<TestSemantics>::new(
            delta,
            vec![(int(1), a), (int(-1), b)],
            int(0),
            int(180),
        );

        let domains = im::hashmap! {
            a => domain(&[0]),
            b => domain(&[135]),
            delta => domain(&(0..180).collect::<Vec<_>>()),
        };
        let solution = Solution::new(domains, HashMap::new(), Arc::new(TestSemantics));

        let revised = constraint.revise(&delta, &solution).unwrap().unwrap();
        assert_eq!(values_of(&revised, delta), vec![45]);
    }

    #[test]
    fn term_values_without_support_are_dropped() {
        let a: VariableId = 0;
        let b: VariableId = 1;
        let delta: VariableId = 2;
        let constraint = LinearModuloConstraint::<TestSemantics>::new(
            delta,
            vec![(int(1), a), (int(-1), b)],
            int(0),
            int(180),
        );

        // delta is pinned to 90; only a == 90 has support with b == 0.
        let domains = im::hashmap! {
            a => domain(&[0, 45, 90]),
            b => domain(&[0]),
            delta => domain(&[90]),
        };
        let solution = Solution::new(domains, HashMap::new(), Arc::new(TestSemantics));

        let revised = constraint.revise(&a, &solution).unwrap().unwrap();
        assert_eq!(values_of(&revised, a), vec![90]);
    }

    #[test]
    fn consistent_domains_are_left_untouched() {
        let a: VariableId = 0;
        let r: VariableId = 1;
        let constraint =
            LinearModuloConstraint::<TestSemantics>::new(r, vec![(int(1), a)], int(0), int(180));

        let domains = im::hashmap! {
            a => domain(&[0, 90]),
            r => domain(&[0, 90]),
        };
        let solution = Solution::new(domains, HashMap::new(), Arc::new(TestSemantics));

        assert!(constraint.revise(&r, &solution).unwrap().is_none());
    }
}
