use im::HashSet;

use crate::{
    error::Result,
    solver::{
        constraint::{Constraint, ConstraintDescriptor},
        engine::VariableId,
        semantics::DomainSemantics,
        solution::Solution,
    },
};

/// Requires every variable in a set to take a distinct value.
///
/// Propagation is the simple singleton-based filtering: once a variable in
/// the group is decided, its value is removed from the domains of the other
/// members. Stronger matchings-based filtering exists but this is enough for
/// permutation variables over small groups.
#[derive(Debug, Clone)]
pub struct AllDifferentConstraint<S: DomainSemantics + std::fmt::Debug> {
    pub vars: Vec<VariableId>,
    _phantom: std::marker::PhantomData<S>,
}

impl<S: DomainSemantics + std::fmt::Debug> AllDifferentConstraint<S> {
    pub fn new(vars: Vec<VariableId>) -> Self {
        Self {
            vars,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<S: DomainSemantics + std::fmt::Debug> Constraint<S> for AllDifferentConstraint<S> {
    fn variables(&self) -> &[VariableId] {
        &self.vars
    }

    fn descriptor(&self) -> ConstraintDescriptor {
        let vars_str = self
            .vars
            .iter()
            .map(|v| format!("?{}", v))
            .collect::<Vec<_>>()
            .join(", ");
        ConstraintDescriptor {
            name: "AllDifferentConstraint".to_string(),
            description: format!("AllDifferent({})", vars_str),
        }
    }

    fn revise(
        &self,
        target_var: &VariableId,
        solution: &Solution<S>,
    ) -> Result<Option<Solution<S>>> {
        // Values already claimed by decided peers.
        let mut taken = HashSet::new();
        for var in &self.vars {
            if var == target_var {
                continue;
            }
            if let Some(domain) = solution.domains.get(var) {
                if let Some(fixed_value) = domain.get_singleton_value() {
                    taken.insert(fixed_value);
                }
            }
        }

        if taken.is_empty() {
            return Ok(None);
        }

        let Some(target_domain) = solution.domains.get(target_var) else {
            return Ok(None);
        };
        let original_size = target_domain.len();
        let new_domain = target_domain.retain(&|val| !taken.contains(val));

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

    #[test]
    fn decided_peer_value_is_pruned() {
        let constraint = AllDifferentConstraint::<TestSemantics>::new(vec![0, 1, 2]);
        let domains = im::hashmap! {
            0 => domain(&[0, 1]),
            1 => domain(&[1]),
            2 => domain(&[1, 2]),
        };
        let solution = Solution::new(domains, HashMap::new(), Arc::new(TestSemantics));

        let revised = constraint.revise(&0, &solution).unwrap().unwrap();
        assert_eq!(values_of(&revised, 0), vec![0]);
    }

    #[test]
    fn no_pruning_without_decided_peers() {
        let constraint = AllDifferentConstraint::<TestSemantics>::new(vec![0, 1]);
        let domains = im::hashmap! {
            0 => domain(&[0, 1]),
            1 => domain(&[0, 1]),
        };
        let solution = Solution::new(domains, HashMap::new(), Arc::new(TestSemantics));

        assert!(constraint.revise(&0, &solution).unwrap().is_none());
    }

    #[test]
    fn two_decided_peers_leave_one_choice() {
        let constraint = AllDifferentConstraint::<TestSemantics>::new(vec![0, 1, 2]);
        let domains = im::hashmap! {
            0 => domain(&[0, 1, 2]),
            1 => domain(&[0]),
            2 => domain(&[1]),
        };
        let solution = Solution::new(domains, HashMap::new(), Arc::new(TestSemantics));

        let revised = constraint.revise(&0, &solution).unwrap().unwrap();
        assert_eq!(values_of(&revised, 0), vec![2]);
    }
}
