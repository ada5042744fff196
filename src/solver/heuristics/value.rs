//! Strategies for ordering the values tried when branching on a variable.

use crate::solver::{engine::VariableId, semantics::DomainSemantics, solution::Solution};

/// Determines the order in which a variable's candidate values are tried.
pub trait ValueOrderingHeuristic<S: DomainSemantics> {
    /// The values of `variable`'s current domain, in the order the search
    /// should try them.
    fn order_values(&self, variable: VariableId, solution: &Solution<S>) -> Vec<S::Value>;
}

/// Tries values in the domain's natural iteration order (ascending for
/// ordered domains).
pub struct IdentityValueHeuristic;

impl<S: DomainSemantics> ValueOrderingHeuristic<S> for IdentityValueHeuristic {
    fn order_values(&self, variable: VariableId, solution: &Solution<S>) -> Vec<S::Value> {
        solution
            .domains
            .get(&variable)
            .map(|domain| domain.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use im::HashMap;

    use super::*;
    use crate::solver::{
        constraint::Constraint,
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
            unimplemented!()
        }
    }

    #[test]
    fn identity_follows_domain_order() {
        let domain: Box<dyn DomainRepresentation<StandardValue>> = Box::new(OrdSetDomain::new(
            [135, 0, 90].into_iter().map(StandardValue::Int).collect(),
        ));
        let mut domains = HashMap::new();
        domains.insert(0u32, domain);
        let solution = Solution::new(domains, HashMap::new(), Arc::new(TestSemantics));

        let order = IdentityValueHeuristic.order_values(0, &solution);
        assert_eq!(
            order,
            vec![
                StandardValue::Int(0),
                StandardValue::Int(90),
                StandardValue::Int(135)
            ]
        );
    }
}
