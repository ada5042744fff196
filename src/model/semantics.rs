//! The solver frontend for the device-design domain.

use crate::solver::{
    constraint::Constraint,
    constraints::{
        all_different::AllDifferentConstraint, automaton::AutomatonConstraint,
        element::ElementConstraint, linear_modulo::LinearModuloConstraint,
    },
    engine::VariableId,
    heuristics::variable::VariableSelectionHeuristic,
    semantics::DomainSemantics,
    solution::Solution,
    value::StandardValue,
};

/// What a variable means in the device model. Decision variables are the
/// ones a fabricator needs; everything else is derived bookkeeping the
/// constraints route through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// A window's filter angle.
    Angle,
    /// A disk's sector offset for one image.
    Rotation,
    /// Which disk sits at a stack position for one image.
    StackOrder,
    /// Rotation-corrected sectors, corrected angles, adjacent-pair deltas.
    Derived,
}

impl VarKind {
    pub fn is_decision(self) -> bool {
        !matches!(self, VarKind::Derived)
    }
}

/// Declarative constraint definitions for the device model; the semantics
/// turns each into a runnable solver constraint.
#[derive(Debug, Clone)]
pub enum DeviceConstraint {
    /// The stack order of one image is a permutation of the disks.
    AllDifferent(Vec<VariableId>),
    /// `result == array[index]`, variable index.
    Element {
        array: Vec<VariableId>,
        index: VariableId,
        result: VariableId,
    },
    /// `result == (constant + Σ coeff·term) mod modulus`.
    LinearModulo {
        result: VariableId,
        terms: Vec<(i64, VariableId)>,
        constant: i64,
        modulus: i64,
    },
    /// The delta sequence of one pixel walks the energy table from full
    /// brightness to the pixel's target value.
    Automaton {
        sequence: Vec<VariableId>,
        transitions: Vec<(i64, i64, i64)>,
        start: i64,
        accept: i64,
    },
}

#[derive(Debug, Clone)]
pub struct DeviceSemantics;

impl DomainSemantics for DeviceSemantics {
    type Value = StandardValue;
    type VariableMetadata = VarKind;
    type ConstraintDefinition = DeviceConstraint;

    fn build_constraint(&self, definition: &DeviceConstraint) -> Box<dyn Constraint<Self>> {
        match definition {
            DeviceConstraint::AllDifferent(vars) => {
                Box::new(AllDifferentConstraint::new(vars.clone()))
            }
            DeviceConstraint::Element {
                array,
                index,
                result,
            } => Box::new(ElementConstraint::new(array.clone(), *index, *result)),
            DeviceConstraint::LinearModulo {
                result,
                terms,
                constant,
                modulus,
            } => Box::new(LinearModuloConstraint::new(
                *result,
                terms
                    .iter()
                    .map(|(coeff, var)| (StandardValue::Int(*coeff), *var))
                    .collect(),
                StandardValue::Int(*constant),
                StandardValue::Int(*modulus),
            )),
            DeviceConstraint::Automaton {
                sequence,
                transitions,
                start,
                accept,
            } => Box::new(AutomatonConstraint::new(
                sequence.clone(),
                transitions
                    .iter()
                    .map(|(input, delta, output)| {
                        (
                            StandardValue::Int(*input),
                            StandardValue::Int(*delta),
                            StandardValue::Int(*output),
                        )
                    })
                    .collect(),
                StandardValue::Int(*start),
                StandardValue::Int(*accept),
            )),
        }
    }
}

/// Branches on decision variables (angles, rotations, stack order) before
/// derived ones, smallest domain first. The derived variables are functions
/// of the decisions, so propagation usually finishes them off; the fallback
/// keeps the search complete if it does not.
pub struct DecisionFirstHeuristic;

impl DecisionFirstHeuristic {
    fn pick(solution: &Solution<DeviceSemantics>, decision_only: bool) -> Option<VariableId> {
        solution
            .domains
            .iter()
            .filter(|(var_id, domain)| {
                domain.len() > 1
                    && (!decision_only
                        || solution
                            .metadata
                            .get(var_id)
                            .is_some_and(|kind| kind.is_decision()))
            })
            .min_by(|(var_a, domain_a), (var_b, domain_b)| {
                (domain_a.len(), *var_a).cmp(&(domain_b.len(), *var_b))
            })
            .map(|(var_id, _)| *var_id)
    }
}

impl VariableSelectionHeuristic<DeviceSemantics> for DecisionFirstHeuristic {
    fn select_variable(&self, solution: &Solution<DeviceSemantics>) -> Option<VariableId> {
        Self::pick(solution, true).or_else(|| Self::pick(solution, false))
    }
}
