//! Turns a [`Problem`] into decision variables, derived variables and the
//! constraint graph tying them to the target images.

use std::collections::BTreeSet;

use tracing::debug;

use crate::{
    model::{
        angles::valid_angles,
        problem::Problem,
        semantics::{DeviceConstraint, VarKind},
        transitions::transition_table,
    },
    solver::{
        engine::VariableId,
        solution::{DomainRepresentation, Domains, OrdSetDomain},
        value::StandardValue,
    },
};

/// Identifier tensors for every variable the model allocates, kept so the
/// orchestrator can read values back out of a satisfied solution.
///
/// Index conventions: `i` disk, `j` slice, `k` window, `m` image, `s` stack
/// position.
#[derive(Debug, Clone)]
pub struct ModelVars {
    /// `angle[i][j][k]`: the filter angle of one window.
    pub angle: Vec<Vec<Vec<VariableId>>>,
    /// `rotation[m][i]`: sector offset of disk `i` for image `m`; the
    /// reference disk (`i == 0`) is pinned to 0, offsets are relative.
    pub rotation: Vec<Vec<VariableId>>,
    /// `stack_order[m][s]`: which disk occupies stack position `s`.
    pub stack_order: Vec<Vec<VariableId>>,
    /// `corrected_sector[j][m][i] == (j − rotation[m][i]) mod S`.
    pub corrected_sector: Vec<Vec<Vec<VariableId>>>,
    /// `placed_angle[m][i][j][k]`: the raw angle physically under logical
    /// sector `j` once disk `i` is rotated.
    pub placed_angle: Vec<Vec<Vec<Vec<VariableId>>>>,
    /// `corrected_angle[m][i][j][k]`: the placed angle phase-shifted by the
    /// disk's own rotation, reduced mod 180.
    pub corrected_angle: Vec<Vec<Vec<Vec<VariableId>>>>,
    /// `stacked_angle[j][k][m][s]`: the corrected angle of the disk at
    /// stack position `s`.
    pub stacked_angle: Vec<Vec<Vec<Vec<VariableId>>>>,
    /// `delta[j][k][m][s-1]`: angle difference between stack positions
    /// `s` and `s − 1`, in [0, 180).
    pub delta: Vec<Vec<Vec<Vec<VariableId>>>>,
}

/// A fully specified constraint system for one solve. Freshly built per
/// call; nothing survives across solves.
#[derive(Debug, Clone)]
pub struct DeviceModel {
    pub variables: ModelVars,
    pub domains: Domains<StandardValue>,
    pub metadata: im::HashMap<VariableId, VarKind>,
    pub constraints: Vec<DeviceConstraint>,
}

/// Allocates variable ids and their domains; a local accumulator rather
/// than anything shared.
struct VarArena {
    next: VariableId,
    domains: Domains<StandardValue>,
    metadata: im::HashMap<VariableId, VarKind>,
}

impl VarArena {
    fn new() -> Self {
        Self {
            next: 0,
            domains: Domains::new(),
            metadata: im::HashMap::new(),
        }
    }

    fn int_var<I: IntoIterator<Item = i64>>(&mut self, values: I, kind: VarKind) -> VariableId {
        let id = self.next;
        self.next += 1;
        let domain: Box<dyn DomainRepresentation<StandardValue>> = Box::new(OrdSetDomain::new(
            values.into_iter().map(StandardValue::Int).collect(),
        ));
        self.domains.insert(id, domain);
        self.metadata.insert(id, kind);
        id
    }
}

/// Builds the full constraint model for `problem`.
pub fn build_model(problem: &Problem) -> DeviceModel {
    let pizzas = problem.pizzas();
    let slices = problem.slices();
    let windows = problem.windows();
    let image_count = problem.image_count();

    let angle_set = valid_angles(problem.angle_subdivisions());
    let table = transition_table(problem.angle_subdivisions(), pizzas as u32);
    // Whole degrees a disk's own rotation adds per sector step.
    let phase = (360 / slices) as i64;

    // Angles that can appear after rotation correction, and the pairwise
    // differences two stacked disks can exhibit. Enumerated up front so the
    // derived variables start from tight domains.
    let reachable_angles: BTreeSet<i64> = angle_set
        .iter()
        .flat_map(|&a| (0..slices as i64).map(move |r| (a + phase * r).rem_euclid(180)))
        .collect();
    let reachable_deltas: BTreeSet<i64> = reachable_angles
        .iter()
        .flat_map(|&x| reachable_angles.iter().map(move |&y| (x - y).rem_euclid(180)))
        .collect();

    let mut arena = VarArena::new();
    let mut constraints = Vec::new();

    let angle: Vec<Vec<Vec<VariableId>>> = (0..pizzas)
        .map(|_| {
            (0..slices)
                .map(|_| {
                    (0..windows)
                        .map(|_| arena.int_var(angle_set.iter().copied(), VarKind::Angle))
                        .collect()
                })
                .collect()
        })
        .collect();

    let rotation: Vec<Vec<VariableId>> = (0..image_count)
        .map(|_| {
            (0..pizzas)
                .map(|i| {
                    let offsets = if i == 0 { 0..1 } else { 0..slices as i64 };
                    arena.int_var(offsets, VarKind::Rotation)
                })
                .collect()
        })
        .collect();

    let stack_order: Vec<Vec<VariableId>> = (0..image_count)
        .map(|_| {
            (0..pizzas)
                .map(|_| arena.int_var(0..pizzas as i64, VarKind::StackOrder))
                .collect()
        })
        .collect();
    for order in &stack_order {
        constraints.push(DeviceConstraint::AllDifferent(order.clone()));
    }

    let corrected_sector: Vec<Vec<Vec<VariableId>>> = (0..slices)
        .map(|j| {
            (0..image_count)
                .map(|m| {
                    (0..pizzas)
                        .map(|i| {
                            let corrected =
                                arena.int_var(0..slices as i64, VarKind::Derived);
                            constraints.push(DeviceConstraint::LinearModulo {
                                result: corrected,
                                terms: vec![(-1, rotation[m][i])],
                                constant: j as i64,
                                modulus: slices as i64,
                            });
                            corrected
                        })
                        .collect()
                })
                .collect()
        })
        .collect();

    let mut placed_angle = vec![vec![vec![vec![0; windows]; slices]; pizzas]; image_count];
    let mut corrected_angle = vec![vec![vec![vec![0; windows]; slices]; pizzas]; image_count];
    for m in 0..image_count {
        for i in 0..pizzas {
            for j in 0..slices {
                for k in 0..windows {
                    let placed = arena.int_var(angle_set.iter().copied(), VarKind::Derived);
                    constraints.push(DeviceConstraint::Element {
                        array: (0..slices).map(|jj| angle[i][jj][k]).collect(),
                        index: corrected_sector[j][m][i],
                        result: placed,
                    });
                    placed_angle[m][i][j][k] = placed;

                    let corrected =
                        arena.int_var(reachable_angles.iter().copied(), VarKind::Derived);
                    constraints.push(DeviceConstraint::LinearModulo {
                        result: corrected,
                        terms: vec![(1, placed), (phase, rotation[m][i])],
                        constant: 0,
                        modulus: 180,
                    });
                    corrected_angle[m][i][j][k] = corrected;
                }
            }
        }
    }

    let mut stacked_angle = vec![vec![vec![vec![0; pizzas]; image_count]; windows]; slices];
    let mut delta =
        vec![vec![vec![vec![0; pizzas.saturating_sub(1)]; image_count]; windows]; slices];
    for j in 0..slices {
        for k in 0..windows {
            for m in 0..image_count {
                for s in 0..pizzas {
                    let stacked =
                        arena.int_var(reachable_angles.iter().copied(), VarKind::Derived);
                    constraints.push(DeviceConstraint::Element {
                        array: (0..pizzas).map(|i| corrected_angle[m][i][j][k]).collect(),
                        index: stack_order[m][s],
                        result: stacked,
                    });
                    stacked_angle[j][k][m][s] = stacked;

                    if s > 0 {
                        let pair_delta =
                            arena.int_var(reachable_deltas.iter().copied(), VarKind::Derived);
                        constraints.push(DeviceConstraint::LinearModulo {
                            result: pair_delta,
                            terms: vec![
                                (1, stacked_angle[j][k][m][s]),
                                (-1, stacked_angle[j][k][m][s - 1]),
                            ],
                            constant: 0,
                            modulus: 180,
                        });
                        delta[j][k][m][s - 1] = pair_delta;
                    }
                }

                // No interface, no automaton: a one-disk stack passes light
                // unattenuated and validation has already pinned the pixel.
                if pizzas > 1 {
                    constraints.push(DeviceConstraint::Automaton {
                        sequence: delta[j][k][m].clone(),
                        transitions: table.clone(),
                        start: 100,
                        accept: i64::from(problem.images()[m][j][k]),
                    });
                }
            }
        }
    }

    debug!(
        variables = arena.next,
        constraints = constraints.len(),
        "constraint model built"
    );

    DeviceModel {
        variables: ModelVars {
            angle,
            rotation,
            stack_order,
            corrected_sector,
            placed_angle,
            corrected_angle,
            stacked_angle,
            delta,
        },
        domains: arena.domains,
        metadata: arena.metadata,
        constraints,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn two_disk_problem() -> Problem {
        Problem::new(
            2,
            4,
            1,
            4,
            vec![
                vec![vec![0], vec![0], vec![0], vec![0]],
                vec![vec![100], vec![100], vec![100], vec![100]],
            ],
        )
        .unwrap()
    }

    fn singleton_value(model: &DeviceModel, var: VariableId) -> i64 {
        match model.domains.get(&var).unwrap().get_singleton_value() {
            Some(StandardValue::Int(i)) => i,
            other => panic!("expected singleton int, got {:?}", other),
        }
    }

    #[test]
    fn reference_disk_rotation_is_pinned_to_zero() {
        let model = build_model(&two_disk_problem());
        for m in 0..2 {
            assert_eq!(singleton_value(&model, model.variables.rotation[m][0]), 0);
            assert!(
                model
                    .domains
                    .get(&model.variables.rotation[m][1])
                    .unwrap()
                    .len()
                    > 1
            );
        }
    }

    #[test]
    fn every_image_gets_a_permutation_constraint() {
        let model = build_model(&two_disk_problem());
        let all_different = model
            .constraints
            .iter()
            .filter(|c| matches!(c, DeviceConstraint::AllDifferent(_)))
            .count();
        assert_eq!(all_different, 2);
    }

    #[test]
    fn automaton_accept_states_are_the_target_pixels() {
        let problem = two_disk_problem();
        let model = build_model(&problem);
        let accepts: Vec<i64> = model
            .constraints
            .iter()
            .filter_map(|c| match c {
                DeviceConstraint::Automaton { accept, start, .. } => {
                    assert_eq!(*start, 100);
                    Some(*accept)
                }
                _ => None,
            })
            .collect();
        // One automaton per (slice, window, image).
        assert_eq!(accepts.len(), 4 * 1 * 2);
        assert_eq!(accepts.iter().filter(|&&a| a == 0).count(), 4);
        assert_eq!(accepts.iter().filter(|&&a| a == 100).count(), 4);
    }

    #[test]
    fn single_disk_model_emits_no_automaton() {
        let problem = Problem::new(1, 2, 1, 4, vec![vec![vec![100], vec![100]]]).unwrap();
        let model = build_model(&problem);
        assert!(
            !model
                .constraints
                .iter()
                .any(|c| matches!(c, DeviceConstraint::Automaton { .. }))
        );
        assert!(model.variables.delta[0][0][0].is_empty());
    }

    #[test]
    fn angle_domains_use_the_discretized_set() {
        let model = build_model(&two_disk_problem());
        let var = model.variables.angle[0][0][0];
        let values: Vec<i64> = model
            .domains
            .get(&var)
            .unwrap()
            .iter()
            .map(|v| match v {
                StandardValue::Int(i) => *i,
                other => panic!("unexpected {:?}", other),
            })
            .collect();
        assert_eq!(values, vec![0, 90]);
    }

    #[test]
    fn decision_and_derived_variables_are_tagged() {
        let model = build_model(&two_disk_problem());
        let vars = &model.variables;
        assert_eq!(model.metadata.get(&vars.angle[0][0][0]), Some(&VarKind::Angle));
        assert_eq!(
            model.metadata.get(&vars.rotation[0][1]),
            Some(&VarKind::Rotation)
        );
        assert_eq!(
            model.metadata.get(&vars.stack_order[0][0]),
            Some(&VarKind::StackOrder)
        );
        assert_eq!(
            model.metadata.get(&vars.delta[0][0][0][0]),
            Some(&VarKind::Derived)
        );
    }
}
