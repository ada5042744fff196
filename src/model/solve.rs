//! The solve orchestrator: problem in, tri-state outcome out.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::info;

use crate::{
    error::{Result, SolverError},
    model::{
        builder::{build_model, DeviceModel},
        problem::Problem,
        semantics::{DecisionFirstHeuristic, DeviceSemantics},
        solution::{DeviceDesign, DeviceSolution, Outcome},
    },
    solver::{
        engine::{SearchOutcome, SolverEngine, VariableId},
        heuristics::value::IdentityValueHeuristic,
        semantics::DomainSemantics,
        solution::Solution,
        value::StandardValue,
    },
};

/// Wall-clock budget used by [`solve`].
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(60);

/// Solves `problem` under the default time budget.
pub fn solve(problem: &Problem) -> Result<DeviceSolution> {
    solve_within(problem, DEFAULT_TIME_BUDGET)
}

/// Solves `problem`, giving up with [`Outcome::Unknown`] once `budget` of
/// wall-clock time has elapsed.
///
/// Every call builds the model fresh; nothing is cached between solves.
/// Errors are internal solver failures only; a well-formed problem that has
/// no design comes back as [`Outcome::Infeasible`], not as an error.
pub fn solve_within(problem: &Problem, budget: Duration) -> Result<DeviceSolution> {
    let started = Instant::now();
    let model = build_model(problem);

    let semantics = Arc::new(DeviceSemantics);
    let constraints: Vec<_> = model
        .constraints
        .iter()
        .map(|definition| semantics.build_constraint(definition))
        .collect();
    let initial = Solution::new(
        model.domains.clone(),
        model.metadata.clone(),
        semantics.clone(),
    );

    let engine = SolverEngine::new(
        Box::new(DecisionFirstHeuristic),
        Box::new(IdentityValueHeuristic),
    );
    let (search_outcome, stats) =
        engine.solve_with_deadline(&constraints, initial, Some(started + budget))?;

    let wall_time = started.elapsed().as_secs_f64();
    let outcome_label = match &search_outcome {
        SearchOutcome::Satisfied(_) => "satisfied",
        SearchOutcome::Exhausted => "infeasible",
        SearchOutcome::DeadlineReached => "unknown",
    };
    info!(
        nodes = stats.nodes_visited,
        backtracks = stats.backtracks,
        wall_time,
        outcome = outcome_label,
        "solve finished"
    );

    Ok(match search_outcome {
        SearchOutcome::Satisfied(solution) => DeviceSolution {
            outcome: Outcome::Satisfied,
            wall_time,
            design: Some(extract_design(problem, &model, &solution)?),
        },
        SearchOutcome::Exhausted => DeviceSolution {
            outcome: Outcome::Infeasible,
            wall_time,
            design: None,
        },
        SearchOutcome::DeadlineReached => DeviceSolution {
            outcome: Outcome::Unknown,
            wall_time,
            design: None,
        },
    })
}

/// Reads the assigned values back out of a complete solution.
fn extract_design(
    problem: &Problem,
    model: &DeviceModel,
    solution: &Solution<DeviceSemantics>,
) -> Result<DeviceDesign> {
    let vars = &model.variables;
    let read = |var: VariableId| -> Result<i64> {
        match solution
            .domains
            .get(&var)
            .and_then(|domain| domain.get_singleton_value())
        {
            Some(StandardValue::Int(value)) => Ok(value),
            other => Err(SolverError::Custom(format!(
                "variable {var} left unassigned in a complete solution: {other:?}"
            ))
            .into()),
        }
    };

    let mut angles = Vec::with_capacity(problem.pizzas());
    for disk in &vars.angle {
        let mut per_slice = Vec::with_capacity(problem.slices());
        for slice in disk {
            per_slice.push(slice.iter().map(|&v| read(v)).collect::<Result<Vec<_>>>()?);
        }
        angles.push(per_slice);
    }

    let mut rotations = Vec::with_capacity(problem.image_count());
    for image in &vars.rotation {
        rotations.push(image.iter().map(|&v| read(v)).collect::<Result<Vec<_>>>()?);
    }

    let mut stack_order = Vec::with_capacity(problem.image_count());
    for image in &vars.stack_order {
        stack_order.push(image.iter().map(|&v| read(v)).collect::<Result<Vec<_>>>()?);
    }

    let mut corrected_sectors = Vec::with_capacity(problem.slices());
    for slice in &vars.corrected_sector {
        let mut per_image = Vec::with_capacity(problem.image_count());
        for image in slice {
            per_image.push(image.iter().map(|&v| read(v)).collect::<Result<Vec<_>>>()?);
        }
        corrected_sectors.push(per_image);
    }

    let mut corrected_angles = Vec::with_capacity(problem.image_count());
    for image in &vars.corrected_angle {
        let mut per_disk = Vec::with_capacity(problem.pizzas());
        for disk in image {
            let mut per_slice = Vec::with_capacity(problem.slices());
            for slice in disk {
                per_slice.push(slice.iter().map(|&v| read(v)).collect::<Result<Vec<_>>>()?);
            }
            per_disk.push(per_slice);
        }
        corrected_angles.push(per_disk);
    }

    Ok(DeviceDesign {
        angles,
        rotations,
        stack_order,
        corrected_sectors,
        corrected_angles,
    })
}
