//! Solve results: the tri-state outcome and, when satisfied, the fabricable
//! device design.

use serde::{Deserialize, Serialize};

use crate::model::{problem::Problem, transitions::energy};

/// What a solve established about the instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// A design reproducing every target image was found.
    Satisfied,
    /// The search space was exhausted; no design exists.
    Infeasible,
    /// The time budget ran out before either answer; says nothing about
    /// feasibility.
    Unknown,
}

/// The result of one solve. `design` is present exactly when the outcome is
/// [`Outcome::Satisfied`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSolution {
    pub outcome: Outcome,
    /// Wall-clock seconds the solve took.
    pub wall_time: f64,
    pub design: Option<DeviceDesign>,
}

/// A complete fabrication recipe: the etched filter angles plus, per image,
/// the stacking permutation and disk rotations to apply.
///
/// Index conventions match the model: `i` disk, `j` slice, `k` window, `m`
/// image, `s` stack position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDesign {
    /// `angles[i][j][k]`: filter angle etched into one window, in degrees.
    pub angles: Vec<Vec<Vec<i64>>>,
    /// `rotations[m][i]`: sector offset applied to disk `i` for image `m`.
    pub rotations: Vec<Vec<i64>>,
    /// `stack_order[m][s]`: which disk sits at stack position `s`.
    pub stack_order: Vec<Vec<i64>>,
    /// `corrected_sectors[j][m][i]`: the physical sector under logical
    /// sector `j` after rotation.
    pub corrected_sectors: Vec<Vec<Vec<i64>>>,
    /// `corrected_angles[m][i][j][k]`: the effective filter angle in
    /// [0, 180) once the disk's rotation phase shift is folded in.
    pub corrected_angles: Vec<Vec<Vec<Vec<i64>>>>,
}

impl DeviceDesign {
    /// Simulates light through the stack and returns the brightness each
    /// image would show, indexed `[image][slice][window]`.
    ///
    /// Useful as a sanity check against the problem's targets; the values
    /// can differ from the targets by the one-percent corrections the
    /// transition table applies to rounding ties.
    pub fn reconstruct(&self, problem: &Problem) -> Vec<Vec<Vec<i64>>> {
        (0..problem.image_count())
            .map(|m| {
                (0..problem.slices())
                    .map(|j| {
                        (0..problem.windows())
                            .map(|k| {
                                let mut brightness = 100;
                                for s in 1..problem.pizzas() {
                                    let over =
                                        self.stacked_angle(m, s, j, k);
                                    let under =
                                        self.stacked_angle(m, s - 1, j, k);
                                    let delta = (over - under).rem_euclid(180);
                                    brightness = energy(brightness, delta as f64);
                                }
                                brightness
                            })
                            .collect()
                    })
                    .collect()
            })
            .collect()
    }

    fn stacked_angle(&self, image: usize, position: usize, slice: usize, window: usize) -> i64 {
        let disk = self.stack_order[image][position] as usize;
        self.corrected_angles[image][disk][slice][window]
    }
}
