//! Designs stacks of rotatable polarizing-filter disks that reproduce
//! target brightness images.
//!
//! A device is a stack of transparent disks ("pizzas"), each divided into
//! equal sectors ("slices") carrying small polarizing-filter windows. Light
//! shining through the stack is attenuated at each disk interface by
//! Malus's law, so the brightness seen through each window depends on the
//! filter angles above it, the per-image disk rotations and the order the
//! disks are stacked in. Given a set of target images, the crate searches
//! for one set of etched filter angles plus per-image rotations and a
//! stacking permutation that reproduce every image at once.
//!
//! The search runs on a generic constraint-satisfaction engine
//! ([`solver`]): AC-3 propagation over immutable domain maps interleaved
//! with backtracking. The device domain ([`model`]) compiles a [`Problem`]
//! into finite-domain variables, element and modular-arithmetic constraints
//! and one energy-transition automaton per pixel, then reads the fabricable
//! design back out of a satisfying assignment.
//!
//! [`Problem`]: model::problem::Problem
//!
//! # Example
//!
//! ```
//! use opticon::model::{problem::Problem, solution::Outcome, solve::solve};
//!
//! // Two disks, one sector, one window: the image asks for darkness, so
//! // the two filters must end up crossed.
//! let problem = Problem::new(2, 1, 1, 4, vec![vec![vec![0]]])?;
//! let result = solve(&problem)?;
//!
//! assert_eq!(result.outcome, Outcome::Satisfied);
//! let design = result.design.unwrap();
//! assert_eq!(design.reconstruct(&problem), vec![vec![vec![0]]]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod model;
pub mod solver;
