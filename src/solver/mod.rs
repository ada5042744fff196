//! A generic constraint-satisfaction backend: enumerated-domain variables,
//! a pruning [`constraint::Constraint`] interface, AC-3 propagation with a
//! prioritised work-list, and deadline-bounded backtracking search.

pub mod constraint;
pub mod constraints;
pub mod engine;
pub mod heuristics;
pub mod semantics;
pub mod solution;
pub mod value;
pub mod work_list;
