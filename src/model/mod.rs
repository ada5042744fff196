//! The device-design domain: discretized filter angles, the Malus's-law
//! energy table, and the constraint model tying a stack of rotatable
//! polarizer disks to the images it must reproduce.

pub mod angles;
pub mod builder;
pub mod problem;
pub mod semantics;
pub mod solution;
pub mod solve;
pub mod transitions;
