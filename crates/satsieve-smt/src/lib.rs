#![doc = include_str!("../README.md")]

//! The term language and solver interface consumed by the classification
//! and generation crates. Nothing here decides satisfiability on its own;
//! decisions always come from a backend implementing [`solver::SmtSolver`].

pub mod backends;
pub mod model;
pub mod solver;
pub mod sorts;
pub mod terms;
