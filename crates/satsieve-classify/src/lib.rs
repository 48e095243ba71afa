#![doc = include_str!("../README.md")]

//! All classifiers share the same contract: one verdict per candidate,
//! in candidate order; resolved verdicts never change; a backend
//! `Unknown` is terminal for the candidates it affects and is never
//! retried within a call.

pub mod disjunctive;
mod session;
pub mod unary;
pub mod verdict;

pub use disjunctive::{classify_disjunctive, classify_disjunctive_incremental};
pub use unary::{classify_unary, classify_unary_cached};
pub use verdict::Verdict;
