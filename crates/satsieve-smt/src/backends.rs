//! Concrete bindings of the abstract solver interface.
//!
//! The SMT-LIB2 printer is shared infrastructure: the cvc5 backend drives a
//! subprocess with it, and the formula generator uses it to render scripts
//! for downstream consumption.

pub mod cvc5_backend;
pub mod smtlib_printer;
#[cfg(feature = "z3")]
pub mod z3_backend;
