#![doc = include_str!("../README.md")]

pub mod generator;
pub mod guards;

pub use generator::{FormulaGenerator, GeneratorConfig, GeneratorError};
