//! Command handlers, one module per subcommand.

pub(crate) mod generate;
pub(crate) mod stress;
