// Command handler for: Generate

use std::path::PathBuf;

use miette::IntoDiagnostic;
use tracing::info;

use satsieve_gen::{FormulaGenerator, GeneratorConfig};
use satsieve_smt::sorts::SmtSort;

use crate::types::LogicChoice;

pub(crate) struct GenerateArgs {
    pub(crate) logic: String,
    pub(crate) vars: usize,
    pub(crate) bv_width: u32,
    pub(crate) seed: Option<u64>,
    pub(crate) bv_unsigned: bool,
    pub(crate) bv_no_overflow: bool,
    pub(crate) bv_no_underflow: bool,
    pub(crate) out: Option<PathBuf>,
}

pub(crate) fn run_generate(args: GenerateArgs) -> miette::Result<()> {
    let logic = parse_logic(&args.logic)?;
    if args.vars == 0 {
        return Err(miette::miette!("--vars must be at least 1"));
    }
    let seed_vars = seed_variables(logic, args.vars, args.bv_width);
    let config = GeneratorConfig {
        bv_signed: !args.bv_unsigned,
        bv_no_overflow: args.bv_no_overflow,
        bv_no_underflow: args.bv_no_underflow,
        seed: args.seed,
    };
    let mut generator =
        FormulaGenerator::new(&seed_vars, config).map_err(|e| miette::miette!("{e}"))?;
    let script = generator.generate_script();

    match &args.out {
        Some(path) => {
            std::fs::write(path, &script).into_diagnostic()?;
            info!(path = %path.display(), "script written");
        }
        None => print!("{script}"),
    }
    Ok(())
}

pub(crate) fn parse_logic(name: &str) -> miette::Result<LogicChoice> {
    match name {
        "int" => Ok(LogicChoice::Int),
        "real" => Ok(LogicChoice::Real),
        "bv" => Ok(LogicChoice::Bv),
        other => Err(miette::miette!(
            "unknown logic `{other}` (expected int, real, or bv)"
        )),
    }
}

pub(crate) fn seed_variables(
    logic: LogicChoice,
    count: usize,
    bv_width: u32,
) -> Vec<(String, SmtSort)> {
    let sort = match logic {
        LogicChoice::Int => SmtSort::Int,
        LogicChoice::Real => SmtSort::Real,
        LogicChoice::Bv => SmtSort::BitVec(bv_width),
    };
    (0..count).map(|i| (format!("x{i}"), sort)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logic_names_parse() {
        assert_eq!(parse_logic("int").unwrap(), LogicChoice::Int);
        assert_eq!(parse_logic("real").unwrap(), LogicChoice::Real);
        assert_eq!(parse_logic("bv").unwrap(), LogicChoice::Bv);
        assert!(parse_logic("float").is_err());
    }

    #[test]
    fn seed_variables_share_the_requested_sort() {
        let vars = seed_variables(LogicChoice::Bv, 3, 16);
        assert_eq!(vars.len(), 3);
        assert_eq!(vars[0], ("x0".to_string(), SmtSort::BitVec(16)));
        assert!(vars.iter().all(|(_, s)| *s == SmtSort::BitVec(16)));
    }

    #[test]
    fn generate_writes_a_script_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("case.smt2");
        run_generate(GenerateArgs {
            logic: "int".to_string(),
            vars: 2,
            bv_width: 32,
            seed: Some(11),
            bv_unsigned: false,
            bv_no_overflow: false,
            bv_no_underflow: false,
            out: Some(path.clone()),
        })
        .unwrap();

        let script = std::fs::read_to_string(&path).unwrap();
        assert!(script.starts_with("(set-logic QF_NIA)"));
        assert!(script.contains("(declare-const x0 Int)"));
        assert!(script.ends_with("(check-sat)\n"));
    }

    #[test]
    fn zero_seed_variables_is_rejected() {
        let result = run_generate(GenerateArgs {
            logic: "int".to_string(),
            vars: 0,
            bv_width: 32,
            seed: None,
            bv_unsigned: false,
            bv_no_overflow: false,
            bv_no_underflow: false,
            out: None,
        });
        assert!(result.is_err());
    }
}
