use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, Command, Stdio};

use num::rational::BigRational;
use num::BigInt;
use thiserror::Error;

use crate::backends::smtlib_printer::{sort_to_smtlib, to_smtlib};
use crate::model::{Model, ModelValue};
use crate::solver::{SatResult, SmtSolver};
use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

#[derive(Debug, Error)]
pub enum Cvc5Error {
    #[error("cvc5 I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cvc5 not found: {0}")]
    NotFound(String),
    #[error("cvc5 error: {0}")]
    SolverError(String),
    #[error("Failed to parse cvc5 output: {0}")]
    ParseError(String),
}

/// A cvc5 session over stdin/stdout pipes speaking SMT-LIB2.
///
/// The process is started with `--incremental --produce-models`, so
/// push/pop and model extraction work without restarting it. `reset`
/// issues an SMT-LIB `(reset)` and re-applies the configured logic.
pub struct Cvc5Solver {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    stderr: BufReader<ChildStderr>,
    logic: String,
}

impl Cvc5Solver {
    pub fn new() -> Result<Self, Cvc5Error> {
        Self::with_command_and_timeout("cvc5", None)
    }

    pub fn with_timeout_secs(timeout_secs: u64) -> Result<Self, Cvc5Error> {
        if timeout_secs == 0 {
            return Self::with_command_and_timeout("cvc5", None);
        }
        let timeout_ms = timeout_secs.saturating_mul(1000);
        Self::with_command_and_timeout("cvc5", Some(timeout_ms))
    }

    pub fn with_command(cmd: &str) -> Result<Self, Cvc5Error> {
        Self::with_command_and_timeout(cmd, None)
    }

    pub fn with_command_and_timeout(cmd: &str, timeout_ms: Option<u64>) -> Result<Self, Cvc5Error> {
        Self::with_options(cmd, "ALL", timeout_ms)
    }

    /// Full constructor: solver binary, SMT-LIB logic, and an optional
    /// per-check time limit in milliseconds.
    pub fn with_options(
        cmd: &str,
        logic: &str,
        timeout_ms: Option<u64>,
    ) -> Result<Self, Cvc5Error> {
        let mut args = vec![
            "--lang".to_string(),
            "smt2".to_string(),
            "--incremental".to_string(),
            "--produce-models".to_string(),
        ];
        if let Some(ms) = timeout_ms {
            args.push(format!("--tlimit-per={ms}"));
        }

        let mut child = Command::new(cmd)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Cvc5Error::NotFound(format!("{cmd}: {e}")))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| Cvc5Error::SolverError("failed to capture cvc5 stdin".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Cvc5Error::SolverError("failed to capture cvc5 stdout".into()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Cvc5Error::SolverError("failed to capture cvc5 stderr".into()))?;

        let mut solver = Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            stderr: BufReader::new(stderr),
            logic: logic.to_string(),
        };

        solver.send_command_no_response(&format!("(set-logic {logic})"))?;
        Ok(solver)
    }

    fn send_command(&mut self, cmd: &str) -> Result<String, Cvc5Error> {
        writeln!(self.stdin, "{cmd}")?;
        self.stdin.flush()?;

        // Read one line of response
        let mut response = String::new();
        self.stdout.read_line(&mut response)?;
        if response.is_empty() {
            let mut stderr = String::new();
            let _ = self.stderr.read_line(&mut stderr);
            return Err(Cvc5Error::SolverError(format!(
                "No response from cvc5 for command `{cmd}`. stderr: {}",
                stderr.trim()
            )));
        }
        Ok(response.trim_end().to_string())
    }

    fn send_command_no_response(&mut self, cmd: &str) -> Result<(), Cvc5Error> {
        writeln!(self.stdin, "{cmd}")?;
        self.stdin.flush()?;
        Ok(())
    }
}

impl Drop for Cvc5Solver {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "(exit)");
        let _ = self.stdin.flush();
        let _ = self.child.wait();
    }
}

impl SmtSolver for Cvc5Solver {
    type Error = Cvc5Error;

    fn declare_var(&mut self, name: &str, sort: &SmtSort) -> Result<(), Cvc5Error> {
        let sort_str = sort_to_smtlib(sort);
        self.send_command_no_response(&format!("(declare-const {name} {sort_str})"))?;
        Ok(())
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), Cvc5Error> {
        let smt_str = to_smtlib(term);
        self.send_command_no_response(&format!("(assert {smt_str})"))?;
        Ok(())
    }

    fn push(&mut self) -> Result<(), Cvc5Error> {
        self.send_command_no_response("(push 1)")?;
        Ok(())
    }

    fn pop(&mut self) -> Result<(), Cvc5Error> {
        self.send_command_no_response("(pop 1)")?;
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, Cvc5Error> {
        let response = self.send_command("(check-sat)")?;
        match response.as_str() {
            "sat" => Ok(SatResult::Sat),
            "unsat" => Ok(SatResult::Unsat),
            "unknown" => Ok(SatResult::Unknown("cvc5 returned unknown".into())),
            other => Err(Cvc5Error::SolverError(other.to_string())),
        }
    }

    fn check_sat_with_model(
        &mut self,
        var_names: &[(&str, &SmtSort)],
    ) -> Result<(SatResult, Option<Model>), Cvc5Error> {
        let result = self.check_sat()?;
        if result != SatResult::Sat {
            return Ok((result, None));
        }

        let mut model = Model::default();
        for &(name, sort) in var_names {
            let response = self.send_command(&format!("(get-value ({name}))"))?;
            // Response format: ((name value))
            let value = parse_cvc5_value(&response, name, sort).ok_or_else(|| {
                Cvc5Error::ParseError(format!("value of `{name}` from `{response}`"))
            })?;
            model.values.insert(name.to_string(), value);
        }

        Ok((SatResult::Sat, Some(model)))
    }

    fn reset(&mut self) -> Result<(), Cvc5Error> {
        self.send_command_no_response("(reset)")?;
        let logic = self.logic.clone();
        self.send_command_no_response(&format!("(set-logic {logic})"))?;
        Ok(())
    }
}

fn parse_cvc5_value(response: &str, name: &str, sort: &SmtSort) -> Option<ModelValue> {
    // Strip the outer `((name ` and trailing `))`.
    let inner = response.trim();
    let inner = inner.strip_prefix("((")?;
    let inner = inner.strip_suffix("))")?;
    let val_str = inner.strip_prefix(name)?.trim();

    match sort {
        SmtSort::Int => parse_int(val_str).map(ModelValue::Int),
        SmtSort::Bool => match val_str {
            "true" => Some(ModelValue::Bool(true)),
            "false" => Some(ModelValue::Bool(false)),
            _ => None,
        },
        SmtSort::Real => parse_real(val_str).map(ModelValue::Real),
        SmtSort::BitVec(width) => parse_bv(val_str, *width).map(|value| ModelValue::Bv {
            value,
            width: *width,
        }),
    }
}

/// Parse `N` or `(- N)`.
fn parse_int(val_str: &str) -> Option<i64> {
    if let Some(body) = val_str.strip_prefix("(- ") {
        let num_str = body.strip_suffix(')')?.trim();
        num_str.parse::<i64>().ok().map(|n| -n)
    } else {
        val_str.parse::<i64>().ok()
    }
}

/// Parse `N.M`, `(/ a b)`, or either wrapped in `(- ...)`.
fn parse_real(val_str: &str) -> Option<BigRational> {
    if let Some(body) = val_str.strip_prefix("(- ") {
        let inner = body.strip_suffix(')')?.trim();
        return parse_real(inner).map(|r| -r);
    }
    if let Some(body) = val_str.strip_prefix("(/ ") {
        let inner = body.strip_suffix(')')?.trim();
        let (num, den) = inner.split_once(' ')?;
        return Some(parse_decimal(num.trim())? / parse_decimal(den.trim())?);
    }
    parse_decimal(val_str)
}

/// Parse a decimal such as `3.0` or `0.25` into an exact rational.
fn parse_decimal(text: &str) -> Option<BigRational> {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, f),
        None => (text, ""),
    };
    let digits: String = format!("{int_part}{frac_part}");
    let numerator: BigInt = digits.parse().ok()?;
    let denominator = BigInt::from(10u32).pow(frac_part.len() as u32);
    if frac_part.is_empty() {
        Some(BigRational::from_integer(numerator))
    } else {
        Some(BigRational::new(numerator, denominator))
    }
}

/// Parse `#bNNN`, `#xNNN`, or `(_ bvN w)`.
fn parse_bv(val_str: &str, width: u32) -> Option<u64> {
    let value = if let Some(bits) = val_str.strip_prefix("#b") {
        u64::from_str_radix(bits, 2).ok()?
    } else if let Some(hex) = val_str.strip_prefix("#x") {
        u64::from_str_radix(hex, 16).ok()?
    } else if let Some(body) = val_str.strip_prefix("(_ bv") {
        let inner = body.strip_suffix(')')?;
        let (digits, _) = inner.split_once(' ')?;
        digits.parse::<u64>().ok()?
    } else {
        return None;
    };
    if width >= 64 {
        Some(value)
    } else {
        Some(value & ((1u64 << width) - 1))
    }
}
