// Command handler for: Stress
//
// Differential testing loop: per trial, generate a random precondition
// and candidate set, classify them with every strategy through a real
// solver backend, and compare the labelings against the unary baseline.

use std::path::{Path, PathBuf};
use std::time::Instant;

use miette::IntoDiagnostic;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use satsieve_classify::{
    classify_disjunctive, classify_disjunctive_incremental, classify_unary,
    classify_unary_cached, Verdict,
};
use satsieve_gen::{FormulaGenerator, GeneratorConfig};
use satsieve_smt::backends::cvc5_backend::Cvc5Solver;
use satsieve_smt::solver::SmtSolver;
use satsieve_smt::sorts::SmtSort;
use satsieve_smt::terms::SmtTerm;

use super::generate::{parse_logic, seed_variables};
use crate::types::{
    OutputFormat, SolverChoice, StrategyReport, StressReport, TrialReport,
    STRESS_REPORT_SCHEMA_VERSION,
};

pub(crate) struct StressArgs {
    pub(crate) trials: usize,
    pub(crate) logic: String,
    pub(crate) solver: String,
    pub(crate) timeout: u64,
    pub(crate) seed: Option<u64>,
    pub(crate) format: String,
    pub(crate) out: Option<PathBuf>,
    pub(crate) bv_width: u32,
}

pub(crate) fn run_stress(args: StressArgs) -> miette::Result<()> {
    let logic = parse_logic(&args.logic)?;
    let format = parse_format(&args.format)?;
    let solver_choice = parse_solver(&args.solver)?;

    let mut trial_reports = Vec::with_capacity(args.trials);
    for trial in 0..args.trials {
        let trial_seed = args.seed.map(|s| s.wrapping_add(trial as u64));
        let seed_vars = seed_variables(logic, 2, args.bv_width);
        let config = GeneratorConfig {
            seed: trial_seed,
            ..GeneratorConfig::default()
        };
        let mut generator =
            FormulaGenerator::new(&seed_vars, config).map_err(|e| miette::miette!("{e}"))?;
        let precondition = generator.generate();
        let mut draw_rng = match trial_seed {
            Some(s) => StdRng::seed_from_u64(s.rotate_left(17)),
            None => StdRng::from_entropy(),
        };
        let candidates = generator.sample_predicates(draw_rng.gen_range(5..=15));
        let decls = generator.declarations().to_vec();

        info!(trial, candidates = candidates.len(), "running trial");
        let report = match solver_choice {
            SolverChoice::Cvc5 => {
                let mut solver = Cvc5Solver::with_timeout_secs(args.timeout)
                    .map_err(|e| miette::miette!("{e}"))?;
                run_trial(&mut solver, trial, &decls, &precondition, &candidates)
                    .map_err(|e| miette::miette!("{e}"))?
            }
            #[cfg(feature = "z3")]
            SolverChoice::Z3 => {
                let mut solver =
                    satsieve_smt::backends::z3_backend::Z3Solver::with_timeout_secs(args.timeout);
                run_trial(&mut solver, trial, &decls, &precondition, &candidates)
                    .map_err(|e| miette::miette!("{e}"))?
            }
        };
        if !report.agreement {
            warn!(trial, "a strategy disagreed with the baseline");
        }
        trial_reports.push(report);
    }

    let agreeing_trials = trial_reports.iter().filter(|t| t.agreement).count();
    let report = StressReport {
        schema_version: STRESS_REPORT_SCHEMA_VERSION.to_string(),
        logic: args.logic.clone(),
        solver: args.solver.clone(),
        trials: args.trials,
        agreeing_trials,
        disagreeing_trials: args.trials - agreeing_trials,
        trial_reports,
    };
    emit_report(&report, format, args.out.as_deref())
}

fn run_trial<S: SmtSolver>(
    solver: &mut S,
    trial: usize,
    decls: &[(String, SmtSort)],
    precondition: &SmtTerm,
    candidates: &[SmtTerm],
) -> Result<TrialReport, S::Error> {
    let started = Instant::now();
    let baseline = classify_unary(solver, decls, precondition, candidates)?;
    let baseline_duration_ms = started.elapsed().as_secs_f64() * 1000.0;

    let mut strategies = Vec::with_capacity(3);

    let started = Instant::now();
    let verdicts = classify_unary_cached(solver, decls, precondition, candidates)?;
    strategies.push(strategy_report("unary_cached", verdicts, &baseline, started));

    let started = Instant::now();
    let verdicts = classify_disjunctive(solver, decls, precondition, candidates)?;
    strategies.push(strategy_report("disjunctive", verdicts, &baseline, started));

    let started = Instant::now();
    let verdicts = classify_disjunctive_incremental(solver, decls, precondition, candidates)?;
    strategies.push(strategy_report(
        "disjunctive_incremental",
        verdicts,
        &baseline,
        started,
    ));

    let agreement = strategies.iter().all(|s| s.agrees_with_baseline);
    Ok(TrialReport {
        trial,
        candidates: candidates.len(),
        baseline: render_verdicts(&baseline),
        baseline_duration_ms,
        strategies,
        agreement,
    })
}

fn strategy_report(
    name: &str,
    verdicts: Vec<Verdict>,
    baseline: &[Verdict],
    started: Instant,
) -> StrategyReport {
    let agrees = labels_compatible(&verdicts, baseline);
    StrategyReport {
        name: name.to_string(),
        verdicts: render_verdicts(&verdicts),
        duration_ms: started.elapsed().as_secs_f64() * 1000.0,
        agrees_with_baseline: agrees,
    }
}

/// Two labelings conflict only when one resolves a candidate SAT and
/// the other resolves the same candidate UNSAT; an Unknown on either
/// side is compatible with anything.
pub(crate) fn labels_compatible(a: &[Verdict], b: &[Verdict]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            !matches!(
                (x, y),
                (Verdict::Sat, Verdict::Unsat) | (Verdict::Unsat, Verdict::Sat)
            )
        })
}

fn render_verdicts(verdicts: &[Verdict]) -> Vec<String> {
    verdicts.iter().map(|v| v.to_string()).collect()
}

pub(crate) fn parse_format(name: &str) -> miette::Result<OutputFormat> {
    match name {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => Err(miette::miette!(
            "unknown format `{other}` (expected text or json)"
        )),
    }
}

pub(crate) fn parse_solver(name: &str) -> miette::Result<SolverChoice> {
    match name {
        "cvc5" => Ok(SolverChoice::Cvc5),
        #[cfg(feature = "z3")]
        "z3" => Ok(SolverChoice::Z3),
        #[cfg(not(feature = "z3"))]
        "z3" => Err(miette::miette!(
            "this build has no z3 backend; rebuild with `--features z3`"
        )),
        other => Err(miette::miette!(
            "unknown solver `{other}` (expected cvc5 or z3)"
        )),
    }
}

fn emit_report(
    report: &StressReport,
    format: OutputFormat,
    out: Option<&Path>,
) -> miette::Result<()> {
    match format {
        OutputFormat::Json => {
            let rendered = serde_json::to_string_pretty(report).into_diagnostic()?;
            match out {
                Some(path) => std::fs::write(path, rendered).into_diagnostic()?,
                None => println!("{rendered}"),
            }
        }
        OutputFormat::Text => {
            let mut rendered = String::new();
            for trial in &report.trial_reports {
                rendered.push_str(&format!(
                    "trial {:>3}: {} candidates, baseline {:.1}ms, {}\n",
                    trial.trial,
                    trial.candidates,
                    trial.baseline_duration_ms,
                    if trial.agreement { "agree" } else { "DISAGREE" }
                ));
                for strategy in &trial.strategies {
                    rendered.push_str(&format!(
                        "    {:<24} {:.1}ms {}\n",
                        strategy.name,
                        strategy.duration_ms,
                        if strategy.agrees_with_baseline {
                            "ok"
                        } else {
                            "mismatch"
                        }
                    ));
                }
            }
            rendered.push_str(&format!(
                "{}/{} trials agreed with the baseline\n",
                report.agreeing_trials, report.trials
            ));
            match out {
                Some(path) => std::fs::write(path, rendered).into_diagnostic()?,
                None => print!("{rendered}"),
            }
        }
    }
    Ok(())
}
