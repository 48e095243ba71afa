//! Per-candidate classification: the naive baseline and the
//! model-reuse variant.

use satsieve_smt::solver::{SatResult, SmtSolver};
use satsieve_smt::sorts::SmtSort;
use satsieve_smt::terms::SmtTerm;
use tracing::{debug, info};

use crate::session::{seed_session, with_scope};
use crate::verdict::Verdict;

/// Check every candidate independently against the precondition.
///
/// One `check_sat` per candidate: the session is seeded once with the
/// precondition and each candidate is asserted inside its own scope.
/// This is the reference baseline the batched strategies are measured
/// against.
pub fn classify_unary<S: SmtSolver>(
    solver: &mut S,
    decls: &[(String, SmtSort)],
    precondition: &SmtTerm,
    candidates: &[SmtTerm],
) -> Result<Vec<Verdict>, S::Error> {
    let mut verdicts = vec![Verdict::Unknown; candidates.len()];
    if candidates.is_empty() {
        return Ok(verdicts);
    }

    seed_session(solver, decls, precondition)?;
    for (i, candidate) in candidates.iter().enumerate() {
        let result = with_scope(solver, |s| {
            s.assert(candidate)?;
            s.check_sat()
        })?;
        verdicts[i] = Verdict::from(&result);
        debug!(candidate = i, verdict = %verdicts[i], "unary check");
    }
    info!(
        candidates = candidates.len(),
        unresolved = verdicts.iter().filter(|v| v.is_unknown()).count(),
        "unary classification finished"
    );
    Ok(verdicts)
}

/// As [`classify_unary`], but every witness model is replayed against
/// the still-unresolved candidates.
///
/// A SAT answer for candidate `i` yields a model of `precondition ∧
/// cᵢ`; any other pending candidate that evaluates to true under that
/// model is satisfiable for the same reason and is marked without its
/// own solver call. Candidates resolved this way are skipped when their
/// turn comes.
pub fn classify_unary_cached<S: SmtSolver>(
    solver: &mut S,
    decls: &[(String, SmtSort)],
    precondition: &SmtTerm,
    candidates: &[SmtTerm],
) -> Result<Vec<Verdict>, S::Error> {
    let mut verdicts = vec![Verdict::Unknown; candidates.len()];
    if candidates.is_empty() {
        return Ok(verdicts);
    }

    let var_refs: Vec<(&str, &SmtSort)> = decls.iter().map(|(n, s)| (n.as_str(), s)).collect();
    seed_session(solver, decls, precondition)?;

    let mut checks = 0usize;
    for i in 0..candidates.len() {
        if !verdicts[i].is_unknown() {
            continue;
        }
        let (result, model) = with_scope(solver, |s| {
            s.assert(&candidates[i])?;
            s.check_sat_with_model(&var_refs)
        })?;
        checks += 1;
        match result {
            SatResult::Sat => {
                verdicts[i] = Verdict::Sat;
                let Some(model) = model else {
                    continue;
                };
                let mut reused = 0usize;
                for (j, candidate) in candidates.iter().enumerate() {
                    if verdicts[j].is_unknown() && model.eval_bool(candidate) == Some(true) {
                        verdicts[j] = Verdict::Sat;
                        reused += 1;
                    }
                }
                if reused > 0 {
                    debug!(witness = i, reused, "witness model resolved further candidates");
                }
            }
            SatResult::Unsat => verdicts[i] = Verdict::Unsat,
            SatResult::Unknown(reason) => {
                debug!(candidate = i, %reason, "solver gave up");
            }
        }
    }
    info!(
        candidates = candidates.len(),
        checks,
        unresolved = verdicts.iter().filter(|v| v.is_unknown()).count(),
        "cached unary classification finished"
    );
    Ok(verdicts)
}
