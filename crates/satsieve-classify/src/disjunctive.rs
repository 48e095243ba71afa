//! Disjunctive compaction: resolve many candidates per solver call.
//!
//! Each round asserts the disjunction of all pending candidates on top
//! of the precondition. An UNSAT answer proves every pending candidate
//! unsatisfiable at once; a SAT answer yields a model that witnesses at
//! least one pending candidate, so the pending set strictly shrinks on
//! every round and the loop runs at most `candidates.len()` rounds.

use satsieve_smt::model::Model;
use satsieve_smt::solver::{SatResult, SmtSolver};
use satsieve_smt::sorts::SmtSort;
use satsieve_smt::terms::SmtTerm;
use tracing::{debug, info, warn};

use crate::session::{seed_session, with_scope};
use crate::verdict::{unresolved_indices, Verdict};

/// Disjunctive compaction over throwaway sessions.
///
/// Every round re-seeds the session from scratch (reset, declarations,
/// precondition) before asserting the round's disjunction; the session
/// is reset again before returning.
pub fn classify_disjunctive<S: SmtSolver>(
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
    let mut round = 0usize;
    loop {
        let unresolved = unresolved_indices(&verdicts);
        if unresolved.is_empty() {
            break;
        }
        round += 1;
        seed_session(solver, decls, precondition)?;
        solver.assert(&disjunction_of(candidates, &unresolved))?;
        let (result, model) = solver.check_sat_with_model(&var_refs)?;
        if !apply_round(&mut verdicts, candidates, &unresolved, result, model, round) {
            break;
        }
    }
    solver.reset()?;
    info!(
        candidates = candidates.len(),
        rounds = round,
        unresolved = verdicts.iter().filter(|v| v.is_unknown()).count(),
        "disjunctive classification finished"
    );
    Ok(verdicts)
}

/// Disjunctive compaction over one long-lived session.
///
/// The precondition is asserted once; each round's disjunction lives in
/// its own push/pop scope, so the solver keeps learned clauses across
/// rounds and ends the call back at the precondition-only base.
pub fn classify_disjunctive_incremental<S: SmtSolver>(
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

    let mut round = 0usize;
    loop {
        let unresolved = unresolved_indices(&verdicts);
        if unresolved.is_empty() {
            break;
        }
        round += 1;
        let disjunction = disjunction_of(candidates, &unresolved);
        let (result, model) = with_scope(solver, |s| {
            s.assert(&disjunction)?;
            s.check_sat_with_model(&var_refs)
        })?;
        if !apply_round(&mut verdicts, candidates, &unresolved, result, model, round) {
            break;
        }
    }
    info!(
        candidates = candidates.len(),
        rounds = round,
        unresolved = verdicts.iter().filter(|v| v.is_unknown()).count(),
        "incremental disjunctive classification finished"
    );
    Ok(verdicts)
}

fn disjunction_of(candidates: &[SmtTerm], indices: &[usize]) -> SmtTerm {
    SmtTerm::or(indices.iter().map(|&i| candidates[i].clone()).collect())
}

/// Fold one round's outcome into the verdicts. Returns whether another
/// round can still make progress.
fn apply_round(
    verdicts: &mut [Verdict],
    candidates: &[SmtTerm],
    unresolved: &[usize],
    result: SatResult,
    model: Option<Model>,
    round: usize,
) -> bool {
    match result {
        SatResult::Unsat => {
            // The precondition cannot force any pending candidate true,
            // so all of them are unsatisfiable under it.
            for &i in unresolved {
                verdicts[i] = Verdict::Unsat;
            }
            debug!(round, resolved = unresolved.len(), "disjunction unsatisfiable");
            false
        }
        SatResult::Sat => {
            let Some(model) = model else {
                warn!(round, "solver returned SAT without a model");
                return false;
            };
            let mut flipped = 0usize;
            for &i in unresolved {
                if model.eval_bool(&candidates[i]) == Some(true) {
                    verdicts[i] = Verdict::Sat;
                    flipped += 1;
                }
            }
            debug!(round, flipped, "witness model applied");
            if flipped == 0 {
                // The model witnesses the disjunction, so this only
                // happens when the backend's model and our evaluator
                // disagree; stopping keeps the loop progress-bounded.
                warn!(round, "witness satisfied no pending candidate");
            }
            flipped > 0
        }
        SatResult::Unknown(reason) => {
            debug!(round, %reason, "solver gave up");
            false
        }
    }
}
