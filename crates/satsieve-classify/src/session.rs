//! Session plumbing shared by the classifiers.

use satsieve_smt::solver::SmtSolver;
use satsieve_smt::sorts::SmtSort;
use satsieve_smt::terms::SmtTerm;

/// Reset the session, declare all variables, and assert the shared
/// precondition. Leaves the session at its base depth.
pub(crate) fn seed_session<S: SmtSolver>(
    solver: &mut S,
    decls: &[(String, SmtSort)],
    precondition: &SmtTerm,
) -> Result<(), S::Error> {
    solver.reset()?;
    for (name, sort) in decls {
        solver.declare_var(name, sort)?;
    }
    solver.assert(precondition)
}

/// Run `f` inside one push/pop scope.
///
/// The pop happens on every exit path, including when `f` fails; when
/// both `f` and the pop fail, `f`'s error wins.
pub(crate) fn with_scope<S, T, F>(solver: &mut S, f: F) -> Result<T, S::Error>
where
    S: SmtSolver,
    F: FnOnce(&mut S) -> Result<T, S::Error>,
{
    solver.push()?;
    let result = f(solver);
    let pop_result = solver.pop();
    match (result, pop_result) {
        (Ok(value), Ok(())) => Ok(value),
        (Err(err), Ok(())) => Err(err),
        (Ok(_), Err(pop_err)) => Err(pop_err),
        (Err(err), Err(_)) => Err(err),
    }
}
