use crate::model::Model;
use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

/// Result of a satisfiability check.
#[derive(Debug, Clone, PartialEq)]
pub enum SatResult {
    Sat,
    Unsat,
    Unknown(String),
}

/// Abstract SMT solver interface.
///
/// One value of an implementing type is one solver session: it owns an
/// assertion stack manipulated through `assert`/`push`/`pop` and is reset
/// to an empty stack by `reset`. Sessions are single-threaded and never
/// shared between concurrent classification calls.
pub trait SmtSolver {
    type Error: std::error::Error;

    /// Declare a new variable.
    fn declare_var(&mut self, name: &str, sort: &SmtSort) -> Result<(), Self::Error>;

    /// Assert a constraint.
    fn assert(&mut self, term: &SmtTerm) -> Result<(), Self::Error>;

    /// Push a new scope.
    fn push(&mut self) -> Result<(), Self::Error>;

    /// Pop a scope.
    fn pop(&mut self) -> Result<(), Self::Error>;

    /// Check satisfiability.
    fn check_sat(&mut self) -> Result<SatResult, Self::Error>;

    /// Check satisfiability and extract a model if SAT.
    ///
    /// The model contains an entry for every variable in `var_names`,
    /// completed with an arbitrary consistent value when the solver left
    /// it unconstrained. It is only valid as a description of the solver
    /// state at the moment of the call; later mutations do not update it.
    fn check_sat_with_model(
        &mut self,
        var_names: &[(&str, &SmtSort)],
    ) -> Result<(SatResult, Option<Model>), Self::Error>;

    /// Reset the solver state.
    fn reset(&mut self) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct MockSolver {
        sat_result: SatResult,
        check_sat_calls: usize,
        depth: usize,
    }

    impl MockSolver {
        fn new(sat_result: SatResult) -> Self {
            Self {
                sat_result,
                check_sat_calls: 0,
                depth: 0,
            }
        }
    }

    impl SmtSolver for MockSolver {
        type Error = io::Error;

        fn declare_var(&mut self, _name: &str, _sort: &SmtSort) -> Result<(), Self::Error> {
            Ok(())
        }

        fn assert(&mut self, _term: &SmtTerm) -> Result<(), Self::Error> {
            Ok(())
        }

        fn push(&mut self) -> Result<(), Self::Error> {
            self.depth += 1;
            Ok(())
        }

        fn pop(&mut self) -> Result<(), Self::Error> {
            assert!(self.depth > 0, "pop without matching push");
            self.depth -= 1;
            Ok(())
        }

        fn check_sat(&mut self) -> Result<SatResult, Self::Error> {
            self.check_sat_calls += 1;
            Ok(self.sat_result.clone())
        }

        fn check_sat_with_model(
            &mut self,
            _var_names: &[(&str, &SmtSort)],
        ) -> Result<(SatResult, Option<Model>), Self::Error> {
            self.check_sat_calls += 1;
            Ok((self.sat_result.clone(), None))
        }

        fn reset(&mut self) -> Result<(), Self::Error> {
            self.depth = 0;
            Ok(())
        }
    }

    #[test]
    fn mock_session_tracks_scopes_and_calls() {
        let mut solver = MockSolver::new(SatResult::Unknown("timeout".into()));
        solver.push().unwrap();
        assert_eq!(solver.depth, 1);
        let result = solver.check_sat().unwrap();
        assert!(matches!(result, SatResult::Unknown(_)));
        solver.pop().unwrap();
        assert_eq!(solver.depth, 0);
        assert_eq!(solver.check_sat_calls, 1);
    }
}
