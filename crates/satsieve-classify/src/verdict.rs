use satsieve_smt::solver::SatResult;

/// Classification outcome for one candidate constraint.
///
/// `Unknown` covers both "not yet attempted" and "backend gave up";
/// callers that need the distinction must track it themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The precondition conjoined with the candidate has a model.
    Sat,
    /// The precondition conjoined with the candidate is unsatisfiable.
    Unsat,
    /// Not resolved within this call.
    Unknown,
}

impl Verdict {
    pub fn is_unknown(self) -> bool {
        matches!(self, Verdict::Unknown)
    }
}

impl From<&SatResult> for Verdict {
    fn from(result: &SatResult) -> Self {
        match result {
            SatResult::Sat => Verdict::Sat,
            SatResult::Unsat => Verdict::Unsat,
            SatResult::Unknown(_) => Verdict::Unknown,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Sat => write!(f, "sat"),
            Verdict::Unsat => write!(f, "unsat"),
            Verdict::Unknown => write!(f, "unknown"),
        }
    }
}

/// Indices of verdicts still pending resolution.
pub(crate) fn unresolved_indices(verdicts: &[Verdict]) -> Vec<usize> {
    verdicts
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_unknown())
        .map(|(i, _)| i)
        .collect()
}
