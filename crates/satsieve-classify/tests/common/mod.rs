//! Shared test backends.
//!
//! `BruteForceSolver` decides satisfiability by enumerating every
//! assignment over small finite domains, so tests get a real, decidable
//! backend without an external solver. `ScriptedSolver` replays a fixed
//! sequence of answers for driving classifier control flow.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;

use satsieve_smt::model::{Model, ModelValue};
use satsieve_smt::solver::{SatResult, SmtSolver};
use satsieve_smt::sorts::SmtSort;
use satsieve_smt::terms::SmtTerm;

pub struct BruteForceSolver {
    decls: Vec<(String, SmtSort)>,
    scopes: Vec<Vec<SmtTerm>>,
    int_lo: i64,
    int_hi: i64,
    pub check_sat_calls: usize,
}

impl BruteForceSolver {
    pub fn new() -> Self {
        Self::with_domain(-8, 8)
    }

    pub fn with_domain(int_lo: i64, int_hi: i64) -> Self {
        Self {
            decls: Vec::new(),
            scopes: vec![Vec::new()],
            int_lo,
            int_hi,
            check_sat_calls: 0,
        }
    }

    /// Current push depth above the base scope.
    pub fn depth(&self) -> usize {
        self.scopes.len() - 1
    }

    fn find_model(&self) -> Option<Model> {
        let mut model = Model::default();
        self.search(0, &mut model)
    }

    fn search(&self, var_idx: usize, model: &mut Model) -> Option<Model> {
        if var_idx == self.decls.len() {
            let satisfied = self
                .scopes
                .iter()
                .flatten()
                .all(|term| model.eval_bool(term) == Some(true));
            return satisfied.then(|| model.clone());
        }
        let (name, sort) = &self.decls[var_idx];
        match sort {
            SmtSort::Bool => {
                for b in [false, true] {
                    model.values.insert(name.clone(), ModelValue::Bool(b));
                    if let Some(found) = self.search(var_idx + 1, model) {
                        return Some(found);
                    }
                }
            }
            SmtSort::Int => {
                for n in self.int_lo..=self.int_hi {
                    model.values.insert(name.clone(), ModelValue::Int(n));
                    if let Some(found) = self.search(var_idx + 1, model) {
                        return Some(found);
                    }
                }
            }
            SmtSort::BitVec(width) => {
                assert!(*width <= 8, "brute-force enumeration needs small widths");
                for value in 0..(1u64 << width) {
                    model
                        .values
                        .insert(name.clone(), ModelValue::Bv { value, width: *width });
                    if let Some(found) = self.search(var_idx + 1, model) {
                        return Some(found);
                    }
                }
            }
            SmtSort::Real => panic!("brute-force enumeration does not cover reals"),
        }
        model.values.remove(name);
        None
    }
}

impl SmtSolver for BruteForceSolver {
    type Error = Infallible;

    fn declare_var(&mut self, name: &str, sort: &SmtSort) -> Result<(), Self::Error> {
        self.decls.push((name.to_string(), *sort));
        Ok(())
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), Self::Error> {
        self.scopes
            .last_mut()
            .expect("base scope always present")
            .push(term.clone());
        Ok(())
    }

    fn push(&mut self) -> Result<(), Self::Error> {
        self.scopes.push(Vec::new());
        Ok(())
    }

    fn pop(&mut self) -> Result<(), Self::Error> {
        assert!(self.scopes.len() > 1, "pop without matching push");
        self.scopes.pop();
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, Self::Error> {
        self.check_sat_calls += 1;
        Ok(if self.find_model().is_some() {
            SatResult::Sat
        } else {
            SatResult::Unsat
        })
    }

    fn check_sat_with_model(
        &mut self,
        _var_names: &[(&str, &SmtSort)],
    ) -> Result<(SatResult, Option<Model>), Self::Error> {
        self.check_sat_calls += 1;
        Ok(match self.find_model() {
            Some(model) => (SatResult::Sat, Some(model)),
            None => (SatResult::Unsat, None),
        })
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.decls.clear();
        self.scopes = vec![Vec::new()];
        Ok(())
    }
}

/// Replays a fixed sequence of `check_sat` answers.
///
/// Once the script runs dry every further check answers
/// `Unknown("script exhausted")`. Every SAT answer hands out a clone of
/// `model`.
pub struct ScriptedSolver {
    pub script: VecDeque<SatResult>,
    pub model: Option<Model>,
    pub check_sat_calls: usize,
    pub depth: usize,
    pub max_depth: usize,
    pub resets: usize,
}

impl ScriptedSolver {
    pub fn new(script: impl IntoIterator<Item = SatResult>) -> Self {
        Self {
            script: script.into_iter().collect(),
            model: None,
            check_sat_calls: 0,
            depth: 0,
            max_depth: 0,
            resets: 0,
        }
    }

    pub fn always_unknown() -> Self {
        Self::new([])
    }

    fn next_result(&mut self) -> SatResult {
        self.check_sat_calls += 1;
        self.script
            .pop_front()
            .unwrap_or_else(|| SatResult::Unknown("script exhausted".into()))
    }
}

impl SmtSolver for ScriptedSolver {
    type Error = Infallible;

    fn declare_var(&mut self, _name: &str, _sort: &SmtSort) -> Result<(), Self::Error> {
        Ok(())
    }

    fn assert(&mut self, _term: &SmtTerm) -> Result<(), Self::Error> {
        Ok(())
    }

    fn push(&mut self) -> Result<(), Self::Error> {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        Ok(())
    }

    fn pop(&mut self) -> Result<(), Self::Error> {
        assert!(self.depth > 0, "pop without matching push");
        self.depth -= 1;
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, Self::Error> {
        Ok(self.next_result())
    }

    fn check_sat_with_model(
        &mut self,
        _var_names: &[(&str, &SmtSort)],
    ) -> Result<(SatResult, Option<Model>), Self::Error> {
        let result = self.next_result();
        let model = if result == SatResult::Sat {
            self.model.clone()
        } else {
            None
        };
        Ok((result, model))
    }

    fn reset(&mut self) -> Result<(), Self::Error> {
        self.resets += 1;
        self.depth = 0;
        Ok(())
    }
}
