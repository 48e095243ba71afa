use std::collections::HashMap;

use num::rational::BigRational;
use num::BigInt;
use thiserror::Error;
use z3::SatResult as Z3SatResult;

use crate::model::{Model, ModelValue};
use crate::solver::{SatResult, SmtSolver};
use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

#[derive(Debug, Error)]
pub enum Z3Error {
    #[error("Z3 error: {0}")]
    Internal(String),
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),
    #[error("Sort mismatch for variable {0}")]
    SortMismatch(String),
}

/// In-process Z3 session, translating the solver-agnostic term tree to
/// `z3::ast` nodes on every assertion.
pub struct Z3Solver {
    solver: z3::Solver,
    int_vars: HashMap<String, z3::ast::Int>,
    bool_vars: HashMap<String, z3::ast::Bool>,
    real_vars: HashMap<String, z3::ast::Real>,
    bv_vars: HashMap<String, z3::ast::BV>,
    _params: Option<z3::Params>,
}

impl Z3Solver {
    pub fn new() -> Self {
        let solver = z3::Solver::new();
        Self {
            solver,
            int_vars: HashMap::new(),
            bool_vars: HashMap::new(),
            real_vars: HashMap::new(),
            bv_vars: HashMap::new(),
            _params: None,
        }
    }

    pub fn with_timeout_secs(timeout_secs: u64) -> Self {
        if timeout_secs == 0 {
            return Self::new();
        }
        let solver = z3::Solver::new();
        let mut params = z3::Params::new();
        let timeout_ms = timeout_secs.saturating_mul(1000);
        params.set_u32("timeout", timeout_ms as u32);
        params.set_u32("solver2_timeout", timeout_ms as u32);
        solver.set_params(&params);
        Self {
            solver,
            int_vars: HashMap::new(),
            bool_vars: HashMap::new(),
            real_vars: HashMap::new(),
            bv_vars: HashMap::new(),
            _params: Some(params),
        }
    }

    pub fn with_default_config() -> Self {
        Self::new()
    }

    fn translate_term(&self, term: &SmtTerm) -> Result<Z3Term, Z3Error> {
        match term {
            SmtTerm::Var(name) => {
                if let Some(v) = self.int_vars.get(name) {
                    Ok(Z3Term::Int(v.clone()))
                } else if let Some(v) = self.bool_vars.get(name) {
                    Ok(Z3Term::Bool(v.clone()))
                } else if let Some(v) = self.real_vars.get(name) {
                    Ok(Z3Term::Real(v.clone()))
                } else if let Some(v) = self.bv_vars.get(name) {
                    Ok(Z3Term::Bv(v.clone()))
                } else {
                    Err(Z3Error::UnknownVariable(name.clone()))
                }
            }
            SmtTerm::IntLit(n) => Ok(Z3Term::Int(z3::ast::Int::from_i64(*n))),
            SmtTerm::BoolLit(b) => Ok(Z3Term::Bool(z3::ast::Bool::from_bool(*b))),
            SmtTerm::RealLit(num, den) => {
                let num = i32::try_from(*num)
                    .map_err(|_| Z3Error::Internal(format!("real numerator {num} out of range")))?;
                let den = i32::try_from(*den)
                    .map_err(|_| Z3Error::Internal(format!("real denominator {den} out of range")))?;
                Ok(Z3Term::Real(z3::ast::Real::from_real(num, den)))
            }
            SmtTerm::BvLit { value, width } => Ok(Z3Term::Bv(z3::ast::BV::from_u64(*value, *width))),

            SmtTerm::Add(lhs, rhs) => match (self.translate_term(lhs)?, self.translate_term(rhs)?) {
                (Z3Term::Int(l), Z3Term::Int(r)) => Ok(Z3Term::Int(&l + &r)),
                (Z3Term::Real(l), Z3Term::Real(r)) => Ok(Z3Term::Real(&l + &r)),
                _ => Err(Z3Error::Internal("Sort mismatch in Add".into())),
            },
            SmtTerm::Sub(lhs, rhs) => match (self.translate_term(lhs)?, self.translate_term(rhs)?) {
                (Z3Term::Int(l), Z3Term::Int(r)) => Ok(Z3Term::Int(&l - &r)),
                (Z3Term::Real(l), Z3Term::Real(r)) => Ok(Z3Term::Real(&l - &r)),
                _ => Err(Z3Error::Internal("Sort mismatch in Sub".into())),
            },
            SmtTerm::Mul(lhs, rhs) => match (self.translate_term(lhs)?, self.translate_term(rhs)?) {
                (Z3Term::Int(l), Z3Term::Int(r)) => Ok(Z3Term::Int(&l * &r)),
                (Z3Term::Real(l), Z3Term::Real(r)) => Ok(Z3Term::Real(&l * &r)),
                _ => Err(Z3Error::Internal("Sort mismatch in Mul".into())),
            },
            SmtTerm::Div(lhs, rhs) => {
                let l = self.translate_term(lhs)?.into_int()?;
                let r = self.translate_term(rhs)?.into_int()?;
                Ok(Z3Term::Int(&l / &r))
            }
            SmtTerm::Mod(lhs, rhs) => {
                let l = self.translate_term(lhs)?.into_int()?;
                let r = self.translate_term(rhs)?.into_int()?;
                Ok(Z3Term::Int(&l % &r))
            }
            SmtTerm::RealDiv(lhs, rhs) => {
                let l = self.translate_term(lhs)?.into_real()?;
                let r = self.translate_term(rhs)?.into_real()?;
                Ok(Z3Term::Real(&l / &r))
            }

            SmtTerm::BvAdd(lhs, rhs) => self.bv_binop(lhs, rhs, |l, r| l + r),
            SmtTerm::BvSub(lhs, rhs) => self.bv_binop(lhs, rhs, |l, r| l - r),
            SmtTerm::BvMul(lhs, rhs) => self.bv_binop(lhs, rhs, |l, r| l * r),
            SmtTerm::BvUDiv(lhs, rhs) => self.bv_binop(lhs, rhs, |l, r| l.bvudiv(r)),
            SmtTerm::BvSDiv(lhs, rhs) => self.bv_binop(lhs, rhs, |l, r| l.bvsdiv(r)),

            SmtTerm::BvZeroExtend(extra, inner) => {
                let bv = self.translate_term(inner)?.into_bv()?;
                Ok(Z3Term::Bv(bv.zero_ext(*extra)))
            }
            SmtTerm::BvSignExtend(extra, inner) => {
                let bv = self.translate_term(inner)?.into_bv()?;
                Ok(Z3Term::Bv(bv.sign_ext(*extra)))
            }
            SmtTerm::BvExtract(hi, lo, inner) => {
                let bv = self.translate_term(inner)?.into_bv()?;
                Ok(Z3Term::Bv(bv.extract(*hi, *lo)))
            }

            SmtTerm::Eq(lhs, rhs) => {
                let l = self.translate_term(lhs)?;
                let r = self.translate_term(rhs)?;
                match (l, r) {
                    (Z3Term::Int(li), Z3Term::Int(ri)) => Ok(Z3Term::Bool(li.eq(&ri))),
                    (Z3Term::Bool(lb), Z3Term::Bool(rb)) => Ok(Z3Term::Bool(lb.eq(&rb))),
                    (Z3Term::Real(lr), Z3Term::Real(rr)) => Ok(Z3Term::Bool(lr.eq(&rr))),
                    (Z3Term::Bv(lv), Z3Term::Bv(rv)) => Ok(Z3Term::Bool(lv.eq(&rv))),
                    _ => Err(Z3Error::Internal("Sort mismatch in Eq".into())),
                }
            }
            SmtTerm::Lt(lhs, rhs) => self.arith_cmp(lhs, rhs, |l, r| l.lt(r), |l, r| l.lt(r)),
            SmtTerm::Le(lhs, rhs) => self.arith_cmp(lhs, rhs, |l, r| l.le(r), |l, r| l.le(r)),
            SmtTerm::Gt(lhs, rhs) => self.arith_cmp(lhs, rhs, |l, r| l.gt(r), |l, r| l.gt(r)),
            SmtTerm::Ge(lhs, rhs) => self.arith_cmp(lhs, rhs, |l, r| l.ge(r), |l, r| l.ge(r)),
            SmtTerm::BvUlt(lhs, rhs) => self.bv_cmp(lhs, rhs, |l, r| l.bvult(r)),
            SmtTerm::BvUle(lhs, rhs) => self.bv_cmp(lhs, rhs, |l, r| l.bvule(r)),
            SmtTerm::BvUgt(lhs, rhs) => self.bv_cmp(lhs, rhs, |l, r| l.bvugt(r)),
            SmtTerm::BvUge(lhs, rhs) => self.bv_cmp(lhs, rhs, |l, r| l.bvuge(r)),
            SmtTerm::BvSlt(lhs, rhs) => self.bv_cmp(lhs, rhs, |l, r| l.bvslt(r)),
            SmtTerm::BvSle(lhs, rhs) => self.bv_cmp(lhs, rhs, |l, r| l.bvsle(r)),
            SmtTerm::BvSgt(lhs, rhs) => self.bv_cmp(lhs, rhs, |l, r| l.bvsgt(r)),
            SmtTerm::BvSge(lhs, rhs) => self.bv_cmp(lhs, rhs, |l, r| l.bvsge(r)),

            SmtTerm::And(terms) => {
                let bools: Result<Vec<_>, _> = terms
                    .iter()
                    .map(|t| self.translate_term(t).and_then(|z| z.into_bool()))
                    .collect();
                let bools = bools?;
                let refs: Vec<&z3::ast::Bool> = bools.iter().collect();
                Ok(Z3Term::Bool(z3::ast::Bool::and(&refs)))
            }
            SmtTerm::Or(terms) => {
                let bools: Result<Vec<_>, _> = terms
                    .iter()
                    .map(|t| self.translate_term(t).and_then(|z| z.into_bool()))
                    .collect();
                let bools = bools?;
                let refs: Vec<&z3::ast::Bool> = bools.iter().collect();
                Ok(Z3Term::Bool(z3::ast::Bool::or(&refs)))
            }
            SmtTerm::Not(inner) => {
                let b = self.translate_term(inner)?.into_bool()?;
                Ok(Z3Term::Bool(b.not()))
            }
            SmtTerm::Implies(lhs, rhs) => {
                let l = self.translate_term(lhs)?.into_bool()?;
                let r = self.translate_term(rhs)?.into_bool()?;
                Ok(Z3Term::Bool(l.implies(&r)))
            }
            SmtTerm::Xor(lhs, rhs) => {
                let l = self.translate_term(lhs)?.into_bool()?;
                let r = self.translate_term(rhs)?.into_bool()?;
                Ok(Z3Term::Bool(l.xor(&r)))
            }

            SmtTerm::Ite(cond, then, els) => {
                let c = self.translate_term(cond)?.into_bool()?;
                let t = self.translate_term(then)?;
                let e = self.translate_term(els)?;
                match (t, e) {
                    (Z3Term::Int(ti), Z3Term::Int(ei)) => Ok(Z3Term::Int(c.ite(&ti, &ei))),
                    (Z3Term::Bool(tb), Z3Term::Bool(eb)) => Ok(Z3Term::Bool(c.ite(&tb, &eb))),
                    (Z3Term::Real(tr), Z3Term::Real(er)) => Ok(Z3Term::Real(c.ite(&tr, &er))),
                    (Z3Term::Bv(tv), Z3Term::Bv(ev)) => Ok(Z3Term::Bv(c.ite(&tv, &ev))),
                    _ => Err(Z3Error::Internal("Sort mismatch in ITE".into())),
                }
            }
        }
    }

    fn bv_binop(
        &self,
        lhs: &SmtTerm,
        rhs: &SmtTerm,
        op: impl FnOnce(&z3::ast::BV, &z3::ast::BV) -> z3::ast::BV,
    ) -> Result<Z3Term, Z3Error> {
        let l = self.translate_term(lhs)?.into_bv()?;
        let r = self.translate_term(rhs)?.into_bv()?;
        Ok(Z3Term::Bv(op(&l, &r)))
    }

    fn bv_cmp(
        &self,
        lhs: &SmtTerm,
        rhs: &SmtTerm,
        op: impl FnOnce(&z3::ast::BV, &z3::ast::BV) -> z3::ast::Bool,
    ) -> Result<Z3Term, Z3Error> {
        let l = self.translate_term(lhs)?.into_bv()?;
        let r = self.translate_term(rhs)?.into_bv()?;
        Ok(Z3Term::Bool(op(&l, &r)))
    }

    fn arith_cmp(
        &self,
        lhs: &SmtTerm,
        rhs: &SmtTerm,
        int_op: impl FnOnce(&z3::ast::Int, &z3::ast::Int) -> z3::ast::Bool,
        real_op: impl FnOnce(&z3::ast::Real, &z3::ast::Real) -> z3::ast::Bool,
    ) -> Result<Z3Term, Z3Error> {
        match (self.translate_term(lhs)?, self.translate_term(rhs)?) {
            (Z3Term::Int(l), Z3Term::Int(r)) => Ok(Z3Term::Bool(int_op(&l, &r))),
            (Z3Term::Real(l), Z3Term::Real(r)) => Ok(Z3Term::Bool(real_op(&l, &r))),
            _ => Err(Z3Error::Internal("Sort mismatch in comparison".into())),
        }
    }
}

enum Z3Term {
    Int(z3::ast::Int),
    Bool(z3::ast::Bool),
    Real(z3::ast::Real),
    Bv(z3::ast::BV),
}

impl Z3Term {
    fn into_int(self) -> Result<z3::ast::Int, Z3Error> {
        match self {
            Z3Term::Int(i) => Ok(i),
            _ => Err(Z3Error::Internal("Expected Int term".into())),
        }
    }

    fn into_bool(self) -> Result<z3::ast::Bool, Z3Error> {
        match self {
            Z3Term::Bool(b) => Ok(b),
            _ => Err(Z3Error::Internal("Expected Bool term".into())),
        }
    }

    fn into_real(self) -> Result<z3::ast::Real, Z3Error> {
        match self {
            Z3Term::Real(r) => Ok(r),
            _ => Err(Z3Error::Internal("Expected Real term".into())),
        }
    }

    fn into_bv(self) -> Result<z3::ast::BV, Z3Error> {
        match self {
            Z3Term::Bv(v) => Ok(v),
            _ => Err(Z3Error::Internal("Expected BitVec term".into())),
        }
    }
}

impl Default for Z3Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl SmtSolver for Z3Solver {
    type Error = Z3Error;

    fn declare_var(&mut self, name: &str, sort: &SmtSort) -> Result<(), Z3Error> {
        match sort {
            SmtSort::Int => {
                let v = z3::ast::Int::new_const(name);
                self.int_vars.insert(name.to_string(), v);
            }
            SmtSort::Bool => {
                let v = z3::ast::Bool::new_const(name);
                self.bool_vars.insert(name.to_string(), v);
            }
            SmtSort::Real => {
                let v = z3::ast::Real::new_const(name);
                self.real_vars.insert(name.to_string(), v);
            }
            SmtSort::BitVec(width) => {
                let v = z3::ast::BV::new_const(name, *width);
                self.bv_vars.insert(name.to_string(), v);
            }
        }
        Ok(())
    }

    fn assert(&mut self, term: &SmtTerm) -> Result<(), Z3Error> {
        let z3_term = self.translate_term(term)?.into_bool()?;
        self.solver.assert(&z3_term);
        Ok(())
    }

    fn push(&mut self) -> Result<(), Z3Error> {
        self.solver.push();
        Ok(())
    }

    fn pop(&mut self) -> Result<(), Z3Error> {
        self.solver.pop(1);
        Ok(())
    }

    fn check_sat(&mut self) -> Result<SatResult, Z3Error> {
        match self.solver.check() {
            Z3SatResult::Sat => Ok(SatResult::Sat),
            Z3SatResult::Unsat => Ok(SatResult::Unsat),
            Z3SatResult::Unknown => Ok(SatResult::Unknown("Z3 returned unknown".into())),
        }
    }

    fn check_sat_with_model(
        &mut self,
        var_names: &[(&str, &SmtSort)],
    ) -> Result<(SatResult, Option<Model>), Z3Error> {
        match self.solver.check() {
            Z3SatResult::Sat => {
                let z3_model = self
                    .solver
                    .get_model()
                    .ok_or_else(|| Z3Error::Internal("SAT but no model available".into()))?;
                let mut model = Model::default();

                for &(name, sort) in var_names {
                    match sort {
                        SmtSort::Int => {
                            if let Some(v) = self.int_vars.get(name) {
                                if let Some(val) = z3_model.eval::<z3::ast::Int>(v, true) {
                                    if let Some(n) = val.as_i64() {
                                        model.values.insert(name.to_string(), ModelValue::Int(n));
                                    }
                                }
                            }
                        }
                        SmtSort::Bool => {
                            if let Some(v) = self.bool_vars.get(name) {
                                if let Some(val) = z3_model.eval::<z3::ast::Bool>(v, true) {
                                    if let Some(b) = val.as_bool() {
                                        model.values.insert(name.to_string(), ModelValue::Bool(b));
                                    }
                                }
                            }
                        }
                        SmtSort::Real => {
                            if let Some(v) = self.real_vars.get(name) {
                                if let Some(val) = z3_model.eval::<z3::ast::Real>(v, true) {
                                    if let Some((num, den)) = val.as_real() {
                                        model.values.insert(
                                            name.to_string(),
                                            ModelValue::Real(BigRational::new(
                                                BigInt::from(num),
                                                BigInt::from(den),
                                            )),
                                        );
                                    }
                                }
                            }
                        }
                        SmtSort::BitVec(width) => {
                            if let Some(v) = self.bv_vars.get(name) {
                                if let Some(val) = z3_model.eval::<z3::ast::BV>(v, true) {
                                    if let Some(value) = val.as_u64() {
                                        model.values.insert(
                                            name.to_string(),
                                            ModelValue::Bv {
                                                value,
                                                width: *width,
                                            },
                                        );
                                    }
                                }
                            }
                        }
                    }
                }

                Ok((SatResult::Sat, Some(model)))
            }
            Z3SatResult::Unsat => Ok((SatResult::Unsat, None)),
            Z3SatResult::Unknown => Ok((SatResult::Unknown("Z3 returned unknown".into()), None)),
        }
    }

    fn reset(&mut self) -> Result<(), Z3Error> {
        self.solver.reset();
        // Z3 may drop per-solver parameters on reset; reapply timeout if configured.
        if let Some(params) = &self._params {
            self.solver.set_params(params);
        }
        self.int_vars.clear();
        self.bool_vars.clear();
        self.real_vars.clear();
        self.bv_vars.clear();
        Ok(())
    }
}
