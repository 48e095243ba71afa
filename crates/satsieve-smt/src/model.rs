use std::collections::HashMap;

use num::rational::BigRational;
use num::BigInt;
use num::Zero;

use crate::terms::SmtTerm;

/// A model (variable assignments) extracted from a SAT result.
///
/// Backends populate a model by evaluating every requested variable with
/// completion enabled, so a model covers all declared variables of the
/// query that produced it. A model is a read-only oracle: evaluating terms
/// against it never touches the solver.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub values: HashMap<String, ModelValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModelValue {
    Int(i64),
    Bool(bool),
    Real(BigRational),
    Bv { value: u64, width: u32 },
}

pub(crate) fn bv_mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

fn to_signed(value: u64, width: u32) -> i64 {
    let masked = value & bv_mask(width);
    if width < 64 && (masked >> (width - 1)) & 1 == 1 {
        ((masked as i128) - (1i128 << width)) as i64
    } else {
        masked as i64
    }
}

/// SMT-LIB Euclidean division: the remainder is always non-negative.
fn euclid_div(a: i64, b: i64) -> Option<i64> {
    if b == 0 {
        return None;
    }
    let (wa, wb) = (a as i128, b as i128);
    let mut q = wa / wb;
    if wa % wb < 0 {
        q -= wb.signum();
    }
    i64::try_from(q).ok()
}

fn euclid_mod(a: i64, b: i64) -> Option<i64> {
    let q = euclid_div(a, b)?;
    i64::try_from((a as i128) - (b as i128) * (q as i128)).ok()
}

impl Model {
    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ModelValue::Int(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.values.get(name) {
            Some(ModelValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }

    pub fn get_real(&self, name: &str) -> Option<&BigRational> {
        match self.values.get(name) {
            Some(ModelValue::Real(r)) => Some(r),
            _ => None,
        }
    }

    pub fn get_bv(&self, name: &str) -> Option<u64> {
        match self.values.get(name) {
            Some(ModelValue::Bv { value, .. }) => Some(*value),
            _ => None,
        }
    }

    /// Evaluate a boolean term under this assignment.
    ///
    /// Returns `None` when the term references a variable outside the
    /// model, mixes sorts, or hits an operation the theory leaves
    /// uninterpreted (integer division by zero). Callers treat `None` as
    /// "not witnessed", never as a decision.
    pub fn eval_bool(&self, term: &SmtTerm) -> Option<bool> {
        match self.eval(term)? {
            ModelValue::Bool(b) => Some(b),
            _ => None,
        }
    }

    /// Evaluate an arbitrary term under this assignment.
    pub fn eval(&self, term: &SmtTerm) -> Option<ModelValue> {
        use ModelValue as V;
        use SmtTerm as T;
        Some(match term {
            T::Var(name) => self.values.get(name)?.clone(),
            T::IntLit(n) => V::Int(*n),
            T::BoolLit(b) => V::Bool(*b),
            T::RealLit(num, den) => V::Real(rational(*num, *den)?),
            T::BvLit { value, width } => V::Bv {
                value: value & bv_mask(*width),
                width: *width,
            },

            T::Add(l, r) => self.arith(l, r, i64::checked_add, |a, b| Some(a + b))?,
            T::Sub(l, r) => self.arith(l, r, i64::checked_sub, |a, b| Some(a - b))?,
            T::Mul(l, r) => self.arith(l, r, i64::checked_mul, |a, b| Some(a * b))?,
            T::Div(l, r) => match (self.eval(l)?, self.eval(r)?) {
                (V::Int(a), V::Int(b)) => V::Int(euclid_div(a, b)?),
                _ => return None,
            },
            T::Mod(l, r) => match (self.eval(l)?, self.eval(r)?) {
                (V::Int(a), V::Int(b)) => V::Int(euclid_mod(a, b)?),
                _ => return None,
            },
            T::RealDiv(l, r) => match (self.eval(l)?, self.eval(r)?) {
                (V::Real(a), V::Real(b)) => {
                    if b.is_zero() {
                        return None;
                    }
                    V::Real(a / b)
                }
                _ => return None,
            },

            T::BvAdd(l, r) => self.bv_arith(l, r, |a, b, w| Some(a.wrapping_add(b) & bv_mask(w)))?,
            T::BvSub(l, r) => self.bv_arith(l, r, |a, b, w| Some(a.wrapping_sub(b) & bv_mask(w)))?,
            T::BvMul(l, r) => self.bv_arith(l, r, |a, b, w| Some(a.wrapping_mul(b) & bv_mask(w)))?,
            T::BvUDiv(l, r) => self.bv_arith(l, r, |a, b, w| {
                // SMT-LIB defines bvudiv by zero as all-ones.
                Some(if b == 0 { bv_mask(w) } else { a / b })
            })?,
            T::BvSDiv(l, r) => self.bv_arith(l, r, |a, b, w| {
                let (sa, sb) = (to_signed(a, w), to_signed(b, w));
                let q = if sb == 0 {
                    // SMT-LIB: bvsdiv by zero is -1 for non-negative
                    // dividends and 1 otherwise.
                    if sa >= 0 {
                        -1
                    } else {
                        1
                    }
                } else {
                    ((sa as i128) / (sb as i128)) as i64
                };
                Some((q as u64) & bv_mask(w))
            })?,

            T::BvZeroExtend(extra, inner) => match self.eval(inner)? {
                V::Bv { value, width } if width + extra <= 64 => V::Bv {
                    value,
                    width: width + extra,
                },
                _ => return None,
            },
            T::BvSignExtend(extra, inner) => match self.eval(inner)? {
                V::Bv { value, width } if width + extra <= 64 => {
                    let wide = (to_signed(value, width) as u64) & bv_mask(width + extra);
                    V::Bv {
                        value: wide,
                        width: width + extra,
                    }
                }
                _ => return None,
            },
            T::BvExtract(hi, lo, inner) => match self.eval(inner)? {
                V::Bv { value, width } if *hi < width && lo <= hi => V::Bv {
                    value: (value >> lo) & bv_mask(hi - lo + 1),
                    width: hi - lo + 1,
                },
                _ => return None,
            },

            T::Eq(l, r) => match (self.eval(l)?, self.eval(r)?) {
                (V::Int(a), V::Int(b)) => V::Bool(a == b),
                (V::Bool(a), V::Bool(b)) => V::Bool(a == b),
                (V::Real(a), V::Real(b)) => V::Bool(a == b),
                (V::Bv { value: a, width: wa }, V::Bv { value: b, width: wb }) if wa == wb => {
                    V::Bool(a == b)
                }
                _ => return None,
            },
            T::Lt(l, r) => self.compare(l, r, |o| o.is_lt())?,
            T::Le(l, r) => self.compare(l, r, |o| o.is_le())?,
            T::Gt(l, r) => self.compare(l, r, |o| o.is_gt())?,
            T::Ge(l, r) => self.compare(l, r, |o| o.is_ge())?,
            T::BvUlt(l, r) => self.bv_compare(l, r, |a, b, _| a < b)?,
            T::BvUle(l, r) => self.bv_compare(l, r, |a, b, _| a <= b)?,
            T::BvUgt(l, r) => self.bv_compare(l, r, |a, b, _| a > b)?,
            T::BvUge(l, r) => self.bv_compare(l, r, |a, b, _| a >= b)?,
            T::BvSlt(l, r) => self.bv_compare(l, r, |a, b, w| to_signed(a, w) < to_signed(b, w))?,
            T::BvSle(l, r) => self.bv_compare(l, r, |a, b, w| to_signed(a, w) <= to_signed(b, w))?,
            T::BvSgt(l, r) => self.bv_compare(l, r, |a, b, w| to_signed(a, w) > to_signed(b, w))?,
            T::BvSge(l, r) => self.bv_compare(l, r, |a, b, w| to_signed(a, w) >= to_signed(b, w))?,

            T::And(terms) => {
                let mut acc = true;
                for t in terms {
                    acc &= self.eval_bool(t)?;
                }
                V::Bool(acc)
            }
            T::Or(terms) => {
                let mut acc = false;
                for t in terms {
                    acc |= self.eval_bool(t)?;
                }
                V::Bool(acc)
            }
            T::Not(inner) => V::Bool(!self.eval_bool(inner)?),
            T::Implies(l, r) => V::Bool(!self.eval_bool(l)? || self.eval_bool(r)?),
            T::Xor(l, r) => V::Bool(self.eval_bool(l)? ^ self.eval_bool(r)?),

            T::Ite(cond, then, els) => {
                if self.eval_bool(cond)? {
                    self.eval(then)?
                } else {
                    self.eval(els)?
                }
            }
        })
    }

    fn arith(
        &self,
        l: &SmtTerm,
        r: &SmtTerm,
        int_op: fn(i64, i64) -> Option<i64>,
        real_op: fn(BigRational, BigRational) -> Option<BigRational>,
    ) -> Option<ModelValue> {
        match (self.eval(l)?, self.eval(r)?) {
            (ModelValue::Int(a), ModelValue::Int(b)) => Some(ModelValue::Int(int_op(a, b)?)),
            (ModelValue::Real(a), ModelValue::Real(b)) => Some(ModelValue::Real(real_op(a, b)?)),
            _ => None,
        }
    }

    fn bv_arith(
        &self,
        l: &SmtTerm,
        r: &SmtTerm,
        op: fn(u64, u64, u32) -> Option<u64>,
    ) -> Option<ModelValue> {
        match (self.eval(l)?, self.eval(r)?) {
            (ModelValue::Bv { value: a, width: wa }, ModelValue::Bv { value: b, width: wb })
                if wa == wb =>
            {
                Some(ModelValue::Bv {
                    value: op(a, b, wa)?,
                    width: wa,
                })
            }
            _ => None,
        }
    }

    fn compare(
        &self,
        l: &SmtTerm,
        r: &SmtTerm,
        pick: fn(std::cmp::Ordering) -> bool,
    ) -> Option<ModelValue> {
        let ordering = match (self.eval(l)?, self.eval(r)?) {
            (ModelValue::Int(a), ModelValue::Int(b)) => a.cmp(&b),
            (ModelValue::Real(a), ModelValue::Real(b)) => a.cmp(&b),
            _ => return None,
        };
        Some(ModelValue::Bool(pick(ordering)))
    }

    fn bv_compare(
        &self,
        l: &SmtTerm,
        r: &SmtTerm,
        op: fn(u64, u64, u32) -> bool,
    ) -> Option<ModelValue> {
        match (self.eval(l)?, self.eval(r)?) {
            (ModelValue::Bv { value: a, width: wa }, ModelValue::Bv { value: b, width: wb })
                if wa == wb =>
            {
                Some(ModelValue::Bool(op(a, b, wa)))
            }
            _ => None,
        }
    }
}

pub(crate) fn rational(num: i64, den: u64) -> Option<BigRational> {
    if den == 0 {
        return None;
    }
    Some(BigRational::new(BigInt::from(num), BigInt::from(den)))
}
