/// Abstract SMT term representation, solver-agnostic.
///
/// Terms span four theories: booleans, unbounded integers, reals, and
/// fixed-width bit-vectors. The tree carries no sort annotations beyond
/// what the constructors imply; backends reject ill-sorted trees when
/// translating.
#[derive(Debug, Clone, PartialEq)]
pub enum SmtTerm {
    /// Variable reference by name.
    Var(String),
    /// Integer literal.
    IntLit(i64),
    /// Boolean literal.
    BoolLit(bool),
    /// Exact rational literal (numerator, denominator). Denominator must
    /// be non-zero.
    RealLit(i64, u64),
    /// Bit-vector literal. `value` is truncated to `width` bits.
    BvLit { value: u64, width: u32 },

    // Integer / real arithmetic
    Add(Box<SmtTerm>, Box<SmtTerm>),
    Sub(Box<SmtTerm>, Box<SmtTerm>),
    Mul(Box<SmtTerm>, Box<SmtTerm>),
    /// Euclidean integer division (SMT-LIB `div`).
    Div(Box<SmtTerm>, Box<SmtTerm>),
    /// Euclidean remainder (SMT-LIB `mod`).
    Mod(Box<SmtTerm>, Box<SmtTerm>),
    /// Real division (SMT-LIB `/`).
    RealDiv(Box<SmtTerm>, Box<SmtTerm>),

    // Bit-vector arithmetic (width-preserving, wrap-around)
    BvAdd(Box<SmtTerm>, Box<SmtTerm>),
    BvSub(Box<SmtTerm>, Box<SmtTerm>),
    BvMul(Box<SmtTerm>, Box<SmtTerm>),
    BvUDiv(Box<SmtTerm>, Box<SmtTerm>),
    BvSDiv(Box<SmtTerm>, Box<SmtTerm>),

    // Bit-vector structure
    BvZeroExtend(u32, Box<SmtTerm>),
    BvSignExtend(u32, Box<SmtTerm>),
    /// Bits `hi` down to `lo`, inclusive.
    BvExtract(u32, u32, Box<SmtTerm>),

    // Comparison
    Eq(Box<SmtTerm>, Box<SmtTerm>),
    Lt(Box<SmtTerm>, Box<SmtTerm>),
    Le(Box<SmtTerm>, Box<SmtTerm>),
    Gt(Box<SmtTerm>, Box<SmtTerm>),
    Ge(Box<SmtTerm>, Box<SmtTerm>),
    BvUlt(Box<SmtTerm>, Box<SmtTerm>),
    BvUle(Box<SmtTerm>, Box<SmtTerm>),
    BvUgt(Box<SmtTerm>, Box<SmtTerm>),
    BvUge(Box<SmtTerm>, Box<SmtTerm>),
    BvSlt(Box<SmtTerm>, Box<SmtTerm>),
    BvSle(Box<SmtTerm>, Box<SmtTerm>),
    BvSgt(Box<SmtTerm>, Box<SmtTerm>),
    BvSge(Box<SmtTerm>, Box<SmtTerm>),

    // Boolean logic
    And(Vec<SmtTerm>),
    Or(Vec<SmtTerm>),
    Not(Box<SmtTerm>),
    Implies(Box<SmtTerm>, Box<SmtTerm>),
    Xor(Box<SmtTerm>, Box<SmtTerm>),

    // If-then-else
    Ite(Box<SmtTerm>, Box<SmtTerm>, Box<SmtTerm>),
}

#[allow(clippy::should_implement_trait)]
impl SmtTerm {
    pub fn var(name: impl Into<String>) -> Self {
        SmtTerm::Var(name.into())
    }

    pub fn int(n: i64) -> Self {
        SmtTerm::IntLit(n)
    }

    pub fn bool(b: bool) -> Self {
        SmtTerm::BoolLit(b)
    }

    /// Integer-valued real literal.
    pub fn real(n: i64) -> Self {
        SmtTerm::RealLit(n, 1)
    }

    pub fn bv(value: u64, width: u32) -> Self {
        SmtTerm::BvLit { value, width }
    }

    pub fn add(self, other: SmtTerm) -> Self {
        SmtTerm::Add(Box::new(self), Box::new(other))
    }

    pub fn sub(self, other: SmtTerm) -> Self {
        SmtTerm::Sub(Box::new(self), Box::new(other))
    }

    pub fn mul(self, other: SmtTerm) -> Self {
        SmtTerm::Mul(Box::new(self), Box::new(other))
    }

    pub fn div(self, other: SmtTerm) -> Self {
        SmtTerm::Div(Box::new(self), Box::new(other))
    }

    pub fn modulo(self, other: SmtTerm) -> Self {
        SmtTerm::Mod(Box::new(self), Box::new(other))
    }

    pub fn real_div(self, other: SmtTerm) -> Self {
        SmtTerm::RealDiv(Box::new(self), Box::new(other))
    }

    pub fn bv_add(self, other: SmtTerm) -> Self {
        SmtTerm::BvAdd(Box::new(self), Box::new(other))
    }

    pub fn bv_sub(self, other: SmtTerm) -> Self {
        SmtTerm::BvSub(Box::new(self), Box::new(other))
    }

    pub fn bv_mul(self, other: SmtTerm) -> Self {
        SmtTerm::BvMul(Box::new(self), Box::new(other))
    }

    pub fn bv_udiv(self, other: SmtTerm) -> Self {
        SmtTerm::BvUDiv(Box::new(self), Box::new(other))
    }

    pub fn bv_sdiv(self, other: SmtTerm) -> Self {
        SmtTerm::BvSDiv(Box::new(self), Box::new(other))
    }

    pub fn zero_extend(self, extra: u32) -> Self {
        SmtTerm::BvZeroExtend(extra, Box::new(self))
    }

    pub fn sign_extend(self, extra: u32) -> Self {
        SmtTerm::BvSignExtend(extra, Box::new(self))
    }

    pub fn extract(self, hi: u32, lo: u32) -> Self {
        SmtTerm::BvExtract(hi, lo, Box::new(self))
    }

    pub fn eq(self, other: SmtTerm) -> Self {
        SmtTerm::Eq(Box::new(self), Box::new(other))
    }

    pub fn ne(self, other: SmtTerm) -> Self {
        self.eq(other).not()
    }

    pub fn lt(self, other: SmtTerm) -> Self {
        SmtTerm::Lt(Box::new(self), Box::new(other))
    }

    pub fn le(self, other: SmtTerm) -> Self {
        SmtTerm::Le(Box::new(self), Box::new(other))
    }

    pub fn gt(self, other: SmtTerm) -> Self {
        SmtTerm::Gt(Box::new(self), Box::new(other))
    }

    pub fn ge(self, other: SmtTerm) -> Self {
        SmtTerm::Ge(Box::new(self), Box::new(other))
    }

    pub fn bv_ult(self, other: SmtTerm) -> Self {
        SmtTerm::BvUlt(Box::new(self), Box::new(other))
    }

    pub fn bv_ule(self, other: SmtTerm) -> Self {
        SmtTerm::BvUle(Box::new(self), Box::new(other))
    }

    pub fn bv_ugt(self, other: SmtTerm) -> Self {
        SmtTerm::BvUgt(Box::new(self), Box::new(other))
    }

    pub fn bv_uge(self, other: SmtTerm) -> Self {
        SmtTerm::BvUge(Box::new(self), Box::new(other))
    }

    pub fn bv_slt(self, other: SmtTerm) -> Self {
        SmtTerm::BvSlt(Box::new(self), Box::new(other))
    }

    pub fn bv_sle(self, other: SmtTerm) -> Self {
        SmtTerm::BvSle(Box::new(self), Box::new(other))
    }

    pub fn bv_sgt(self, other: SmtTerm) -> Self {
        SmtTerm::BvSgt(Box::new(self), Box::new(other))
    }

    pub fn bv_sge(self, other: SmtTerm) -> Self {
        SmtTerm::BvSge(Box::new(self), Box::new(other))
    }

    pub fn and(terms: Vec<SmtTerm>) -> Self {
        SmtTerm::And(terms)
    }

    pub fn or(terms: Vec<SmtTerm>) -> Self {
        SmtTerm::Or(terms)
    }

    pub fn not(self) -> Self {
        SmtTerm::Not(Box::new(self))
    }

    pub fn implies(self, other: SmtTerm) -> Self {
        SmtTerm::Implies(Box::new(self), Box::new(other))
    }

    pub fn xor(self, other: SmtTerm) -> Self {
        SmtTerm::Xor(Box::new(self), Box::new(other))
    }
}
