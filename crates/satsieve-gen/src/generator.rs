//! Random well-typed formula generation over typed operand pools.
//!
//! A generator instance owns one pool per theory, seeded from the
//! caller's variables and a handful of random literals. Generation is a
//! single pass: comparisons seed the boolean pool, a fixed number of
//! expansion rounds grow all pools, and clause assembly draws the final
//! conjunction. Pools only ever grow and die with the instance.

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::debug;

use satsieve_smt::backends::smtlib_printer::script_to_smtlib;
use satsieve_smt::sorts::SmtSort;
use satsieve_smt::terms::SmtTerm;

use crate::guards;

#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Interpret bit-vector comparisons and division as signed.
    pub bv_signed: bool,
    /// Capture no-overflow side-conditions for bit-vector arithmetic.
    pub bv_no_overflow: bool,
    /// Capture no-underflow side-conditions for bit-vector arithmetic.
    pub bv_no_underflow: bool,
    /// Fixed RNG seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            bv_signed: true,
            bv_no_overflow: false,
            bv_no_underflow: false,
            seed: None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("seed variables must include at least one Int, Real, or BitVec variable")]
    NoTypedSeedVariables,
    #[error("bit-vector seed variables must share one width")]
    MixedBitVectorWidths,
    #[error("bit-vector width {width} is unsupported (must be 1..={max})")]
    UnsupportedBitVectorWidth { width: u32, max: u32 },
}

/// Builds one random conjunction of clauses over the theories its seed
/// variables span. Theories without a seed variable stay inactive and
/// contribute nothing to the output.
#[derive(Debug)]
pub struct FormulaGenerator {
    config: GeneratorConfig,
    rng: StdRng,
    decls: Vec<(String, SmtSort)>,
    bools: Vec<SmtTerm>,
    ints: Vec<SmtTerm>,
    reals: Vec<SmtTerm>,
    bvs: Vec<SmtTerm>,
    hard_bools: Vec<SmtTerm>,
    use_int: bool,
    use_real: bool,
    use_bv: bool,
    bv_width: u32,
}

impl FormulaGenerator {
    /// Partition `seed_vars` into per-theory pools and widen each
    /// active pool with random literals.
    ///
    /// Fails when no seed variable belongs to a comparison-capable
    /// theory, when bit-vector seeds mix widths, or when the shared
    /// width is zero or too wide (above 64 bits, or above 32 when the
    /// overflow/underflow guards are enabled).
    pub fn new(
        seed_vars: &[(String, SmtSort)],
        config: GeneratorConfig,
    ) -> Result<Self, GeneratorError> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut generator = Self {
            config,
            rng,
            decls: seed_vars.to_vec(),
            bools: Vec::new(),
            ints: Vec::new(),
            reals: Vec::new(),
            bvs: Vec::new(),
            hard_bools: Vec::new(),
            use_int: false,
            use_real: false,
            use_bv: false,
            bv_width: 0,
        };

        for (name, sort) in seed_vars {
            let var = SmtTerm::var(name);
            match sort {
                SmtSort::Bool => generator.bools.push(var),
                SmtSort::Int => generator.ints.push(var),
                SmtSort::Real => generator.reals.push(var),
                SmtSort::BitVec(width) => {
                    if generator.bvs.is_empty() {
                        generator.bv_width = *width;
                    } else if generator.bv_width != *width {
                        return Err(GeneratorError::MixedBitVectorWidths);
                    }
                    generator.bvs.push(var);
                }
            }
        }

        if generator.ints.is_empty() && generator.reals.is_empty() && generator.bvs.is_empty() {
            return Err(GeneratorError::NoTypedSeedVariables);
        }

        if !generator.bvs.is_empty() {
            // Literals and model values are 64-bit; the multiplication
            // guards additionally compute a double-width product.
            let guards_enabled =
                generator.config.bv_no_overflow || generator.config.bv_no_underflow;
            let max = if guards_enabled { 32 } else { 64 };
            if generator.bv_width == 0 || generator.bv_width > max {
                return Err(GeneratorError::UnsupportedBitVectorWidth {
                    width: generator.bv_width,
                    max,
                });
            }
        }

        // Widen each active pool with a few literal constants so the
        // composition steps have more operands to draw from.
        if !generator.ints.is_empty() {
            generator.use_int = true;
            for _ in 0..generator.rng.gen_range(3..=6) {
                let n = generator.rng.gen_range(-100..=100);
                generator.ints.push(SmtTerm::int(n));
            }
        }
        if !generator.reals.is_empty() {
            generator.use_real = true;
            for _ in 0..generator.rng.gen_range(3..=6) {
                let n = generator.rng.gen_range(-100..=100);
                generator.reals.push(SmtTerm::real(n));
            }
        }
        if !generator.bvs.is_empty() {
            generator.use_bv = true;
            let hi = 100u64.min(mask(generator.bv_width));
            for _ in 0..generator.rng.gen_range(3..=6) {
                let value = generator.rng.gen_range(1..=hi);
                generator.bvs.push(SmtTerm::bv(value, generator.bv_width));
            }
        }

        Ok(generator)
    }

    /// The seed variables and their sorts, for declaring a session or
    /// rendering a script around generated terms.
    pub fn declarations(&self) -> &[(String, SmtSort)] {
        &self.decls
    }

    /// Generate one random boolean formula.
    pub fn generate(&mut self) -> SmtTerm {
        let seeding_rounds = self.rng.gen_range(3..=8);
        for _ in 0..seeding_rounds {
            if self.use_int {
                self.bool_from_int();
            }
            if self.use_real {
                self.bool_from_real();
            }
            if self.use_bv {
                self.bool_from_bv();
            }
        }

        for _ in 0..8 {
            if self.rng.gen_bool(0.33) {
                if self.use_int {
                    self.int_from_int();
                }
                if self.use_real {
                    self.real_from_real();
                }
                if self.use_bv {
                    self.bv_from_bv();
                }
            }
            if self.rng.gen_bool(0.33) {
                if self.use_int {
                    self.bool_from_int();
                }
                if self.use_real {
                    self.bool_from_real();
                }
                if self.use_bv {
                    self.bool_from_bv();
                }
            }
            if self.rng.gen_bool(0.33) {
                self.bool_from_bool();
            }
        }

        debug_assert!(!self.bools.is_empty(), "seeding always derives comparisons");

        let clause_count = self.rng.gen_range(5..=30);
        let mut clauses = Vec::with_capacity(clause_count);
        for _ in 0..clause_count {
            let width = self.rng.gen_range(1..=8).min(self.bools.len());
            if width == 1 {
                let pick = self.rng.gen_range(0..self.bools.len());
                clauses.push(self.bools[pick].clone());
            } else {
                let picked = index::sample(&mut self.rng, self.bools.len(), width);
                clauses.push(SmtTerm::or(
                    picked.iter().map(|i| self.bools[i].clone()).collect(),
                ));
            }
        }
        if self.hard_bools.len() > 1 {
            clauses.extend(self.hard_bools.iter().cloned());
        }
        debug!(
            clauses = clauses.len(),
            hard_conditions = self.hard_bools.len(),
            booleans = self.bools.len(),
            "assembled formula"
        );

        if clauses.len() == 1 {
            clauses.swap_remove(0)
        } else {
            SmtTerm::and(clauses)
        }
    }

    /// Generate one formula and render it as a complete SMT-LIB2 script
    /// holding exactly that assertion.
    pub fn generate_script(&mut self) -> String {
        let formula = self.generate();
        script_to_smtlib(&self.decls, &[formula])
    }

    /// Draw up to `count` distinct entries from the boolean pool, e.g.
    /// as classification candidates. Call after [`generate`] so the
    /// pool is populated.
    ///
    /// [`generate`]: FormulaGenerator::generate
    pub fn sample_predicates(&mut self, count: usize) -> Vec<SmtTerm> {
        let take = count.min(self.bools.len());
        if take == 0 {
            return Vec::new();
        }
        index::sample(&mut self.rng, self.bools.len(), take)
            .iter()
            .map(|i| self.bools[i].clone())
            .collect()
    }

    fn int_from_int(&mut self) {
        if self.ints.len() < 2 {
            return;
        }
        let (a, b) = sample_pair(&mut self.rng, &self.ints);
        let derived = match self.rng.gen_range(0..5) {
            0 => a.add(b),
            1 => a.sub(b),
            2 => a.mul(b),
            3 => a.div(b),
            _ => a.modulo(b),
        };
        self.ints.push(derived);
    }

    fn real_from_real(&mut self) {
        if self.reals.len() < 2 {
            return;
        }
        let (a, b) = sample_pair(&mut self.rng, &self.reals);
        let derived = match self.rng.gen_range(0..4) {
            0 => a.add(b),
            1 => a.sub(b),
            2 => a.mul(b),
            _ => a.real_div(b),
        };
        self.reals.push(derived);
    }

    fn bv_from_bv(&mut self) {
        if self.bvs.len() < 2 {
            return;
        }
        let (a, b) = sample_pair(&mut self.rng, &self.bvs);
        let width = self.bv_width;
        let signed = self.config.bv_signed;
        match self.rng.gen_range(0..4) {
            0 => {
                self.bvs.push(a.clone().bv_add(b.clone()));
                if self.config.bv_no_overflow {
                    self.hard_bools
                        .push(guards::add_no_overflow(&a, &b, width, signed));
                }
                if self.config.bv_no_underflow && signed {
                    self.hard_bools.push(guards::add_no_underflow(&a, &b, width));
                }
            }
            1 => {
                self.bvs.push(a.clone().bv_sub(b.clone()));
                if self.config.bv_no_overflow && signed {
                    self.hard_bools.push(guards::sub_no_overflow(&a, &b, width));
                }
                if self.config.bv_no_underflow {
                    self.hard_bools
                        .push(guards::sub_no_underflow(&a, &b, width, signed));
                }
            }
            2 => {
                self.bvs.push(a.clone().bv_mul(b.clone()));
                if self.config.bv_no_overflow {
                    self.hard_bools
                        .push(guards::mul_no_overflow(&a, &b, width, signed));
                }
                if self.config.bv_no_underflow && signed {
                    self.hard_bools.push(guards::mul_no_underflow(&a, &b, width));
                }
            }
            _ => {
                if signed {
                    self.bvs.push(a.clone().bv_sdiv(b.clone()));
                    if self.config.bv_no_overflow {
                        self.hard_bools.push(guards::sdiv_no_overflow(&a, &b, width));
                    }
                } else {
                    self.bvs.push(a.bv_udiv(b));
                }
            }
        }
    }

    fn bool_from_int(&mut self) {
        if self.ints.len() < 2 {
            return;
        }
        let (a, b) = sample_pair(&mut self.rng, &self.ints);
        let comparison = match self.rng.gen_range(0..6) {
            0 => a.lt(b),
            1 => a.le(b),
            2 => a.eq(b),
            3 => a.gt(b),
            4 => a.ge(b),
            _ => a.ne(b),
        };
        self.bools.push(comparison);
    }

    fn bool_from_real(&mut self) {
        if self.reals.len() < 2 {
            return;
        }
        let (a, b) = sample_pair(&mut self.rng, &self.reals);
        let comparison = match self.rng.gen_range(0..6) {
            0 => a.lt(b),
            1 => a.le(b),
            2 => a.eq(b),
            3 => a.gt(b),
            4 => a.ge(b),
            _ => a.ne(b),
        };
        self.bools.push(comparison);
    }

    fn bool_from_bv(&mut self) {
        if self.bvs.len() < 2 {
            return;
        }
        let (a, b) = sample_pair(&mut self.rng, &self.bvs);
        let signed = self.config.bv_signed;
        let comparison = match self.rng.gen_range(0..6) {
            0 if signed => a.bv_slt(b),
            0 => a.bv_ult(b),
            1 if signed => a.bv_sle(b),
            1 => a.bv_ule(b),
            2 => a.eq(b),
            3 if signed => a.bv_sgt(b),
            3 => a.bv_ugt(b),
            4 if signed => a.bv_sge(b),
            4 => a.bv_uge(b),
            _ => a.ne(b),
        };
        self.bools.push(comparison);
    }

    fn bool_from_bool(&mut self) {
        if self.bools.len() < 2 {
            return;
        }
        if self.rng.gen_bool(0.22) {
            let pick = self.rng.gen_range(0..self.bools.len());
            let negated = self.bools[pick].clone().not();
            self.bools.push(negated);
            return;
        }
        let (a, b) = sample_pair(&mut self.rng, &self.bools);
        let combined = match self.rng.gen_range(0..4) {
            0 => SmtTerm::and(vec![a, b]),
            1 => SmtTerm::or(vec![a, b]),
            2 => a.xor(b),
            _ => a.implies(b),
        };
        self.bools.push(combined);
    }
}

fn sample_pair(rng: &mut StdRng, pool: &[SmtTerm]) -> (SmtTerm, SmtTerm) {
    let picked = index::sample(rng, pool.len(), 2);
    (pool[picked.index(0)].clone(), pool[picked.index(1)].clone())
}

fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_seeds() -> Vec<(String, SmtSort)> {
        vec![
            ("a".to_string(), SmtSort::Int),
            ("b".to_string(), SmtSort::Int),
        ]
    }

    fn seeded(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            seed: Some(seed),
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn rejects_seed_lists_without_typed_variables() {
        let err = FormulaGenerator::new(&[], GeneratorConfig::default()).unwrap_err();
        assert_eq!(err, GeneratorError::NoTypedSeedVariables);

        let bool_only = vec![("p".to_string(), SmtSort::Bool)];
        let err = FormulaGenerator::new(&bool_only, GeneratorConfig::default()).unwrap_err();
        assert_eq!(err, GeneratorError::NoTypedSeedVariables);
    }

    #[test]
    fn rejects_mixed_bitvector_widths() {
        let seeds = vec![
            ("v".to_string(), SmtSort::BitVec(8)),
            ("w".to_string(), SmtSort::BitVec(16)),
        ];
        let err = FormulaGenerator::new(&seeds, GeneratorConfig::default()).unwrap_err();
        assert_eq!(err, GeneratorError::MixedBitVectorWidths);
    }

    #[test]
    fn rejects_zero_width_bitvectors() {
        let seeds = vec![("v".to_string(), SmtSort::BitVec(0))];
        let err = FormulaGenerator::new(&seeds, GeneratorConfig::default()).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::UnsupportedBitVectorWidth { width: 0, max: 64 }
        );
    }

    #[test]
    fn guard_flags_cap_the_bitvector_width_at_32() {
        let seeds = |width| vec![("v".to_string(), SmtSort::BitVec(width))];
        let guarded = GeneratorConfig {
            bv_no_overflow: true,
            seed: Some(1),
            ..GeneratorConfig::default()
        };

        // 64-bit vectors are fine without guards, and 32-bit with them.
        assert!(FormulaGenerator::new(&seeds(64), seeded(1)).is_ok());
        assert!(FormulaGenerator::new(&seeds(32), guarded.clone()).is_ok());

        for width in [33, 64] {
            let err = FormulaGenerator::new(&seeds(width), guarded.clone()).unwrap_err();
            assert_eq!(
                err,
                GeneratorError::UnsupportedBitVectorWidth { width, max: 32 }
            );
        }

        let underflow_only = GeneratorConfig {
            bv_no_underflow: true,
            seed: Some(1),
            ..GeneratorConfig::default()
        };
        let err = FormulaGenerator::new(&seeds(64), underflow_only).unwrap_err();
        assert_eq!(
            err,
            GeneratorError::UnsupportedBitVectorWidth { width: 64, max: 32 }
        );
    }

    #[test]
    fn fixed_seed_makes_generation_deterministic() {
        let first = FormulaGenerator::new(&int_seeds(), seeded(7))
            .unwrap()
            .generate();
        let second = FormulaGenerator::new(&int_seeds(), seeded(7))
            .unwrap()
            .generate();
        assert_eq!(first, second);

        let different = FormulaGenerator::new(&int_seeds(), seeded(8))
            .unwrap()
            .generate();
        assert_ne!(first, different);
    }

    #[test]
    fn top_level_is_a_conjunction_of_drawn_clauses() {
        for seed in 0..16 {
            let mut generator = FormulaGenerator::new(&int_seeds(), seeded(seed)).unwrap();
            match generator.generate() {
                SmtTerm::And(clauses) => {
                    // 5 to 30 clauses; integer seeds produce no hard
                    // side-conditions.
                    assert!((5..=30).contains(&clauses.len()), "got {}", clauses.len());
                }
                other => panic!("expected a conjunction, got {other:?}"),
            }
        }
    }

    #[test]
    fn declarations_keep_every_seed_variable() {
        let seeds = vec![
            ("p".to_string(), SmtSort::Bool),
            ("a".to_string(), SmtSort::Int),
        ];
        let generator = FormulaGenerator::new(&seeds, seeded(1)).unwrap();
        assert_eq!(generator.declarations(), seeds.as_slice());
    }

    #[test]
    fn sample_predicates_draws_from_the_boolean_pool() {
        let mut generator = FormulaGenerator::new(&int_seeds(), seeded(3)).unwrap();
        generator.generate();
        let predicates = generator.sample_predicates(4);
        assert_eq!(predicates.len(), 4);

        // Requests beyond the pool clamp instead of failing.
        let all = generator.sample_predicates(usize::MAX);
        assert!(all.len() >= 4);
    }

    #[test]
    fn inactive_theories_leave_no_trace_in_scripts() {
        for seed in 0..8 {
            let mut generator = FormulaGenerator::new(&int_seeds(), seeded(seed)).unwrap();
            let script = generator.generate_script();
            assert!(script.starts_with("(set-logic QF_NIA)"));
            assert!(!script.contains("Real"));
            assert!(!script.contains("BitVec"));
            assert!(script.ends_with("(check-sat)\n"));
        }
    }
}
