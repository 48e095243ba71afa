use crate::sorts::SmtSort;
use crate::terms::SmtTerm;

/// Print an SmtTerm as SMT-LIB2 format.
pub fn to_smtlib(term: &SmtTerm) -> String {
    match term {
        SmtTerm::Var(name) => name.clone(),
        SmtTerm::IntLit(n) => {
            if *n < 0 {
                format!("(- {})", n.unsigned_abs())
            } else {
                n.to_string()
            }
        }
        SmtTerm::BoolLit(b) => {
            if *b {
                "true".to_string()
            } else {
                "false".to_string()
            }
        }
        SmtTerm::RealLit(num, den) => {
            let magnitude = if *den == 1 {
                format!("{}.0", num.unsigned_abs())
            } else {
                format!("(/ {}.0 {den}.0)", num.unsigned_abs())
            };
            if *num < 0 {
                format!("(- {magnitude})")
            } else {
                magnitude
            }
        }
        SmtTerm::BvLit { value, width } => format!("(_ bv{value} {width})"),

        SmtTerm::Add(lhs, rhs) => format!("(+ {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::Sub(lhs, rhs) => format!("(- {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::Mul(lhs, rhs) => format!("(* {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::Div(lhs, rhs) => format!("(div {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::Mod(lhs, rhs) => format!("(mod {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::RealDiv(lhs, rhs) => format!("(/ {} {})", to_smtlib(lhs), to_smtlib(rhs)),

        SmtTerm::BvAdd(lhs, rhs) => format!("(bvadd {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::BvSub(lhs, rhs) => format!("(bvsub {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::BvMul(lhs, rhs) => format!("(bvmul {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::BvUDiv(lhs, rhs) => format!("(bvudiv {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::BvSDiv(lhs, rhs) => format!("(bvsdiv {} {})", to_smtlib(lhs), to_smtlib(rhs)),

        SmtTerm::BvZeroExtend(extra, inner) => {
            format!("((_ zero_extend {extra}) {})", to_smtlib(inner))
        }
        SmtTerm::BvSignExtend(extra, inner) => {
            format!("((_ sign_extend {extra}) {})", to_smtlib(inner))
        }
        SmtTerm::BvExtract(hi, lo, inner) => {
            format!("((_ extract {hi} {lo}) {})", to_smtlib(inner))
        }

        SmtTerm::Eq(lhs, rhs) => format!("(= {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::Lt(lhs, rhs) => format!("(< {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::Le(lhs, rhs) => format!("(<= {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::Gt(lhs, rhs) => format!("(> {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::Ge(lhs, rhs) => format!("(>= {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::BvUlt(lhs, rhs) => format!("(bvult {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::BvUle(lhs, rhs) => format!("(bvule {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::BvUgt(lhs, rhs) => format!("(bvugt {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::BvUge(lhs, rhs) => format!("(bvuge {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::BvSlt(lhs, rhs) => format!("(bvslt {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::BvSle(lhs, rhs) => format!("(bvsle {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::BvSgt(lhs, rhs) => format!("(bvsgt {} {})", to_smtlib(lhs), to_smtlib(rhs)),
        SmtTerm::BvSge(lhs, rhs) => format!("(bvsge {} {})", to_smtlib(lhs), to_smtlib(rhs)),

        SmtTerm::And(terms) => {
            if terms.is_empty() {
                "true".to_string()
            } else if terms.len() == 1 {
                to_smtlib(&terms[0])
            } else {
                let inner: Vec<String> = terms.iter().map(to_smtlib).collect();
                format!("(and {})", inner.join(" "))
            }
        }
        SmtTerm::Or(terms) => {
            if terms.is_empty() {
                "false".to_string()
            } else if terms.len() == 1 {
                to_smtlib(&terms[0])
            } else {
                let inner: Vec<String> = terms.iter().map(to_smtlib).collect();
                format!("(or {})", inner.join(" "))
            }
        }
        SmtTerm::Not(inner) => format!("(not {})", to_smtlib(inner)),
        SmtTerm::Implies(lhs, rhs) => {
            format!("(=> {} {})", to_smtlib(lhs), to_smtlib(rhs))
        }
        SmtTerm::Xor(lhs, rhs) => format!("(xor {} {})", to_smtlib(lhs), to_smtlib(rhs)),

        SmtTerm::Ite(cond, then, els) => {
            format!(
                "(ite {} {} {})",
                to_smtlib(cond),
                to_smtlib(then),
                to_smtlib(els)
            )
        }
    }
}

/// Print a sort as SMT-LIB2 format.
pub fn sort_to_smtlib(sort: &SmtSort) -> String {
    sort.to_string()
}

/// Pick a logic string covering the given declarations.
///
/// Multiplication of variables is reachable in every generated formula,
/// so the arithmetic logics are the nonlinear ones.
pub fn logic_for(decls: &[(String, SmtSort)]) -> &'static str {
    let mut ints = false;
    let mut reals = false;
    let mut bvs = false;
    for (_, sort) in decls {
        match sort {
            SmtSort::Int => ints = true,
            SmtSort::Real => reals = true,
            SmtSort::BitVec(_) => bvs = true,
            SmtSort::Bool => {}
        }
    }
    match (ints, reals, bvs) {
        (true, false, false) => "QF_NIA",
        (false, true, false) => "QF_NRA",
        (false, false, true) => "QF_BV",
        (false, false, false) => "QF_UF",
        _ => "ALL",
    }
}

/// Render a complete SMT-LIB2 script: logic, declarations, assertions,
/// and a final `(check-sat)`.
pub fn script_to_smtlib(decls: &[(String, SmtSort)], assertions: &[SmtTerm]) -> String {
    let mut out = String::new();
    out.push_str(&format!("(set-logic {})\n", logic_for(decls)));
    for (name, sort) in decls {
        out.push_str(&format!("(declare-const {name} {})\n", sort_to_smtlib(sort)));
    }
    for assertion in assertions {
        out.push_str(&format!("(assert {})\n", to_smtlib(assertion)));
    }
    out.push_str("(check-sat)\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn print_simple_term() {
        let term = SmtTerm::var("x").add(SmtTerm::int(1)).ge(SmtTerm::int(0));
        assert_eq!(to_smtlib(&term), "(>= (+ x 1) 0)");
    }

    #[test]
    fn print_and_term() {
        let term = SmtTerm::and(vec![
            SmtTerm::var("a").gt(SmtTerm::int(0)),
            SmtTerm::var("b").lt(SmtTerm::int(10)),
        ]);
        assert_eq!(to_smtlib(&term), "(and (> a 0) (< b 10))");
    }

    #[test]
    fn print_negative_literals() {
        assert_eq!(to_smtlib(&SmtTerm::int(-3)), "(- 3)");
        assert_eq!(to_smtlib(&SmtTerm::real(-3)), "(- 3.0)");
        assert_eq!(to_smtlib(&SmtTerm::RealLit(-1, 2)), "(- (/ 1.0 2.0))");
        assert_eq!(to_smtlib(&SmtTerm::real(2)), "2.0");
    }

    #[test]
    fn print_bv_terms() {
        let term = SmtTerm::bv(5, 8).bv_add(SmtTerm::var("x"));
        assert_eq!(to_smtlib(&term), "(bvadd (_ bv5 8) x)");
        let cmp = SmtTerm::var("x").bv_slt(SmtTerm::bv(0, 8));
        assert_eq!(to_smtlib(&cmp), "(bvslt x (_ bv0 8))");
        let structure = SmtTerm::var("x").zero_extend(1).extract(8, 8);
        assert_eq!(
            to_smtlib(&structure),
            "((_ extract 8 8) ((_ zero_extend 1) x))"
        );
    }

    #[test]
    fn print_euclidean_and_real_division() {
        assert_eq!(
            to_smtlib(&SmtTerm::var("x").div(SmtTerm::int(2))),
            "(div x 2)"
        );
        assert_eq!(
            to_smtlib(&SmtTerm::var("x").modulo(SmtTerm::int(2))),
            "(mod x 2)"
        );
        assert_eq!(
            to_smtlib(&SmtTerm::var("r").real_div(SmtTerm::real(2))),
            "(/ r 2.0)"
        );
    }

    #[test]
    fn print_xor_and_implies() {
        let term = SmtTerm::var("a").xor(SmtTerm::var("b").implies(SmtTerm::var("c")));
        assert_eq!(to_smtlib(&term), "(xor a (=> b c))");
    }

    #[test]
    fn singleton_connectives_unwrap() {
        assert_eq!(to_smtlib(&SmtTerm::or(vec![SmtTerm::var("p")])), "p");
        assert_eq!(to_smtlib(&SmtTerm::and(vec![])), "true");
        assert_eq!(to_smtlib(&SmtTerm::or(vec![])), "false");
    }

    #[test]
    fn logic_selection_per_theory() {
        let int_decls = vec![("x".to_string(), SmtSort::Int)];
        let bv_decls = vec![("x".to_string(), SmtSort::BitVec(32))];
        let mixed = vec![
            ("x".to_string(), SmtSort::Int),
            ("r".to_string(), SmtSort::Real),
        ];
        assert_eq!(logic_for(&int_decls), "QF_NIA");
        assert_eq!(logic_for(&bv_decls), "QF_BV");
        assert_eq!(logic_for(&mixed), "ALL");
    }

    #[test]
    fn script_contains_declarations_and_check_sat() {
        let decls = vec![
            ("x".to_string(), SmtSort::Int),
            ("y".to_string(), SmtSort::Int),
        ];
        let assertions = vec![SmtTerm::var("x").gt(SmtTerm::var("y"))];
        let script = script_to_smtlib(&decls, &assertions);
        assert!(script.starts_with("(set-logic QF_NIA)\n"));
        assert!(script.contains("(declare-const x Int)"));
        assert!(script.contains("(declare-const y Int)"));
        assert!(script.contains("(assert (> x y))"));
        assert!(script.ends_with("(check-sat)\n"));
    }
}
