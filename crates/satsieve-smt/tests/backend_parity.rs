//! Backend parity tests: the cvc5 subprocess backend (and, when
//! compiled in, Z3) must produce the same SAT/UNSAT verdicts on a set
//! of small formulas.
//!
//! cvc5 tests are gated behind `#[ignore]` so they can be skipped when
//! the binary is not installed. Run with `cargo test -- --ignored` to
//! include them.

use satsieve_smt::backends::cvc5_backend::Cvc5Solver;
use satsieve_smt::solver::{SatResult, SmtSolver};
use satsieve_smt::sorts::SmtSort;
use satsieve_smt::terms::SmtTerm;

fn cvc5_available() -> bool {
    Cvc5Solver::new().is_ok()
}

fn cvc5_check(setup: impl FnOnce(&mut Cvc5Solver)) -> SatResult {
    let mut solver = Cvc5Solver::new().expect("cvc5 should be available");
    setup(&mut solver);
    solver.check_sat().unwrap()
}

#[test]
#[ignore = "requires cvc5 binary"]
fn cvc5_simple_sat() {
    if !cvc5_available() {
        return;
    }
    let result = cvc5_check(|s| {
        s.declare_var("x", &SmtSort::Int).unwrap();
        s.assert(&SmtTerm::and(vec![
            SmtTerm::var("x").gt(SmtTerm::int(0)),
            SmtTerm::var("x").lt(SmtTerm::int(10)),
        ]))
        .unwrap();
    });
    assert_eq!(result, SatResult::Sat);
}

#[test]
#[ignore = "requires cvc5 binary"]
fn cvc5_simple_unsat() {
    if !cvc5_available() {
        return;
    }
    let result = cvc5_check(|s| {
        s.declare_var("x", &SmtSort::Int).unwrap();
        s.assert(&SmtTerm::and(vec![
            SmtTerm::var("x").gt(SmtTerm::int(0)),
            SmtTerm::var("x").lt(SmtTerm::int(0)),
        ]))
        .unwrap();
    });
    assert_eq!(result, SatResult::Unsat);
}

#[test]
#[ignore = "requires cvc5 binary"]
fn cvc5_model_extraction_across_sorts() {
    if !cvc5_available() {
        return;
    }
    let mut solver = Cvc5Solver::new().expect("cvc5 should be available");
    solver.declare_var("x", &SmtSort::Int).unwrap();
    solver.declare_var("p", &SmtSort::Bool).unwrap();
    solver.declare_var("v", &SmtSort::BitVec(8)).unwrap();
    solver
        .assert(&SmtTerm::var("x").eq(SmtTerm::int(-3)))
        .unwrap();
    solver.assert(&SmtTerm::var("p")).unwrap();
    solver
        .assert(&SmtTerm::var("v").eq(SmtTerm::bv(200, 8)))
        .unwrap();

    let bv8 = SmtSort::BitVec(8);
    let vars = vec![
        ("x", &SmtSort::Int),
        ("p", &SmtSort::Bool),
        ("v", &bv8),
    ];
    let (result, model) = solver.check_sat_with_model(&vars).unwrap();
    assert_eq!(result, SatResult::Sat);
    let model = model.expect("model for SAT result");
    assert_eq!(model.get_int("x"), Some(-3));
    assert_eq!(model.get_bool("p"), Some(true));
    assert_eq!(model.get_bv("v"), Some(200));
}

#[test]
#[ignore = "requires cvc5 binary"]
fn cvc5_push_pop_restores_state() {
    if !cvc5_available() {
        return;
    }
    let mut solver = Cvc5Solver::new().expect("cvc5 should be available");
    solver.declare_var("x", &SmtSort::Int).unwrap();
    solver
        .assert(&SmtTerm::var("x").gt(SmtTerm::int(0)))
        .unwrap();

    solver.push().unwrap();
    solver
        .assert(&SmtTerm::var("x").lt(SmtTerm::int(0)))
        .unwrap();
    assert_eq!(solver.check_sat().unwrap(), SatResult::Unsat);
    solver.pop().unwrap();

    assert_eq!(solver.check_sat().unwrap(), SatResult::Sat);
}

// ---- Z3 parity (only with the `z3` feature) ----

#[cfg(feature = "z3")]
mod z3_parity {
    use super::*;
    use satsieve_smt::backends::z3_backend::Z3Solver;

    fn z3_check(setup: impl FnOnce(&mut Z3Solver)) -> SatResult {
        let mut solver = Z3Solver::with_default_config();
        setup(&mut solver);
        solver.check_sat().unwrap()
    }

    #[test]
    fn z3_simple_sat() {
        let result = z3_check(|s| {
            s.declare_var("x", &SmtSort::Int).unwrap();
            s.assert(&SmtTerm::and(vec![
                SmtTerm::var("x").gt(SmtTerm::int(0)),
                SmtTerm::var("x").lt(SmtTerm::int(10)),
            ]))
            .unwrap();
        });
        assert_eq!(result, SatResult::Sat);
    }

    #[test]
    #[ignore = "requires cvc5 binary"]
    fn cvc5_z3_parity_on_shared_formula() {
        if !cvc5_available() {
            return;
        }
        let formula = SmtTerm::and(vec![
            SmtTerm::var("x").gt(SmtTerm::int(5)),
            SmtTerm::var("x").lt(SmtTerm::int(3)),
        ]);

        let z3_result = z3_check(|s| {
            s.declare_var("x", &SmtSort::Int).unwrap();
            s.assert(&formula).unwrap();
        });

        let cvc5_result = cvc5_check(|s| {
            s.declare_var("x", &SmtSort::Int).unwrap();
            s.assert(&formula).unwrap();
        });

        assert_eq!(z3_result, cvc5_result, "Z3 and cvc5 should agree");
    }
}
