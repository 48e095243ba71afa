//! Property tests: every batched strategy produces exactly the naive
//! baseline labeling on randomly generated decidable inputs.

mod common;

use common::BruteForceSolver;
use proptest::prelude::*;
use satsieve_classify::{
    classify_disjunctive, classify_disjunctive_incremental, classify_unary,
    classify_unary_cached,
};
use satsieve_smt::sorts::SmtSort;
use satsieve_smt::terms::SmtTerm;

fn atom() -> impl Strategy<Value = SmtTerm> {
    let operand = prop_oneof![
        Just(SmtTerm::var("x")),
        Just(SmtTerm::var("y")),
        Just(SmtTerm::var("x").add(SmtTerm::var("y"))),
        Just(SmtTerm::var("x").sub(SmtTerm::var("y"))),
    ];
    (operand, -6i64..=6, 0u8..6).prop_map(|(lhs, c, relation)| {
        let rhs = SmtTerm::int(c);
        match relation {
            0 => lhs.lt(rhs),
            1 => lhs.le(rhs),
            2 => lhs.eq(rhs),
            3 => lhs.gt(rhs),
            4 => lhs.ge(rhs),
            _ => lhs.ne(rhs),
        }
    })
}

fn candidate() -> impl Strategy<Value = SmtTerm> {
    prop_oneof![
        atom(),
        atom().prop_map(|a| a.not()),
        (atom(), atom()).prop_map(|(a, b)| SmtTerm::and(vec![a, b])),
        (atom(), atom()).prop_map(|(a, b)| SmtTerm::or(vec![a, b])),
        (atom(), atom()).prop_map(|(a, b)| a.implies(b)),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn batched_strategies_match_the_naive_baseline(
        candidates in prop::collection::vec(candidate(), 0..8),
        bound in 1i64..=6,
    ) {
        let decls = vec![
            ("x".to_string(), SmtSort::Int),
            ("y".to_string(), SmtSort::Int),
        ];
        // Keep every variable inside the enumerated domain so the
        // backend is genuinely decidable for these formulas.
        let precondition = SmtTerm::and(vec![
            SmtTerm::var("x").ge(SmtTerm::int(-bound)),
            SmtTerm::var("x").le(SmtTerm::int(bound)),
            SmtTerm::var("y").ge(SmtTerm::int(-bound)),
            SmtTerm::var("y").le(SmtTerm::int(bound)),
        ]);

        let mut solver = BruteForceSolver::new();
        let baseline = classify_unary(&mut solver, &decls, &precondition, &candidates).unwrap();
        prop_assert_eq!(baseline.len(), candidates.len());
        prop_assert!(baseline.iter().all(|v| !v.is_unknown()));

        let mut solver = BruteForceSolver::new();
        let cached =
            classify_unary_cached(&mut solver, &decls, &precondition, &candidates).unwrap();
        prop_assert_eq!(&cached, &baseline);

        let mut solver = BruteForceSolver::new();
        let disjunctive =
            classify_disjunctive(&mut solver, &decls, &precondition, &candidates).unwrap();
        prop_assert_eq!(&disjunctive, &baseline);
        prop_assert!(solver.check_sat_calls <= candidates.len() + 1);

        let mut solver = BruteForceSolver::new();
        let incremental =
            classify_disjunctive_incremental(&mut solver, &decls, &precondition, &candidates)
                .unwrap();
        prop_assert_eq!(&incremental, &baseline);
        prop_assert!(solver.check_sat_calls <= candidates.len() + 1);
        prop_assert_eq!(solver.depth(), 0);
    }
}
