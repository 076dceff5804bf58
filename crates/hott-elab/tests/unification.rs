use hott_core::common::MetaVariableId;
use hott_core::syn::parse::parse;
use hott_core::syn::resolve::resolve_in;
use hott_core::syn::{Scope, Syntax, Term};
use hott_core::{alpha_eq, normalize};
use hott_elab::{unify, unify_all, zonk, zonk_full, Constraint, Solutions, UnifyError};
use proptest::prelude::*;

const GLOBALS: &[&str] = &["f", "g", "a", "b", "A", "B"];

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Read a term with `locals` in scope, the last one innermost.
fn read_in(locals: &[&str], input: &str) -> Term {
    let raw = parse(input).unwrap();
    let mut scope = Scope::with_terms(locals.iter().copied());
    resolve_in(GLOBALS, &mut scope, &raw).unwrap()
}

fn read(input: &str) -> Term {
    read_in(&[], input)
}

fn meta(id: usize) -> MetaVariableId {
    MetaVariableId::new(id)
}

#[test]
fn pattern_solution_abstracts_the_arguments() {
    init();
    let lhs = read_in(&["x", "y"], "(?0 x y)");
    let rhs = read_in(&["x", "y"], "(f x y)");
    let result = unify(&lhs, &rhs);
    assert!(result.is_success());
    let solution = result.solved.get(meta(0)).unwrap();
    assert_eq!(solution.to_string(), "(\\_ => (\\_ => (f {1} {0})))");

    // Substituting the solution back makes both sides agree.
    let lhs = zonk_full(&result.solved, &lhs).unwrap();
    assert!(alpha_eq(&normalize(&lhs), &normalize(&rhs)));
}

#[test]
fn occurs_check_rejects_cyclic_solutions() {
    init();
    let lhs = read("?0");
    let rhs = read("(Pi x ?0 Type)");
    let result = unify(&lhs, &rhs);
    assert_eq!(result.errors, [UnifyError::OccursCheck(meta(0), rhs)]);
    assert!(result.solved.get(meta(0)).is_none());
    assert!(result.errors[0].to_string().starts_with("?0 occurs in"));
}

#[test]
fn swapped_metavariables_leave_an_acyclic_solution() {
    init();
    let lhs = read("(pair ?0 ?1)");
    let rhs = read("(pair ?1 ?0)");
    let result = unify(&lhs, &rhs);
    assert!(result.errors.is_empty(), "{:?}", result);
    for (_, solution) in &result.solved {
        let solution = zonk(&result.solved, solution);
        for id in hott_elab::collect_metas(&solution) {
            assert!(!result.solved.contains(id), "{solution} mentions solved {id}");
        }
    }
    assert!(alpha_eq(&zonk(&result.solved, &lhs), &zonk(&result.solved, &rhs)));
}

#[test]
fn indirect_cycles_fail_the_occurs_check() {
    init();
    let result = unify_all([
        Constraint::new(read("?0"), read("?1")),
        Constraint::new(read("?1"), read("(Pi x ?0 Type)")),
    ]);
    assert_eq!(result.errors.len(), 1, "{:?}", result);
    assert!(matches!(result.errors[0], UnifyError::OccursCheck(..)));

    let result = unify(&read("(pair ?0 ?1)"), &read("(pair ?1 (Pi x ?0 Type))"));
    assert_eq!(result.errors.len(), 1, "{:?}", result);
    assert!(matches!(result.errors[0], UnifyError::OccursCheck(..)));
}

#[test]
fn structural_descent_solves_every_position() {
    init();
    let lhs = read("(Sigma x ?0 (Id ?1 x x))");
    let rhs = read("(Sigma x A (Id A x x))");
    let result = unify(&lhs, &rhs);
    assert!(result.is_success());
    assert_eq!(result.solved.get(meta(0)).unwrap(), &read("A"));
    assert_eq!(result.solved.get(meta(1)).unwrap(), &read("A"));
}

#[test]
fn deferred_constraints_wait_for_their_arguments() {
    init();
    let first = Constraint::new(read_in(&["x"], "(?0 ?1)"), read("a"));
    let second = Constraint::new(read_in(&["x"], "?1"), read_in(&["x"], "x"));
    let result = unify_all([first, second]);
    assert!(result.is_success(), "{:?}", result);
    assert_eq!(result.solved.get(meta(0)).unwrap().to_string(), "(\\_ => a)");
}

#[test]
fn inconsistent_constraints_are_reported() {
    init();
    let result = unify_all([
        Constraint::new(read("?0"), read("a")),
        Constraint::new(read("?0"), read("b")),
    ]);
    // After the first solution the second constraint is rigid.
    assert_eq!(result.errors.len(), 1);
    assert!(matches!(result.errors[0], UnifyError::Mismatch(_, _)));
}

#[test]
fn zonk_full_reports_what_is_left() {
    init();
    let result = unify(&read("(pair ?0 ?1)"), &read("(pair a ?1)"));
    assert!(result.is_success());
    let err = zonk_full(&result.solved, &read("(pair ?0 ?1)")).unwrap_err();
    assert_eq!(err.to_string(), "unsolved metavariables: ?1");
}

/// Terms over a few globals and metavariables `?0` to `?3`.
fn term() -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![
        (0..2usize).prop_map(Syntax::universe),
        prop::sample::select(vec!["a", "b", "f"]).prop_map(Syntax::global),
        (0..4usize).prop_map(|id| Syntax::metavariable(MetaVariableId::new(id), vec![])),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(f, a)| Syntax::application(f, a)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Syntax::pi("_", a, b)),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| Syntax::pair(a, b)),
            inner.prop_map(|b| Syntax::lambda("_", b)),
        ]
    })
}

/// Closed solutions where `?k` only mentions metavariables above `k`.
fn solutions() -> impl Strategy<Value = Solutions> {
    prop::collection::vec(prop::option::of(term()), 4).prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .filter_map(|(k, t)| {
                let t = t?;
                let acyclic = hott_elab::collect_metas(&t).iter().all(|m| m.0 > k);
                acyclic.then(|| (MetaVariableId::new(k), t))
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn solutions_are_acyclic_and_make_both_sides_agree(l in term(), r in term()) {
        let result = unify(&l, &r);
        for (&id, solution) in &result.solved {
            let solution = zonk(&result.solved, solution);
            for other in hott_elab::collect_metas(&solution) {
                prop_assert!(other != id, "{} := {}", id, solution);
                prop_assert!(!result.solved.contains(other), "{} := {}", id, solution);
            }
        }
        if result.is_success() {
            let l = normalize(&zonk(&result.solved, &l));
            let r = normalize(&zonk(&result.solved, &r));
            prop_assert!(alpha_eq(&l, &r), "{} and {}", l, r);
        }
    }

    #[test]
    fn zonk_is_idempotent(solved in solutions(), t in term()) {
        let once = zonk(&solved, &t);
        prop_assert_eq!(zonk(&solved, &once), once);
    }

    #[test]
    fn zonk_removes_solved_metavariables(solved in solutions(), t in term()) {
        let zonked = zonk(&solved, &t);
        for id in hott_elab::collect_metas(&zonked) {
            prop_assert!(!solved.contains(id));
        }
    }
}
