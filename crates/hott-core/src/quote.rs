//! Reification: reading semantic values back into normal-form syntax.
//!
//! Reification is level-indexed. `level` is the number of term variables in
//! scope and `dlevel` the number of interval variables; under a binder a fresh
//! variable at the current level is applied and the body is read back one
//! level deeper.

use crate::eval::{eval, fresh, run_closure, EvalState};
use crate::syn::{Syntax, Term};
use crate::val::{Closure, Environment, Head, Neutral, RcValue, Value};

pub fn reify(st: &mut EvalState, level: usize, dlevel: usize, value: &Value) -> Term {
    match value {
        Value::Universe(universe) => Syntax::universe(universe.level),
        Value::Pi(pi) => Syntax::pi(
            pi.hint.clone(),
            reify(st, level, dlevel, &pi.source),
            reify_closure(st, level, dlevel, &pi.target),
        ),
        Value::Lambda(lam) => {
            Syntax::lambda(lam.hint.clone(), reify_closure(st, level, dlevel, &lam.body))
        }
        Value::Sigma(sigma) => Syntax::sigma(
            sigma.hint.clone(),
            reify(st, level, dlevel, &sigma.first),
            reify_closure(st, level, dlevel, &sigma.second),
        ),
        Value::Pair(pair) => Syntax::pair(
            reify(st, level, dlevel, &pair.first),
            reify(st, level, dlevel, &pair.second),
        ),
        Value::Id(id) => Syntax::id(
            reify(st, level, dlevel, &id.ty),
            reify(st, level, dlevel, &id.lhs),
            reify(st, level, dlevel, &id.rhs),
        ),
        Value::Refl(refl) => Syntax::refl(
            reify(st, level, dlevel, &refl.ty),
            reify(st, level, dlevel, &refl.point),
        ),
        Value::Neutral(neutral) => reify_neutral(st, level, dlevel, neutral),
        #[cfg(feature = "cubical")]
        Value::Cubical(c) => crate::cubical::quote::reify_cubical(st, level, dlevel, c),
    }
}

/// Read back the body of a closure binding one term variable.
pub fn reify_closure(st: &mut EvalState, level: usize, dlevel: usize, closure: &Closure) -> Term {
    let body = run_closure(st, closure, [fresh(level)]);
    reify(st, level + 1, dlevel, &body)
}

fn reify_all(st: &mut EvalState, level: usize, dlevel: usize, values: &[RcValue]) -> Vec<Term> {
    values
        .iter()
        .map(|v| reify(st, level, dlevel, v))
        .collect()
}

fn reify_neutral(st: &mut EvalState, level: usize, dlevel: usize, neutral: &Neutral) -> Term {
    let arity = neutral.head.arity();
    if neutral.spine.len() < arity {
        st.impossible(format_args!(
            "neutral {:?} with {} of its {arity} operands",
            neutral.head,
            neutral.spine.len()
        ));
        let head = Syntax::global(format!("{:?}", neutral.head));
        let args = reify_all(st, level, dlevel, &neutral.spine);
        return Syntax::applications(head, args);
    }
    let (operands, rest) = neutral.spine.split_at(arity);
    let mut ops = reify_all(st, level, dlevel, operands).into_iter();
    let mut op = || ops.next().unwrap_or_else(|| Syntax::global("?"));
    let head = match &neutral.head {
        Head::Variable(l) => {
            if l.is_bound(level) {
                Syntax::variable(l.to_index(level))
            } else {
                st.impossible(format_args!("variable {l} escapes reification at depth {level}"));
                Syntax::global(l.to_string())
            }
        }
        Head::Free(k) => Syntax::variable(k.to_index(level)),
        Head::Global(name) => Syntax::global(name.clone()),
        Head::Metavariable(id, _) => Syntax::metavariable(*id, ops.by_ref().collect()),
        Head::Fst => Syntax::fst(op()),
        Head::Snd => Syntax::snd(op()),
        Head::J => Syntax::j(op(), op(), op(), op(), op(), op()),
        Head::BadApplication => Syntax::application(op(), op()),
        #[cfg(feature = "cubical")]
        Head::PathApplication => Syntax::path_application(op(), op()),
    };
    let args = reify_all(st, level, dlevel, rest);
    Syntax::applications(head, args)
}

/// Normalize a closed term: evaluate in the empty environment and read back.
pub fn normalize(term: &Term) -> Term {
    let mut st = EvalState::new();
    normalize_with(&mut st, term)
}

pub fn normalize_with(st: &mut EvalState, term: &Term) -> Term {
    normalize_in(st, &Environment::new(), term)
}

/// Normalize a term whose free variables are bound by `env`.
pub fn normalize_in(st: &mut EvalState, env: &Environment, term: &Term) -> Term {
    let value = eval(st, env, term);
    reify(st, env.depth(), env.dims_depth(), &value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn norm(t: &Term) -> Term {
        let mut st = EvalState::with_config(&Config::default());
        normalize_with(&mut st, t)
    }

    #[test]
    fn test_beta_under_binder() {
        // \x. (\y. y) x  ~>  \x. x
        let inner = Syntax::lambda("y", Syntax::variable(0));
        let t = Syntax::lambda("x", Syntax::application(inner, Syntax::variable(0)));
        assert_eq!(norm(&t), Syntax::lambda("x", Syntax::variable(0)));
    }

    #[test]
    fn test_free_variables_survive() {
        let t = Syntax::lambda("x", Syntax::application(Syntax::variable(1), Syntax::variable(0)));
        assert_eq!(norm(&t), t);
    }

    #[test]
    fn test_fst_of_neutral_reifies_to_fst() {
        let t = Syntax::application(Syntax::fst(Syntax::global("p")), Syntax::global("a"));
        assert_eq!(norm(&t), t);
    }

    #[test]
    fn test_j_neutral_reifies_to_j() {
        let g = Syntax::global;
        let t = Syntax::j(g("A"), g("C"), g("d"), g("x"), g("y"), Syntax::variable(0));
        assert_eq!(norm(&t), t);
    }

    #[test]
    fn test_metavariable_round_trips() {
        let meta = Syntax::metavariable(
            crate::common::MetaVariableId(3),
            vec![Syntax::variable(0)],
        );
        let t = Syntax::application(meta, Syntax::global("a"));
        assert_eq!(norm(&t), t);
    }

    #[test]
    fn test_reify_in_context() {
        let mut st = EvalState::with_config(&Config::default());
        let env = Environment::identity(2, 0);
        let t = Syntax::pair(Syntax::variable(0), Syntax::variable(1));
        assert_eq!(normalize_in(&mut st, &env, &t), t);
    }
}
