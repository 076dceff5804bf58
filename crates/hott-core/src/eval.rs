//! Evaluation of core syntax into the semantic domain.

use crate::cache::EvalCache;
use crate::common::{Level, NegativeLevel};
use crate::config::Config;
use crate::recursor;
use crate::syn::{self, Syntax, Term};
use crate::val::{Closure, Environment, Head, RcValue, Value};
use std::fmt;
use std::rc::Rc;

/// State threaded through one kernel operation: the evaluation cache and the
/// policy for impossible states.
#[derive(Debug)]
pub struct EvalState {
    pub cache: EvalCache,
    pub debug: bool,
}

impl EvalState {
    pub fn new() -> EvalState {
        EvalState::with_config(Config::current())
    }

    pub fn with_config(config: &Config) -> EvalState {
        EvalState {
            cache: EvalCache::new(config.cache_capacity),
            debug: config.debug,
        }
    }

    /// Report a state that well-typed input never reaches. In debug mode this
    /// panics; otherwise it is logged and the caller carries on with a
    /// diagnostic neutral.
    pub(crate) fn impossible(&self, what: fmt::Arguments<'_>) {
        if self.debug {
            panic!("impossible evaluator state: {what}");
        }
        log::warn!("impossible evaluator state: {what}");
    }
}

impl Default for EvalState {
    fn default() -> Self {
        EvalState::new()
    }
}

impl Drop for EvalState {
    fn drop(&mut self) {
        let stats = self.cache.stats();
        if stats.hits + stats.misses > 0 {
            log::trace!(
                "eval cache: {} hits, {} misses, {} entries",
                stats.hits,
                stats.misses,
                stats.size
            );
        }
    }
}

pub fn eval(st: &mut EvalState, env: &Environment, term: &Term) -> RcValue {
    match term.as_ref() {
        Syntax::Universe(_) | Syntax::Variable(_) | Syntax::Global(_) => {
            return eval_uncached(st, env, term);
        }
        _ => {}
    }
    if let Some(value) = st.cache.get(term, env) {
        return value;
    }
    let value = eval_uncached(st, env, term);
    st.cache.insert(term, env, value.clone());
    value
}

fn eval_uncached(st: &mut EvalState, env: &Environment, term: &Term) -> RcValue {
    match term.as_ref() {
        Syntax::Universe(universe) => Rc::new(Value::universe(universe.level)),
        Syntax::Variable(var) => eval_variable(env, var),
        Syntax::Global(global) => Rc::new(Value::global(global.name.clone())),
        Syntax::Pi(pi) => eval_pi(st, env, pi),
        Syntax::Lambda(lam) => Rc::new(Value::lambda(
            lam.hint.clone(),
            Closure::new(env.clone(), lam.body.clone()),
        )),
        Syntax::Application(app) => eval_application(st, env, app),
        Syntax::Sigma(sigma) => {
            let first = eval(st, env, &sigma.first);
            let second = Closure::new(env.clone(), sigma.second.clone());
            Rc::new(Value::sigma(sigma.hint.clone(), first, second))
        }
        Syntax::Pair(pair) => {
            let first = eval(st, env, &pair.first);
            let second = eval(st, env, &pair.second);
            Rc::new(Value::pair(first, second))
        }
        Syntax::Fst(fst) => {
            let pair = eval(st, env, &fst.pair);
            run_fst(st, &pair)
        }
        Syntax::Snd(snd) => {
            let pair = eval(st, env, &snd.pair);
            run_snd(st, &pair)
        }
        Syntax::Let(lt) => {
            let value = eval(st, env, &lt.value);
            eval(st, &env.extended(value), &lt.body)
        }
        Syntax::Id(id) => {
            let ty = eval(st, env, &id.ty);
            let lhs = eval(st, env, &id.lhs);
            let rhs = eval(st, env, &id.rhs);
            Rc::new(Value::id(ty, lhs, rhs))
        }
        Syntax::Refl(refl) => {
            let ty = eval(st, env, &refl.ty);
            let point = eval(st, env, &refl.point);
            Rc::new(Value::refl(ty, point))
        }
        Syntax::J(j) => eval_j(st, env, j),
        Syntax::Metavariable(meta) => {
            let arguments = meta
                .arguments
                .iter()
                .map(|arg| eval(st, env, arg))
                .collect();
            Rc::new(Value::neutral(
                Head::Metavariable(meta.id, meta.arguments.len()),
                arguments,
            ))
        }
        #[cfg(feature = "cubical")]
        Syntax::Cubical(c) => crate::cubical::eval::eval_cubical(st, env, c),
    }
}

/// Look a variable up in the environment. A variable past the end of the
/// environment was free in the term and evaluates to a free neutral.
fn eval_variable(env: &Environment, var: &syn::Variable) -> RcValue {
    match env.get(var.index) {
        Some(value) => value.clone(),
        None => Rc::new(Value::neutral(
            Head::Free(var.index.to_negative_level(env.depth())),
            Vec::new(),
        )),
    }
}

fn eval_pi(st: &mut EvalState, env: &Environment, pi: &syn::Pi) -> RcValue {
    let source = eval(st, env, &pi.source);
    let target = Closure::new(env.clone(), pi.target.clone());
    Rc::new(Value::pi(pi.hint.clone(), source, target))
}

fn eval_application(st: &mut EvalState, env: &Environment, app: &syn::Application) -> RcValue {
    let fun = eval(st, env, &app.function);
    let arg = eval(st, env, &app.argument);
    run_application(st, &fun, arg)
}

fn eval_j(st: &mut EvalState, env: &Environment, j: &syn::J) -> RcValue {
    let proof = eval(st, env, &j.proof);
    if let Value::Refl(_) = proof.as_ref() {
        return eval(st, env, &j.base);
    }
    let spine = vec![
        eval(st, env, &j.ty),
        eval(st, env, &j.motive),
        eval(st, env, &j.base),
        eval(st, env, &j.lhs),
        eval(st, env, &j.rhs),
        proof,
    ];
    Rc::new(Value::neutral(Head::J, spine))
}

/// Perform an application.
pub fn run_application(st: &mut EvalState, fun: &RcValue, arg: RcValue) -> RcValue {
    match fun.as_ref() {
        Value::Lambda(lambda) => run_closure(st, &lambda.body, [arg]),
        Value::Neutral(neutral) => {
            let mut spine = neutral.spine.clone();
            spine.push(arg);
            if let Head::Global(name) = &neutral.head {
                if let Some(reduct) = recursor::try_reduce(st, name, &spine) {
                    return reduct;
                }
            }
            Rc::new(Value::neutral(neutral.head.clone(), spine))
        }
        _ => {
            st.impossible(format_args!("application of a non-function"));
            Rc::new(Value::neutral(Head::BadApplication, vec![fun.clone(), arg]))
        }
    }
}

/// Apply a value to each argument in turn.
pub fn run_applications<I>(st: &mut EvalState, fun: RcValue, args: I) -> RcValue
where
    I: IntoIterator<Item = RcValue>,
{
    args.into_iter()
        .fold(fun, |f, arg| run_application(st, &f, arg))
}

pub fn run_fst(st: &mut EvalState, pair: &RcValue) -> RcValue {
    match pair.as_ref() {
        Value::Pair(pair) => pair.first.clone(),
        Value::Neutral(_) => Rc::new(Value::neutral(Head::Fst, vec![pair.clone()])),
        _ => {
            st.impossible(format_args!("first projection of a non-pair"));
            Rc::new(Value::neutral(Head::Fst, vec![pair.clone()]))
        }
    }
}

pub fn run_snd(st: &mut EvalState, pair: &RcValue) -> RcValue {
    match pair.as_ref() {
        Value::Pair(pair) => pair.second.clone(),
        Value::Neutral(_) => Rc::new(Value::neutral(Head::Snd, vec![pair.clone()])),
        _ => {
            st.impossible(format_args!("second projection of a non-pair"));
            Rc::new(Value::neutral(Head::Snd, vec![pair.clone()]))
        }
    }
}

/// Perform a delayed substitution.
pub fn run_closure<T>(st: &mut EvalState, closure: &Closure, args: T) -> RcValue
where
    T: IntoIterator<Item = RcValue>,
{
    let mut env = closure.environment.clone();
    env.extend(args);
    eval(st, &env, &closure.term)
}

/// A fresh variable at the given level, for going under binders.
pub fn fresh(level: usize) -> RcValue {
    Rc::new(Value::variable(Level::new(level)))
}

/// A free variable `k` steps past the evaluation context.
pub fn free(k: usize) -> RcValue {
    Rc::new(Value::neutral(Head::Free(NegativeLevel::new(k)), Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn state() -> EvalState {
        EvalState::with_config(&Config::default())
    }

    fn head_of(v: &RcValue) -> Head {
        match v.as_ref() {
            Value::Neutral(n) => n.head.clone(),
            other => panic!("expected a neutral, found {other:?}"),
        }
    }

    #[test]
    fn test_beta() {
        let mut st = state();
        let id = Syntax::lambda("x", Syntax::variable(0));
        let term = Syntax::application(id, Syntax::global("y"));
        let v = eval(&mut st, &Environment::new(), &term);
        assert_eq!(head_of(&v), Head::Global("y".into()));
    }

    #[test]
    fn test_unbound_variable_is_free() {
        let mut st = state();
        let v = eval(&mut st, &Environment::identity(1, 0), &Syntax::variable(3));
        assert_eq!(head_of(&v), Head::Free(NegativeLevel::new(2)));
    }

    #[test]
    fn test_let_pushes_value() {
        let mut st = state();
        let term = Syntax::let_in("x", None, Syntax::global("a"), Syntax::variable(0));
        let v = eval(&mut st, &Environment::new(), &term);
        assert_eq!(head_of(&v), Head::Global("a".into()));
    }

    #[test]
    fn test_j_on_neutral_proof_is_stuck() {
        let mut st = state();
        let g = Syntax::global;
        let term = Syntax::j(g("A"), g("C"), g("d"), g("x"), g("y"), g("p"));
        let v = eval(&mut st, &Environment::new(), &term);
        let Value::Neutral(n) = v.as_ref() else {
            panic!("expected a neutral");
        };
        assert_eq!(n.head, Head::J);
        assert_eq!(n.spine.len(), 6);
    }

    #[test]
    fn test_bad_application_is_diagnostic_neutral() {
        let mut st = state();
        let term = Syntax::application(Syntax::universe(0), Syntax::global("a"));
        let v = eval(&mut st, &Environment::new(), &term);
        assert_eq!(head_of(&v), Head::BadApplication);
    }

    #[test]
    #[should_panic(expected = "impossible evaluator state")]
    fn test_bad_application_panics_in_debug_mode() {
        let mut st = EvalState::with_config(&Config::default().with_debug(true));
        let term = Syntax::application(Syntax::universe(0), Syntax::global("a"));
        let _ = eval(&mut st, &Environment::new(), &term);
    }

    #[test]
    fn test_projection_of_neutral() {
        let mut st = state();
        let v = eval(&mut st, &Environment::new(), &Syntax::fst(Syntax::global("p")));
        assert_eq!(head_of(&v), Head::Fst);
    }

    #[test]
    fn test_cache_is_consulted() {
        let mut st = state();
        let arg = Syntax::application(Syntax::global("f"), Syntax::global("a"));
        let term = Syntax::pair(arg.clone(), arg);
        let _ = eval(&mut st, &Environment::new(), &term);
        assert!(st.cache.stats().hits >= 1);
    }
}
