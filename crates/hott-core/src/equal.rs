//! Alpha-equivalence and definitional equality.

use crate::config::ConvOptions;
use crate::eval::EvalState;
use crate::quote::normalize_in;
use crate::subst::shift;
use crate::syn::traverse::{for_each_child, map_children, Binders, Rewrite};
use crate::syn::{Syntax, Term};
use crate::val::Environment;

/// Structural equality of nameless terms, ignoring binder hints.
pub fn alpha_eq(a: &Term, b: &Term) -> bool {
    a == b
}

/// Equality of normal forms up to η for functions and pairs.
pub fn eta_equal(a: &Term, b: &Term) -> bool {
    if a == b {
        return true;
    }
    match (a.as_ref(), b.as_ref()) {
        (Syntax::Lambda(l), Syntax::Lambda(r)) => eta_equal(&l.body, &r.body),
        (Syntax::Lambda(l), _) => {
            log::trace!("η-expanding a function to compare it with a lambda");
            eta_equal(&l.body, &expand_function(b))
        }
        (_, Syntax::Lambda(r)) => {
            log::trace!("η-expanding a function to compare it with a lambda");
            eta_equal(&expand_function(a), &r.body)
        }
        (Syntax::Pair(p), Syntax::Pair(q)) => {
            eta_equal(&p.first, &q.first) && eta_equal(&p.second, &q.second)
        }
        (Syntax::Pair(p), _) => {
            eta_equal(&p.first, &Syntax::fst(b.clone()))
                && eta_equal(&p.second, &Syntax::snd(b.clone()))
        }
        (_, Syntax::Pair(q)) => {
            eta_equal(&Syntax::fst(a.clone()), &q.first)
                && eta_equal(&Syntax::snd(a.clone()), &q.second)
        }
        _ => {
            if shape(a) != shape(b) {
                return false;
            }
            let lhs = children(a);
            let rhs = children(b);
            lhs.len() == rhs.len() && lhs.iter().zip(&rhs).all(|(x, y)| eta_equal(x, y))
        }
    }
}

/// The body `f {0}` of the η-expansion of `f`.
fn expand_function(f: &Term) -> Term {
    Syntax::application(shift(1, 0, f), Syntax::variable(0))
}

fn children(term: &Term) -> Vec<Term> {
    let mut out = Vec::new();
    for_each_child(term, |child, _| out.push(child.clone()));
    out
}

/// The term with every child replaced by the same placeholder, so that two
/// shapes compare equal exactly when the nodes agree on everything but
/// their children.
fn shape(term: &Term) -> Term {
    struct Blank(Term);

    impl Rewrite for Blank {
        fn term(&mut self, _: &Term, _: Binders) -> Term {
            self.0.clone()
        }
    }

    map_children(term, &mut Blank(Syntax::global("")))
}

/// Decide definitional equality of two terms whose free variables are bound
/// by `env`.
pub fn conv(env: &Environment, a: &Term, b: &Term, options: ConvOptions) -> bool {
    let mut st = EvalState::new();
    conv_with(&mut st, env, a, b, options)
}

pub fn conv_with(
    st: &mut EvalState,
    env: &Environment,
    a: &Term,
    b: &Term,
    options: ConvOptions,
) -> bool {
    let a = normalize_in(st, env, a);
    let b = normalize_in(st, env, b);
    if options.eta {
        eta_equal(&a, &b)
    } else {
        alpha_eq(&a, &b)
    }
}

/// Definitional equality of closed terms, with η.
pub fn conv_closed(a: &Term, b: &Term) -> bool {
    conv(&Environment::new(), a, b, ConvOptions::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(i: usize) -> Term {
        Syntax::variable(i)
    }

    #[test]
    fn test_alpha_ignores_hints() {
        let a = Syntax::pi("x", Syntax::universe(0), var(0));
        let b = Syntax::pi("y", Syntax::universe(0), var(0));
        assert!(alpha_eq(&a, &b));
        assert!(!alpha_eq(&a, &Syntax::pi("x", Syntax::universe(1), var(0))));
    }

    #[test]
    fn test_beta_is_conversion() {
        let body = Syntax::pair(var(0), var(1));
        let a = Syntax::global("a");
        let redex = Syntax::application(Syntax::lambda("x", body.clone()), a.clone());
        let env = Environment::identity(1, 0);
        let expected = crate::subst::subst(0, &a, &body);
        assert!(conv(&env, &redex, &expected, ConvOptions::default()));
    }

    #[test]
    fn test_function_eta() {
        let f = Syntax::global("f");
        let expanded = Syntax::lambda("x", Syntax::application(f.clone(), var(0)));
        assert!(conv_closed(&f, &expanded));
        assert!(!conv(
            &Environment::new(),
            &f,
            &expanded,
            ConvOptions::without_eta()
        ));
    }

    #[test]
    fn test_pair_eta() {
        let p = Syntax::global("p");
        let expanded = Syntax::pair(Syntax::fst(p.clone()), Syntax::snd(p.clone()));
        assert!(conv_closed(&expanded, &p));
        assert!(!conv(
            &Environment::new(),
            &expanded,
            &p,
            ConvOptions::without_eta()
        ));
    }

    #[test]
    fn test_eta_under_constructors() {
        let f = Syntax::global("f");
        let expanded = Syntax::lambda("x", Syntax::application(f.clone(), var(0)));
        let a = Syntax::id(Syntax::global("A"), f, Syntax::global("g"));
        let b = Syntax::id(Syntax::global("A"), expanded, Syntax::global("g"));
        assert!(eta_equal(&a, &b));
    }

    #[test]
    fn test_distinct_heads_differ() {
        assert!(!conv_closed(&Syntax::global("a"), &Syntax::global("b")));
        assert!(!eta_equal(
            &Syntax::fst(Syntax::global("p")),
            &Syntax::snd(Syntax::global("p"))
        ));
    }
}
