//! Shifting and substitution in the term namespace.
//!
//! The interval namespace has its own pair of operations in
//! `cubical::subst`; the two never touch each other's indices.

use crate::syn::traverse::{map_children, Binders, Rewrite};
use crate::syn::{Syntax, Term};

/// Add `d` to every term variable with index at least `cutoff`.
pub fn shift(d: isize, cutoff: usize, term: &Term) -> Term {
    if d == 0 {
        return term.clone();
    }
    match term.as_ref() {
        Syntax::Variable(var) if var.index.0 >= cutoff => {
            Syntax::variable(var.index.0.saturating_add_signed(d))
        }
        _ => map_children(term, &mut Shift { d, cutoff }),
    }
}

struct Shift {
    d: isize,
    cutoff: usize,
}

impl Rewrite for Shift {
    fn term(&mut self, term: &Term, binders: Binders) -> Term {
        shift(self.d, self.cutoff + binders.terms, term)
    }
}

/// Replace the variable `j` with `s` and close the gap it leaves: variables
/// above `j` move down by one.
pub fn subst(j: usize, s: &Term, term: &Term) -> Term {
    match term.as_ref() {
        Syntax::Variable(var) => {
            let index = var.index.0;
            if index == j {
                s.clone()
            } else if index > j {
                Syntax::variable(index - 1)
            } else {
                term.clone()
            }
        }
        _ => map_children(term, &mut Subst { j, s }),
    }
}

struct Subst<'a> {
    j: usize,
    s: &'a Term,
}

impl Rewrite for Subst<'_> {
    fn term(&mut self, term: &Term, binders: Binders) -> Term {
        if binders == Binders::NONE {
            return subst(self.j, self.s, term);
        }
        let s = under(binders, self.s);
        subst(self.j + binders.terms, &s, term)
    }
}

/// Weaken `s` so that it means the same thing below `binders`.
pub fn under(binders: Binders, s: &Term) -> Term {
    let s = shift(binders.terms as isize, 0, s);
    #[cfg(feature = "cubical")]
    let s = crate::cubical::subst::ishift(binders.dims as isize, 0, &s);
    s
}

/// Substitute for the innermost variable of a binder body: `b[a/0]`.
pub fn instantiate(body: &Term, a: &Term) -> Term {
    subst(0, a, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(i: usize) -> Term {
        Syntax::variable(i)
    }

    #[test]
    fn test_shift_respects_cutoff() {
        let t = Syntax::applications(Syntax::global("f"), [var(0), var(1), var(2)]);
        let expected = Syntax::applications(Syntax::global("f"), [var(0), var(3), var(4)]);
        assert_eq!(shift(2, 1, &t), expected);
    }

    #[test]
    fn test_shift_under_binder() {
        let t = Syntax::lambda("x", Syntax::application(var(0), var(1)));
        let expected = Syntax::lambda("x", Syntax::application(var(0), var(2)));
        assert_eq!(shift(1, 0, &t), expected);
    }

    #[test]
    fn test_shift_zero_is_identity() {
        let t = Syntax::pi("x", var(3), var(0));
        assert_eq!(shift(0, 0, &t), t);
    }

    #[test]
    fn test_negative_shift() {
        assert_eq!(shift(-1, 0, &var(2)), var(1));
    }

    #[test]
    fn test_subst_collapses_binder() {
        let s = Syntax::global("a");
        assert_eq!(subst(0, &s, &var(0)), s);
        assert_eq!(subst(0, &s, &var(1)), var(0));
        assert_eq!(subst(1, &s, &var(0)), var(0));
    }

    #[test]
    fn test_subst_under_binder_shifts_substituent() {
        // (\y. x y)[z/x] where z is the variable just outside.
        let t = Syntax::lambda("y", Syntax::application(var(1), var(0)));
        let expected = Syntax::lambda("y", Syntax::application(var(1), var(0)));
        assert_eq!(subst(0, &var(0), &t), expected);
    }

    #[test]
    fn test_subst_through_shift() {
        let s = var(2);
        let t = Syntax::pi("x", var(0), Syntax::application(var(1), var(3)));
        let lhs = shift(1, 0, &subst(0, &s, &t));
        let rhs = subst(0, &shift(1, 0, &s), &shift(1, 1, &t));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_instantiate() {
        let body = Syntax::pair(var(0), var(1));
        let a = Syntax::global("a");
        assert_eq!(instantiate(&body, &a), Syntax::pair(a.clone(), var(0)));
    }
}
