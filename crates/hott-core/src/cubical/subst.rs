//! Shifting and substitution in the interval namespace.

use crate::common::DimIndex;
use crate::syn::traverse::{map_children, Binders, Rewrite};
use crate::syn::{Cubical, Face, Syntax, Term};

/// Add `d` to every interval variable with index at least `cutoff`.
pub fn ishift(d: isize, cutoff: usize, term: &Term) -> Term {
    if d == 0 {
        return term.clone();
    }
    match term.as_ref() {
        Syntax::Cubical(Cubical::Dimension(dim)) if dim.index.0 >= cutoff => {
            Syntax::dimension(dim.index.0.saturating_add_signed(d))
        }
        _ => map_children(term, &mut IShift { d, cutoff }),
    }
}

pub fn ishift_face(d: isize, cutoff: usize, face: &Face) -> Face {
    if d == 0 {
        return face.clone();
    }
    face.map_atoms(&mut |var: &DimIndex, is_one| {
        if var.0 >= cutoff {
            Face::atom(DimIndex(var.0.saturating_add_signed(d)), is_one)
        } else {
            Face::atom(*var, is_one)
        }
    })
}

struct IShift {
    d: isize,
    cutoff: usize,
}

impl Rewrite for IShift {
    fn term(&mut self, term: &Term, binders: Binders) -> Term {
        ishift(self.d, self.cutoff + binders.dims, term)
    }

    fn face(&mut self, face: &Face, binders: Binders) -> Face {
        ishift_face(self.d, self.cutoff + binders.dims, face)
    }
}

/// Replace the interval variable `j` with the interval term `s`; interval
/// variables above `j` move down by one.
pub fn isubst(j: usize, s: &Term, term: &Term) -> Term {
    match term.as_ref() {
        Syntax::Cubical(Cubical::Dimension(dim)) => {
            let index = dim.index.0;
            if index == j {
                s.clone()
            } else if index > j {
                Syntax::dimension(index - 1)
            } else {
                term.clone()
            }
        }
        _ => map_children(term, &mut ISubst { j, s }),
    }
}

/// Substitute into a face. An atom on `j` becomes `⊤` or `⊥` when `s` is an
/// endpoint, and the result is re-simplified.
pub fn isubst_face(j: usize, s: &Term, face: &Face) -> Face {
    face.map_atoms(&mut |var: &DimIndex, is_one| {
        let index = var.0;
        if index > j {
            return Face::atom(DimIndex(index - 1), is_one);
        }
        if index < j {
            return Face::atom(*var, is_one);
        }
        match s.as_ref() {
            Syntax::Cubical(Cubical::Zero) => Face::from_bool(!is_one),
            Syntax::Cubical(Cubical::One) => Face::from_bool(is_one),
            Syntax::Cubical(Cubical::Dimension(dim)) => Face::atom(dim.index, is_one),
            _ => Face::atom(*var, is_one),
        }
    })
}

struct ISubst<'a> {
    j: usize,
    s: &'a Term,
}

impl Rewrite for ISubst<'_> {
    fn term(&mut self, term: &Term, binders: Binders) -> Term {
        if binders.dims == 0 {
            return isubst(self.j, self.s, term);
        }
        let s = ishift(binders.dims as isize, 0, self.s);
        isubst(self.j + binders.dims, &s, term)
    }

    fn face(&mut self, face: &Face, binders: Binders) -> Face {
        let s = ishift(binders.dims as isize, 0, self.s);
        isubst_face(self.j + binders.dims, &s, face)
    }
}

/// Substitute for the innermost interval variable of a dimension binder.
pub fn instantiate_dim(body: &Term, r: &Term) -> Term {
    isubst(0, r, body)
}

/// Check whether interval variable `j` occurs in `term`.
pub fn mentions_dim(j: usize, term: &Term) -> bool {
    match term.as_ref() {
        Syntax::Cubical(Cubical::Dimension(dim)) => dim.index.0 == j,
        _ => {
            struct Mentions {
                j: usize,
                found: bool,
            }
            impl Rewrite for Mentions {
                fn term(&mut self, term: &Term, binders: Binders) -> Term {
                    self.found = self.found || mentions_dim(self.j + binders.dims, term);
                    term.clone()
                }
                fn face(&mut self, face: &Face, binders: Binders) -> Face {
                    let j = self.j + binders.dims;
                    face.for_each_atom(&mut |v, _| self.found = self.found || v.0 == j);
                    face.clone()
                }
            }
            let mut m = Mentions { j, found: false };
            let _ = map_children(term, &mut m);
            m.found
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dim(i: usize) -> Term {
        Syntax::dimension(i)
    }

    #[test]
    fn test_ishift_leaves_term_variables() {
        let t = Syntax::path_application(Syntax::variable(0), dim(0));
        let expected = Syntax::path_application(Syntax::variable(0), dim(1));
        assert_eq!(ishift(1, 0, &t), expected);
    }

    #[test]
    fn test_term_shift_leaves_dimensions() {
        let t = Syntax::path_application(Syntax::variable(0), dim(0));
        let expected = Syntax::path_application(Syntax::variable(1), dim(0));
        assert_eq!(crate::subst::shift(1, 0, &t), expected);
    }

    #[test]
    fn test_ishift_under_path_lambda() {
        let t = Syntax::path_lambda("i", Syntax::path_application(Syntax::global("p"), dim(1)));
        let expected =
            Syntax::path_lambda("i", Syntax::path_application(Syntax::global("p"), dim(2)));
        assert_eq!(ishift(1, 0, &t), expected);
    }

    #[test]
    fn test_isubst_endpoint_into_face() {
        let face = Face::or(Face::atom(DimIndex(0), true), Face::atom(DimIndex(1), false));
        assert_eq!(
            isubst_face(0, &Syntax::dim_one(), &face),
            Face::Top
        );
        assert_eq!(
            isubst_face(0, &Syntax::dim_zero(), &face),
            Face::atom(DimIndex(0), false)
        );
    }

    #[test]
    fn test_isubst_into_partial() {
        let t = Syntax::partial(Face::atom(DimIndex(0), false), Syntax::global("A"));
        let expected = Syntax::partial(Face::Top, Syntax::global("A"));
        assert_eq!(isubst(0, &Syntax::dim_zero(), &t), expected);
    }

    #[test]
    fn test_isubst_under_dimension_binder() {
        let body = Syntax::path_lambda("j", Syntax::path_application(Syntax::global("p"), dim(1)));
        let expected = Syntax::path_lambda(
            "j",
            Syntax::path_application(Syntax::global("p"), Syntax::dim_one()),
        );
        assert_eq!(instantiate_dim(&body, &Syntax::dim_one()), expected);
    }

    #[test]
    fn test_mentions_dim() {
        let t = Syntax::path_lambda("j", dim(1));
        assert!(mentions_dim(0, &t));
        assert!(!mentions_dim(1, &t));
        assert!(!mentions_dim(0, &Syntax::global("A")));
    }
}
