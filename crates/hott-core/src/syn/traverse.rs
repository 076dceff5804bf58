//! Generic one-level traversals of core syntax.
//!
//! Every operation that walks terms (shifting, substitution, zonking, the
//! occurs check) is written against these two functions, so the binding
//! structure of each constructor is described exactly once.

use crate::syn::basic::*;
#[cfg(feature = "cubical")]
use crate::syn::cubical::*;

/// The binders crossed between a term and one of its immediate children.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct Binders {
    pub terms: usize,
    pub dims: usize,
}

impl Binders {
    pub const NONE: Binders = Binders { terms: 0, dims: 0 };
    pub const TERM: Binders = Binders { terms: 1, dims: 0 };
    pub const DIM: Binders = Binders { terms: 0, dims: 1 };
}

impl std::ops::Add for Binders {
    type Output = Binders;

    fn add(self, rhs: Binders) -> Binders {
        Binders {
            terms: self.terms + rhs.terms,
            dims: self.dims + rhs.dims,
        }
    }
}

/// A rewrite of the immediate children of a term.
pub trait Rewrite {
    fn term(&mut self, term: &Term, binders: Binders) -> Term;

    #[cfg(feature = "cubical")]
    fn face(&mut self, face: &Face, binders: Binders) -> Face {
        let _ = binders;
        face.clone()
    }
}

/// Rebuild `term`, rewriting each immediate child. Leaves are shared.
pub fn map_children<R: Rewrite + ?Sized>(term: &Term, r: &mut R) -> Term {
    use Binders as B;
    match term.as_ref() {
        Syntax::Universe(_) | Syntax::Variable(_) | Syntax::Global(_) => term.clone(),
        Syntax::Pi(pi) => Syntax::pi(
            pi.hint.clone(),
            r.term(&pi.source, B::NONE),
            r.term(&pi.target, B::TERM),
        ),
        Syntax::Lambda(lam) => match &lam.annotation {
            Some(ann) => Syntax::annotated_lambda(
                lam.hint.clone(),
                r.term(ann, B::NONE),
                r.term(&lam.body, B::TERM),
            ),
            None => Syntax::lambda(lam.hint.clone(), r.term(&lam.body, B::TERM)),
        },
        Syntax::Application(app) => Syntax::application(
            r.term(&app.function, B::NONE),
            r.term(&app.argument, B::NONE),
        ),
        Syntax::Sigma(sigma) => Syntax::sigma(
            sigma.hint.clone(),
            r.term(&sigma.first, B::NONE),
            r.term(&sigma.second, B::TERM),
        ),
        Syntax::Pair(pair) => {
            Syntax::pair(r.term(&pair.first, B::NONE), r.term(&pair.second, B::NONE))
        }
        Syntax::Fst(fst) => Syntax::fst(r.term(&fst.pair, B::NONE)),
        Syntax::Snd(snd) => Syntax::snd(r.term(&snd.pair, B::NONE)),
        Syntax::Let(lt) => Syntax::let_in(
            lt.hint.clone(),
            lt.annotation.as_ref().map(|ann| r.term(ann, B::NONE)),
            r.term(&lt.value, B::NONE),
            r.term(&lt.body, B::TERM),
        ),
        Syntax::Id(id) => Syntax::id(
            r.term(&id.ty, B::NONE),
            r.term(&id.lhs, B::NONE),
            r.term(&id.rhs, B::NONE),
        ),
        Syntax::Refl(refl) => Syntax::refl(r.term(&refl.ty, B::NONE), r.term(&refl.point, B::NONE)),
        Syntax::J(j) => Syntax::j(
            r.term(&j.ty, B::NONE),
            r.term(&j.motive, B::NONE),
            r.term(&j.base, B::NONE),
            r.term(&j.lhs, B::NONE),
            r.term(&j.rhs, B::NONE),
            r.term(&j.proof, B::NONE),
        ),
        Syntax::Metavariable(meta) => Syntax::metavariable(
            meta.id,
            meta.arguments.iter().map(|a| r.term(a, B::NONE)).collect(),
        ),
        #[cfg(feature = "cubical")]
        Syntax::Cubical(c) => map_cubical(term, c, r),
    }
}

#[cfg(feature = "cubical")]
fn map_cubical<R: Rewrite + ?Sized>(term: &Term, c: &Cubical, r: &mut R) -> Term {
    use Binders as B;
    let branches = |r: &mut R, branches: &[Branch]| -> Vec<Branch> {
        branches
            .iter()
            .map(|b| Branch::new(r.face(&b.face, B::NONE), r.term(&b.term, B::NONE)))
            .collect()
    };
    match c {
        Cubical::Interval | Cubical::Zero | Cubical::One | Cubical::Dimension(_) => term.clone(),
        Cubical::Path(path) => Syntax::path(
            r.term(&path.ty, B::NONE),
            r.term(&path.lhs, B::NONE),
            r.term(&path.rhs, B::NONE),
        ),
        Cubical::PathP(pathp) => Syntax::path_p(
            pathp.hint.clone(),
            r.term(&pathp.family, B::DIM),
            r.term(&pathp.lhs, B::NONE),
            r.term(&pathp.rhs, B::NONE),
        ),
        Cubical::PathLambda(plam) => {
            Syntax::path_lambda(plam.hint.clone(), r.term(&plam.body, B::DIM))
        }
        Cubical::PathApplication(papp) => Syntax::path_application(
            r.term(&papp.path, B::NONE),
            r.term(&papp.dimension, B::NONE),
        ),
        Cubical::Transport(tr) => Syntax::transport(
            tr.hint.clone(),
            r.term(&tr.family, B::DIM),
            r.term(&tr.base, B::NONE),
        ),
        Cubical::Partial(partial) => Syntax::partial(
            r.face(&partial.face, B::NONE),
            r.term(&partial.ty, B::NONE),
        ),
        Cubical::System(system) => Syntax::system(branches(r, &system.branches)),
        Cubical::Comp(comp) => Syntax::comp(
            comp.hint.clone(),
            r.term(&comp.family, B::DIM),
            r.face(&comp.face, B::NONE),
            r.term(&comp.tube, B::DIM),
            r.term(&comp.base, B::NONE),
        ),
        Cubical::Fill(fill) => Syntax::fill(
            fill.hint.clone(),
            r.term(&fill.family, B::DIM),
            r.face(&fill.face, B::NONE),
            r.term(&fill.tube, B::DIM),
            r.term(&fill.base, B::NONE),
        ),
        Cubical::HComp(hcomp) => Syntax::hcomp(
            r.term(&hcomp.ty, B::NONE),
            r.face(&hcomp.face, B::NONE),
            hcomp.hint.clone(),
            r.term(&hcomp.tube, B::DIM),
            r.term(&hcomp.base, B::NONE),
        ),
        Cubical::Glue(glue) => Syntax::glue(
            r.term(&glue.ty, B::NONE),
            glue.branches
                .iter()
                .map(|b| {
                    GlueBranch::new(
                        r.face(&b.face, B::NONE),
                        r.term(&b.fiber, B::NONE),
                        r.term(&b.equiv, B::NONE),
                    )
                })
                .collect(),
        ),
        Cubical::GlueElem(elem) => {
            let base = r.term(&elem.base, B::NONE);
            Syntax::glue_elem(base, branches(r, &elem.branches))
        }
        Cubical::Unglue(unglue) => Syntax::unglue(
            r.term(&unglue.ty, B::NONE),
            r.term(&unglue.glued, B::NONE),
        ),
        Cubical::Ua(ua) => Syntax::ua(
            r.term(&ua.lhs, B::NONE),
            r.term(&ua.rhs, B::NONE),
            r.term(&ua.equiv, B::NONE),
        ),
        Cubical::UaBeta(beta) => Syntax::ua_beta(
            r.term(&beta.equiv, B::NONE),
            r.term(&beta.argument, B::NONE),
        ),
        Cubical::HitApplication(hit) => Syntax::hit_application(
            hit.hit.clone(),
            hit.constructor.clone(),
            hit.arguments.iter().map(|a| r.term(a, B::NONE)).collect(),
            hit.dimensions.iter().map(|d| r.term(d, B::NONE)).collect(),
        ),
    }
}

/// Call `f` on each immediate child of `term`, in order.
pub fn for_each_child<F>(term: &Term, mut f: F)
where
    F: FnMut(&Term, Binders),
{
    struct Visit<F>(F);

    impl<F: FnMut(&Term, Binders)> Rewrite for Visit<F> {
        fn term(&mut self, term: &Term, binders: Binders) -> Term {
            (self.0)(term, binders);
            term.clone()
        }
    }

    // Rebuilding the parent node is cheap next to visiting its children.
    let _ = map_children(term, &mut Visit(&mut f));
}

/// True if `pred` holds for `term` or any term below it.
pub fn any_subterm<F>(term: &Term, pred: &mut F) -> bool
where
    F: FnMut(&Term) -> bool,
{
    if pred(term) {
        return true;
    }
    let mut found = false;
    for_each_child(term, |child, _| {
        found = found || any_subterm(child, pred);
    });
    found
}
