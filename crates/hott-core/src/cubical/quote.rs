//! Reification of cubical values.

use crate::cubical::eval::run_dim_closure;
use crate::cubical::val::*;
use crate::eval::EvalState;
use crate::quote::reify;
use crate::syn::{self, Face, Syntax, Term};
use crate::val::Closure;

pub(crate) fn reify_cubical(
    st: &mut EvalState,
    level: usize,
    dlevel: usize,
    value: &CubicalValue,
) -> Term {
    match value {
        CubicalValue::Interval => Syntax::interval(),
        CubicalValue::Dimension(dim) => reify_dim(st, dlevel, *dim),
        CubicalValue::Path(path) => Syntax::path(
            reify(st, level, dlevel, &path.ty),
            reify(st, level, dlevel, &path.lhs),
            reify(st, level, dlevel, &path.rhs),
        ),
        CubicalValue::PathP(pathp) => Syntax::path_p(
            pathp.hint.clone(),
            reify_dim_closure(st, level, dlevel, &pathp.family),
            reify(st, level, dlevel, &pathp.lhs),
            reify(st, level, dlevel, &pathp.rhs),
        ),
        CubicalValue::PathLambda(plam) => Syntax::path_lambda(
            plam.hint.clone(),
            reify_dim_closure(st, level, dlevel, &plam.body),
        ),
        CubicalValue::Transport(tr) => Syntax::transport(
            tr.hint.clone(),
            reify_dim_closure(st, level, dlevel, &tr.family),
            reify(st, level, dlevel, &tr.base),
        ),
        CubicalValue::Partial(partial) => Syntax::partial(
            reify_face(st, dlevel, &partial.face),
            reify(st, level, dlevel, &partial.ty),
        ),
        CubicalValue::System(system) => {
            Syntax::system(reify_branches(st, level, dlevel, &system.branches))
        }
        CubicalValue::Comp(comp) => {
            let (hint, family, face, tube, base) = reify_comp(st, level, dlevel, comp);
            Syntax::comp(hint, family, face, tube, base)
        }
        CubicalValue::Fill(fill) => {
            let (hint, family, face, tube, base) = reify_comp(st, level, dlevel, fill);
            Syntax::fill(hint, family, face, tube, base)
        }
        CubicalValue::HComp(hcomp) => Syntax::hcomp(
            reify(st, level, dlevel, &hcomp.ty),
            reify_face(st, dlevel, &hcomp.face),
            hcomp.hint.clone(),
            reify_dim_closure(st, level, dlevel, &hcomp.tube),
            reify(st, level, dlevel, &hcomp.base),
        ),
        CubicalValue::Glue(glue) => {
            let ty = reify(st, level, dlevel, &glue.ty);
            let branches = glue
                .branches
                .iter()
                .map(|b| {
                    syn::GlueBranch::new(
                        reify_face(st, dlevel, &b.face),
                        reify(st, level, dlevel, &b.fiber),
                        reify(st, level, dlevel, &b.equiv),
                    )
                })
                .collect();
            Syntax::glue(ty, branches)
        }
        CubicalValue::GlueElem(elem) => Syntax::glue_elem(
            reify(st, level, dlevel, &elem.base),
            reify_branches(st, level, dlevel, &elem.branches),
        ),
        CubicalValue::Unglue(unglue) => Syntax::unglue(
            reify(st, level, dlevel, &unglue.ty),
            reify(st, level, dlevel, &unglue.glued),
        ),
        CubicalValue::Ua(ua) => Syntax::ua(
            reify(st, level, dlevel, &ua.lhs),
            reify(st, level, dlevel, &ua.rhs),
            reify(st, level, dlevel, &ua.equiv),
        ),
        CubicalValue::UaBeta(beta) => Syntax::ua_beta(
            reify(st, level, dlevel, &beta.equiv),
            reify(st, level, dlevel, &beta.argument),
        ),
        CubicalValue::HitPath(hit) => {
            let arguments = hit
                .arguments
                .iter()
                .map(|a| reify(st, level, dlevel, a))
                .collect();
            let dimensions = hit
                .dimensions
                .iter()
                .map(|d| reify_dim(st, dlevel, *d))
                .collect();
            Syntax::hit_application(
                hit.hit.clone(),
                hit.constructor.clone(),
                arguments,
                dimensions,
            )
        }
    }
}

pub fn reify_dim(st: &mut EvalState, dlevel: usize, dim: Dim) -> Term {
    match dim {
        Dim::Zero => Syntax::dim_zero(),
        Dim::One => Syntax::dim_one(),
        Dim::Level(l) => {
            if l.is_bound(dlevel) {
                Syntax::dimension(l.to_index(dlevel))
            } else {
                st.impossible(format_args!(
                    "interval variable {l} escapes reification at depth {dlevel}"
                ));
                Syntax::dim_zero()
            }
        }
        Dim::Free(k) => Syntax::dimension(k.to_dim_index(dlevel)),
    }
}

/// Read a face back. Atoms on bound variables become indices; endpoints
/// cannot occur in an evaluated face.
pub fn reify_face(st: &EvalState, dlevel: usize, face: &FaceValue) -> Face {
    face.map_atoms(&mut |dim: &Dim, is_one| match *dim {
        Dim::Zero => Face::from_bool(!is_one),
        Dim::One => Face::from_bool(is_one),
        Dim::Level(l) if l.is_bound(dlevel) => Face::atom(l.to_index(dlevel), is_one),
        Dim::Level(l) => {
            st.impossible(format_args!(
                "interval variable {l} escapes face reification at depth {dlevel}"
            ));
            Face::Bot
        }
        Dim::Free(k) => Face::atom(k.to_dim_index(dlevel), is_one),
    })
}

/// Read back the body of a closure binding one dimension.
pub fn reify_dim_closure(st: &mut EvalState, level: usize, dlevel: usize, closure: &Closure) -> Term {
    let body = run_dim_closure(st, closure, Dim::Level(crate::common::DimLevel::new(dlevel)));
    reify(st, level, dlevel + 1, &body)
}

fn reify_branches(
    st: &mut EvalState,
    level: usize,
    dlevel: usize,
    branches: &[Branch],
) -> Vec<syn::Branch> {
    branches
        .iter()
        .map(|b| syn::Branch::new(reify_face(st, dlevel, &b.face), reify(st, level, dlevel, &b.value)))
        .collect()
}

fn reify_comp(
    st: &mut EvalState,
    level: usize,
    dlevel: usize,
    comp: &Comp,
) -> (syn::Hint, Term, Face, Term, Term) {
    (
        comp.hint.clone(),
        reify_dim_closure(st, level, dlevel, &comp.family),
        reify_face(st, dlevel, &comp.face),
        reify_dim_closure(st, level, dlevel, &comp.tube),
        reify(st, level, dlevel, &comp.base),
    )
}
