//! Evaluation of cubical syntax.
//!
//! Composite constructs reduce when a face is decided and stay stuck
//! otherwise: a `⊤` face selects its branch, `⊥` branches are dropped.

use crate::common::DimIndex;
use crate::cubical::hit::hit_boundaries;
use crate::cubical::val::*;
use crate::eval::{eval, run_application, EvalState};
use crate::equal::alpha_eq;
use crate::quote::reify;
use crate::syn::{self, Cubical, Face, Hint, Syntax, Term};
use crate::val::{Closure, Environment, Head, RcValue, Value};
use std::rc::Rc;

/// Level used to read both ends of a type family back when checking it for
/// constancy. It is far beyond any real context, so distinct variables stay
/// distinct.
const FRESH_LEVEL: usize = usize::MAX / 4;

pub(crate) fn eval_cubical(st: &mut EvalState, env: &Environment, c: &Cubical) -> RcValue {
    match c {
        Cubical::Interval => CubicalValue::Interval.into(),
        Cubical::Zero => Rc::new(Value::dim(Dim::Zero)),
        Cubical::One => Rc::new(Value::dim(Dim::One)),
        Cubical::Dimension(dim) => Rc::new(Value::dim(eval_dim(env, dim.index))),
        Cubical::Path(path) => CubicalValue::Path(Path {
            ty: eval(st, env, &path.ty),
            lhs: eval(st, env, &path.lhs),
            rhs: eval(st, env, &path.rhs),
        })
        .into(),
        Cubical::PathP(pathp) => CubicalValue::PathP(PathP {
            hint: pathp.hint.clone(),
            family: Closure::new(env.clone(), pathp.family.clone()),
            lhs: eval(st, env, &pathp.lhs),
            rhs: eval(st, env, &pathp.rhs),
        })
        .into(),
        Cubical::PathLambda(plam) => CubicalValue::PathLambda(PathLambda {
            hint: plam.hint.clone(),
            body: Closure::new(env.clone(), plam.body.clone()),
        })
        .into(),
        Cubical::PathApplication(papp) => {
            let path = eval(st, env, &papp.path);
            let dim = eval_dim_term(st, env, &papp.dimension);
            run_path_application(st, &path, dim)
        }
        Cubical::Transport(tr) => {
            let family = Closure::new(env.clone(), tr.family.clone());
            let base = eval(st, env, &tr.base);
            run_transport(st, tr.hint.clone(), family, base)
        }
        Cubical::Partial(partial) => CubicalValue::Partial(Partial {
            face: eval_face(env, &partial.face),
            ty: eval(st, env, &partial.ty),
        })
        .into(),
        Cubical::System(system) => eval_system(st, env, &system.branches),
        Cubical::Comp(comp) => {
            let comp = eval_comp_parts(st, env, comp);
            run_comp(st, comp)
        }
        Cubical::Fill(fill) => {
            let fill = eval_comp_parts(st, env, fill);
            if fill.face.is_top() {
                CubicalValue::PathLambda(PathLambda {
                    hint: fill.hint,
                    body: fill.tube,
                })
                .into()
            } else {
                CubicalValue::Fill(fill).into()
            }
        }
        Cubical::HComp(hcomp) => eval_hcomp(st, env, hcomp),
        Cubical::Glue(glue) => eval_glue(st, env, glue),
        Cubical::GlueElem(elem) => eval_glue_elem(st, env, elem),
        Cubical::Unglue(unglue) => {
            let glued = eval(st, env, &unglue.glued);
            if let Value::Cubical(CubicalValue::GlueElem(elem)) = glued.as_ref() {
                return elem.base.clone();
            }
            CubicalValue::Unglue(Unglue {
                ty: eval(st, env, &unglue.ty),
                glued,
            })
            .into()
        }
        Cubical::Ua(ua) => CubicalValue::Ua(Ua {
            lhs: eval(st, env, &ua.lhs),
            rhs: eval(st, env, &ua.rhs),
            equiv: eval(st, env, &ua.equiv),
        })
        .into(),
        Cubical::UaBeta(beta) => {
            let equiv = eval(st, env, &beta.equiv);
            let argument = eval(st, env, &beta.argument);
            match equiv.as_ref() {
                Value::Pair(pair) => run_application(st, &pair.first, argument),
                _ => CubicalValue::UaBeta(UaBeta { equiv, argument }).into(),
            }
        }
        Cubical::HitApplication(app) => {
            let arguments = app.arguments.iter().map(|a| eval(st, env, a)).collect();
            let dimensions = app
                .dimensions
                .iter()
                .map(|d| eval_dim_term(st, env, d))
                .collect();
            run_hit(
                st,
                HitPath {
                    hit: app.hit.clone(),
                    constructor: app.constructor.clone(),
                    arguments,
                    dimensions,
                },
            )
        }
    }
}

fn eval_dim(env: &Environment, index: DimIndex) -> Dim {
    match env.get_dim(index) {
        Some(dim) => *dim,
        None => Dim::Free(index.to_negative_level(env.dims_depth())),
    }
}

/// Evaluate a term in interval position.
pub fn eval_dim_term(st: &mut EvalState, env: &Environment, term: &Term) -> Dim {
    match term.as_ref() {
        Syntax::Cubical(Cubical::Zero) => Dim::Zero,
        Syntax::Cubical(Cubical::One) => Dim::One,
        Syntax::Cubical(Cubical::Dimension(dim)) => eval_dim(env, dim.index),
        _ => match eval(st, env, term).as_dim() {
            Some(dim) => dim,
            None => {
                st.impossible(format_args!("interval argument is not an interval term"));
                Dim::Zero
            }
        },
    }
}

/// Evaluate a face. Atoms on endpoints are decided.
pub fn eval_face(env: &Environment, face: &Face) -> FaceValue {
    face.map_atoms(&mut |var: &DimIndex, is_one| match eval_dim(env, *var) {
        Dim::Zero => Face::from_bool(!is_one),
        Dim::One => Face::from_bool(is_one),
        dim => Face::atom(dim, is_one),
    })
}

/// Run a closure binding one dimension.
pub fn run_dim_closure(st: &mut EvalState, closure: &Closure, dim: Dim) -> RcValue {
    let mut env = closure.environment.clone();
    env.push_dim(dim);
    eval(st, &env, &closure.term)
}

pub fn run_path_application(st: &mut EvalState, path: &RcValue, dim: Dim) -> RcValue {
    let stuck = || {
        Rc::new(Value::neutral(
            Head::PathApplication,
            vec![path.clone(), Rc::new(Value::dim(dim))],
        ))
    };
    match path.as_ref() {
        Value::Cubical(CubicalValue::PathLambda(plam)) => run_dim_closure(st, &plam.body, dim),
        Value::Cubical(CubicalValue::Ua(ua)) => match dim {
            Dim::Zero => ua.lhs.clone(),
            Dim::One => ua.rhs.clone(),
            dim => CubicalValue::Glue(Glue {
                ty: ua.rhs.clone(),
                branches: vec![GlueBranch {
                    face: Face::atom(dim, false),
                    fiber: ua.lhs.clone(),
                    equiv: ua.equiv.clone(),
                }],
            })
            .into(),
        },
        Value::Cubical(CubicalValue::Fill(fill)) => match dim {
            Dim::Zero => fill.base.clone(),
            Dim::One => run_comp(st, fill.clone()),
            _ => stuck(),
        },
        Value::Cubical(CubicalValue::HitPath(hit)) => {
            let mut hit = hit.clone();
            hit.dimensions.push(dim);
            run_hit(st, hit)
        }
        Value::Neutral(_) | Value::Cubical(_) => stuck(),
        _ => {
            st.impossible(format_args!("path application of a non-path"));
            stuck()
        }
    }
}

/// Transport along a family that is constant in its dimension is the
/// identity. Any other transport is stuck.
pub fn run_transport(st: &mut EvalState, hint: Hint, family: Closure, base: RcValue) -> RcValue {
    if is_constant_family(st, &family) {
        return base;
    }
    CubicalValue::Transport(Transport { hint, family, base }).into()
}

fn is_constant_family(st: &mut EvalState, family: &Closure) -> bool {
    if !crate::cubical::subst::mentions_dim(0, &family.term) {
        return true;
    }
    let at_zero = run_dim_closure(st, family, Dim::Zero);
    let at_one = run_dim_closure(st, family, Dim::One);
    let at_zero = reify(st, FRESH_LEVEL, FRESH_LEVEL, &at_zero);
    let at_one = reify(st, FRESH_LEVEL, FRESH_LEVEL, &at_one);
    alpha_eq(&at_zero, &at_one)
}

fn eval_comp_parts(st: &mut EvalState, env: &Environment, comp: &syn::Comp) -> Comp {
    Comp {
        hint: comp.hint.clone(),
        family: Closure::new(env.clone(), comp.family.clone()),
        face: eval_face(env, &comp.face),
        tube: Closure::new(env.clone(), comp.tube.clone()),
        base: eval(st, env, &comp.base),
    }
}

/// `comp^i A [φ ↦ u] a`: the tube's end on `⊤`, a transport on `⊥`.
fn run_comp(st: &mut EvalState, comp: Comp) -> RcValue {
    if comp.face.is_top() {
        return run_dim_closure(st, &comp.tube, Dim::One);
    }
    if comp.face.is_bot() {
        return run_transport(st, comp.hint, comp.family, comp.base);
    }
    CubicalValue::Comp(comp).into()
}

fn eval_hcomp(st: &mut EvalState, env: &Environment, hcomp: &syn::HComp) -> RcValue {
    let face = eval_face(env, &hcomp.face);
    let tube = Closure::new(env.clone(), hcomp.tube.clone());
    if face.is_top() {
        return run_dim_closure(st, &tube, Dim::One);
    }
    let base = eval(st, env, &hcomp.base);
    if face.is_bot() {
        return base;
    }
    CubicalValue::HComp(HComp {
        ty: eval(st, env, &hcomp.ty),
        face,
        hint: hcomp.hint.clone(),
        tube,
        base,
    })
    .into()
}

/// Evaluate the branches of a system, stopping at the first branch whose
/// face holds. `Err` carries that branch's value.
fn eval_branches(
    st: &mut EvalState,
    env: &Environment,
    branches: &[syn::Branch],
) -> Result<Vec<Branch>, RcValue> {
    let mut live = Vec::new();
    for branch in branches {
        let face = eval_face(env, &branch.face);
        if face.is_top() {
            return Err(eval(st, env, &branch.term));
        }
        if !face.is_bot() {
            live.push(Branch {
                face,
                value: eval(st, env, &branch.term),
            });
        }
    }
    Ok(live)
}

fn eval_system(st: &mut EvalState, env: &Environment, branches: &[syn::Branch]) -> RcValue {
    match eval_branches(st, env, branches) {
        Err(value) => value,
        Ok(branches) => CubicalValue::System(System { branches }).into(),
    }
}

fn eval_glue(st: &mut EvalState, env: &Environment, glue: &syn::Glue) -> RcValue {
    let mut branches = Vec::new();
    for branch in &glue.branches {
        let face = eval_face(env, &branch.face);
        if face.is_top() {
            return eval(st, env, &branch.fiber);
        }
        if !face.is_bot() {
            branches.push(GlueBranch {
                face,
                fiber: eval(st, env, &branch.fiber),
                equiv: eval(st, env, &branch.equiv),
            });
        }
    }
    let ty = eval(st, env, &glue.ty);
    if branches.is_empty() {
        return ty;
    }
    CubicalValue::Glue(Glue { ty, branches }).into()
}

fn eval_glue_elem(st: &mut EvalState, env: &Environment, elem: &syn::GlueElem) -> RcValue {
    match eval_branches(st, env, &elem.branches) {
        Err(value) => value,
        Ok(branches) => {
            let base = eval(st, env, &elem.base);
            if branches.is_empty() {
                return base;
            }
            CubicalValue::GlueElem(GlueElem { base, branches }).into()
        }
    }
}

/// A path constructor reduces to a boundary as soon as one of its interval
/// arguments is an endpoint, scanning dimensions in order. It stays stuck
/// once it meets a dimension it has no boundary for.
fn run_hit(st: &mut EvalState, hit: HitPath) -> RcValue {
    let Some(boundaries) = hit_boundaries(&hit.hit, &hit.constructor) else {
        return CubicalValue::HitPath(hit).into();
    };
    for (n, dim) in hit.dimensions.iter().enumerate() {
        let Some(boundary) = boundaries.get(n) else {
            break;
        };
        if let Some(is_one) = dim.as_endpoint() {
            let term = if is_one {
                &boundary.at_one
            } else {
                &boundary.at_zero
            };
            let mut env = Environment::new();
            env.extend(hit.arguments.iter().cloned());
            return eval(st, &env, term);
        }
    }
    CubicalValue::HitPath(hit).into()
}
