//! Cubical syntax: the interval, path types, composition, glue and HITs.
//!
//! Fields documented as "binds a dimension" are under one interval binder;
//! no cubical construct binds a term variable.

use crate::common::DimIndex;
use crate::syn::basic::{Hint, Name, Syntax, Term};
use derive_new::new;
use std::sync::Arc;

pub use crate::cubical::face::Face;

#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub enum Cubical {
    /// The interval type `I`.
    Interval,
    Zero,
    One,
    Dimension(Dimension),
    Path(Path),
    PathP(PathP),
    PathLambda(PathLambda),
    PathApplication(PathApplication),
    Transport(Transport),
    Partial(Partial),
    System(System),
    Comp(Comp),
    HComp(HComp),
    Fill(Comp),
    Glue(Glue),
    GlueElem(GlueElem),
    Unglue(Unglue),
    Ua(Ua),
    UaBeta(UaBeta),
    HitApplication(HitApplication),
}

impl Syntax {
    fn cubical(c: Cubical) -> Term {
        Arc::new(Syntax::Cubical(c))
    }

    pub fn interval() -> Term {
        Syntax::cubical(Cubical::Interval)
    }

    pub fn dim_zero() -> Term {
        Syntax::cubical(Cubical::Zero)
    }

    pub fn dim_one() -> Term {
        Syntax::cubical(Cubical::One)
    }

    /// The endpoint `i1` if `is_one`, otherwise `i0`.
    pub fn endpoint(is_one: bool) -> Term {
        if is_one {
            Syntax::dim_one()
        } else {
            Syntax::dim_zero()
        }
    }

    pub fn dimension(index: impl Into<DimIndex>) -> Term {
        Syntax::cubical(Cubical::Dimension(Dimension::new(index.into())))
    }

    pub fn path(ty: Term, lhs: Term, rhs: Term) -> Term {
        Syntax::cubical(Cubical::Path(Path::new(ty, lhs, rhs)))
    }

    pub fn path_p(hint: impl Into<Hint>, family: Term, lhs: Term, rhs: Term) -> Term {
        Syntax::cubical(Cubical::PathP(PathP::new(hint.into(), family, lhs, rhs)))
    }

    pub fn path_lambda(hint: impl Into<Hint>, body: Term) -> Term {
        Syntax::cubical(Cubical::PathLambda(PathLambda::new(hint.into(), body)))
    }

    pub fn path_application(path: Term, dimension: Term) -> Term {
        Syntax::cubical(Cubical::PathApplication(PathApplication::new(
            path, dimension,
        )))
    }

    pub fn transport(hint: impl Into<Hint>, family: Term, base: Term) -> Term {
        Syntax::cubical(Cubical::Transport(Transport::new(hint.into(), family, base)))
    }

    pub fn partial(face: Face, ty: Term) -> Term {
        Syntax::cubical(Cubical::Partial(Partial::new(face, ty)))
    }

    pub fn system(branches: Vec<Branch>) -> Term {
        Syntax::cubical(Cubical::System(System::new(branches)))
    }

    pub fn comp(hint: impl Into<Hint>, family: Term, face: Face, tube: Term, base: Term) -> Term {
        Syntax::cubical(Cubical::Comp(Comp::new(hint.into(), family, face, tube, base)))
    }

    pub fn hcomp(ty: Term, face: Face, hint: impl Into<Hint>, tube: Term, base: Term) -> Term {
        Syntax::cubical(Cubical::HComp(HComp::new(ty, face, hint.into(), tube, base)))
    }

    pub fn fill(hint: impl Into<Hint>, family: Term, face: Face, tube: Term, base: Term) -> Term {
        Syntax::cubical(Cubical::Fill(Comp::new(hint.into(), family, face, tube, base)))
    }

    pub fn glue(ty: Term, branches: Vec<GlueBranch>) -> Term {
        Syntax::cubical(Cubical::Glue(Glue::new(ty, branches)))
    }

    pub fn glue_elem(base: Term, branches: Vec<Branch>) -> Term {
        Syntax::cubical(Cubical::GlueElem(GlueElem::new(base, branches)))
    }

    pub fn unglue(ty: Term, glued: Term) -> Term {
        Syntax::cubical(Cubical::Unglue(Unglue::new(ty, glued)))
    }

    pub fn ua(lhs: Term, rhs: Term, equiv: Term) -> Term {
        Syntax::cubical(Cubical::Ua(Ua::new(lhs, rhs, equiv)))
    }

    pub fn ua_beta(equiv: Term, argument: Term) -> Term {
        Syntax::cubical(Cubical::UaBeta(UaBeta::new(equiv, argument)))
    }

    pub fn hit_application(
        hit: impl Into<Name>,
        constructor: impl Into<Name>,
        arguments: Vec<Term>,
        dimensions: Vec<Term>,
    ) -> Term {
        Syntax::cubical(Cubical::HitApplication(HitApplication::new(
            hit.into(),
            constructor.into(),
            arguments,
            dimensions,
        )))
    }

    /// If this term is `i0` or `i1`, which one.
    pub fn as_endpoint(&self) -> Option<bool> {
        match self {
            Syntax::Cubical(Cubical::Zero) => Some(false),
            Syntax::Cubical(Cubical::One) => Some(true),
            _ => None,
        }
    }
}

/// An interval variable.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Dimension {
    pub index: DimIndex,
}

/// The non-dependent path type `Path A x y`.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Path {
    pub ty: Term,
    pub lhs: Term,
    pub rhs: Term,
}

/// The dependent path type. The family binds a dimension.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct PathP {
    pub hint: Hint,
    pub family: Term,
    pub lhs: Term,
    pub rhs: Term,
}

/// `<i> t`. The body binds a dimension.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct PathLambda {
    pub hint: Hint,
    pub body: Term,
}

/// `p @ r`.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct PathApplication {
    pub path: Term,
    pub dimension: Term,
}

/// Transport along a line of types. The family binds a dimension.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Transport {
    pub hint: Hint,
    pub family: Term,
    pub base: Term,
}

/// The type of partial elements of `ty` defined on `face`.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Partial {
    pub face: Face,
    pub ty: Term,
}

/// A face paired with the term that is valid on it.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Branch {
    pub face: Face,
    pub term: Term,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct System {
    pub branches: Vec<Branch>,
}

/// Heterogeneous composition, also used for `fill`. The family and the tube
/// bind a dimension, the face does not.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Comp {
    pub hint: Hint,
    pub family: Term,
    pub face: Face,
    pub tube: Term,
    pub base: Term,
}

/// Homogeneous composition. Only the tube binds a dimension.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct HComp {
    pub ty: Term,
    pub face: Face,
    pub hint: Hint,
    pub tube: Term,
    pub base: Term,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct GlueBranch {
    pub face: Face,
    pub fiber: Term,
    pub equiv: Term,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Glue {
    pub ty: Term,
    pub branches: Vec<GlueBranch>,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct GlueElem {
    pub base: Term,
    pub branches: Vec<Branch>,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Unglue {
    pub ty: Term,
    pub glued: Term,
}

/// Univalence: the path `A = B` induced by `equiv : A ≃ B`.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Ua {
    pub lhs: Term,
    pub rhs: Term,
    pub equiv: Term,
}

/// The computation rule `transport (ua e) a ⇝ fst e a`.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct UaBeta {
    pub equiv: Term,
    pub argument: Term,
}

/// A path constructor of a higher inductive type applied to term and
/// interval arguments.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct HitApplication {
    pub hit: Name,
    pub constructor: Name,
    pub arguments: Vec<Term>,
    pub dimensions: Vec<Term>,
}
