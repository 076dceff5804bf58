//! Cubical values.

use crate::common::{DimLevel, NegativeLevel};
use crate::cubical::face::Face;
use crate::syn::{Hint, Name};
use crate::val::{Closure, RcValue, Value};
use std::rc::Rc;

/// The value of an interval term.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dim {
    Zero,
    One,
    /// An interval variable bound in the environment, by level.
    Level(DimLevel),
    /// An interval variable that was free in the evaluated term.
    Free(NegativeLevel),
}

impl Dim {
    pub fn endpoint(is_one: bool) -> Dim {
        if is_one {
            Dim::One
        } else {
            Dim::Zero
        }
    }

    pub fn as_endpoint(self) -> Option<bool> {
        match self {
            Dim::Zero => Some(false),
            Dim::One => Some(true),
            Dim::Level(_) | Dim::Free(_) => None,
        }
    }
}

/// A face over interval values.
pub type FaceValue = Face<Dim>;

#[derive(Clone, Debug)]
pub enum CubicalValue {
    Interval,
    Dimension(Dim),
    Path(Path),
    PathP(PathP),
    PathLambda(PathLambda),
    /// A transport that did not reduce.
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
    /// A ua-beta whose equivalence is not yet a pair.
    UaBeta(UaBeta),
    /// A path constructor at interval arguments which did not reduce.
    HitPath(HitPath),
}

impl Value {
    pub fn cubical(c: CubicalValue) -> Value {
        Value::Cubical(c)
    }

    pub fn dim(dim: Dim) -> Value {
        Value::Cubical(CubicalValue::Dimension(dim))
    }

    /// The interval value this value denotes, if it is one.
    pub fn as_dim(&self) -> Option<Dim> {
        match self {
            Value::Cubical(CubicalValue::Dimension(dim)) => Some(*dim),
            _ => None,
        }
    }
}

impl From<CubicalValue> for RcValue {
    fn from(c: CubicalValue) -> RcValue {
        Rc::new(Value::Cubical(c))
    }
}

#[derive(Clone, Debug)]
pub struct Path {
    pub ty: RcValue,
    pub lhs: RcValue,
    pub rhs: RcValue,
}

/// A dependent path type; the family closure binds one dimension.
#[derive(Clone, Debug)]
pub struct PathP {
    pub hint: Hint,
    pub family: Closure,
    pub lhs: RcValue,
    pub rhs: RcValue,
}

#[derive(Clone, Debug)]
pub struct PathLambda {
    pub hint: Hint,
    pub body: Closure,
}

#[derive(Clone, Debug)]
pub struct Transport {
    pub hint: Hint,
    pub family: Closure,
    pub base: RcValue,
}

#[derive(Clone, Debug)]
pub struct Partial {
    pub face: FaceValue,
    pub ty: RcValue,
}

#[derive(Clone, Debug)]
pub struct Branch {
    pub face: FaceValue,
    pub value: RcValue,
}

#[derive(Clone, Debug)]
pub struct System {
    pub branches: Vec<Branch>,
}

/// A stuck `comp` or `fill`. Family and tube bind one dimension.
#[derive(Clone, Debug)]
pub struct Comp {
    pub hint: Hint,
    pub family: Closure,
    pub face: FaceValue,
    pub tube: Closure,
    pub base: RcValue,
}

#[derive(Clone, Debug)]
pub struct HComp {
    pub ty: RcValue,
    pub face: FaceValue,
    pub hint: Hint,
    pub tube: Closure,
    pub base: RcValue,
}

#[derive(Clone, Debug)]
pub struct GlueBranch {
    pub face: FaceValue,
    pub fiber: RcValue,
    pub equiv: RcValue,
}

#[derive(Clone, Debug)]
pub struct Glue {
    pub ty: RcValue,
    pub branches: Vec<GlueBranch>,
}

#[derive(Clone, Debug)]
pub struct GlueElem {
    pub base: RcValue,
    pub branches: Vec<Branch>,
}

#[derive(Clone, Debug)]
pub struct Unglue {
    pub ty: RcValue,
    pub glued: RcValue,
}

#[derive(Clone, Debug)]
pub struct Ua {
    pub lhs: RcValue,
    pub rhs: RcValue,
    pub equiv: RcValue,
}

#[derive(Clone, Debug)]
pub struct UaBeta {
    pub equiv: RcValue,
    pub argument: RcValue,
}

#[derive(Clone, Debug)]
pub struct HitPath {
    pub hit: Name,
    pub constructor: Name,
    pub arguments: Vec<RcValue>,
    pub dimensions: Vec<Dim>,
}
