use crate::common::{Index, Level, MetaVariableId, NegativeLevel, UniverseLevel};
use crate::syn::{Hint, Name, Term};
use std::rc::Rc;

#[cfg(feature = "cubical")]
pub use crate::cubical::val::*;

pub type RcValue = Rc<Value>;

/// An evaluation environment. Term values are stored by level, so that the
/// innermost binding is the last element. Environments are persistent:
/// pushing onto a shared environment copies it first.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    values: Rc<Vec<RcValue>>,
    #[cfg(feature = "cubical")]
    dims: Rc<Vec<Dim>>,
}

impl Environment {
    pub fn new() -> Environment {
        Environment::default()
    }

    /// An environment of `depth` fresh term variables and `dims` fresh
    /// interval variables, in which every bound variable stands for itself.
    pub fn identity(depth: usize, dims: usize) -> Environment {
        let mut env = Environment::new();
        for level in 0..depth {
            env.push(Rc::new(Value::variable(Level::new(level))));
        }
        #[cfg(feature = "cubical")]
        for level in 0..dims {
            env.push_dim(Dim::Level(crate::common::DimLevel::new(level)));
        }
        #[cfg(not(feature = "cubical"))]
        let _ = dims;
        env
    }

    /// The number of term variables bound in this environment.
    pub fn depth(&self) -> usize {
        self.values.len()
    }

    /// The number of interval variables bound in this environment.
    pub fn dims_depth(&self) -> usize {
        #[cfg(feature = "cubical")]
        let depth = self.dims.len();
        #[cfg(not(feature = "cubical"))]
        let depth = 0;
        depth
    }

    pub fn get(&self, index: Index) -> Option<&RcValue> {
        if !index.is_bound(self.depth()) {
            return None;
        }
        self.values.get(usize::from(index.to_level(self.depth())))
    }

    pub fn push(&mut self, value: RcValue) {
        Rc::make_mut(&mut self.values).push(value);
    }

    /// Bind a fresh variable at the next level.
    pub fn push_var(&mut self) {
        let level = Level::new(self.depth());
        self.push(Rc::new(Value::variable(level)));
    }

    pub fn extended(&self, value: RcValue) -> Environment {
        let mut env = self.clone();
        env.push(value);
        env
    }

    #[cfg(feature = "cubical")]
    pub fn push_dim(&mut self, dim: Dim) {
        Rc::make_mut(&mut self.dims).push(dim);
    }

    #[cfg(feature = "cubical")]
    pub fn get_dim(&self, index: crate::common::DimIndex) -> Option<&Dim> {
        if !index.is_bound(self.dims.len()) {
            return None;
        }
        self.dims.get(usize::from(index.to_level(self.dims.len())))
    }

    /// Identity of the term bindings, for use as a cache key.
    pub(crate) fn values_id(&self) -> usize {
        Rc::as_ptr(&self.values) as usize
    }

    /// Identity of the interval bindings, for use as a cache key.
    pub(crate) fn dims_id(&self) -> usize {
        #[cfg(feature = "cubical")]
        let id = Rc::as_ptr(&self.dims) as usize;
        #[cfg(not(feature = "cubical"))]
        let id = 0;
        id
    }
}

impl Extend<RcValue> for Environment {
    fn extend<T: IntoIterator<Item = RcValue>>(&mut self, iter: T) {
        Rc::make_mut(&mut self.values).extend(iter);
    }
}

/// A closure represents a pending evaluation: the term to reduce, and the
/// environment it is to be evaluated under. Running a closure pushes its
/// arguments onto a copy of the environment.
#[derive(Clone, Debug)]
pub struct Closure {
    pub environment: Environment,
    pub term: Term,
}

impl Closure {
    pub fn new(environment: Environment, term: Term) -> Closure {
        Closure { environment, term }
    }
}

/// Values in the semantic domain.
#[derive(Clone, Debug)]
pub enum Value {
    Universe(Universe),
    Pi(Pi),
    Lambda(Lambda),
    Sigma(Sigma),
    Pair(Pair),
    Id(Id),
    Refl(Refl),
    Neutral(Neutral),
    #[cfg(feature = "cubical")]
    Cubical(CubicalValue),
}

impl Value {
    pub fn universe(level: UniverseLevel) -> Value {
        Value::Universe(Universe { level })
    }

    pub fn pi(hint: Hint, source: RcValue, target: Closure) -> Value {
        Value::Pi(Pi {
            hint,
            source,
            target,
        })
    }

    pub fn lambda(hint: Hint, body: Closure) -> Value {
        Value::Lambda(Lambda { hint, body })
    }

    pub fn sigma(hint: Hint, first: RcValue, second: Closure) -> Value {
        Value::Sigma(Sigma {
            hint,
            first,
            second,
        })
    }

    pub fn pair(first: RcValue, second: RcValue) -> Value {
        Value::Pair(Pair { first, second })
    }

    pub fn id(ty: RcValue, lhs: RcValue, rhs: RcValue) -> Value {
        Value::Id(Id { ty, lhs, rhs })
    }

    pub fn refl(ty: RcValue, point: RcValue) -> Value {
        Value::Refl(Refl { ty, point })
    }

    pub fn neutral(head: Head, spine: Vec<RcValue>) -> Value {
        Value::Neutral(Neutral { head, spine })
    }

    /// A bound variable with no arguments.
    pub fn variable(level: Level) -> Value {
        Value::neutral(Head::Variable(level), Vec::new())
    }

    pub fn global(name: Name) -> Value {
        Value::neutral(Head::Global(name), Vec::new())
    }
}

#[derive(Clone, Debug)]
pub struct Universe {
    pub level: UniverseLevel,
}

/// A dependent function type. Written `(x : source) -> target(x)`.
#[derive(Clone, Debug)]
pub struct Pi {
    pub hint: Hint,
    pub source: RcValue,
    pub target: Closure,
}

#[derive(Clone, Debug)]
pub struct Lambda {
    pub hint: Hint,
    pub body: Closure,
}

#[derive(Clone, Debug)]
pub struct Sigma {
    pub hint: Hint,
    pub first: RcValue,
    pub second: Closure,
}

#[derive(Clone, Debug)]
pub struct Pair {
    pub first: RcValue,
    pub second: RcValue,
}

#[derive(Clone, Debug)]
pub struct Id {
    pub ty: RcValue,
    pub lhs: RcValue,
    pub rhs: RcValue,
}

#[derive(Clone, Debug)]
pub struct Refl {
    pub ty: RcValue,
    pub point: RcValue,
}

/// The neutrals represent stuck computations: a head which cannot reduce,
/// and the arguments already applied to it.
#[derive(Clone, Debug)]
pub struct Neutral {
    pub head: Head,
    pub spine: Vec<RcValue>,
}

/// What a neutral is stuck on. Operator heads keep their own operands at the
/// front of the spine: one for `Fst` and `Snd`, six for `J`, two for path and
/// bad applications, and the meta's own arguments for a metavariable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Head {
    /// A variable bound in the environment, by level.
    Variable(Level),
    /// A variable that was free in the evaluated term.
    Free(NegativeLevel),
    Global(Name),
    Metavariable(MetaVariableId, usize),
    Fst,
    Snd,
    J,
    /// An application whose function is not a function.
    BadApplication,
    #[cfg(feature = "cubical")]
    PathApplication,
}

impl Head {
    /// How many leading spine entries are operands of the head itself.
    pub fn arity(&self) -> usize {
        match self {
            Head::Variable(_) | Head::Free(_) | Head::Global(_) => 0,
            Head::Metavariable(_, n) => *n,
            Head::Fst | Head::Snd => 1,
            Head::J => 6,
            Head::BadApplication => 2,
            #[cfg(feature = "cubical")]
            Head::PathApplication => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syn::Syntax;

    #[test]
    fn test_environment_lookup_by_index() {
        let mut env = Environment::new();
        env.push(Rc::new(Value::global("a".into())));
        env.push(Rc::new(Value::global("b".into())));
        let Some(Value::Neutral(n)) = env.get(Index::new(0)).map(AsRef::as_ref) else {
            panic!("expected a neutral");
        };
        assert_eq!(n.head, Head::Global("b".into()));
        assert!(env.get(Index::new(2)).is_none());
    }

    #[test]
    fn test_extension_does_not_mutate_snapshot() {
        let env = Environment::identity(1, 0);
        let closure = Closure::new(env.clone(), Syntax::variable(0));
        let extended = env.extended(Rc::new(Value::global("x".into())));
        assert_eq!(closure.environment.depth(), 1);
        assert_eq!(extended.depth(), 2);
        assert_ne!(closure.environment.values_id(), extended.values_id());
    }

    #[test]
    fn test_identity_environment() {
        let env = Environment::identity(3, 2);
        assert_eq!(env.depth(), 3);
        let Some(Value::Neutral(n)) = env.get(Index::new(0)).map(AsRef::as_ref) else {
            panic!("expected a neutral");
        };
        assert_eq!(n.head, Head::Variable(Level::new(2)));
        #[cfg(feature = "cubical")]
        assert_eq!(env.dims_depth(), 2);
    }
}
