//! Higher inductive types: declarations of path constructors and their
//! boundaries, stored alongside the type's recursor.

use crate::recursor::{self, ConstructorInfo, RecursorInfo};
use crate::syn::{Name, Term};

/// The endpoints of one dimension of a path constructor. Both terms are
/// scoped over the constructor's term arguments, the last argument being
/// variable `{0}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Boundary {
    pub at_zero: Term,
    pub at_one: Term,
}

impl Boundary {
    pub fn new(at_zero: Term, at_one: Term) -> Boundary {
        Boundary { at_zero, at_one }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathConstructor {
    pub name: Name,
    /// Number of term arguments.
    pub arity: usize,
    /// Number of interval arguments.
    pub dimension: usize,
    /// One boundary per dimension.
    pub boundaries: Vec<Boundary>,
}

impl PathConstructor {
    pub fn new(name: impl Into<Name>, arity: usize, boundaries: Vec<Boundary>) -> PathConstructor {
        PathConstructor {
            name: name.into(),
            arity,
            dimension: boundaries.len(),
            boundaries,
        }
    }
}

/// A higher inductive type declaration.
#[derive(Clone, Debug)]
pub struct HitSpec {
    pub name: Name,
    pub eliminator: Name,
    pub params: usize,
    pub constructors: Vec<ConstructorInfo>,
    pub path_constructors: Vec<PathConstructor>,
}

impl HitSpec {
    pub fn new(name: impl Into<Name>, eliminator: impl Into<Name>) -> HitSpec {
        HitSpec {
            name: name.into(),
            eliminator: eliminator.into(),
            params: 0,
            constructors: Vec::new(),
            path_constructors: Vec::new(),
        }
    }

    pub fn with_params(mut self, params: usize) -> Self {
        self.params = params;
        self
    }

    pub fn point(mut self, ctor: ConstructorInfo) -> Self {
        self.constructors.push(ctor);
        self
    }

    pub fn path(mut self, ctor: PathConstructor) -> Self {
        self.path_constructors.push(ctor);
        self
    }

    pub fn recursor_info(&self) -> RecursorInfo {
        let mut info = RecursorInfo::new(
            self.eliminator.clone(),
            self.name.clone(),
            self.params,
            0,
            self.constructors.clone(),
        );
        info.is_hit = true;
        info.path_constructors = self.path_constructors.clone();
        info
    }

    /// Register the type's recursor, making its path constructors compute.
    pub fn register(&self) -> Result<(), recursor::Error> {
        recursor::register(self.recursor_info())
    }
}

/// The boundaries of a path constructor of a registered HIT.
pub fn hit_boundaries(hit: &str, constructor: &str) -> Option<Vec<Boundary>> {
    let info = recursor::find(|info| info.is_hit && &*info.inductive == hit)?;
    info.path_constructors
        .iter()
        .find(|pc| &*pc.name == constructor)
        .map(|pc| pc.boundaries.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syn::Syntax;

    #[test]
    fn test_boundaries_lookup() {
        let _guard = recursor::test_guard();
        let base = Syntax::global("unit-S1-base");
        HitSpec::new("unit-S1", "unit-S1-elim")
            .point(ConstructorInfo::new("unit-S1-base", 0, vec![]))
            .path(PathConstructor::new(
                "loop",
                0,
                vec![Boundary::new(base.clone(), base.clone())],
            ))
            .register()
            .unwrap();
        let boundaries = hit_boundaries("unit-S1", "loop").unwrap();
        assert_eq!(boundaries, vec![Boundary::new(base.clone(), base)]);
        assert!(hit_boundaries("unit-S1", "other").is_none());
        assert!(hit_boundaries("unit-nothing", "loop").is_none());
    }

    #[test]
    fn test_second_eliminator_for_a_hit_is_rejected() {
        let _guard = recursor::test_guard();
        let base = Syntax::global("unit-I-zero");
        let declare = |eliminator: &str, at_one: &str| {
            HitSpec::new("unit-I", eliminator)
                .point(ConstructorInfo::new("unit-I-zero", 0, vec![]))
                .path(PathConstructor::new(
                    "seg",
                    0,
                    vec![Boundary::new(base.clone(), Syntax::global(at_one))],
                ))
        };
        declare("unit-I-elim", "unit-I-one").register().unwrap();
        // Re-registering under the same eliminator replaces it.
        declare("unit-I-elim", "unit-I-one").register().unwrap();

        let err = declare("unit-I-rec", "unit-I-other").register().unwrap_err();
        assert!(matches!(err, recursor::Error::DuplicateHit { .. }));
        assert!(recursor::lookup("unit-I-rec").is_none());
        let boundaries = hit_boundaries("unit-I", "seg").unwrap();
        assert_eq!(boundaries[0].at_one, Syntax::global("unit-I-one"));
    }
}
