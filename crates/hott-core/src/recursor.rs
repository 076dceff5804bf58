//! The process-wide registry of declared eliminators, and the generic
//! ι-reduction it drives.
//!
//! An eliminator `E` for an inductive type with constructors `c1 .. cn` takes
//! its arguments in the order
//!
//! ```text
//! E params.. motive case_c1 .. case_cn indices.. scrutinee extra..
//! ```
//!
//! and reduces when the scrutinee is a fully applied constructor:
//!
//! ```text
//! E .. (ci a1 .. am)  ~>  case_ci a1 [ih1] .. am [ihm] extra..
//! ```
//!
//! where `ihk` is present only for recursive arguments.

use crate::eval::{run_application, run_applications, EvalState};
use crate::syn::Name;
use crate::val::{Head, RcValue, Value};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::rc::Rc;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};
use thiserror::Error;

#[cfg(feature = "cubical")]
use crate::cubical::hit::PathConstructor;

/// Errors raised when registering a malformed recursor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("constructor {constructor} of {eliminator}: recursive argument {position} is out of range for arity {arity}")]
    RecursiveOutOfRange {
        eliminator: Name,
        constructor: Name,
        position: usize,
        arity: usize,
    },

    #[error("constructor {constructor} of {eliminator}: index position {position} is out of range for arity {arity}")]
    IndexOutOfRange {
        eliminator: Name,
        constructor: Name,
        position: usize,
        arity: usize,
    },

    #[error("{eliminator} declares constructor {constructor} twice")]
    DuplicateConstructor { eliminator: Name, constructor: Name },

    #[error("{inductive} already has path constructors through {existing}; {eliminator} cannot declare them again")]
    DuplicateHit {
        inductive: Name,
        existing: Name,
        eliminator: Name,
    },

    #[error("{eliminator} takes {cases} cases but declares {constructors} constructors")]
    TooFewCases {
        eliminator: Name,
        cases: usize,
        constructors: usize,
    },
}

/// A point constructor of an inductive type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructorInfo {
    pub name: Name,
    /// Number of arguments, not counting the type's parameters.
    pub arity: usize,
    /// Positions of the arguments whose type is the inductive type itself.
    pub recursive: Vec<usize>,
    /// For an indexed type: for each recursive argument, the positions of
    /// the arguments that are its indices.
    pub index_positions: BTreeMap<usize, Vec<usize>>,
}

impl ConstructorInfo {
    pub fn new(name: impl Into<Name>, arity: usize, recursive: Vec<usize>) -> ConstructorInfo {
        ConstructorInfo {
            name: name.into(),
            arity,
            recursive,
            index_positions: BTreeMap::new(),
        }
    }

    pub fn with_index_positions(mut self, argument: usize, positions: Vec<usize>) -> Self {
        self.index_positions.insert(argument, positions);
        self
    }
}

/// Everything needed to reduce applications of one eliminator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecursorInfo {
    pub eliminator: Name,
    pub inductive: Name,
    pub params: usize,
    pub indices: usize,
    /// Number of case arguments. Case `k` handles constructor `k`.
    pub cases: usize,
    pub constructors: Vec<ConstructorInfo>,
    #[cfg(feature = "cubical")]
    pub is_hit: bool,
    #[cfg(feature = "cubical")]
    pub path_constructors: Vec<PathConstructor>,
}

impl RecursorInfo {
    /// A recursor with one case per constructor.
    pub fn new(
        eliminator: impl Into<Name>,
        inductive: impl Into<Name>,
        params: usize,
        indices: usize,
        constructors: Vec<ConstructorInfo>,
    ) -> RecursorInfo {
        RecursorInfo {
            eliminator: eliminator.into(),
            inductive: inductive.into(),
            params,
            indices,
            cases: constructors.len(),
            constructors,
            #[cfg(feature = "cubical")]
            is_hit: false,
            #[cfg(feature = "cubical")]
            path_constructors: Vec::new(),
        }
    }

    /// The number of arguments needed before the eliminator can fire.
    pub fn min_arguments(&self) -> usize {
        self.params + 1 + self.cases + self.indices + 1
    }

    fn validate(&self) -> Result<(), Error> {
        if self.cases < self.constructors.len() {
            return Err(Error::TooFewCases {
                eliminator: self.eliminator.clone(),
                cases: self.cases,
                constructors: self.constructors.len(),
            });
        }
        let mut seen = HashSet::new();
        for ctor in &self.constructors {
            if !seen.insert(ctor.name.clone()) {
                return Err(Error::DuplicateConstructor {
                    eliminator: self.eliminator.clone(),
                    constructor: ctor.name.clone(),
                });
            }
            if let Some(&position) = ctor.recursive.iter().find(|&&p| p >= ctor.arity) {
                return Err(Error::RecursiveOutOfRange {
                    eliminator: self.eliminator.clone(),
                    constructor: ctor.name.clone(),
                    position,
                    arity: ctor.arity,
                });
            }
            let positions = ctor
                .index_positions
                .iter()
                .flat_map(|(arg, positions)| std::iter::once(arg).chain(positions));
            for &position in positions {
                if position >= ctor.arity {
                    return Err(Error::IndexOutOfRange {
                        eliminator: self.eliminator.clone(),
                        constructor: ctor.name.clone(),
                        position,
                        arity: ctor.arity,
                    });
                }
            }
        }
        Ok(())
    }
}

type Registry = HashMap<Name, Arc<RecursorInfo>>;

static REGISTRY: LazyLock<RwLock<Registry>> = LazyLock::new(|| RwLock::new(HashMap::new()));

/// Insert a recursor, replacing any previous one of the same name. A higher
/// inductive type has exactly one eliminator carrying its path constructors.
pub fn register(info: RecursorInfo) -> Result<(), Error> {
    info.validate()?;
    let name = info.eliminator.clone();
    let mut registry = REGISTRY.write().unwrap_or_else(PoisonError::into_inner);
    #[cfg(feature = "cubical")]
    if info.is_hit {
        let clash = registry.values().find(|other| {
            other.is_hit && other.inductive == info.inductive && other.eliminator != name
        });
        if let Some(other) = clash {
            return Err(Error::DuplicateHit {
                inductive: info.inductive.clone(),
                existing: other.eliminator.clone(),
                eliminator: name,
            });
        }
    }
    if registry.insert(name.clone(), Arc::new(info)).is_some() {
        log::debug!("replaced recursor {name}");
    } else {
        log::debug!("registered recursor {name}");
    }
    Ok(())
}

pub fn lookup(eliminator: &str) -> Option<Arc<RecursorInfo>> {
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    registry.get(eliminator).cloned()
}

/// Find a registered recursor satisfying `pred`.
pub fn find<F>(pred: F) -> Option<Arc<RecursorInfo>>
where
    F: Fn(&RecursorInfo) -> bool,
{
    let registry = REGISTRY.read().unwrap_or_else(PoisonError::into_inner);
    registry.values().find(|info| pred(info)).cloned()
}

/// Remove every recursor.
pub fn clear() {
    REGISTRY
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .clear();
}

/// Try to fire the ι-rule for `eliminator` applied to `spine`. Returns `None`
/// when the eliminator is unknown, under-applied, or its scrutinee is not a
/// fully applied constructor.
pub fn try_reduce(st: &mut EvalState, eliminator: &Name, spine: &[RcValue]) -> Option<RcValue> {
    let info = lookup(eliminator)?;
    if spine.len() < info.min_arguments() {
        return None;
    }

    let cases_start = info.params + 1;
    let cases = &spine[cases_start..cases_start + info.cases];
    let scrutinee_index = cases_start + info.cases + info.indices;
    let scrutinee = &spine[scrutinee_index];
    let extra = &spine[scrutinee_index + 1..];

    let Value::Neutral(neutral) = scrutinee.as_ref() else {
        return None;
    };
    let Head::Global(ctor_name) = &neutral.head else {
        return None;
    };
    let (ctor_index, ctor) = info
        .constructors
        .iter()
        .enumerate()
        .find(|(_, c)| c.name == *ctor_name && neutral.spine.len() == info.params + c.arity)?;

    log::debug!("ι-reducing {eliminator} on {ctor_name}");
    let args = &neutral.spine[info.params..];
    let mut result = cases[ctor_index].clone();
    for (i, arg) in args.iter().enumerate() {
        result = run_application(st, &result, arg.clone());
        if ctor.recursive.contains(&i) {
            let ih = induction_hypothesis(st, &info, ctor, spine, args, i);
            result = run_application(st, &result, ih);
        }
    }
    Some(run_applications(st, result, extra.iter().cloned()))
}

/// Build `E params.. motive cases.. indices.. args[position]`.
fn induction_hypothesis(
    st: &mut EvalState,
    info: &RecursorInfo,
    ctor: &ConstructorInfo,
    spine: &[RcValue],
    args: &[RcValue],
    position: usize,
) -> RcValue {
    let prefix = spine[..info.params + 1 + info.cases].iter().cloned();
    let head = Rc::new(Value::global(info.eliminator.clone()));
    let mut result = run_applications(st, head, prefix);

    if info.indices > 0 {
        match ctor.index_positions.get(&position) {
            Some(positions) if positions.len() == info.indices => {
                let indices = positions.iter().filter_map(|&p| args.get(p).cloned());
                result = run_applications(st, result, indices);
            }
            _ => {
                // Without positions, assume the indices are the arguments
                // preceding the recursive one.
                let mut taken = 0;
                while taken < position && taken < info.indices {
                    result = run_application(st, &result, args[taken].clone());
                    taken += 1;
                }
                while taken < info.indices && taken < args.len() {
                    result = run_application(st, &result, args[taken].clone());
                    taken += 1;
                }
            }
        }
    }

    run_application(st, &result, args[position].clone())
}

#[cfg(test)]
pub(crate) fn test_guard() -> std::sync::MutexGuard<'static, ()> {
    static LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
    LOCK.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::quote::normalize_with;
    use crate::syn::{Syntax, Term};

    fn norm(t: &Term) -> Term {
        let mut st = EvalState::with_config(&Config::default());
        normalize_with(&mut st, t)
    }

    fn nat(elim: &str) -> RecursorInfo {
        RecursorInfo::new(
            elim,
            "Nat",
            0,
            0,
            vec![
                ConstructorInfo::new("zero", 0, vec![]),
                ConstructorInfo::new("succ", 1, vec![0]),
            ],
        )
    }

    #[test]
    fn test_nat_elim_zero() {
        let _guard = test_guard();
        register(nat("unit-natElim-zero")).unwrap();
        let g = Syntax::global;
        let t = Syntax::applications(
            g("unit-natElim-zero"),
            [g("P"), g("pz"), g("ps"), g("zero")],
        );
        assert_eq!(norm(&t), g("pz"));
    }

    #[test]
    fn test_nat_elim_succ_builds_hypothesis() {
        let _guard = test_guard();
        register(nat("unit-natElim-succ")).unwrap();
        let g = Syntax::global;
        let n = Syntax::variable(0);
        let scrutinee = Syntax::application(g("succ"), n.clone());
        let t = Syntax::applications(
            g("unit-natElim-succ"),
            [g("P"), g("pz"), g("ps"), scrutinee],
        );
        let ih = Syntax::applications(g("unit-natElim-succ"), [g("P"), g("pz"), g("ps"), n.clone()]);
        let expected = Syntax::applications(g("ps"), [n, ih]);
        assert_eq!(norm(&t), expected);
    }

    #[test]
    fn test_extra_arguments_are_applied() {
        let _guard = test_guard();
        register(nat("unit-natElim-extra")).unwrap();
        let g = Syntax::global;
        let t = Syntax::applications(
            g("unit-natElim-extra"),
            [g("P"), g("pz"), g("ps"), g("zero"), g("x")],
        );
        assert_eq!(norm(&t), Syntax::application(g("pz"), g("x")));
    }

    #[test]
    fn test_unregistered_eliminator_is_stuck() {
        let g = Syntax::global;
        let t = Syntax::applications(g("unit-unknownElim"), [g("P"), g("pz"), g("zero")]);
        assert_eq!(norm(&t), t);
    }

    #[test]
    fn test_wrong_arity_constructor_is_stuck() {
        let _guard = test_guard();
        register(nat("unit-natElim-arity")).unwrap();
        let g = Syntax::global;
        let t = Syntax::applications(
            g("unit-natElim-arity"),
            [g("P"), g("pz"), g("ps"), g("succ")],
        );
        assert_eq!(norm(&t), t);
    }

    #[test]
    fn test_indexed_hypothesis_uses_positions() {
        let _guard = test_guard();
        // vecElim A P pnil pcons n v, with vcons n x xs : Vec A (succ n).
        let info = RecursorInfo::new(
            "unit-vecElim",
            "Vec",
            1,
            1,
            vec![
                ConstructorInfo::new("vnil", 0, vec![]),
                ConstructorInfo::new("vcons", 3, vec![2]).with_index_positions(2, vec![0]),
            ],
        );
        register(info).unwrap();
        let g = Syntax::global;
        let cons = Syntax::applications(g("vcons"), [g("A"), g("n"), g("x"), g("xs")]);
        let t = Syntax::applications(
            g("unit-vecElim"),
            [g("A"), g("P"), g("pnil"), g("pcons"), Syntax::application(g("succ"), g("n")), cons],
        );
        let ih = Syntax::applications(
            g("unit-vecElim"),
            [g("A"), g("P"), g("pnil"), g("pcons"), g("n"), g("xs")],
        );
        let expected = Syntax::applications(g("pcons"), [g("n"), g("x"), g("xs"), ih]);
        assert_eq!(norm(&t), expected);
    }

    #[test]
    fn test_validation() {
        let bad = RecursorInfo::new(
            "unit-bad",
            "Bad",
            0,
            0,
            vec![ConstructorInfo::new("mk", 1, vec![1])],
        );
        assert!(matches!(register(bad), Err(Error::RecursiveOutOfRange { .. })));

        let dup = RecursorInfo::new(
            "unit-dup",
            "Dup",
            0,
            0,
            vec![
                ConstructorInfo::new("mk", 0, vec![]),
                ConstructorInfo::new("mk", 0, vec![]),
            ],
        );
        assert!(matches!(register(dup), Err(Error::DuplicateConstructor { .. })));
        assert!(lookup("unit-dup").is_none());
    }

    #[test]
    fn test_register_replaces_and_clear_empties() {
        let _guard = test_guard();
        register(nat("unit-natElim-replace")).unwrap();
        let mut replacement = nat("unit-natElim-replace");
        replacement.inductive = "Nat2".into();
        register(replacement).unwrap();
        let info = lookup("unit-natElim-replace").unwrap();
        assert_eq!(&*info.inductive, "Nat2");
        clear();
        assert!(lookup("unit-natElim-replace").is_none());
    }
}
