use crate::common::{Index, MetaVariableId, UniverseLevel};
use derive_new::new;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

#[cfg(feature = "cubical")]
use crate::syn::cubical::Cubical;

/// The name of a global constant.
pub type Name = Arc<str>;

/// Syntax is shared, never mutated. Sharing is atomic so that syntax can be
/// stored in the process-wide recursor registry.
pub type Term = Arc<Syntax>;

pub type Tm = Syntax;
pub type Ty = Syntax;

/// A binder's display name. Hints never take part in equality or hashing, so
/// two terms which differ only in their hints compare equal.
#[derive(Clone, Debug)]
pub struct Hint(pub Name);

impl Hint {
    pub fn new(name: impl Into<Name>) -> Hint {
        Hint(name.into())
    }

    pub fn anonymous() -> Hint {
        Hint::new("_")
    }

    /// The hint as printed: an empty hint prints as `_`.
    pub fn as_str(&self) -> &str {
        if self.0.is_empty() {
            "_"
        } else {
            &self.0
        }
    }
}

impl Default for Hint {
    fn default() -> Self {
        Hint::anonymous()
    }
}

impl PartialEq for Hint {
    fn eq(&self, _: &Hint) -> bool {
        true
    }
}

impl Eq for Hint {}

impl Hash for Hint {
    fn hash<H: Hasher>(&self, _: &mut H) {}
}

impl From<&str> for Hint {
    fn from(name: &str) -> Hint {
        Hint::new(name)
    }
}

impl From<String> for Hint {
    fn from(name: String) -> Hint {
        Hint::new(name)
    }
}

impl From<Name> for Hint {
    fn from(name: Name) -> Hint {
        Hint(name)
    }
}

/// The nameless core language.
#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub enum Syntax {
    Universe(Universe),
    Variable(Variable),
    Global(Global),
    Pi(Pi),
    Lambda(Lambda),
    Application(Application),
    Sigma(Sigma),
    Pair(Pair),
    Fst(Fst),
    Snd(Snd),
    Let(Let),
    Id(Id),
    Refl(Refl),
    J(J),
    Metavariable(Metavariable),
    #[cfg(feature = "cubical")]
    Cubical(Cubical),
}

impl Syntax {
    pub fn universe(level: impl Into<UniverseLevel>) -> Term {
        Arc::new(Syntax::Universe(Universe::new(level.into())))
    }

    pub fn variable(index: impl Into<Index>) -> Term {
        Arc::new(Syntax::Variable(Variable::new(index.into())))
    }

    pub fn global(name: impl Into<Name>) -> Term {
        Arc::new(Syntax::Global(Global::new(name.into())))
    }

    pub fn pi(hint: impl Into<Hint>, source: Term, target: Term) -> Term {
        Arc::new(Syntax::Pi(Pi::new(hint.into(), source, target)))
    }

    /// A non-dependent function type.
    pub fn arrow(source: Term, target: Term) -> Term {
        Syntax::pi(Hint::anonymous(), source, crate::subst::shift(1, 0, &target))
    }

    pub fn lambda(hint: impl Into<Hint>, body: Term) -> Term {
        Arc::new(Syntax::Lambda(Lambda::new(hint.into(), None, body)))
    }

    pub fn annotated_lambda(hint: impl Into<Hint>, annotation: Term, body: Term) -> Term {
        Arc::new(Syntax::Lambda(Lambda::new(
            hint.into(),
            Some(annotation),
            body,
        )))
    }

    pub fn application(function: Term, argument: Term) -> Term {
        Arc::new(Syntax::Application(Application::new(function, argument)))
    }

    /// Apply `function` to each argument in turn.
    pub fn applications<I>(function: Term, arguments: I) -> Term
    where
        I: IntoIterator<Item = Term>,
    {
        arguments
            .into_iter()
            .fold(function, |f, a| Syntax::application(f, a))
    }

    pub fn sigma(hint: impl Into<Hint>, first: Term, second: Term) -> Term {
        Arc::new(Syntax::Sigma(Sigma::new(hint.into(), first, second)))
    }

    pub fn pair(first: Term, second: Term) -> Term {
        Arc::new(Syntax::Pair(Pair::new(first, second)))
    }

    pub fn fst(pair: Term) -> Term {
        Arc::new(Syntax::Fst(Fst::new(pair)))
    }

    pub fn snd(pair: Term) -> Term {
        Arc::new(Syntax::Snd(Snd::new(pair)))
    }

    pub fn let_in(
        hint: impl Into<Hint>,
        annotation: Option<Term>,
        value: Term,
        body: Term,
    ) -> Term {
        Arc::new(Syntax::Let(Let::new(hint.into(), annotation, value, body)))
    }

    pub fn id(ty: Term, lhs: Term, rhs: Term) -> Term {
        Arc::new(Syntax::Id(Id::new(ty, lhs, rhs)))
    }

    pub fn refl(ty: Term, point: Term) -> Term {
        Arc::new(Syntax::Refl(Refl::new(ty, point)))
    }

    pub fn j(ty: Term, motive: Term, base: Term, lhs: Term, rhs: Term, proof: Term) -> Term {
        Arc::new(Syntax::J(J::new(ty, motive, base, lhs, rhs, proof)))
    }

    pub fn metavariable(id: MetaVariableId, arguments: Vec<Term>) -> Term {
        Arc::new(Syntax::Metavariable(Metavariable::new(id, arguments)))
    }

    /// Split an application spine into its head and its arguments, in order.
    pub fn spine(term: &Term) -> (&Term, Vec<&Term>) {
        let mut head = term;
        let mut arguments = Vec::new();
        while let Syntax::Application(app) = head.as_ref() {
            arguments.push(&app.argument);
            head = &app.function;
        }
        arguments.reverse();
        (head, arguments)
    }

    /// True if the head of this application spine is a metavariable.
    pub fn is_flexible(term: &Term) -> bool {
        matches!(Syntax::spine(term).0.as_ref(), Syntax::Metavariable(_))
    }
}

/// A universe, the "type of a type".
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Universe {
    pub level: UniverseLevel,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Variable {
    pub index: Index,
}

/// A reference to an externally declared constant.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Global {
    pub name: Name,
}

/// A dependent function type. The target binds one term variable.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Pi {
    pub hint: Hint,
    pub source: Term,
    pub target: Term,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Lambda {
    pub hint: Hint,
    pub annotation: Option<Term>,
    pub body: Term,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Application {
    pub function: Term,
    pub argument: Term,
}

/// A dependent pair type. The second component binds one term variable.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Sigma {
    pub hint: Hint,
    pub first: Term,
    pub second: Term,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Pair {
    pub first: Term,
    pub second: Term,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Fst {
    pub pair: Term,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Snd {
    pub pair: Term,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Let {
    pub hint: Hint,
    pub annotation: Option<Term>,
    pub value: Term,
    pub body: Term,
}

/// The identity type `Id A x y`.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Id {
    pub ty: Term,
    pub lhs: Term,
    pub rhs: Term,
}

#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Refl {
    pub ty: Term,
    pub point: Term,
}

/// The identity eliminator `J A C d x y p`.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct J {
    pub ty: Term,
    pub motive: Term,
    pub base: Term,
    pub lhs: Term,
    pub rhs: Term,
    pub proof: Term,
}

/// A metavariable applied to a spine of arguments.
#[derive(PartialEq, Eq, Hash, Debug, Clone, new)]
pub struct Metavariable {
    pub id: MetaVariableId,
    pub arguments: Vec<Term>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_do_not_affect_equality() {
        let x = Syntax::lambda("x", Syntax::variable(0));
        let y = Syntax::lambda("y", Syntax::variable(0));
        assert_eq!(x, y);
        assert_ne!(x, Syntax::lambda("x", Syntax::variable(1)));
    }

    #[test]
    fn test_globals_compare_by_name() {
        assert_ne!(Syntax::global("a"), Syntax::global("b"));
        assert_eq!(Syntax::global("a"), Syntax::global("a"));
    }

    #[test]
    fn test_spine() {
        let f = Syntax::global("f");
        let app = Syntax::applications(f.clone(), [Syntax::variable(0), Syntax::variable(1)]);
        let (head, args) = Syntax::spine(&app);
        assert_eq!(head, &f);
        assert_eq!(args, vec![&Syntax::variable(0), &Syntax::variable(1)]);
    }

    #[test]
    fn test_flexible() {
        let meta = Syntax::metavariable(MetaVariableId(0), vec![]);
        assert!(Syntax::is_flexible(&Syntax::application(
            meta.clone(),
            Syntax::global("a")
        )));
        assert!(!Syntax::is_flexible(&Syntax::global("a")));
    }

    #[test]
    fn test_arrow_shifts_target() {
        let arrow = Syntax::arrow(Syntax::variable(0), Syntax::variable(0));
        let Syntax::Pi(pi) = arrow.as_ref() else {
            panic!("expected a pi type");
        };
        assert_eq!(pi.target, Syntax::variable(1));
    }

    #[test]
    fn test_empty_hint_prints_as_underscore() {
        assert_eq!(Hint::new("").as_str(), "_");
        assert_eq!(Hint::new("x").as_str(), "x");
    }
}
