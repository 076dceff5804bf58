//! Typing contexts.

use crate::common::Index;
use crate::subst::shift;
use crate::syn::{Hint, Term};
use crate::val::Environment;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub hint: Hint,
    /// The type, scoped over the bindings before this one.
    pub ty: Term,
}

/// A stack of bindings. Index 0 is the innermost.
#[derive(Clone, Debug, Default)]
pub struct Context {
    bindings: Vec<Binding>,
}

impl Context {
    pub fn new() -> Context {
        Context::default()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// The binding for a variable, or `None` if the variable is free.
    pub fn lookup(&self, index: Index) -> Option<&Binding> {
        if !index.is_bound(self.len()) {
            return None;
        }
        self.bindings.get(usize::from(index.to_level(self.len())))
    }

    /// The type of a variable, shifted to be valid in the whole context.
    pub fn type_of(&self, index: Index) -> Option<Term> {
        let binding = self.lookup(index)?;
        let amount = isize::try_from(index.0 + 1).ok()?;
        Some(shift(amount, 0, &binding.ty))
    }

    /// A new context with one more binding.
    #[must_use]
    pub fn extend(&self, hint: impl Into<Hint>, ty: Term) -> Context {
        let mut bindings = self.bindings.clone();
        bindings.push(Binding {
            hint: hint.into(),
            ty,
        });
        Context { bindings }
    }

    /// The context without its innermost binding. Dropping from the empty
    /// context gives the empty context.
    #[must_use]
    pub fn drop(&self) -> Context {
        let mut bindings = self.bindings.clone();
        bindings.pop();
        Context { bindings }
    }

    /// The innermost variable with this name.
    pub fn lookup_name(&self, name: &str) -> Option<(Index, &Binding)> {
        self.iter()
            .enumerate()
            .find(|(_, b)| b.hint.as_str() == name)
            .map(|(i, b)| (Index::new(i), b))
    }

    /// Bindings from the innermost outwards.
    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter().rev()
    }

    /// An environment binding each variable of the context to itself.
    pub fn environment(&self) -> Environment {
        Environment::identity(self.len(), 0)
    }
}
