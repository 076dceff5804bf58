//! Renaming: preparing metavariable solutions for substitution.
//!
//! A metavariable applied to distinct bound variables, `?a x y`, is a
//! pattern. Solving `?a x y = t` means abstracting `t` over `x` and `y`:
//! each pattern variable becomes one of the solution's lambdas, and every
//! other variable of `t` must come from the context the metavariable was
//! created in.

#[cfg(feature = "cubical")]
use hott_core::common::DimIndex;
use hott_core::common::Index;
#[cfg(feature = "cubical")]
use hott_core::syn::{Cubical, Face};
use hott_core::syn::traverse::{map_children, Binders, Rewrite};
use hott_core::syn::{Hint, Syntax, Term};
use std::collections::HashMap;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InversionError {
    /// The argument at this position is not a bound variable.
    #[error("argument {0} of the metavariable is not a variable")]
    NonVariable(usize),
    /// The same variable is passed at both positions.
    #[error("arguments {0} and {1} of the metavariable are the same variable")]
    NonLinear(usize, usize),
    /// The variable is bound between the metavariable's context and the
    /// constraint, and is not one of the pattern variables.
    #[error("variable {0} escapes the scope of the metavariable")]
    Escape(Index),
    #[cfg(feature = "cubical")]
    #[error("interval variable {0} escapes the scope of the metavariable")]
    EscapeDimension(DimIndex),
}

/// A partial renaming from the context of a constraint to the context of a
/// metavariable's solution body.
///
/// The constraint sits `depth` binders below the context the metavariable
/// was created in. The solution body sits `arity` lambdas below that same
/// context.
#[derive(Clone, Debug)]
pub struct Renaming {
    depth: Binders,
    arity: usize,
    /// Pattern variables, as indices in the constraint's context, to the
    /// argument position they were passed at.
    map: HashMap<usize, usize>,
}

impl Renaming {
    /// Invert the arguments of a metavariable occurring `depth` binders
    /// below its own context.
    pub fn invert(arguments: &[Term], depth: Binders) -> Result<Renaming, InversionError> {
        let mut map = HashMap::new();
        for (position, argument) in arguments.iter().enumerate() {
            let Syntax::Variable(var) = argument.as_ref() else {
                return Err(InversionError::NonVariable(position));
            };
            if let Some(first) = map.insert(var.index.0, position) {
                return Err(InversionError::NonLinear(first, position));
            }
        }
        Ok(Renaming {
            depth,
            arity: arguments.len(),
            map,
        })
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn depth(&self) -> Binders {
        self.depth
    }

    /// Rename a term from the constraint's context into the solution body's.
    pub fn apply(&self, term: &Term) -> Result<Term, InversionError> {
        let mut rename = Rename {
            renaming: self,
            error: None,
        };
        let result = rename.go(term, Binders::NONE);
        match rename.error {
            Some(error) => Err(error),
            None => Ok(result),
        }
    }

    /// The solution for a metavariable: the renamed term under one lambda
    /// for each argument.
    pub fn solution(&self, term: &Term) -> Result<Term, InversionError> {
        let body = self.apply(term)?;
        Ok((0..self.arity).fold(body, |body, _| Syntax::lambda(Hint::anonymous(), body)))
    }

    fn rename_variable(&self, index: usize, local: usize) -> Result<usize, InversionError> {
        if index < local {
            return Ok(index);
        }
        let outer = index - local;
        if let Some(position) = self.map.get(&outer) {
            return Ok(self.arity - 1 - position + local);
        }
        if outer < self.depth.terms {
            return Err(InversionError::Escape(Index::new(outer)));
        }
        Ok(outer - self.depth.terms + self.arity + local)
    }

    #[cfg(feature = "cubical")]
    fn rename_dimension(&self, index: usize, local: usize) -> Result<usize, InversionError> {
        if index < local {
            return Ok(index);
        }
        let outer = index - local;
        if outer < self.depth.dims {
            return Err(InversionError::EscapeDimension(DimIndex::new(outer)));
        }
        Ok(index - self.depth.dims)
    }

    /// Invert a pattern `args` at the top level, then rename `term`.
    pub fn invert_pattern(arguments: &[Term], term: &Term) -> Result<Term, InversionError> {
        Renaming::invert(arguments, Binders::NONE)?.solution(term)
    }
}

struct Rename<'a> {
    renaming: &'a Renaming,
    error: Option<InversionError>,
}

impl Rename<'_> {
    fn fail(&mut self, error: InversionError) {
        self.error.get_or_insert(error);
    }

    fn go(&mut self, term: &Term, local: Binders) -> Term {
        match term.as_ref() {
            Syntax::Variable(var) => {
                match self.renaming.rename_variable(var.index.0, local.terms) {
                    Ok(index) => Syntax::variable(index),
                    Err(error) => {
                        self.fail(error);
                        term.clone()
                    }
                }
            }
            #[cfg(feature = "cubical")]
            Syntax::Cubical(Cubical::Dimension(dim)) => {
                match self.renaming.rename_dimension(dim.index.0, local.dims) {
                    Ok(index) => Syntax::dimension(index),
                    Err(error) => {
                        self.fail(error);
                        term.clone()
                    }
                }
            }
            _ => map_children(term, &mut Under { rename: self, local }),
        }
    }
}

struct Under<'r, 'a> {
    rename: &'r mut Rename<'a>,
    local: Binders,
}

impl Rewrite for Under<'_, '_> {
    fn term(&mut self, term: &Term, binders: Binders) -> Term {
        self.rename.go(term, self.local + binders)
    }

    #[cfg(feature = "cubical")]
    fn face(&mut self, face: &Face, binders: Binders) -> Face {
        let local = (self.local + binders).dims;
        let rename = &mut *self.rename;
        face.map_atoms(&mut |var: &DimIndex, is_one| {
            match rename.renaming.rename_dimension(var.0, local) {
                Ok(index) => Face::atom(DimIndex::new(index), is_one),
                Err(error) => {
                    rename.fail(error);
                    Face::atom(*var, is_one)
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(i: usize) -> Term {
        Syntax::variable(i)
    }

    fn app(f: &str, args: Vec<Term>) -> Term {
        Syntax::applications(Syntax::global(f), args)
    }

    #[test]
    fn test_invert_rejects_non_variables() {
        let args = [var(0), Syntax::global("c")];
        assert_eq!(
            Renaming::invert(&args, Binders::NONE).unwrap_err(),
            InversionError::NonVariable(1)
        );
    }

    #[test]
    fn test_invert_rejects_repeated_variables() {
        let args = [var(1), var(0), var(1)];
        assert_eq!(
            Renaming::invert(&args, Binders::NONE).unwrap_err(),
            InversionError::NonLinear(0, 2)
        );
    }

    #[test]
    fn test_pattern_variables_become_lambdas() {
        // ?a {1} {0} = f {1} {0}
        let solution = Renaming::invert_pattern(&[var(1), var(0)], &app("f", vec![var(1), var(0)]));
        assert_eq!(solution.unwrap().to_string(), "(\\_ => (\\_ => (f {1} {0})))");
    }

    #[test]
    fn test_swapped_pattern() {
        // ?a {0} {1} = f {1} {0} gives \_ \_ . f {0} {1}
        let solution = Renaming::invert_pattern(&[var(0), var(1)], &app("f", vec![var(1), var(0)]));
        assert_eq!(solution.unwrap().to_string(), "(\\_ => (\\_ => (f {0} {1})))");
    }

    #[test]
    fn test_other_variables_are_shifted_past_the_lambdas() {
        // ?a {0} = f {0} {3}
        let solution = Renaming::invert_pattern(&[var(0)], &app("f", vec![var(0), var(3)]));
        assert_eq!(solution.unwrap().to_string(), "(\\_ => (f {0} {4}))");
    }

    #[test]
    fn test_binders_inside_the_term_are_kept() {
        // ?a {0} = \y => f y {1}
        let term = Syntax::lambda("y", app("f", vec![var(0), var(1)]));
        let solution = Renaming::invert_pattern(&[var(0)], &term).unwrap();
        assert_eq!(solution.to_string(), "(\\_ => (\\y => (f {0} {1})))");
    }

    #[test]
    fn test_variables_bound_during_unification_escape() {
        // One binder was crossed, and {0} refers to it but is not a pattern
        // variable.
        let renaming = Renaming::invert(&[], Binders::TERM).unwrap();
        assert_eq!(
            renaming.apply(&app("f", vec![var(0)])).unwrap_err(),
            InversionError::Escape(Index::new(0))
        );
        // {1} is outside the crossed binder and comes down by one.
        assert_eq!(renaming.apply(&var(1)).unwrap(), var(0));
    }

    #[test]
    fn test_local_pattern_variables_do_not_escape() {
        // ?a {0} under one crossed binder, where {0} is that binder.
        let renaming = Renaming::invert(&[var(0)], Binders::TERM).unwrap();
        let solution = renaming.solution(&app("f", vec![var(0), var(2)])).unwrap();
        assert_eq!(solution.to_string(), "(\\_ => (f {0} {2}))");
    }

    #[cfg(feature = "cubical")]
    #[test]
    fn test_interval_variables_escape() {
        let renaming = Renaming::invert(&[], Binders::DIM).unwrap();
        assert_eq!(
            renaming.apply(&Syntax::dimension(0)).unwrap_err(),
            InversionError::EscapeDimension(DimIndex::new(0))
        );
        assert_eq!(renaming.apply(&Syntax::dimension(1)).unwrap(), Syntax::dimension(0));
        // Interval variables bound inside the term are kept.
        let plam = Syntax::path_lambda("i", Syntax::dimension(0));
        assert_eq!(renaming.apply(&plam).unwrap(), plam);
    }
}
