//! Name resolution: named raw terms to nameless core terms.

use crate::syn::raw::Raw;
#[cfg(feature = "cubical")]
use crate::syn::raw::{RawCubical, RawDim, RawFace};
#[cfg(feature = "cubical")]
use crate::syn::{Branch, Face, GlueBranch};
use crate::common::MetaVariableId;
use crate::syn::{Hint, Syntax, Term};
use std::collections::{BTreeSet, HashSet};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unbound name `{name}` in `{term}`")]
    UnboundName { name: String, term: String },
    #[error("unbound interval variable `{name}` in `{term}`")]
    UnboundDimension { name: String, term: String },
}

impl Error {
    /// Attach the surrounding term, unless a smaller one is already known.
    fn within(mut self, raw: &Raw) -> Error {
        let (Error::UnboundName { term, .. } | Error::UnboundDimension { term, .. }) = &mut self;
        if term.is_empty() {
            *term = raw.to_string();
        }
        self
    }
}

type Result<T> = std::result::Result<T, Error>;

/// Answers whether a name is a declared global constant.
pub trait Globals {
    fn contains(&self, name: &str) -> bool;
}

impl Globals for HashSet<String> {
    fn contains(&self, name: &str) -> bool {
        HashSet::contains(self, name)
    }
}

impl Globals for BTreeSet<String> {
    fn contains(&self, name: &str) -> bool {
        BTreeSet::contains(self, name)
    }
}

impl Globals for [&str] {
    fn contains(&self, name: &str) -> bool {
        self.iter().any(|g| *g == name)
    }
}

/// Treats every name that is not bound as a global.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenGlobals;

impl Globals for OpenGlobals {
    fn contains(&self, _: &str) -> bool {
        true
    }
}

/// Globals decided by a predicate.
pub struct FnGlobals<F>(pub F);

impl<F: Fn(&str) -> bool> Globals for FnGlobals<F> {
    fn contains(&self, name: &str) -> bool {
        (self.0)(name)
    }
}

/// The names in scope, one stack per namespace. Each new name is pushed on
/// the end.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    terms: Vec<String>,
    dims: Vec<String>,
}

impl Scope {
    pub fn new() -> Scope {
        Scope::default()
    }

    /// A scope binding the given term variables, the last one innermost.
    pub fn with_terms<I, S>(names: I) -> Scope
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scope {
            terms: names.into_iter().map(Into::into).collect(),
            dims: Vec::new(),
        }
    }

    fn find(names: &[String], name: &str) -> Option<usize> {
        names.iter().rev().position(|n| n == name)
    }

    fn under<T>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.terms.push(name.to_owned());
        let result = f(self);
        self.terms.pop();
        result
    }

    #[cfg(feature = "cubical")]
    fn under_dim<T>(&mut self, name: &str, f: impl FnOnce(&mut Self) -> T) -> T {
        self.dims.push(name.to_owned());
        let result = f(self);
        self.dims.pop();
        result
    }
}

/// Resolve a closed raw term.
pub fn resolve<G: Globals + ?Sized>(globals: &G, raw: &Raw) -> Result<Term> {
    resolve_in(globals, &mut Scope::new(), raw)
}

/// Resolve a raw term whose free names may be bound by `scope`.
pub fn resolve_in<G: Globals + ?Sized>(globals: &G, scope: &mut Scope, raw: &Raw) -> Result<Term> {
    let mut r = Resolver { globals, scope };
    r.term(raw).map_err(|e| e.within(raw))
}

struct Resolver<'a, G: ?Sized> {
    globals: &'a G,
    scope: &'a mut Scope,
}

impl<G: Globals + ?Sized> Resolver<'_, G> {
    fn name(&self, name: &str) -> Result<Term> {
        if let Some(index) = Scope::find(&self.scope.terms, name) {
            return Ok(Syntax::variable(index));
        }
        if self.globals.contains(name) {
            return Ok(Syntax::global(name));
        }
        Err(Error::UnboundName {
            name: name.to_owned(),
            term: String::new(),
        })
    }

    fn under(&mut self, name: &str, raw: &Raw) -> Result<Term> {
        let globals = self.globals;
        self.scope
            .under(name, |scope| Resolver { globals, scope }.term(raw))
    }

    fn term(&mut self, raw: &Raw) -> Result<Term> {
        if let Raw::Name(_) = raw {
            return self.term_inner(raw);
        }
        self.term_inner(raw).map_err(|e| e.within(raw))
    }

    fn optional(&mut self, raw: Option<&Raw>) -> Result<Option<Term>> {
        raw.map(|r| self.term(r)).transpose()
    }

    fn term_inner(&mut self, raw: &Raw) -> Result<Term> {
        Ok(match raw {
            Raw::Universe(level) => Syntax::universe(*level),
            Raw::Name(name) => self.name(name)?,
            Raw::Metavariable(id) => Syntax::metavariable(MetaVariableId::new(*id), Vec::new()),
            Raw::Pi {
                name,
                source,
                target,
            } => Syntax::pi(name.as_str(), self.term(source)?, self.under(name, target)?),
            Raw::Arrow { source, target } => {
                Syntax::arrow(self.term(source)?, self.term(target)?)
            }
            Raw::Lambda {
                name,
                annotation,
                body,
            } => {
                let body = self.under(name, body)?;
                match self.optional(annotation.as_deref())? {
                    Some(ty) => Syntax::annotated_lambda(name.as_str(), ty, body),
                    None => Syntax::lambda(name.as_str(), body),
                }
            }
            Raw::Application {
                function,
                arguments,
            } => {
                let arguments = arguments
                    .iter()
                    .map(|a| self.term(a))
                    .collect::<Result<Vec<_>>>()?;
                if let Raw::Metavariable(id) = function.as_ref() {
                    Syntax::metavariable(MetaVariableId::new(*id), arguments)
                } else {
                    Syntax::applications(self.term(function)?, arguments)
                }
            }
            Raw::Sigma {
                name,
                first,
                second,
            } => Syntax::sigma(name.as_str(), self.term(first)?, self.under(name, second)?),
            Raw::Pair { first, second } => Syntax::pair(self.term(first)?, self.term(second)?),
            Raw::Fst(pair) => Syntax::fst(self.term(pair)?),
            Raw::Snd(pair) => Syntax::snd(self.term(pair)?),
            Raw::Let {
                name,
                annotation,
                value,
                body,
            } => {
                let annotation = self.optional(annotation.as_deref())?;
                let value = self.term(value)?;
                let body = self.under(name, body)?;
                Syntax::let_in(Hint::new(name.as_str()), annotation, value, body)
            }
            Raw::Id { ty, lhs, rhs } => {
                Syntax::id(self.term(ty)?, self.term(lhs)?, self.term(rhs)?)
            }
            Raw::Refl { ty, point } => Syntax::refl(self.term(ty)?, self.term(point)?),
            Raw::J {
                ty,
                motive,
                base,
                lhs,
                rhs,
                proof,
            } => Syntax::j(
                self.term(ty)?,
                self.term(motive)?,
                self.term(base)?,
                self.term(lhs)?,
                self.term(rhs)?,
                self.term(proof)?,
            ),
            #[cfg(feature = "cubical")]
            Raw::Cubical(c) => self.cubical(c)?,
        })
    }
}

#[cfg(feature = "cubical")]
impl<G: Globals + ?Sized> Resolver<'_, G> {
    fn under_dim(&mut self, name: &str, raw: &Raw) -> Result<Term> {
        let globals = self.globals;
        self.scope
            .under_dim(name, |scope| Resolver { globals, scope }.term(raw))
    }

    fn dim_index(&self, name: &str) -> Result<usize> {
        Scope::find(&self.scope.dims, name).ok_or_else(|| Error::UnboundDimension {
            name: name.to_owned(),
            term: String::new(),
        })
    }

    fn dim(&self, dim: &RawDim) -> Result<Term> {
        Ok(match dim {
            RawDim::Zero => Syntax::dim_zero(),
            RawDim::One => Syntax::dim_one(),
            RawDim::Name(name) => Syntax::dimension(self.dim_index(name)?),
        })
    }

    fn face(&self, face: &RawFace) -> Result<Face> {
        Ok(match face {
            RawFace::Top => Face::Top,
            RawFace::Bot => Face::Bot,
            RawFace::Eq(name, is_one) => {
                Face::atom(crate::common::DimIndex(self.dim_index(name)?), *is_one)
            }
            RawFace::And(l, r) => Face::and(self.face(l)?, self.face(r)?),
            RawFace::Or(l, r) => Face::or(self.face(l)?, self.face(r)?),
        })
    }

    fn branches(&mut self, branches: &[crate::syn::raw::RawBranch]) -> Result<Vec<Branch>> {
        branches
            .iter()
            .map(|b| -> Result<Branch> { Ok(Branch::new(self.face(&b.face)?, self.term(&b.term)?)) })
            .collect()
    }

    fn cubical(&mut self, c: &RawCubical) -> Result<Term> {
        Ok(match c {
            RawCubical::Interval => Syntax::interval(),
            RawCubical::Dim(dim) => self.dim(dim)?,
            RawCubical::Path { ty, lhs, rhs } => {
                Syntax::path(self.term(ty)?, self.term(lhs)?, self.term(rhs)?)
            }
            RawCubical::PathP {
                name,
                family,
                lhs,
                rhs,
            } => Syntax::path_p(
                name.as_str(),
                self.under_dim(name, family)?,
                self.term(lhs)?,
                self.term(rhs)?,
            ),
            RawCubical::PathLambda { name, body } => {
                Syntax::path_lambda(name.as_str(), self.under_dim(name, body)?)
            }
            RawCubical::PathApplication { path, dimension } => {
                Syntax::path_application(self.term(path)?, self.dim(dimension)?)
            }
            RawCubical::Transport { name, family, base } => Syntax::transport(
                name.as_str(),
                self.under_dim(name, family)?,
                self.term(base)?,
            ),
            RawCubical::Partial { face, ty } => Syntax::partial(self.face(face)?, self.term(ty)?),
            RawCubical::System(branches) => Syntax::system(self.branches(branches)?),
            RawCubical::Comp {
                name,
                family,
                face,
                tube,
                base,
            } => Syntax::comp(
                name.as_str(),
                self.under_dim(name, family)?,
                self.face(face)?,
                self.under_dim(name, tube)?,
                self.term(base)?,
            ),
            RawCubical::HComp {
                ty,
                face,
                name,
                tube,
                base,
            } => Syntax::hcomp(
                self.term(ty)?,
                self.face(face)?,
                name.as_str(),
                self.under_dim(name, tube)?,
                self.term(base)?,
            ),
            RawCubical::Fill {
                name,
                family,
                face,
                tube,
                base,
            } => Syntax::fill(
                name.as_str(),
                self.under_dim(name, family)?,
                self.face(face)?,
                self.under_dim(name, tube)?,
                self.term(base)?,
            ),
            RawCubical::Glue { ty, branches } => {
                let ty = self.term(ty)?;
                let branches = branches
                    .iter()
                    .map(|b| -> Result<GlueBranch> {
                        Ok(GlueBranch::new(
                            self.face(&b.face)?,
                            self.term(&b.fiber)?,
                            self.term(&b.equiv)?,
                        ))
                    })
                    .collect::<Result<Vec<_>>>()?;
                Syntax::glue(ty, branches)
            }
            RawCubical::GlueElem { base, branches } => {
                Syntax::glue_elem(self.term(base)?, self.branches(branches)?)
            }
            RawCubical::Unglue { ty, glued } => Syntax::unglue(self.term(ty)?, self.term(glued)?),
            RawCubical::Ua { lhs, rhs, equiv } => {
                Syntax::ua(self.term(lhs)?, self.term(rhs)?, self.term(equiv)?)
            }
            RawCubical::UaBeta { equiv, argument } => {
                Syntax::ua_beta(self.term(equiv)?, self.term(argument)?)
            }
            RawCubical::Hit {
                hit,
                constructor,
                arguments,
                dimensions,
            } => {
                let arguments = arguments
                    .iter()
                    .map(|a| self.term(a))
                    .collect::<Result<Vec<_>>>()?;
                let dimensions = dimensions
                    .iter()
                    .map(|d| self.dim(d))
                    .collect::<Result<Vec<_>>>()?;
                Syntax::hit_application(hit.as_str(), constructor.as_str(), arguments, dimensions)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syn::parse::parse;

    fn read(input: &str, globals: &[&str]) -> Result<Term> {
        resolve(globals, &parse(input).unwrap())
    }

    #[test]
    fn test_bound_names_become_indices() {
        let t = read("(lam x (lam y (x y)))", &[]).unwrap();
        let expected = Syntax::lambda(
            "x",
            Syntax::lambda(
                "y",
                Syntax::application(Syntax::variable(1), Syntax::variable(0)),
            ),
        );
        assert_eq!(t, expected);
    }

    #[test]
    fn test_inner_binder_shadows() {
        let t = read("(lam x (lam x x))", &[]).unwrap();
        assert_eq!(
            t,
            Syntax::lambda("x", Syntax::lambda("x", Syntax::variable(0)))
        );
    }

    #[test]
    fn test_globals_resolve_after_locals() {
        let t = read("(lam f (f g))", &["f", "g"]).unwrap();
        assert_eq!(
            t,
            Syntax::lambda(
                "f",
                Syntax::application(Syntax::variable(0), Syntax::global("g"))
            )
        );
    }

    #[test]
    fn test_unbound_name_reports_surrounding_term() {
        let err = read("(lam x (f x))", &[]).unwrap_err();
        assert_eq!(
            err,
            Error::UnboundName {
                name: "f".to_owned(),
                term: "(f x)".to_owned(),
            }
        );
        let err = read("y", &[]).unwrap_err();
        assert_eq!(
            err,
            Error::UnboundName {
                name: "y".to_owned(),
                term: "y".to_owned(),
            }
        );
    }

    #[test]
    fn test_annotation_is_outside_binder() {
        let t = read("(lam (x x) x)", &["x"]).unwrap();
        assert_eq!(
            t,
            Syntax::annotated_lambda("x", Syntax::global("x"), Syntax::variable(0))
        );
    }

    #[test]
    fn test_applied_metavariable() {
        let t = read("(lam x (?3 x))", &[]).unwrap();
        assert_eq!(
            t,
            Syntax::lambda(
                "x",
                Syntax::metavariable(MetaVariableId(3), vec![Syntax::variable(0)])
            )
        );
    }

    #[test]
    fn test_open_globals() {
        let raw = parse("(f a)").unwrap();
        assert!(resolve(&OpenGlobals, &raw).is_ok());
        let only_f = FnGlobals(|n: &str| n == "f");
        assert!(resolve(&only_f, &raw).is_err());
    }

    #[cfg(feature = "cubical")]
    #[test]
    fn test_namespaces_are_separate() {
        // `i` is bound as an interval variable only, so the term `i` is global.
        let t = read("(plam i (@ (p i) i))", &["p", "i"]).unwrap();
        let expected = Syntax::path_lambda(
            "i",
            Syntax::path_application(
                Syntax::application(Syntax::global("p"), Syntax::global("i")),
                Syntax::dimension(0),
            ),
        );
        assert_eq!(t, expected);
        let err = read("(@ p j)", &["p"]).unwrap_err();
        assert!(matches!(err, Error::UnboundDimension { .. }));
    }

    #[cfg(feature = "cubical")]
    #[test]
    fn test_faces_resolve_and_simplify() {
        let t = read("(plam i (Partial (and (= i 0) (= i 1)) A))", &["A"]).unwrap();
        assert_eq!(
            t,
            Syntax::path_lambda("i", Syntax::partial(Face::Bot, Syntax::global("A")))
        );
    }
}
