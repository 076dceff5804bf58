//! Zonking: substituting metavariable solutions into terms.

use crate::meta::Solutions;
use hott_core::common::MetaVariableId;
use hott_core::subst::under;
use hott_core::syn::traverse::{any_subterm, for_each_child, map_children, Binders, Rewrite};
use hott_core::syn::{Syntax, Term};
use std::collections::BTreeSet;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unsolved metavariables: {}", display_ids(.0))]
    UnsolvedMetas(Vec<MetaVariableId>),
}

fn display_ids(ids: &[MetaVariableId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// True if any metavariable occurs in `term`.
pub fn has_meta(term: &Term) -> bool {
    any_subterm(term, &mut |t| matches!(t.as_ref(), Syntax::Metavariable(_)))
}

/// Every metavariable occurring in `term`.
pub fn collect_metas(term: &Term) -> BTreeSet<MetaVariableId> {
    fn go(term: &Term, out: &mut BTreeSet<MetaVariableId>) {
        if let Syntax::Metavariable(meta) = term.as_ref() {
            out.insert(meta.id);
        }
        for_each_child(term, |child, _| go(child, out));
    }
    let mut out = BTreeSet::new();
    go(term, &mut out);
    out
}

/// Replace every solved metavariable in `term` with its solution, applied to
/// the metavariable's arguments. Unsolved metavariables stay, with their
/// arguments zonked.
pub fn zonk(solutions: &Solutions, term: &Term) -> Term {
    zonk_under(solutions, term, Binders::NONE)
}

/// Zonk a term sitting `depth` binders below the context the solutions were
/// made in.
pub fn zonk_under(solutions: &Solutions, term: &Term, depth: Binders) -> Term {
    if solutions.is_empty() || !has_meta(term) {
        return term.clone();
    }
    Zonk { solutions }.go(term, depth)
}

/// Zonk, then fail if any metavariable remains.
pub fn zonk_full(solutions: &Solutions, term: &Term) -> Result<Term, Error> {
    let term = zonk(solutions, term);
    let unsolved = collect_metas(&term);
    if unsolved.is_empty() {
        Ok(term)
    } else {
        Err(Error::UnsolvedMetas(unsolved.into_iter().collect()))
    }
}

struct Zonk<'a> {
    solutions: &'a Solutions,
}

impl Zonk<'_> {
    fn go(&mut self, term: &Term, depth: Binders) -> Term {
        match term.as_ref() {
            Syntax::Metavariable(meta) => {
                let arguments: Vec<Term> =
                    meta.arguments.iter().map(|a| self.go(a, depth)).collect();
                match self.solutions.get(meta.id) {
                    Some(solution) => {
                        let solution = self.go(solution, Binders::NONE);
                        Syntax::applications(under(depth, &solution), arguments)
                    }
                    None => Syntax::metavariable(meta.id, arguments),
                }
            }
            _ => map_children(term, &mut Under { zonk: self, depth }),
        }
    }
}

struct Under<'r, 'a> {
    zonk: &'r mut Zonk<'a>,
    depth: Binders,
}

impl Rewrite for Under<'_, '_> {
    fn term(&mut self, term: &Term, binders: Binders) -> Term {
        self.zonk.go(term, self.depth + binders)
    }
}
