//! Higher-order pattern unification.
//!
//! Constraints are solved from a FIFO worklist. A constraint whose sides are
//! not yet decidable, because a metavariable is applied to something other
//! than distinct variables or sits in a position the structural rules do
//! not cover, is set aside. Every new solution puts the set-aside
//! constraints back on the worklist.

use crate::meta::Solutions;
use crate::occurs_check::occurs;
use crate::renaming::Renaming;
use crate::zonk::{has_meta, zonk_under};
use derive_new::new;
use elegance::{Printer, Render};
use hott_core::common::MetaVariableId;
use hott_core::syn::traverse::Binders;
#[cfg(feature = "cubical")]
use hott_core::syn::Cubical;
use hott_core::syn::{Syntax, Term};
use hott_core::{alpha_eq, normalize};
use hott_support::{Pretty, PP};
use std::collections::VecDeque;
use std::fmt;

/// An equation between two terms, `depth` binders below the context the
/// metavariables were created in.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constraint {
    pub lhs: Term,
    pub rhs: Term,
    pub depth: Binders,
}

impl Constraint {
    pub fn new(lhs: Term, rhs: Term) -> Constraint {
        Constraint::under(lhs, rhs, Binders::NONE)
    }

    pub fn under(lhs: Term, rhs: Term, depth: Binders) -> Constraint {
        Constraint { lhs, rhs, depth }
    }
}

impl PP for Constraint {
    fn print<R: Render>(&self, p: &mut Printer<R>) -> Result<(), R::Error> {
        p.igroup(0, |p| {
            self.lhs.print(p)?;
            p.text(" ≡")?;
            p.space()?;
            self.rhs.print(p)
        })
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Pretty(self).fmt(f)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UnifyError {
    /// Two rigid terms with different shapes.
    #[error("cannot unify {0} with {1}")]
    Mismatch(Term, Term),
    /// Solving the metavariable would make it part of its own solution.
    #[error("{0} occurs in {1}")]
    OccursCheck(MetaVariableId, Term),
    /// A solved metavariable met a closed term its solution disagrees with.
    #[error("{0} was solved as {1}, but must also be {2}")]
    InconsistentSolution(MetaVariableId, Term, Term),
}

/// The outcome of solving a set of constraints.
#[derive(Clone, Debug, Default)]
pub struct UnifyResult {
    pub solved: Solutions,
    /// Constraints that could be neither solved nor refuted.
    pub unsolved: Vec<Constraint>,
    pub errors: Vec<UnifyError>,
}

impl UnifyResult {
    /// No errors and nothing left over.
    pub fn is_success(&self) -> bool {
        self.unsolved.is_empty() && self.errors.is_empty()
    }
}

/// A metavariable applied to arguments, either directly or through an
/// application spine.
#[derive(new)]
struct Flex {
    id: MetaVariableId,
    arguments: Vec<Term>,
}

impl Flex {
    fn of(term: &Term) -> Option<Flex> {
        let (head, spine) = Syntax::spine(term);
        let Syntax::Metavariable(meta) = head.as_ref() else {
            return None;
        };
        let mut arguments = meta.arguments.clone();
        arguments.extend(spine.into_iter().cloned());
        Some(Flex::new(meta.id, arguments))
    }
}

type Step = Result<(), UnifyError>;

#[derive(Debug, Default)]
pub struct Unifier {
    solutions: Solutions,
    worklist: VecDeque<Constraint>,
    unsolved: Vec<Constraint>,
    errors: Vec<UnifyError>,
}

impl Unifier {
    pub fn new() -> Unifier {
        Unifier::default()
    }

    /// Start from solutions found earlier.
    pub fn with_solutions(solutions: Solutions) -> Unifier {
        Unifier {
            solutions,
            ..Unifier::default()
        }
    }

    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.worklist.push_back(constraint);
    }

    pub fn solution(&self, id: MetaVariableId) -> Option<&Term> {
        self.solutions.get(id)
    }

    pub fn solutions(&self) -> &Solutions {
        &self.solutions
    }

    /// Run the worklist to exhaustion.
    pub fn solve(mut self) -> UnifyResult {
        while let Some(constraint) = self.worklist.pop_front() {
            let Constraint { lhs, rhs, depth } = self.prepare(&constraint);
            log::trace!("unify {} ≡ {}", lhs, rhs);
            if let Err(error) = self.unify(&lhs, &rhs, depth) {
                log::debug!("unification failed: {error}");
                self.errors.push(error);
            }
        }
        UnifyResult {
            solved: self.solutions,
            unsolved: self.unsolved,
            errors: self.errors,
        }
    }

    /// Bring a constraint up to date with the current solutions.
    fn prepare(&self, constraint: &Constraint) -> Constraint {
        let depth = constraint.depth;
        let lhs = zonk_under(&self.solutions, &constraint.lhs, depth);
        let rhs = zonk_under(&self.solutions, &constraint.rhs, depth);
        if has_meta(&lhs) || has_meta(&rhs) {
            Constraint::under(lhs, rhs, depth)
        } else {
            Constraint::under(normalize(&lhs), normalize(&rhs), depth)
        }
    }

    fn defer(&mut self, lhs: &Term, rhs: &Term, depth: Binders) {
        log::debug!("deferring {} ≡ {}", lhs, rhs);
        self.unsolved
            .push(Constraint::under(lhs.clone(), rhs.clone(), depth));
    }

    fn unify(&mut self, lhs: &Term, rhs: &Term, depth: Binders) -> Step {
        if alpha_eq(lhs, rhs) {
            return Ok(());
        }
        if let Some(flex) = Flex::of(lhs) {
            return self.solve_meta(flex, lhs, rhs, depth);
        }
        if let Some(flex) = Flex::of(rhs) {
            return self.solve_meta(flex, rhs, lhs, depth);
        }
        let under = |b: Binders| depth + b;
        match (lhs.as_ref(), rhs.as_ref()) {
            (Syntax::Variable(_), Syntax::Variable(_))
            | (Syntax::Global(_), Syntax::Global(_))
            | (Syntax::Universe(_), Syntax::Universe(_)) => Err(mismatch(lhs, rhs)),
            (Syntax::Pi(l), Syntax::Pi(r)) => {
                self.unify(&l.source, &r.source, depth)?;
                self.unify(&l.target, &r.target, under(Binders::TERM))
            }
            (Syntax::Lambda(l), Syntax::Lambda(r)) => {
                self.unify(&l.body, &r.body, under(Binders::TERM))
            }
            (Syntax::Application(l), Syntax::Application(r)) => {
                self.unify(&l.function, &r.function, depth)?;
                self.unify(&l.argument, &r.argument, depth)
            }
            (Syntax::Sigma(l), Syntax::Sigma(r)) => {
                self.unify(&l.first, &r.first, depth)?;
                self.unify(&l.second, &r.second, under(Binders::TERM))
            }
            (Syntax::Pair(l), Syntax::Pair(r)) => {
                self.unify(&l.first, &r.first, depth)?;
                self.unify(&l.second, &r.second, depth)
            }
            (Syntax::Fst(l), Syntax::Fst(r)) => self.unify(&l.pair, &r.pair, depth),
            (Syntax::Snd(l), Syntax::Snd(r)) => self.unify(&l.pair, &r.pair, depth),
            (Syntax::Id(l), Syntax::Id(r)) => {
                self.unify(&l.ty, &r.ty, depth)?;
                self.unify(&l.lhs, &r.lhs, depth)?;
                self.unify(&l.rhs, &r.rhs, depth)
            }
            (Syntax::Refl(l), Syntax::Refl(r)) => {
                self.unify(&l.ty, &r.ty, depth)?;
                self.unify(&l.point, &r.point, depth)
            }
            #[cfg(feature = "cubical")]
            (Syntax::Cubical(Cubical::Path(l)), Syntax::Cubical(Cubical::Path(r))) => {
                self.unify(&l.ty, &r.ty, depth)?;
                self.unify(&l.lhs, &r.lhs, depth)?;
                self.unify(&l.rhs, &r.rhs, depth)
            }
            #[cfg(feature = "cubical")]
            (Syntax::Cubical(Cubical::PathP(l)), Syntax::Cubical(Cubical::PathP(r))) => {
                self.unify(&l.family, &r.family, under(Binders::DIM))?;
                self.unify(&l.lhs, &r.lhs, depth)?;
                self.unify(&l.rhs, &r.rhs, depth)
            }
            _ if is_structural(lhs) && is_structural(rhs) => Err(mismatch(lhs, rhs)),
            _ => {
                self.defer(lhs, rhs, depth);
                Ok(())
            }
        }
    }

    /// Solve `flex ≡ other`, where `term` is the flexible side as written.
    fn solve_meta(&mut self, flex: Flex, term: &Term, other: &Term, depth: Binders) -> Step {
        let Flex { id, arguments } = flex;

        if let Some(existing) = self.solutions.get(id).cloned() {
            let solved = zonk_under(&self.solutions, term, depth);
            if has_meta(&solved) || has_meta(other) {
                return self.unify(&normalize(&solved), other, depth);
            }
            return if alpha_eq(&normalize(&solved), &normalize(other)) {
                Ok(())
            } else {
                Err(UnifyError::InconsistentSolution(id, existing, other.clone()))
            };
        }

        // Earlier solutions may have rewritten either side since the
        // constraint was queued.
        let arguments: Vec<Term> = arguments
            .iter()
            .map(|argument| zonk_under(&self.solutions, argument, depth))
            .collect();
        let term = &Syntax::metavariable(id, arguments.clone());
        let other = &zonk_under(&self.solutions, other, depth);
        let other = &if has_meta(other) { other.clone() } else { normalize(other) };

        if let Some(other_flex) = Flex::of(other) {
            if other_flex.id == id {
                let same = other_flex.arguments.len() == arguments.len()
                    && arguments
                        .iter()
                        .zip(&other_flex.arguments)
                        .all(|(a, b)| alpha_eq(a, b));
                if same {
                    return Ok(());
                }
                self.defer(term, other, depth);
                return Ok(());
            }
        }

        if occurs(id, other) {
            return Err(UnifyError::OccursCheck(id, other.clone()));
        }

        let solution = match Renaming::invert(&arguments, depth).and_then(|r| r.solution(other)) {
            Ok(solution) => solution,
            Err(reason) => {
                log::debug!("{id} is not solvable yet: {reason}");
                self.defer(term, other, depth);
                return Ok(());
            }
        };

        log::debug!("solved {id} := {solution}");
        self.solutions.insert(id, solution);
        self.replay();
        Ok(())
    }

    /// Move every set-aside constraint back onto the worklist.
    fn replay(&mut self) {
        if !self.unsolved.is_empty() {
            log::debug!("replaying {} deferred constraints", self.unsolved.len());
            self.worklist.extend(self.unsolved.drain(..));
        }
    }
}

fn mismatch(lhs: &Term, rhs: &Term) -> UnifyError {
    UnifyError::Mismatch(lhs.clone(), rhs.clone())
}

/// Forms the structural rules decide. Two of these with different heads can
/// never be made equal.
fn is_structural(term: &Term) -> bool {
    match term.as_ref() {
        Syntax::Variable(_)
        | Syntax::Global(_)
        | Syntax::Universe(_)
        | Syntax::Pi(_)
        | Syntax::Lambda(_)
        | Syntax::Sigma(_)
        | Syntax::Pair(_)
        | Syntax::Id(_)
        | Syntax::Refl(_) => true,
        #[cfg(feature = "cubical")]
        Syntax::Cubical(Cubical::Path(_) | Cubical::PathP(_)) => true,
        _ => false,
    }
}

/// Solve a single equation.
pub fn unify(lhs: &Term, rhs: &Term) -> UnifyResult {
    unify_all([Constraint::new(lhs.clone(), rhs.clone())])
}

/// Solve a set of equations together.
pub fn unify_all<I>(constraints: I) -> UnifyResult
where
    I: IntoIterator<Item = Constraint>,
{
    let mut unifier = Unifier::new();
    for constraint in constraints {
        unifier.add_constraint(constraint);
    }
    unifier.solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use hott_core::syn::Hint;
    use insta::assert_snapshot;

    fn meta(id: usize, arguments: Vec<Term>) -> Term {
        Syntax::metavariable(MetaVariableId::new(id), arguments)
    }

    fn var(i: usize) -> Term {
        Syntax::variable(i)
    }

    fn g(name: &str) -> Term {
        Syntax::global(name)
    }

    fn solution(result: &UnifyResult, id: usize) -> String {
        result
            .solved
            .get(MetaVariableId::new(id))
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    #[test]
    fn test_equal_terms_need_nothing() {
        let result = unify(&g("a"), &g("a"));
        assert!(result.is_success());
        assert!(result.solved.is_empty());
    }

    #[test]
    fn test_rigid_mismatch() {
        let result = unify(&g("a"), &g("b"));
        assert_eq!(result.errors, [UnifyError::Mismatch(g("a"), g("b"))]);
        let result = unify(&Syntax::universe(0), &Syntax::pi("_", g("A"), g("B")));
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_constant_metavariable() {
        let result = unify(&meta(0, vec![]), &Syntax::universe(1));
        assert!(result.is_success());
        assert_eq!(solution(&result, 0), "Type1");
    }

    #[test]
    fn test_metavariable_on_the_right() {
        let result = unify(&g("a"), &meta(0, vec![]));
        assert_eq!(solution(&result, 0), "a");
    }

    #[test]
    fn test_pattern_through_application_spine() {
        // (?0 {1}) {0} = f {1} {0}
        let lhs = Syntax::applications(meta(0, vec![]), [var(1), var(0)]);
        let rhs = Syntax::applications(g("f"), [var(1), var(0)]);
        let result = unify(&lhs, &rhs);
        assert!(result.is_success());
        assert_snapshot!(solution(&result, 0), @r"(\_ => (\_ => (f {1} {0})))");
    }

    #[test]
    fn test_structural_rules_reach_metavariables() {
        // (Pi _: ?0 . ?1) = (Pi _: A . B)
        let lhs = Syntax::pi("_", meta(0, vec![]), meta(1, vec![]));
        let rhs = Syntax::pi("_", g("A"), g("B"));
        let result = unify(&lhs, &rhs);
        assert!(result.is_success());
        assert_eq!(solution(&result, 0), "A");
        assert_eq!(solution(&result, 1), "B");
    }

    #[test]
    fn test_bound_variable_escapes_until_it_is_a_pattern() {
        // (\x => ?0) = (\x => x) cannot be solved: ?0 would capture x.
        let lhs = Syntax::lambda("x", meta(0, vec![]));
        let rhs = Syntax::lambda("x", var(0));
        let result = unify(&lhs, &rhs);
        assert!(result.errors.is_empty());
        assert!(result.solved.is_empty());
        assert_eq!(result.unsolved.len(), 1);
        assert_eq!(result.unsolved[0].depth, Binders::TERM);

        // (\x => ?0 x) = (\x => x) is a pattern.
        let lhs = Syntax::lambda("x", meta(0, vec![var(0)]));
        let result = unify(&lhs, &rhs);
        assert!(result.is_success());
        assert_eq!(solution(&result, 0), "(\\_ => {0})");
    }

    #[test]
    fn test_outer_variables_under_binders() {
        // (\x => ?0) = (\x => {1}): {1} is the outer {0}.
        let lhs = Syntax::lambda("x", meta(0, vec![]));
        let rhs = Syntax::lambda("x", var(1));
        let result = unify(&lhs, &rhs);
        assert!(result.is_success());
        assert_eq!(solution(&result, 0), "{0}");
    }

    #[test]
    fn test_non_pattern_is_deferred_then_replayed() {
        // ?0 ?1 = a is not a pattern until ?1 is solved.
        let c1 = Constraint::new(meta(0, vec![meta(1, vec![])]), g("a"));
        let c2 = Constraint::new(meta(1, vec![]), var(0));
        let result = unify_all([c1, c2]);
        assert!(result.is_success(), "{:?}", result);
        assert_eq!(solution(&result, 1), "{0}");
        assert_eq!(solution(&result, 0), "(\\_ => a)");
    }

    #[test]
    fn test_non_pattern_stays_unsolved() {
        let lhs = meta(0, vec![g("c")]);
        let result = unify(&lhs, &g("a"));
        assert!(result.errors.is_empty());
        assert_eq!(result.unsolved, [Constraint::new(lhs, g("a"))]);
    }

    #[test]
    fn test_occurs_check() {
        let rhs = Syntax::pi("_", meta(0, vec![]), Syntax::universe(0));
        let result = unify(&meta(0, vec![]), &rhs);
        assert_eq!(
            result.errors,
            [UnifyError::OccursCheck(MetaVariableId::new(0), rhs)]
        );
        assert!(result.solved.is_empty());
    }

    #[test]
    fn test_swapped_metavariables_do_not_form_a_cycle() {
        // (?0 , ?1) = (?1 , ?0)
        let lhs = Syntax::pair(meta(0, vec![]), meta(1, vec![]));
        let rhs = Syntax::pair(meta(1, vec![]), meta(0, vec![]));
        let result = unify(&lhs, &rhs);
        assert!(result.is_success(), "{:?}", result);
        assert_eq!(solution(&result, 0), "?1");
        assert!(result.solved.get(MetaVariableId::new(1)).is_none());
    }

    #[test]
    fn test_occurs_check_sees_through_solutions() {
        // ?0 = ?1, then ?1 = (Pi _: ?0 . Type)
        let rhs = Syntax::pi("_", meta(0, vec![]), Syntax::universe(0));
        let result = unify_all([
            Constraint::new(meta(0, vec![]), meta(1, vec![])),
            Constraint::new(meta(1, vec![]), rhs),
        ]);
        assert_eq!(result.errors.len(), 1);
        assert!(matches!(
            &result.errors[0],
            UnifyError::OccursCheck(id, _) if *id == MetaVariableId::new(1)
        ));
        assert!(result.solved.get(MetaVariableId::new(1)).is_none());
    }

    #[test]
    fn test_same_metavariable_same_arguments() {
        let result = unify(&meta(0, vec![var(0)]), &meta(0, vec![var(0)]));
        assert!(result.is_success());
    }

    #[test]
    fn test_second_occurrence_checks_against_the_solution() {
        // (?0 , ?0) = (a , b)
        let lhs = Syntax::pair(meta(0, vec![]), meta(0, vec![]));
        let rhs = Syntax::pair(g("a"), g("b"));
        let result = unify(&lhs, &rhs);
        assert_eq!(solution(&result, 0), "a");
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_closed_constraints_are_normalized() {
        // ((\x => x) a) = a
        let id = Syntax::lambda(Hint::anonymous(), var(0));
        let lhs = Syntax::application(id, g("a"));
        assert!(unify(&lhs, &g("a")).is_success());
    }

    #[test]
    fn test_constraint_display() {
        let c = Constraint::new(meta(0, vec![var(0)]), g("a"));
        assert_snapshot!(c.to_string(), @"(?0 {0}) ≡ a");
    }

    #[cfg(feature = "cubical")]
    #[test]
    fn test_path_types() {
        let lhs = Syntax::path(meta(0, vec![]), g("a"), meta(1, vec![]));
        let rhs = Syntax::path(g("A"), g("a"), g("b"));
        let result = unify(&lhs, &rhs);
        assert!(result.is_success());
        assert_eq!(solution(&result, 0), "A");
        assert_eq!(solution(&result, 1), "b");
    }
}
