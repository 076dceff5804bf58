//! Face formulas: boolean combinations of constraints `i = 0` and `i = 1`.
//!
//! Faces are only ever built through the smart constructors [`Face::and`] and
//! [`Face::or`], which keep them simplified: no `⊤` or `⊥` below a connective,
//! and no conjunction of `i = 0` with `i = 1`.

use crate::common::DimIndex;
use std::sync::Arc;

#[derive(PartialEq, Eq, Hash, Debug, Clone)]
pub enum Face<V = DimIndex> {
    Top,
    Bot,
    /// The constraint `v = 1` if the flag is set, otherwise `v = 0`.
    Eq(V, bool),
    And(Arc<Face<V>>, Arc<Face<V>>),
    Or(Arc<Face<V>>, Arc<Face<V>>),
}

impl<V: Clone + PartialEq> Face<V> {
    pub fn atom(var: V, is_one: bool) -> Face<V> {
        Face::Eq(var, is_one)
    }

    pub fn from_bool(b: bool) -> Face<V> {
        if b {
            Face::Top
        } else {
            Face::Bot
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Face::Top)
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, Face::Bot)
    }

    pub fn and(lhs: Face<V>, rhs: Face<V>) -> Face<V> {
        match (lhs, rhs) {
            (Face::Bot, _) | (_, Face::Bot) => Face::Bot,
            (Face::Top, x) | (x, Face::Top) => x,
            (lhs, rhs) if lhs == rhs => lhs,
            (lhs, rhs) => {
                if contradicts(&lhs, &rhs, Connective::And) {
                    Face::Bot
                } else {
                    Face::And(Arc::new(lhs), Arc::new(rhs))
                }
            }
        }
    }

    pub fn or(lhs: Face<V>, rhs: Face<V>) -> Face<V> {
        match (lhs, rhs) {
            (Face::Top, _) | (_, Face::Top) => Face::Top,
            (Face::Bot, x) | (x, Face::Bot) => x,
            (lhs, rhs) if lhs == rhs => lhs,
            (lhs, rhs) => {
                if contradicts(&lhs, &rhs, Connective::Or) {
                    Face::Top
                } else {
                    Face::Or(Arc::new(lhs), Arc::new(rhs))
                }
            }
        }
    }

    /// Rebuild the face, replacing each atom with the face `f` returns for
    /// it. The result is simplified.
    pub fn map_atoms<W, F>(&self, f: &mut F) -> Face<W>
    where
        W: Clone + PartialEq,
        F: FnMut(&V, bool) -> Face<W>,
    {
        match self {
            Face::Top => Face::Top,
            Face::Bot => Face::Bot,
            Face::Eq(v, is_one) => f(v, *is_one),
            Face::And(l, r) => Face::and(l.map_atoms(f), r.map_atoms(f)),
            Face::Or(l, r) => Face::or(l.map_atoms(f), r.map_atoms(f)),
        }
    }

    /// Visit every atom.
    pub fn for_each_atom<F>(&self, f: &mut F)
    where
        F: FnMut(&V, bool),
    {
        match self {
            Face::Top | Face::Bot => {}
            Face::Eq(v, is_one) => f(v, *is_one),
            Face::And(l, r) | Face::Or(l, r) => {
                l.for_each_atom(f);
                r.for_each_atom(f);
            }
        }
    }

    /// Re-simplify a face which may have been built without the smart
    /// constructors.
    pub fn simplify(&self) -> Face<V> {
        self.map_atoms(&mut |v, is_one| Face::atom(v.clone(), is_one))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Connective {
    And,
    Or,
}

/// Gather the atoms of a chain of one connective.
fn chain<'a, V>(face: &'a Face<V>, connective: Connective, out: &mut Vec<(&'a V, bool)>) -> bool {
    match (face, connective) {
        (Face::Eq(v, is_one), _) => {
            out.push((v, *is_one));
            true
        }
        (Face::And(l, r), Connective::And) | (Face::Or(l, r), Connective::Or) => {
            chain(l, connective, out) && chain(r, connective, out)
        }
        _ => false,
    }
}

/// True if the two chains constrain one variable to both endpoints. Under a
/// conjunction that is unsatisfiable, under a disjunction it always holds.
fn contradicts<V: PartialEq>(lhs: &Face<V>, rhs: &Face<V>, connective: Connective) -> bool {
    let mut atoms = Vec::new();
    if !chain(lhs, connective, &mut atoms) || !chain(rhs, connective, &mut atoms) {
        return false;
    }
    atoms.iter().enumerate().any(|(n, (v, b))| {
        atoms[n + 1..]
            .iter()
            .any(|(w, c)| v == w && b != c)
    })
}
