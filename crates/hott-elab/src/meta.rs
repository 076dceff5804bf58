//! Metavariable solutions.

use hott_core::common::MetaVariableId;
use hott_core::syn::Term;
use std::collections::btree_map::{self, BTreeMap};

/// A solution for each solved metavariable.
///
/// A solution is a closed-over term in the context the metavariable was
/// created in: `n` lambdas, one for each argument the metavariable is
/// applied to, wrapped around a body.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Solutions {
    map: BTreeMap<MetaVariableId, Term>,
}

impl Solutions {
    pub fn new() -> Solutions {
        Solutions::default()
    }

    pub fn get(&self, id: MetaVariableId) -> Option<&Term> {
        self.map.get(&id)
    }

    pub fn contains(&self, id: MetaVariableId) -> bool {
        self.map.contains_key(&id)
    }

    /// Record a solution. Returns the previous solution, if there was one.
    pub fn insert(&mut self, id: MetaVariableId, solution: Term) -> Option<Term> {
        self.map.insert(id, solution)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, MetaVariableId, Term> {
        self.map.iter()
    }
}

impl<'a> IntoIterator for &'a Solutions {
    type Item = (&'a MetaVariableId, &'a Term);
    type IntoIter = btree_map::Iter<'a, MetaVariableId, Term>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<(MetaVariableId, Term)> for Solutions {
    fn from_iter<T: IntoIterator<Item = (MetaVariableId, Term)>>(iter: T) -> Solutions {
        Solutions {
            map: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hott_core::syn::Syntax;

    #[test]
    fn test_insert_and_get() {
        let mut solutions = Solutions::new();
        assert!(solutions.is_empty());
        assert_eq!(solutions.insert(MetaVariableId::new(3), Syntax::universe(0)), None);
        assert!(solutions.contains(MetaVariableId::new(3)));
        assert_eq!(solutions.get(MetaVariableId::new(3)), Some(&Syntax::universe(0)));
        assert_eq!(solutions.get(MetaVariableId::new(4)), None);
        assert_eq!(solutions.len(), 1);
    }

    #[test]
    fn test_iterates_in_id_order() {
        let solutions: Solutions = [
            (MetaVariableId::new(2), Syntax::universe(2)),
            (MetaVariableId::new(0), Syntax::universe(0)),
        ]
        .into_iter()
        .collect();
        let ids: Vec<usize> = solutions.iter().map(|(id, _)| id.0).collect();
        assert_eq!(ids, [0, 2]);
    }
}
