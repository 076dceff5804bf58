//! A per-operation memo table for evaluation.
//!
//! Entries are keyed on the identity of the term and of the environment it
//! was evaluated in. Each entry holds on to both, so an identity can never
//! be reused by another allocation while the entry lives.

use crate::config::Config;
use crate::syn::Term;
use crate::val::{Environment, RcValue};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct Key {
    term: usize,
    values: usize,
    dims: usize,
}

impl Key {
    fn new(term: &Term, env: &Environment) -> Key {
        Key {
            term: Arc::as_ptr(term) as usize,
            values: env.values_id(),
            dims: env.dims_id(),
        }
    }
}

struct Entry {
    _term: Term,
    _environment: Environment,
    value: RcValue,
}

/// Counters describing how well the cache did.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub size: usize,
    pub capacity: usize,
}

pub struct EvalCache {
    entries: HashMap<Key, Entry>,
    capacity: usize,
    hits: usize,
    misses: usize,
}

impl EvalCache {
    pub fn new(capacity: usize) -> EvalCache {
        EvalCache {
            entries: HashMap::new(),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, term: &Term, env: &Environment) -> Option<RcValue> {
        match self.entries.get(&Key::new(term, env)) {
            Some(entry) => {
                self.hits += 1;
                Some(entry.value.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Remember a result. Once the cache is full, new results are dropped.
    pub fn insert(&mut self, term: &Term, env: &Environment, value: RcValue) {
        if self.entries.len() >= self.capacity {
            return;
        }
        self.entries.insert(
            Key::new(term, env),
            Entry {
                _term: term.clone(),
                _environment: env.clone(),
                value,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            size: self.entries.len(),
            capacity: self.capacity,
        }
    }

    /// Drop every entry and zero the counters.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}

impl Default for EvalCache {
    fn default() -> Self {
        EvalCache::new(Config::current().cache_capacity)
    }
}

impl std::fmt::Debug for EvalCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvalCache")
            .field("stats", &self.stats())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syn::Syntax;
    use crate::val::Value;
    use std::rc::Rc;

    #[test]
    fn test_hit_after_insert() {
        let mut cache = EvalCache::new(4);
        let term = Syntax::global("a");
        let env = Environment::new();
        assert!(cache.get(&term, &env).is_none());
        cache.insert(&term, &env, Rc::new(Value::global("a".into())));
        assert!(cache.get(&term, &env).is_some());
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.size), (1, 1, 1));
    }

    #[test]
    fn test_equal_terms_with_distinct_identity_miss() {
        let mut cache = EvalCache::new(4);
        let env = Environment::new();
        cache.insert(&Syntax::global("a"), &env, Rc::new(Value::global("a".into())));
        assert!(cache.get(&Syntax::global("a"), &env).is_none());
    }

    #[test]
    fn test_refuses_to_grow_when_full() {
        let mut cache = EvalCache::new(2);
        let env = Environment::new();
        let terms: Vec<_> = (0..3).map(|i| Syntax::variable(i)).collect();
        for t in &terms {
            cache.insert(t, &env, Rc::new(Value::global("x".into())));
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&terms[0], &env).is_some());
        assert!(cache.get(&terms[2], &env).is_none());
    }

    #[test]
    fn test_reset() {
        let mut cache = EvalCache::new(2);
        let env = Environment::new();
        let t = Syntax::universe(0);
        cache.insert(&t, &env, Rc::new(Value::global("x".into())));
        let _ = cache.get(&t, &env);
        cache.reset();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits, 0);
    }
}
