use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// A de Bruijn level in the term namespace: the number of binders between
/// the root of the context and the binding site.
#[derive(Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Level(usize);

impl Level {
    pub fn new(x: usize) -> Level {
        Level(x)
    }

    pub fn to_index(self, depth: usize) -> Index {
        Index(depth - self.0 - 1)
    }

    /// Whether this level names a variable bound in a context of size `depth`.
    pub fn is_bound(self, depth: usize) -> bool {
        self.0 < depth
    }
}

impl Display for Level {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "%{}", self.0)
    }
}

impl From<Level> for usize {
    fn from(x: Level) -> usize {
        x.0
    }
}

impl From<usize> for Level {
    fn from(x: usize) -> Level {
        Level(x)
    }
}

/// A variable that lives outside of the environment it was evaluated in. The
/// number counts outward from the edge of that environment, starting at zero.
#[derive(Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct NegativeLevel(usize);

impl NegativeLevel {
    pub fn new(x: usize) -> NegativeLevel {
        NegativeLevel(x)
    }

    pub fn to_index(self, depth: usize) -> Index {
        Index(depth + self.0)
    }

    pub fn to_dim_index(self, depth: usize) -> DimIndex {
        DimIndex(depth + self.0)
    }
}

impl Display for NegativeLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.0)
    }
}

impl From<NegativeLevel> for usize {
    fn from(x: NegativeLevel) -> usize {
        x.0
    }
}

/// A de Bruijn index in the term namespace. Zero is the innermost binder.
#[derive(Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct Index(pub usize);

impl Index {
    pub fn new(x: usize) -> Index {
        Index(x)
    }

    pub fn to_level(self, depth: usize) -> Level {
        Level(depth - self.0 - 1)
    }

    pub fn to_negative_level(self, depth: usize) -> NegativeLevel {
        NegativeLevel(self.0 - depth)
    }

    pub fn raise(self, amount: usize) -> Index {
        Index(self.0 + amount)
    }

    pub fn is_bound(self, depth: usize) -> bool {
        self.0 < depth
    }
}

impl Display for Index {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}}}", self.0)
    }
}

impl From<Index> for usize {
    fn from(x: Index) -> usize {
        x.0
    }
}

impl From<usize> for Index {
    fn from(x: usize) -> Index {
        Index(x)
    }
}

/// A de Bruijn index in the interval namespace.
#[derive(Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct DimIndex(pub usize);

impl DimIndex {
    pub fn new(x: usize) -> DimIndex {
        DimIndex(x)
    }

    pub fn to_level(self, depth: usize) -> DimLevel {
        DimLevel(depth - self.0 - 1)
    }

    pub fn to_negative_level(self, depth: usize) -> NegativeLevel {
        NegativeLevel(self.0 - depth)
    }

    pub fn is_bound(self, depth: usize) -> bool {
        self.0 < depth
    }
}

impl Display for DimIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "i{{{}}}", self.0)
    }
}

impl From<DimIndex> for usize {
    fn from(x: DimIndex) -> usize {
        x.0
    }
}

impl From<usize> for DimIndex {
    fn from(x: usize) -> DimIndex {
        DimIndex(x)
    }
}

/// A de Bruijn level in the interval namespace.
#[derive(Hash, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct DimLevel(usize);

impl DimLevel {
    pub fn new(x: usize) -> DimLevel {
        DimLevel(x)
    }

    pub fn to_index(self, depth: usize) -> DimIndex {
        DimIndex(depth - self.0 - 1)
    }

    pub fn is_bound(self, depth: usize) -> bool {
        self.0 < depth
    }
}

impl Display for DimLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "%i{}", self.0)
    }
}

impl From<DimLevel> for usize {
    fn from(x: DimLevel) -> usize {
        x.0
    }
}

#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UniverseLevel(usize);

impl UniverseLevel {
    pub fn new(x: usize) -> UniverseLevel {
        UniverseLevel(x)
    }
}

impl Display for UniverseLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<UniverseLevel> for usize {
    fn from(x: UniverseLevel) -> usize {
        x.0
    }
}

impl From<usize> for UniverseLevel {
    fn from(x: usize) -> UniverseLevel {
        UniverseLevel(x)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MetaVariableId(pub usize);

impl MetaVariableId {
    pub fn new(id: usize) -> MetaVariableId {
        MetaVariableId(id)
    }
}

impl Display for MetaVariableId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.0)
    }
}
