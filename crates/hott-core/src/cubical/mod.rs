//! The cubical layer: interval, faces, paths, composition, glue and higher
//! inductive types.

pub mod eval;
pub mod face;
pub mod hit;
pub mod quote;
pub mod subst;
pub mod val;

pub use face::Face;
pub use hit::{hit_boundaries, Boundary, HitSpec, PathConstructor};
pub use subst::{instantiate_dim, ishift, isubst, mentions_dim};
pub use val::{CubicalValue, Dim, FaceValue};
