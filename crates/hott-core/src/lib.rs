//! A small kernel for homotopy type theory: nameless core syntax,
//! normalization by evaluation, conversion checking and ι-reduction of
//! user-declared eliminators, with an optional cubical layer.

pub mod cache;
pub mod common;
pub mod config;
pub mod context;
#[cfg(feature = "cubical")]
pub mod cubical;
pub mod equal;
pub mod eval;
pub mod quote;
pub mod recursor;
pub mod subst;
pub mod syn;
pub mod val;

pub use config::{Config, ConvOptions};
pub use equal::{alpha_eq, conv, conv_closed};
pub use quote::normalize;
pub use syn::{Syntax, Term};
