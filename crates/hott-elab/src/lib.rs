//! Solving metavariables: higher-order pattern unification, the occurs
//! check, and zonking.

pub mod meta;
pub use meta::Solutions;

pub mod occurs_check;
pub use occurs_check::occurs;

pub mod renaming;
pub use renaming::{InversionError, Renaming};

pub mod unify;
pub use unify::{unify, unify_all, Constraint, UnifyError, UnifyResult, Unifier};

pub mod zonk;
pub use zonk::{collect_metas, has_meta, zonk, zonk_full};
