//! The occurs check.

use hott_core::common::MetaVariableId;
use hott_core::syn::traverse::any_subterm;
use hott_core::syn::{Syntax, Term};

/// True if the metavariable `id` appears anywhere in `term`, including in
/// the arguments of other metavariables.
pub fn occurs(id: MetaVariableId, term: &Term) -> bool {
    any_subterm(term, &mut |t| {
        matches!(t.as_ref(), Syntax::Metavariable(meta) if meta.id == id)
    })
}
