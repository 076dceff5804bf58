pub mod basic;
#[cfg(feature = "cubical")]
pub mod cubical;
pub mod parse;
pub mod print;
pub mod raw;
pub mod resolve;
pub mod traverse;

pub use basic::*;
#[cfg(feature = "cubical")]
pub use cubical::*;
pub use raw::Raw;
pub use resolve::{Globals, OpenGlobals, Scope};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    #[error(transparent)]
    Parse(#[from] parse::Error),
    #[error(transparent)]
    Resolve(#[from] resolve::Error),
}

/// Parse and resolve a closed term.
pub fn read<G: Globals + ?Sized>(input: &str, globals: &G) -> Result<Term, ReadError> {
    let raw = parse::parse(input)?;
    Ok(resolve::resolve(globals, &raw)?)
}
