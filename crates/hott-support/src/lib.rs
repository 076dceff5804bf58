pub mod pp;

pub use pp::*;
