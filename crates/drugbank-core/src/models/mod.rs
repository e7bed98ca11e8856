//! Domain models for the DrugBank index.

mod drug;
mod interaction;
mod summary;

pub use drug::*;
pub use interaction::*;
pub use summary::*;
