mod form;
mod product;
mod submission;

pub use form::*;
pub use product::*;
pub use submission::*;
