mod kind;
mod models;

pub use kind::{ContentKind, Language};
pub use models::*;
