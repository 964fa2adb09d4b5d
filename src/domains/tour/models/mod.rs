// Tour domain models
pub mod tour;

pub use tour::*;
