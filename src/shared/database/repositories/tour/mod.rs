// Tour repositories (Resource Store)
pub mod tour_store;
pub mod tour_repository;
pub mod in_memory_tour_repository;

pub use tour_store::*;
pub use tour_repository::*;
pub use in_memory_tour_repository::*;
