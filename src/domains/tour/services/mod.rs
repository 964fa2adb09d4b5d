// Tour domain services
pub mod tour_service;
pub mod state;

pub use tour_service::*;
pub use state::*;
