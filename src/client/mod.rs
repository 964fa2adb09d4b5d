// Client-side session guard (dashboard API client)
pub mod error;
pub mod session;
pub mod api;
pub mod guard;
pub mod dashboard;

pub use error::*;
pub use session::*;
pub use api::*;
pub use guard::*;
