//! Tour admin: JWT-authenticated tour management API, plus the
//! session-guarded client used by the terminal dashboard.

pub mod client;
pub mod domains;
pub mod routes;
pub mod shared;
