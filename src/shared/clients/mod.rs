// External service clients
pub mod media_host;
pub mod cloudinary;

pub use media_host::*;
pub use cloudinary::*;
