mod error;
mod path;


pub use error::PathError;
pub use path::PathGuard;
