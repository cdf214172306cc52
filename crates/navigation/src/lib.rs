pub mod config;
pub mod path;
pub mod standing;

pub use config::*;
pub use path::*;
pub use standing::*;
