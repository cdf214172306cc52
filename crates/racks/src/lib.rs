pub mod config;
pub mod layout;
pub mod target;

pub use config::*;
pub use layout::*;
pub use target::*;
