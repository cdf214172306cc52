pub mod config;
pub mod phase;
pub mod pose;
pub mod state;

pub use config::*;
pub use phase::*;
pub use pose::*;
pub use state::*;
