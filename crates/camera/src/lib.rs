pub mod command;
pub mod config;
pub mod controller;

pub use command::*;
pub use config::*;
pub use controller::*;
