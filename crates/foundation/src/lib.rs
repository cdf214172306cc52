pub mod bounds;
pub mod finite;
pub mod math;
pub mod time;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use finite::*;
pub use time::*;
