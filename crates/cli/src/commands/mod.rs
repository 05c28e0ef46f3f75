//! Command implementations.

mod bridge;
mod serve;
mod signal;
mod validate;

pub use bridge::run_bridge;
pub use serve::{run_door, run_rain};
pub use validate::run_validate;
