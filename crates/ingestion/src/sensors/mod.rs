//! Built-in sensor types
//!
//! Each module exposes its profile, defaults, and a service constructor.

pub mod door;
pub mod rain;
