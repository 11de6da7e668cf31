//! Chart geometry, and HTML rendering of both flows when the `plotting` feature is on.

pub mod layout;
#[cfg(feature = "plotting")]
pub mod render;
