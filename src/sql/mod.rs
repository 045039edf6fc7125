//! Safe SQL builder: identifiers from constants and the field allowlist only, values as parameters.

mod builder;
pub mod params;
pub use builder::*;
pub use params::*;
