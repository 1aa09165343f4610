pub mod attributes;
pub mod error;
pub mod manifest;
pub mod provider;
pub mod registry;

pub use attributes::*;
pub use error::*;
pub use manifest::*;
pub use provider::*;
pub use registry::*;
