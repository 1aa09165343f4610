pub mod allocator;
pub mod cache;
pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod model;
pub mod registry;

pub use allocator::*;
pub use cache::*;
pub use compiler::*;
pub use config::*;
pub use diagnostics::*;
pub use error::*;
pub use model::*;
pub use registry::*;
