pub mod classify;
pub mod declared;
pub mod wire;

pub use classify::*;
pub use declared::*;
pub use wire::*;
