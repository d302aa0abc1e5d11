//! Bearer-token model, provider seam, and the single-flight lifecycle manager.

pub mod cache;
pub mod manager;
pub mod provider;
pub mod secret;
pub mod stats;

pub use cache::*;
pub use manager::*;
pub use provider::*;
pub use secret::*;
pub use stats::*;
