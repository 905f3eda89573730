pub mod authorization;
pub mod entities;

// Re-export tracing for use in this crate
pub use tracing;
