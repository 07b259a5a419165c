//! Geometry pipeline turning raw country datasets into SVG payloads.

pub mod assembler;
pub mod augment;
pub mod config;
pub mod error;
pub mod payload;
pub mod project;
pub mod svg;

pub use assembler::*;
pub use config::*;
pub use error::*;
pub use payload::*;
pub use project::*;
