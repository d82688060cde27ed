//! Batch pipeline components.
//!
//! - **discovery**: Enumerate image files in the input directory
//! - **validate**: Pre-flight size and magic-byte checks
//! - **decode**: Load and decode images for the caption provider
//! - **executor**: Copy or rename without overwriting
//! - **orchestrator**: Drives every task to a terminal outcome

pub mod decode;
pub mod discovery;
pub mod executor;
pub mod orchestrator;
pub mod validate;

// Re-exports for convenient access
pub use decode::{DecodedImage, ImageDecoder};
pub use discovery::FileDiscovery;
pub use executor::{execute, ExecuteStatus, FileOperation};
pub use orchestrator::BatchOrchestrator;
pub use validate::Validator;
