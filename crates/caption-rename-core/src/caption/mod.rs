//! Caption providers.
//!
//! The pipeline only depends on the [`CaptionProvider`] trait. The shipped
//! implementations are thin HTTP clients:
//! - **ollama**: local Ollama server (`/api/generate`)
//! - **openai**: any OpenAI-compatible Chat Completions endpoint

pub mod device;
pub mod ollama;
pub mod openai;
pub mod provider;

pub use device::{gpu_available, resolve_device, Device};
pub use provider::{CaptionOptions, CaptionProvider, CaptionProviderFactory, ImageInput};
