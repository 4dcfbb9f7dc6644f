//! # Dream Teller
//!
//! Turns a free-text dream into a short cinematic story plus video or
//! podcast links.
//!
//! ```text
//! form (browser page or CLI) → client → server → generation → llm + store + media
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod generation;
pub mod llm;
pub mod media;
pub mod model;
pub mod server;
pub mod store;

pub use client::{DreamApi, DreamClient};
pub use config::Config;
pub use error::{ApiError, ClientError, FormError, GenerationError, LlmError, StoreError};
pub use form::{DreamForm, FormView};
pub use generation::DreamGenerator;
pub use model::{DreamGeneration, DreamRequest, FormatType, GenerationStatus, StatusCheck};
