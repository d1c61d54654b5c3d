pub mod backend;

pub use backend::{BackendClient, LightingBackend, SourceError};
