//! Registry persistence adapters.

mod json;

pub use json::JsonRegistryStore;
