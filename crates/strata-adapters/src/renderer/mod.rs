//! Artifact rendering adapters.

mod csharp;
mod templates;

pub use csharp::CSharpArtifactRenderer;
