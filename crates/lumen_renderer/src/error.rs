//! Error types for scene building and rendering.

use thiserror::Error;

/// Errors surfaced by the renderer.
///
/// Intersection and scattering never fail; these cover configuration,
/// scene assembly and the image sink.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Invalid camera configuration: {0}")]
    InvalidConfig(String),

    #[error("Cannot build a BVH from an empty scene")]
    EmptyScene,

    #[error("Image sink error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
