/// Error types for mesh loading and pipeline construction
use thiserror::Error;

/// Errors produced while reading or parsing a mesh source.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("failed to read mesh file: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported mesh format: {0}")]
    UnsupportedFormat(String),

    #[error("parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: vertex index {index} out of range ({count} vertices defined)")]
    IndexOutOfRange { line: usize, index: i64, count: usize },

    #[error("unexpected end of binary STL data")]
    Truncated,

    #[error("mesh contains no triangles")]
    Empty,
}

/// Errors that abort pipeline startup. Nothing here is produced once a
/// [`Pipeline`](crate::Pipeline) has been loaded.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("far plane ({far}) must differ from near plane ({near})")]
    DegenerateFrustum { near: f32, far: f32 },

    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse pipeline configuration: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}
