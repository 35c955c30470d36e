//! Error types for every stage of the asset pipeline.
//!
//! [`SceneError`] is the only error that aborts a whole level load. Everything else is
//! recovered per model record and surfaces as a [`RecordError`] in the scene's load report.

use std::path::PathBuf;

/// Errors produced while reading a mesh file.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    #[error("failed to read mesh file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("line {line}: vertex index {index} out of range ({count} vertices read so far)")]
    VertexIndexOutOfRange { line: usize, index: i64, count: usize },
    #[error("line {line}: normal index {index} out of range ({count} normals read so far)")]
    NormalIndexOutOfRange { line: usize, index: i64, count: usize },
}

/// Errors from GPU resource allocation.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("failed to allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },
}

/// Errors from the shader compiler.
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader source {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create shader object: {0}")]
    Create(String),
    #[error("failed to compile {}: {log}", .path.display())]
    Compile { path: PathBuf, log: String },
    #[error("failed to link program: {0}")]
    Link(String),
}

/// Why a single model record did not make it into the scene.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid model record: {0}")]
    Invalid(#[source] serde_json::Error),
    #[error(transparent)]
    Mesh(#[from] MeshError),
    #[error(transparent)]
    Gpu(#[from] GpuError),
    #[error(transparent)]
    Shader(#[from] ShaderError),
}

/// Fatal level load errors.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read level file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed level descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),
}
