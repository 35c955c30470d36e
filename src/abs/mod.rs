//! This module contains the rendering abstractions: application setup, GPU resource
//! management, shaders and the OpenGL device that backs them.

pub mod app;
pub mod gl;
pub mod gpu;
pub mod shader;

pub use app::*;
pub use gl::*;
pub use gpu::*;
pub use shader::*;
