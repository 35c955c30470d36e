//! Shaders and uniforms.
//!
//! This module defines the [`ShaderCompiler`] trait used by the scene loader, the OpenGL
//! [`Shader`] stage wrapper, and the [`Uniform`] trait for setting uniform variables in shader
//! programs.

use std::{path::Path, sync::Arc};

use glam::{Mat4, Vec3};
use glow::HasContext;

use crate::{abs::gpu::ProgramHandle, error::ShaderError};

/// Turns a vertex and a fragment shader file into a linked program.
pub trait ShaderCompiler {
    /// Reads, compiles and links both stages.
    fn compile(
        &self,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<ProgramHandle, ShaderError>;

    /// Frees a program.
    fn destroy_program(&self, program: ProgramHandle);
}

/// Represents an individual OpenGL shader stage. The stage object is deleted on drop, which is
/// fine once it has been linked into a program.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    pub fn new(gl: &Arc<glow::Context>, shader_type: u32, source: &str) -> Result<Self, String> {
        unsafe {
            let shader = gl.create_shader(shader_type)?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(log);
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }

    /// Reads and compiles the shader file at `path`.
    pub fn from_file(
        gl: &Arc<glow::Context>,
        shader_type: u32,
        path: &Path,
    ) -> Result<Self, ShaderError> {
        let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::new(gl, shader_type, &source).map_err(|log| ShaderError::Compile {
            path: path.to_path_buf(),
            log,
        })
    }
}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Links a program from the given stages. The stages are detached again afterwards.
pub fn link_program(gl: &glow::Context, shaders: &[&Shader]) -> Result<glow::Program, ShaderError> {
    unsafe {
        let program = gl.create_program().map_err(ShaderError::Create)?;

        for shader in shaders {
            gl.attach_shader(program, shader.id);
        }

        gl.link_program(program);

        if !gl.get_program_link_status(program) {
            let log = gl.get_program_info_log(program);
            gl.delete_program(program);
            return Err(ShaderError::Link(log));
        }

        for shader in shaders {
            gl.detach_shader(program, shader.id);
        }

        Ok(program)
    }
}

/// Represents a uniform variable in a shader program.
pub trait Uniform {
    /// Sets the value of the uniform variable in the given shader program.
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str);
}

impl Uniform for f32 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_1_f32(Some(&loc), *self);
            }
        }
    }
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_1_i32(Some(&loc), *self);
            }
        }
    }
}

impl Uniform for Vec3 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_3_f32(Some(&loc), self.x, self.y, self.z);
            }
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        unsafe {
            let location = gl.get_uniform_location(program, name);
            if let Some(loc) = location {
                gl.uniform_matrix_4_f32_slice(Some(&loc), false, self.as_ref());
            }
        }
    }
}

/// A uniform value that can be stored and compared before it reaches the GPU.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec3(Vec3),
    Mat4(Mat4),
}

impl Uniform for UniformValue {
    fn set_uniform(&self, gl: &glow::Context, program: glow::Program, name: &str) {
        match self {
            UniformValue::Int(v) => v.set_uniform(gl, program, name),
            UniformValue::Float(v) => v.set_uniform(gl, program, name),
            UniformValue::Vec3(v) => v.set_uniform(gl, program, name),
            UniformValue::Mat4(v) => v.set_uniform(gl, program, name),
        }
    }
}
