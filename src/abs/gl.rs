//! OpenGL implementation of the GPU seams.
//!
//! [`GlDevice`] wraps a shared [`glow::Context`] and implements [`GpuDevice`],
//! [`ShaderCompiler`] and [`FrameRenderer`]. It must only be used on the thread whose GL
//! context is current.

use std::{path::Path, sync::Arc};

use glow::HasContext;

use crate::{
    abs::{
        gpu::{BufferHandle, GpuDevice, GpuMesh, ProgramHandle, VertexArrayHandle},
        shader::{Shader, ShaderCompiler, Uniform, UniformValue, link_program},
    },
    error::{GpuError, ShaderError},
    mesh::{Face, NORMAL_OFFSET, VERTEX_STRIDE, Vertex},
    scene::bind::FrameRenderer,
};

/// OpenGL backed device.
pub struct GlDevice {
    gl: Arc<glow::Context>,
}

impl GlDevice {
    /// Creates a device over the given context.
    pub fn new(gl: &Arc<glow::Context>) -> Self {
        Self { gl: Arc::clone(gl) }
    }

    /// Creates a buffer and uploads `data` once with static usage.
    fn create_static_buffer(&self, what: &'static str, data: &[u8]) -> Result<BufferHandle, GpuError> {
        unsafe {
            let buffer = self
                .gl
                .create_buffer()
                .map_err(|reason| GpuError::Allocation { what, reason })?;

            // Buffer objects are untyped, so the index buffer is filled through ARRAY_BUFFER
            // as well. It gets bound as ELEMENT_ARRAY_BUFFER inside its vertex array.
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl
                .buffer_data_u8_slice(glow::ARRAY_BUFFER, data, glow::STATIC_DRAW);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);

            log::debug!("Allocated {} {} ({} bytes)", what, buffer.0, data.len());
            Ok(BufferHandle::from_raw(buffer.0))
        }
    }
}

impl GpuDevice for GlDevice {
    fn create_vertex_buffer(&self, vertices: &[Vertex]) -> Result<BufferHandle, GpuError> {
        let bytes = unsafe {
            std::slice::from_raw_parts(
                vertices.as_ptr() as *const u8,
                std::mem::size_of_val(vertices),
            )
        };
        self.create_static_buffer("vertex buffer", bytes)
    }

    fn create_index_buffer(&self, faces: &[Face]) -> Result<BufferHandle, GpuError> {
        let bytes = unsafe {
            std::slice::from_raw_parts(faces.as_ptr() as *const u8, std::mem::size_of_val(faces))
        };
        self.create_static_buffer("index buffer", bytes)
    }

    fn create_vertex_layout(
        &self,
        vertex_buffer: &BufferHandle,
        index_buffer: &BufferHandle,
    ) -> Result<VertexArrayHandle, GpuError> {
        unsafe {
            let vao = self
                .gl
                .create_vertex_array()
                .map_err(|reason| GpuError::Allocation {
                    what: "vertex array",
                    reason,
                })?;

            self.gl.bind_vertex_array(Some(vao));
            self.gl.bind_buffer(
                glow::ARRAY_BUFFER,
                Some(glow::NativeBuffer(vertex_buffer.raw())),
            );
            self.gl.bind_buffer(
                glow::ELEMENT_ARRAY_BUFFER,
                Some(glow::NativeBuffer(index_buffer.raw())),
            );

            let stride = VERTEX_STRIDE as i32;

            // Position attribute
            self.gl.enable_vertex_attrib_array(0);
            self.gl
                .vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);

            // Normal attribute
            self.gl.enable_vertex_attrib_array(1);
            self.gl.vertex_attrib_pointer_f32(
                1,
                3,
                glow::FLOAT,
                false,
                stride,
                NORMAL_OFFSET as i32,
            );

            self.gl.bind_vertex_array(None);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, None);

            Ok(VertexArrayHandle::from_raw(vao.0))
        }
    }

    fn destroy_buffer(&self, buffer: BufferHandle) {
        unsafe {
            self.gl.delete_buffer(glow::NativeBuffer(buffer.raw()));
        }
    }

    fn destroy_vertex_layout(&self, layout: VertexArrayHandle) {
        unsafe {
            self.gl
                .delete_vertex_array(glow::NativeVertexArray(layout.raw()));
        }
    }
}

impl ShaderCompiler for GlDevice {
    fn compile(
        &self,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<ProgramHandle, ShaderError> {
        let vert = Shader::from_file(&self.gl, glow::VERTEX_SHADER, vertex_path)?;
        let frag = Shader::from_file(&self.gl, glow::FRAGMENT_SHADER, fragment_path)?;
        let program = link_program(&self.gl, &[&vert, &frag])?;
        Ok(ProgramHandle::from_raw(program.0))
    }

    fn destroy_program(&self, program: ProgramHandle) {
        unsafe {
            self.gl.delete_program(glow::NativeProgram(program.raw()));
        }
    }
}

impl FrameRenderer for GlDevice {
    fn draw(&self, program: &ProgramHandle, uniforms: &[(String, UniformValue)], mesh: &GpuMesh) {
        let program = glow::NativeProgram(program.raw());
        unsafe {
            self.gl.use_program(Some(program));
            for (name, value) in uniforms {
                value.set_uniform(&self.gl, program, name);
            }

            self.gl
                .bind_vertex_array(Some(glow::NativeVertexArray(mesh.layout().raw())));
            self.gl.draw_elements(
                glow::TRIANGLES,
                mesh.index_count() as i32,
                glow::UNSIGNED_INT,
                0,
            );
            self.gl.bind_vertex_array(None);
        }
    }
}
