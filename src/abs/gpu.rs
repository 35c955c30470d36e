//! GPU resource management.
//!
//! This module defines the opaque handle types, the [`GpuDevice`] trait through which buffers
//! and vertex layouts are created and destroyed, and [`GpuMesh`], the bundle of handles owned
//! by a single scene object.
//!
//! Handles are neither `Clone` nor `Copy`. Destroying one consumes it, so a handle can only be
//! released once and cannot be used afterwards.

use std::num::NonZero;

use crate::{
    error::GpuError,
    mesh::{Face, Mesh, Vertex},
};

macro_rules! gpu_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, PartialEq, Eq, Hash)]
        pub struct $name(NonZero<u32>);

        impl $name {
            /// Wraps a raw id handed out by a device.
            pub fn from_raw(id: NonZero<u32>) -> Self {
                Self(id)
            }

            /// Returns the raw id.
            pub fn raw(&self) -> NonZero<u32> {
                self.0
            }
        }
    };
}

gpu_handle!(
    /// A vertex or index buffer.
    BufferHandle
);
gpu_handle!(
    /// A vertex layout binding (a vertex array object in OpenGL terms).
    VertexArrayHandle
);
gpu_handle!(
    /// A linked shader program.
    ProgramHandle
);

/// Creates and destroys GPU buffers and vertex layouts.
///
/// Implementations must be used from the thread that owns the rendering context.
pub trait GpuDevice {
    /// Allocates a buffer sized exactly to `vertices` and uploads them.
    fn create_vertex_buffer(&self, vertices: &[Vertex]) -> Result<BufferHandle, GpuError>;

    /// Allocates a buffer sized exactly to `faces` and uploads their indices.
    fn create_index_buffer(&self, faces: &[Face]) -> Result<BufferHandle, GpuError>;

    /// Declares the interleaved position/normal layout over the two buffers.
    fn create_vertex_layout(
        &self,
        vertex_buffer: &BufferHandle,
        index_buffer: &BufferHandle,
    ) -> Result<VertexArrayHandle, GpuError>;

    /// Frees a buffer.
    fn destroy_buffer(&self, buffer: BufferHandle);

    /// Frees a vertex layout.
    fn destroy_vertex_layout(&self, layout: VertexArrayHandle);
}

/// The GPU side of one mesh.
#[derive(Debug)]
#[must_use = "GPU resources leak unless released"]
pub struct GpuMesh {
    layout: VertexArrayHandle,
    vertex_buffer: BufferHandle,
    index_buffer: BufferHandle,
    index_count: usize,
}

impl GpuMesh {
    /// Uploads a mesh. If any allocation fails, whatever was already created is destroyed
    /// before the error is returned.
    pub fn upload<D: GpuDevice + ?Sized>(device: &D, mesh: &Mesh) -> Result<Self, GpuError> {
        let vertex_buffer = device.create_vertex_buffer(&mesh.vertices)?;

        let index_buffer = match device.create_index_buffer(&mesh.faces) {
            Ok(buffer) => buffer,
            Err(e) => {
                device.destroy_buffer(vertex_buffer);
                return Err(e);
            }
        };

        let layout = match device.create_vertex_layout(&vertex_buffer, &index_buffer) {
            Ok(layout) => layout,
            Err(e) => {
                device.destroy_buffer(vertex_buffer);
                device.destroy_buffer(index_buffer);
                return Err(e);
            }
        };

        log::debug!(
            "Uploaded mesh: {} vertices, {} faces (layout {})",
            mesh.vertices.len(),
            mesh.faces.len(),
            layout.raw()
        );

        Ok(Self {
            layout,
            vertex_buffer,
            index_buffer,
            index_count: mesh.index_count(),
        })
    }

    /// Frees the layout and both buffers.
    pub fn release<D: GpuDevice + ?Sized>(self, device: &D) {
        device.destroy_vertex_layout(self.layout);
        device.destroy_buffer(self.vertex_buffer);
        device.destroy_buffer(self.index_buffer);
    }

    pub fn layout(&self) -> &VertexArrayHandle {
        &self.layout
    }

    pub fn vertex_buffer(&self) -> &BufferHandle {
        &self.vertex_buffer
    }

    pub fn index_buffer(&self) -> &BufferHandle {
        &self.index_buffer
    }

    /// Returns the amount of indices to draw.
    pub fn index_count(&self) -> usize {
        self.index_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingDevice;

    fn triangle() -> Mesh {
        Mesh::parse("v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n").unwrap()
    }

    #[test]
    fn test_upload_and_release() {
        let device = RecordingDevice::default();
        let gpu = GpuMesh::upload(&device, &triangle()).unwrap();
        assert_eq!(gpu.index_count(), 3);
        assert_eq!(device.buffers_created(), 2);
        assert_eq!(device.layouts_created(), 1);
        assert_ne!(gpu.vertex_buffer(), gpu.index_buffer());
        assert_eq!(device.live_count(), 3);

        gpu.release(&device);
        assert_eq!(device.buffers_destroyed(), 2);
        assert_eq!(device.layouts_destroyed(), 1);
        assert_eq!(device.live_count(), 0);
    }

    #[test]
    fn test_partial_upload_is_rolled_back() {
        let device = RecordingDevice::default();
        device.fail_after(1);
        let err = GpuMesh::upload(&device, &triangle()).unwrap_err();
        assert!(matches!(err, GpuError::Allocation { .. }));
        assert_eq!(device.buffers_created(), 1);
        assert_eq!(device.live_count(), 0);

        let device = RecordingDevice::default();
        device.fail_after(2);
        assert!(GpuMesh::upload(&device, &triangle()).is_err());
        assert_eq!(device.buffers_created(), 2);
        assert_eq!(device.layouts_created(), 0);
        assert_eq!(device.live_count(), 0);
    }
}
