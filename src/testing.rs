//! Test doubles shared by the unit tests.

use std::{
    cell::{Cell, RefCell},
    collections::BTreeSet,
    num::NonZero,
    path::{Path, PathBuf},
};

use crate::{
    abs::{
        BufferHandle, GpuDevice, GpuMesh, ProgramHandle, ShaderCompiler, UniformValue,
        VertexArrayHandle,
    },
    error::{GpuError, ShaderError},
    mesh::{Face, Vertex},
    scene::bind::FrameRenderer,
};

/// Shader sources containing this marker fail to compile.
pub const BROKEN_SHADER: &str = "#error broken";

#[derive(Debug, Clone)]
pub struct DrawCall {
    pub program: NonZero<u32>,
    pub uniforms: Vec<(String, UniformValue)>,
    pub index_count: usize,
}

/// A device that hands out ids, counts every call and panics when an id that is not alive
/// gets destroyed.
#[derive(Default)]
pub struct RecordingDevice {
    next_id: Cell<u32>,
    live: RefCell<BTreeSet<u32>>,
    fail_after: Cell<Option<usize>>,
    fail_at: Cell<Option<usize>>,
    allocations: Cell<usize>,
    buffers_created: Cell<usize>,
    buffers_destroyed: Cell<usize>,
    layouts_created: Cell<usize>,
    layouts_destroyed: Cell<usize>,
    programs_created: Cell<usize>,
    programs_destroyed: Cell<usize>,
    draws: RefCell<Vec<DrawCall>>,
}

impl RecordingDevice {
    /// Makes every allocation after the first `n` fail.
    pub fn fail_after(&self, n: usize) {
        self.fail_after.set(Some(n));
    }

    /// Makes only the allocation that follows the first `n` fail. Later ones succeed again.
    pub fn fail_at(&self, n: usize) {
        self.fail_at.set(Some(n));
    }

    fn allocate(&self, what: &'static str) -> Result<NonZero<u32>, GpuError> {
        if self.fail_at.get() == Some(self.allocations.get()) {
            self.fail_at.set(None);
            return Err(GpuError::Allocation {
                what,
                reason: "out of memory".to_string(),
            });
        }
        if self.fail_after.get().is_some_and(|n| self.allocations.get() >= n) {
            return Err(GpuError::Allocation {
                what,
                reason: "out of memory".to_string(),
            });
        }
        self.allocations.set(self.allocations.get() + 1);
        Ok(self.next())
    }

    fn next(&self) -> NonZero<u32> {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.live.borrow_mut().insert(id);
        NonZero::new(id).expect("ids start at 1")
    }

    fn free(&self, id: NonZero<u32>) {
        assert!(
            self.live.borrow_mut().remove(&id.get()),
            "handle {id} destroyed twice or never created"
        );
    }

    pub fn live_count(&self) -> usize {
        self.live.borrow().len()
    }

    pub fn buffers_created(&self) -> usize {
        self.buffers_created.get()
    }

    pub fn buffers_destroyed(&self) -> usize {
        self.buffers_destroyed.get()
    }

    pub fn layouts_created(&self) -> usize {
        self.layouts_created.get()
    }

    pub fn layouts_destroyed(&self) -> usize {
        self.layouts_destroyed.get()
    }

    pub fn programs_created(&self) -> usize {
        self.programs_created.get()
    }

    pub fn programs_destroyed(&self) -> usize {
        self.programs_destroyed.get()
    }

    pub fn draws(&self) -> Vec<DrawCall> {
        self.draws.borrow().clone()
    }
}

fn bump(counter: &Cell<usize>) {
    counter.set(counter.get() + 1);
}

impl GpuDevice for RecordingDevice {
    fn create_vertex_buffer(&self, _vertices: &[Vertex]) -> Result<BufferHandle, GpuError> {
        let id = self.allocate("vertex buffer")?;
        bump(&self.buffers_created);
        Ok(BufferHandle::from_raw(id))
    }

    fn create_index_buffer(&self, _faces: &[Face]) -> Result<BufferHandle, GpuError> {
        let id = self.allocate("index buffer")?;
        bump(&self.buffers_created);
        Ok(BufferHandle::from_raw(id))
    }

    fn create_vertex_layout(
        &self,
        vertex_buffer: &BufferHandle,
        index_buffer: &BufferHandle,
    ) -> Result<VertexArrayHandle, GpuError> {
        let live = self.live.borrow().clone();
        assert!(live.contains(&vertex_buffer.raw().get()));
        assert!(live.contains(&index_buffer.raw().get()));
        let id = self.allocate("vertex array")?;
        bump(&self.layouts_created);
        Ok(VertexArrayHandle::from_raw(id))
    }

    fn destroy_buffer(&self, buffer: BufferHandle) {
        self.free(buffer.raw());
        bump(&self.buffers_destroyed);
    }

    fn destroy_vertex_layout(&self, layout: VertexArrayHandle) {
        self.free(layout.raw());
        bump(&self.layouts_destroyed);
    }
}

impl ShaderCompiler for RecordingDevice {
    fn compile(
        &self,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<ProgramHandle, ShaderError> {
        for path in [vertex_path, fragment_path] {
            let source = std::fs::read_to_string(path).map_err(|source| ShaderError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            if source.contains(BROKEN_SHADER) {
                return Err(ShaderError::Compile {
                    path: path.to_path_buf(),
                    log: "0:1(1): error: broken".to_string(),
                });
            }
        }
        bump(&self.programs_created);
        Ok(ProgramHandle::from_raw(self.next()))
    }

    fn destroy_program(&self, program: ProgramHandle) {
        self.free(program.raw());
        bump(&self.programs_destroyed);
    }
}

impl FrameRenderer for RecordingDevice {
    fn draw(&self, program: &ProgramHandle, uniforms: &[(String, UniformValue)], mesh: &GpuMesh) {
        self.draws.borrow_mut().push(DrawCall {
            program: program.raw(),
            uniforms: uniforms.to_vec(),
            index_count: mesh.index_count(),
        });
    }
}

/// Files on disk for loader tests.
pub struct Fixture {
    dir: tempfile::TempDir,
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes a file and returns its absolute path as a string.
    pub fn write(&self, name: &str, contents: &str) -> String {
        let path: PathBuf = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("failed to create fixture dir");
        }
        std::fs::write(&path, contents).expect("failed to write fixture");
        path.to_string_lossy().into_owned()
    }

    pub fn triangle(&self, name: &str) -> String {
        self.write(
            name,
            "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n",
        )
    }

    /// Writes a compilable vertex/fragment pair.
    pub fn shaders(&self, name: &str) -> (String, String) {
        (
            self.write(&format!("{name}.vert"), "#version 330 core\nvoid main() {}\n"),
            self.write(&format!("{name}.frag"), "#version 330 core\nvoid main() {}\n"),
        )
    }

    /// Writes a vertex/fragment pair whose fragment stage fails to compile.
    pub fn broken_shaders(&self, name: &str) -> (String, String) {
        (
            self.write(&format!("{name}.vert"), "#version 330 core\nvoid main() {}\n"),
            self.write(&format!("{name}.frag"), BROKEN_SHADER),
        )
    }
}
