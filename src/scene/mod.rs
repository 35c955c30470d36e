//! Scene entities.
//!
//! A [`Scene`] is one loaded level: its name, the [`SceneObject`]s that made it through
//! loading and the [`Light`]s. Entities are immutable once built; the only way to get rid of
//! their GPU resources is [`loader::SceneLoader::teardown`], which consumes the scene.

pub mod bind;
pub mod descriptor;
pub mod loader;

use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};

use crate::{
    abs::{GpuDevice, GpuMesh, ProgramHandle, ShaderCompiler},
    error::RecordError,
    mesh::Mesh,
};

/// A point light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
}

/// Placement of an object in the world. Rotation is `angle` radians about +Y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub location: Vec3,
    pub angle: f32,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            location: Vec3::ZERO,
            angle: 0.0,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Composes translation, rotation and scale, in that order.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.location)
            * Mat4::from_rotation_y(self.angle)
            * Mat4::from_scale(self.scale)
    }
}

/// One placed, shaded model with its own GPU resources.
#[derive(Debug)]
pub struct SceneObject {
    source: PathBuf,
    vertex_shader: PathBuf,
    fragment_shader: PathBuf,
    transform: Transform,
    color: Vec3,
    mesh: Mesh,
    gpu: GpuMesh,
    program: ProgramHandle,
}

impl SceneObject {
    /// Path of the mesh file, used for diagnostics.
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn vertex_shader(&self) -> &Path {
        &self.vertex_shader
    }

    pub fn fragment_shader(&self) -> &Path {
        &self.fragment_shader
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Base material color.
    pub fn color(&self) -> Vec3 {
        self.color
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn gpu(&self) -> &GpuMesh {
        &self.gpu
    }

    pub fn program(&self) -> &ProgramHandle {
        &self.program
    }

    fn release<D, C>(self, device: &D, compiler: &C)
    where
        D: GpuDevice + ?Sized,
        C: ShaderCompiler + ?Sized,
    {
        log::debug!("Releasing {}", self.source.display());
        self.gpu.release(device);
        compiler.destroy_program(self.program);
    }
}

/// What happened to a model record during loading.
#[derive(Debug)]
pub enum RecordOutcome {
    /// Added to the scene.
    Live,
    /// `LoadObject` was false.
    Skipped,
    /// Any resources created for the record were released again.
    Failed(RecordError),
}

/// Load report entry for one model record, in descriptor order.
#[derive(Debug)]
pub struct RecordReport {
    pub index: usize,
    /// The record's `FileName`, if it could be read.
    pub file_name: Option<PathBuf>,
    pub outcome: RecordOutcome,
}

impl RecordReport {
    pub fn is_live(&self) -> bool {
        matches!(self.outcome, RecordOutcome::Live)
    }
}

/// A loaded level.
#[derive(Debug, Default)]
pub struct Scene {
    name: String,
    objects: Vec<SceneObject>,
    lights: Vec<Light>,
    records: Vec<RecordReport>,
}

impl Scene {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Objects in descriptor order.
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    /// Lights in descriptor order.
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// One entry per model record of the descriptor.
    pub fn records(&self) -> &[RecordReport] {
        &self.records
    }
}
