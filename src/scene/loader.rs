//! Level loading and teardown.
//!
//! [`SceneLoader`] turns a level descriptor into a [`Scene`]. Lights are materialized first,
//! then each model record goes through mesh parsing, GPU upload and shader compilation. A
//! broken record never stops the load; only a broken descriptor does.

use std::path::{Path, PathBuf};

use glam::Vec3;

use crate::{
    abs::{GpuDevice, GpuMesh, ShaderCompiler},
    error::{RecordError, SceneError},
    mesh::Mesh,
    scene::{
        Light, RecordOutcome, RecordReport, Scene, SceneObject,
        descriptor::{Descriptor, ModelRecord},
    },
};

/// Loader settings.
#[derive(Debug, Clone, Default)]
pub struct LoaderConfig {
    /// Relative mesh and shader paths are joined onto this directory. Without it they are
    /// used as written, relative to the working directory.
    pub asset_root: Option<PathBuf>,
}

impl LoaderConfig {
    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.asset_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

/// Builds scenes on the thread that owns the rendering context.
pub struct SceneLoader<'a, D: ?Sized, C: ?Sized> {
    device: &'a D,
    compiler: &'a C,
    config: LoaderConfig,
}

impl<'a, D, C> SceneLoader<'a, D, C>
where
    D: GpuDevice + ?Sized,
    C: ShaderCompiler + ?Sized,
{
    pub fn new(device: &'a D, compiler: &'a C) -> Self {
        Self {
            device,
            compiler,
            config: LoaderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the level file at `path`.
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Scene, SceneError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&source)
    }

    /// Loads a level from descriptor text.
    ///
    /// The descriptor is fully decoded before any GPU resource is created, so a fatal error
    /// never leaves anything to clean up.
    pub fn load_str(&self, source: &str) -> Result<Scene, SceneError> {
        let descriptor: Descriptor = source.parse()?;

        let mut scene = Scene {
            name: descriptor.name,
            lights: descriptor.lights.iter().map(Light::from).collect(),
            ..Default::default()
        };

        for (index, value) in descriptor.models.iter().enumerate() {
            let record = match ModelRecord::from_value(value) {
                Ok(record) => record,
                Err(e) => {
                    log::warn!("Invalid model record #{}: {}", index, e);
                    scene.records.push(RecordReport {
                        index,
                        file_name: value
                            .get("FileName")
                            .and_then(|v| v.as_str())
                            .map(PathBuf::from),
                        outcome: RecordOutcome::Failed(RecordError::Invalid(e)),
                    });
                    continue;
                }
            };

            let location = Vec3::new(record.location_x, record.location_y, record.location_z);
            let outcome = if !record.load_object {
                log::info!(
                    "Skipped model: {} at {}",
                    record.file_name.display(),
                    location
                );
                RecordOutcome::Skipped
            } else {
                match self.load_model(&record) {
                    Ok(object) => {
                        log::info!(
                            "Loaded model: {} at {} (program {})",
                            record.file_name.display(),
                            location,
                            object.program().raw()
                        );
                        scene.objects.push(object);
                        RecordOutcome::Live
                    }
                    Err(e) => {
                        log::error!("Failed to load model {}: {}", record.file_name.display(), e);
                        RecordOutcome::Failed(e)
                    }
                }
            };

            scene.records.push(RecordReport {
                index,
                file_name: Some(record.file_name),
                outcome,
            });
        }

        log::info!(
            "Loaded level '{}': {} objects, {} lights",
            scene.name,
            scene.objects.len(),
            scene.lights.len()
        );
        Ok(scene)
    }

    /// Parses, uploads and compiles a single enabled record.
    fn load_model(&self, record: &ModelRecord) -> Result<SceneObject, RecordError> {
        let source = self.config.resolve(&record.file_name);
        let vertex_shader = self.config.resolve(&record.vertex_shader);
        let fragment_shader = self.config.resolve(&record.fragment_shader);

        let mesh = Mesh::load(&source)?;
        let gpu = GpuMesh::upload(self.device, &mesh)?;

        let program = match self.compiler.compile(&vertex_shader, &fragment_shader) {
            Ok(program) => program,
            Err(e) => {
                gpu.release(self.device);
                return Err(e.into());
            }
        };

        Ok(SceneObject {
            source,
            vertex_shader,
            fragment_shader,
            transform: record.transform(),
            color: Vec3::from(record.color),
            mesh,
            gpu,
            program,
        })
    }

    /// Releases every GPU resource of the scene. Must run before the rendering context goes
    /// away.
    pub fn teardown(&self, scene: Scene) {
        log::info!("Tearing down level '{}'", scene.name);
        for object in scene.objects {
            object.release(self.device, self.compiler);
        }
    }
}
