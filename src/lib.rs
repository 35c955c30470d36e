//! Level loading for a small OpenGL scene viewer.
//!
//! A level file names a set of models (mesh file, shaders, placement, color) and point lights.
//! [`scene::loader::SceneLoader`] parses it, reads every enabled model's mesh with
//! [`mesh::Mesh`], uploads it through an [`abs::GpuDevice`], compiles its program through an
//! [`abs::ShaderCompiler`] and hands back a [`scene::Scene`] that the render loop draws with
//! [`scene::Scene::bind`].

pub mod abs;
pub mod camera;
pub mod error;
pub mod logging;
pub mod mesh;
pub mod scene;

#[cfg(test)]
mod testing;
