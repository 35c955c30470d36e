//! Per-frame uniform binding.
//!
//! Every frame each object's program receives the camera matrices, its model matrix and base
//! color, and the full light list. The uniform names below are shared with the shaders and
//! must not change.

use glam::Mat4;

use crate::{
    abs::{GpuMesh, ProgramHandle, UniformValue},
    scene::{Light, Scene, SceneObject},
};

pub const VIEW: &str = "view";
pub const PROJECTION: &str = "projection";
pub const MODEL: &str = "model";
pub const OBJECT_COLOR: &str = "objectColor";
pub const LIGHT_COUNT: &str = "numLights";

/// Name of a field of the `index`-th entry of the `lights` uniform array.
pub fn light_uniform(index: usize, field: &str) -> String {
    format!("lights[{index}].{field}")
}

/// Something that can draw a mesh with a program and a set of uniforms.
pub trait FrameRenderer {
    fn draw(&self, program: &ProgramHandle, uniforms: &[(String, UniformValue)], mesh: &GpuMesh);
}

/// Builds the uniforms for one object.
pub fn frame_uniforms(
    object: &SceneObject,
    lights: &[Light],
    view: Mat4,
    projection: Mat4,
) -> Vec<(String, UniformValue)> {
    let mut uniforms = Vec::with_capacity(5 + lights.len() * 3);
    uniforms.push((VIEW.to_string(), UniformValue::Mat4(view)));
    uniforms.push((PROJECTION.to_string(), UniformValue::Mat4(projection)));
    uniforms.push((
        LIGHT_COUNT.to_string(),
        UniformValue::Int(lights.len() as i32),
    ));
    uniforms.push((OBJECT_COLOR.to_string(), UniformValue::Vec3(object.color())));

    for (i, light) in lights.iter().enumerate() {
        uniforms.push((light_uniform(i, "position"), UniformValue::Vec3(light.position)));
        uniforms.push((light_uniform(i, "color"), UniformValue::Vec3(light.color)));
        uniforms.push((light_uniform(i, "intensity"), UniformValue::Float(light.intensity)));
    }

    uniforms.push((
        MODEL.to_string(),
        UniformValue::Mat4(object.transform().model_matrix()),
    ));
    uniforms
}

impl Scene {
    /// Draws every object in descriptor order.
    pub fn bind<R: FrameRenderer + ?Sized>(&self, renderer: &R, view: Mat4, projection: Mat4) {
        for object in self.objects() {
            let uniforms = frame_uniforms(object, self.lights(), view, projection);
            renderer.draw(object.program(), &uniforms, object.gpu());
        }
    }
}
