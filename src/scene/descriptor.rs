//! Level descriptor format.
//!
//! A level is a JSON object with a `Name`, a list of `Lights` and a list of `Models`. Lights are
//! decoded strictly together with the top level. Models are kept as raw values so that one bad
//! record can be skipped without failing the whole level.

use std::path::PathBuf;

use glam::Vec3;
use serde::Deserialize;

use crate::scene::{Light, Transform};

/// The top level of a level file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Descriptor {
    pub name: String,
    pub lights: Vec<LightRecord>,
    pub models: Vec<serde_json::Value>,
}

impl std::str::FromStr for Descriptor {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LightRecord {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub intensity: f32,
}

impl From<&LightRecord> for Light {
    fn from(record: &LightRecord) -> Self {
        Light {
            position: Vec3::from(record.position),
            color: Vec3::from(record.color),
            intensity: record.intensity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ModelRecord {
    pub file_name: PathBuf,
    pub fragment_shader: PathBuf,
    pub vertex_shader: PathBuf,
    pub location_x: f32,
    pub location_y: f32,
    pub location_z: f32,
    pub angle: f32,
    pub load_object: bool,
    pub color: [f32; 3],
    #[serde(default)]
    pub scale: Option<[f32; 3]>,
}

impl ModelRecord {
    /// Decodes one entry of the `Models` array.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }

    pub fn transform(&self) -> Transform {
        Transform {
            location: Vec3::new(self.location_x, self.location_y, self.location_z),
            angle: self.angle,
            scale: self.scale.map_or(Vec3::ONE, Vec3::from),
        }
    }
}
