//! Mesh file parsing.
//!
//! This module defines the CPU side [`Mesh`] together with its [`Vertex`] and [`Face`] records.
//! Meshes are read from a line oriented text format where `v` lines carry positions, `vn` lines
//! carry normals and `f` lines carry triangles of `vertex/texcoord/normal` groups.

use std::path::Path;

use glam::Vec3;

use crate::error::MeshError;

/// Size in bytes of one [`Vertex`] record in a vertex buffer.
pub const VERTEX_STRIDE: usize = std::mem::size_of::<Vertex>();

/// Byte offset of [`Vertex::normal`] inside a vertex record.
pub const NORMAL_OFFSET: usize = std::mem::offset_of!(Vertex, normal);

/// A single vertex as it is laid out on the GPU.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

/// A triangle referencing three vertices by their 0-based index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct Face {
    pub indices: [u32; 3],
}

/// A mesh read from a file. Vertices keep file order, so face indices stay stable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub normals: Vec<Vec3>,
    pub faces: Vec<Face>,
}

impl Mesh {
    /// Reads and parses the mesh file at `path`.
    ///
    /// Bytes that are not valid UTF-8 are replaced before parsing, so they only affect the
    /// lines they appear on.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MeshError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| MeshError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&String::from_utf8_lossy(&bytes))
    }

    /// Parses mesh source text.
    ///
    /// Lines with an unknown leading token are ignored, as are face lines that do not carry
    /// three well formed index groups. Face indices that point past the vertices or normals
    /// read so far are rejected.
    pub fn parse(source: &str) -> Result<Self, MeshError> {
        let mut mesh = Mesh::default();

        for (line_index, line) in source.lines().enumerate() {
            let mut tokens = line.split_whitespace();
            match tokens.next() {
                Some("v") => mesh.vertices.push(Vertex {
                    position: read_vec3(tokens),
                    normal: Vec3::ZERO,
                }),
                Some("vn") => mesh.normals.push(read_vec3(tokens)),
                Some("f") => {
                    let Some(groups) = read_face_groups(tokens) else {
                        continue;
                    };
                    let face = mesh.resolve_face(&groups, line_index + 1)?;
                    mesh.faces.push(face);
                }
                _ => {}
            }
        }

        Ok(mesh)
    }

    /// Converts three 1-based groups into a face, copying each referenced normal onto its
    /// vertex. A vertex shared by several faces keeps the normal of the last one.
    fn resolve_face(&mut self, groups: &[FaceGroup; 3], line: usize) -> Result<Face, MeshError> {
        let mut indices = [0u32; 3];

        for (slot, group) in indices.iter_mut().zip(groups) {
            let vertex = to_zero_based(group.vertex, self.vertices.len()).ok_or(
                MeshError::VertexIndexOutOfRange {
                    line,
                    index: group.vertex,
                    count: self.vertices.len(),
                },
            )?;

            if let Some(normal_index) = group.normal {
                let normal = to_zero_based(normal_index, self.normals.len()).ok_or(
                    MeshError::NormalIndexOutOfRange {
                        line,
                        index: normal_index,
                        count: self.normals.len(),
                    },
                )?;
                self.vertices[vertex].normal = self.normals[normal];
            }

            *slot = vertex as u32;
        }

        Ok(Face { indices })
    }

    /// Number of indices needed to draw every face.
    pub fn index_count(&self) -> usize {
        self.faces.len() * 3
    }

    /// Flattened index list, three entries per face.
    pub fn indices(&self) -> Vec<u32> {
        self.faces.iter().flat_map(|face| face.indices).collect()
    }
}

/// One `vertex/texcoord/normal` group of a face line, still 1-based.
#[derive(Clone, Copy, Debug, PartialEq)]
struct FaceGroup {
    vertex: i64,
    normal: Option<i64>,
}

impl std::str::FromStr for FaceGroup {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = s.split('/');
        let vertex = fields.next().unwrap_or_default().parse()?;
        // the texture coordinate is never used
        let _ = fields.next();
        let normal = match fields.next() {
            Some(field) if !field.is_empty() => Some(field.parse()?),
            _ => None,
        };
        Ok(FaceGroup { vertex, normal })
    }
}

/// Reads the first three groups of a face line. Extra groups are dropped.
fn read_face_groups<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Option<[FaceGroup; 3]> {
    let mut next = || tokens.next()?.parse::<FaceGroup>().ok();
    Some([next()?, next()?, next()?])
}

/// Reads up to three components, treating missing or unparsable ones as zero.
fn read_vec3<'a>(tokens: impl Iterator<Item = &'a str>) -> Vec3 {
    let mut components = [0.0f32; 3];
    for (component, token) in components.iter_mut().zip(tokens) {
        *component = token.parse().unwrap_or(0.0);
    }
    Vec3::from(components)
}

#[inline]
fn to_zero_based(index: i64, count: usize) -> Option<usize> {
    let index = usize::try_from(index).ok()?;
    (1..=count).contains(&index).then(|| index - 1)
}
