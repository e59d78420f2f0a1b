//! CPU mesh data and box primitive generation.

use bytemuck::{Pod, Zeroable};
use engine_core::safe_normalize_with;
use glam::{Mat3, Mat4, Vec3};

/// Smallest extent a generated box may have along any axis.
pub const MIN_BOX_EXTENT: f32 = 1e-4;

/// Squared length below which a transformed normal is considered collapsed.
const NORMAL_EPSILON_SQ: f32 = 1e-10;

/// Standard vertex with position, normal and UV coordinates.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coords: [f32; 2],
}

impl Vertex {
    /// Create a vertex with zero UVs.
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self {
            position: position.into(),
            normal: normal.into(),
            tex_coords: [0.0, 0.0],
        }
    }

    /// Get the position.
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    /// Get the normal.
    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Phong-style surface parameters carried by every mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Vec3::splat(0.8),
            specular: Vec3::splat(0.2),
            shininess: 32.0,
        }
    }
}

/// Mesh data before GPU upload. Every triangle index is `< vertices.len()`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<[u32; 3]>,
    pub material: Material,
}

impl MeshData {
    /// Create an empty mesh with the default material.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty mesh with reserved storage.
    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
            material: Material::default(),
        }
    }

    /// Get the vertex count.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the triangle count.
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Flat index list for an index buffer.
    pub fn indices(&self) -> &[u32] {
        bytemuck::cast_slice(&self.triangles)
    }

    /// Raw vertex bytes for a vertex buffer.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// True when every triangle references an existing vertex.
    pub fn indices_in_bounds(&self) -> bool {
        let count = self.vertices.len() as u64;
        self.triangles
            .iter()
            .all(|tri| tri.iter().all(|&i| (i as u64) < count))
    }
}

/// Build a box of the given size centered at the local origin.
///
/// Six faces with four vertices each (24 vertices, 12 triangles). Faces do
/// not share vertices, so every face keeps a constant outward normal and
/// shades flat.
pub fn build_box(size: Vec3) -> MeshData {
    let half = size.max(Vec3::splat(MIN_BOX_EXTENT)) * 0.5;

    let corners = [
        Vec3::new(-half.x, -half.y, -half.z),
        Vec3::new(half.x, -half.y, -half.z),
        Vec3::new(half.x, half.y, -half.z),
        Vec3::new(-half.x, half.y, -half.z),
        Vec3::new(-half.x, -half.y, half.z),
        Vec3::new(half.x, -half.y, half.z),
        Vec3::new(half.x, half.y, half.z),
        Vec3::new(-half.x, half.y, half.z),
    ];

    // (outward normal, counter-clockwise corner loop seen from outside)
    let faces: [(Vec3, [usize; 4]); 6] = [
        (Vec3::Z, [4, 5, 6, 7]),     // Front
        (Vec3::NEG_Z, [1, 0, 3, 2]), // Back
        (Vec3::NEG_X, [0, 4, 7, 3]), // Left
        (Vec3::X, [5, 1, 2, 6]),     // Right
        (Vec3::Y, [3, 7, 6, 2]),     // Top
        (Vec3::NEG_Y, [0, 1, 5, 4]), // Bottom
    ];

    let mut mesh = MeshData::with_capacity(24, 12);
    for (normal, loop_indices) in faces {
        let base = mesh.vertices.len() as u32;
        mesh.vertices
            .extend(loop_indices.iter().map(|&c| Vertex::new(corners[c], normal)));
        mesh.triangles.push([base, base + 1, base + 2]);
        mesh.triangles.push([base, base + 2, base + 3]);
    }
    mesh
}

/// Append `source` to `destination`, transforming it by `transform`.
///
/// Positions use the full matrix; normals use the inverse-transpose of its
/// upper 3x3 and are renormalized. A normal that collapses under a singular
/// transform keeps its original value. Triangle indices are offset by the
/// destination's vertex count before the append.
pub fn append_transformed(destination: &mut MeshData, source: &MeshData, transform: Mat4) {
    let index_offset = destination.vertices.len() as u32;
    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();

    destination.vertices.reserve(source.vertices.len());
    destination.triangles.reserve(source.triangles.len());

    destination.vertices.extend(source.vertices.iter().map(|vertex| {
        let original_normal = vertex.normal();
        let normal = safe_normalize_with(
            normal_matrix * original_normal,
            NORMAL_EPSILON_SQ,
            original_normal,
        );
        Vertex {
            position: transform.transform_point3(vertex.position()).into(),
            normal: normal.into(),
            tex_coords: vertex.tex_coords,
        }
    }));

    destination.triangles.extend(
        source
            .triangles
            .iter()
            .map(|tri| tri.map(|i| i + index_offset)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_has_24_vertices_and_12_triangles() {
        for size in [Vec3::ONE, Vec3::new(2.5, 1.0, 2.5), Vec3::new(0.05, 3.2, 0.7)] {
            let mesh = build_box(size);
            assert_eq!(mesh.vertex_count(), 24);
            assert_eq!(mesh.triangle_count(), 12);
            assert!(mesh.triangles.iter().flatten().all(|&i| i < 24));
        }
    }

    #[test]
    fn box_is_centered_and_scaled() {
        let mesh = build_box(Vec3::new(2.0, 4.0, 6.0));
        let (min, max) = mesh.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(lo, hi), v| (lo.min(v.position()), hi.max(v.position())),
        );
        assert_eq!(min, Vec3::new(-1.0, -2.0, -3.0));
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn box_normals_point_outward_and_faces_are_flat() {
        let mesh = build_box(Vec3::new(1.0, 2.0, 3.0));
        for face in mesh.vertices.chunks(4) {
            let n = face[0].normal();
            assert!(face.iter().all(|v| v.normal() == n));
            // Every vertex of the face lies on the outward side
            assert!(face.iter().all(|v| v.position().dot(n) > 0.0));
        }
    }

    #[test]
    fn box_winding_matches_normals() {
        let mesh = build_box(Vec3::ONE);
        for tri in &mesh.triangles {
            let [a, b, c] = tri.map(|i| mesh.vertices[i as usize]);
            let face_normal = (b.position() - a.position()).cross(c.position() - a.position());
            assert!(face_normal.dot(a.normal()) > 0.0);
        }
    }

    #[test]
    fn degenerate_box_size_is_clamped() {
        let mesh = build_box(Vec3::new(0.0, -1.0, 1.0));
        assert!(mesh
            .vertices
            .iter()
            .all(|v| v.position().abs().min_element() >= MIN_BOX_EXTENT * 0.5 - 1e-9));
    }

    #[test]
    fn append_identity_preserves_vertices_and_offsets_indices() {
        let mut destination = build_box(Vec3::ONE);
        let source = build_box(Vec3::new(2.0, 1.0, 0.5));
        let prior = destination.vertex_count() as u32;

        append_transformed(&mut destination, &source, Mat4::IDENTITY);

        assert_eq!(destination.vertex_count(), 48);
        assert_eq!(destination.triangle_count(), 24);
        for (appended, original) in destination.vertices[24..].iter().zip(&source.vertices) {
            assert!((appended.position() - original.position()).length() < 1e-6);
            assert!((appended.normal() - original.normal()).length() < 1e-6);
        }
        for (appended, original) in destination.triangles[12..].iter().zip(&source.triangles) {
            for k in 0..3 {
                assert_eq!(appended[k], original[k] + prior);
            }
        }
        assert!(destination.indices_in_bounds());
    }

    #[test]
    fn append_uses_inverse_transpose_for_normals() {
        // Shear in XY: a plain matrix multiply would tilt the +Y normal wrong
        let shear = Mat4::from_cols_array(&[
            1.0, 0.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        let source = build_box(Vec3::ONE);
        let mut destination = MeshData::new();
        append_transformed(&mut destination, &source, shear);

        for tri in &destination.triangles {
            let [a, b, c] = tri.map(|i| destination.vertices[i as usize]);
            let edge1 = b.position() - a.position();
            let edge2 = c.position() - a.position();
            assert!(a.normal().dot(edge1).abs() < 1e-5);
            assert!(a.normal().dot(edge2).abs() < 1e-5);
            assert!((a.normal().length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn append_singular_transform_keeps_original_normals() {
        let source = build_box(Vec3::ONE);
        let mut destination = MeshData::new();
        append_transformed(&mut destination, &source, Mat4::from_scale(Vec3::new(1.0, 0.0, 1.0)));
        for (out, original) in destination.vertices.iter().zip(&source.vertices) {
            assert!(out.normal().is_finite());
            assert_eq!(out.normal(), original.normal());
        }
    }

    #[test]
    fn index_buffer_is_flat_view_of_triangles() {
        let mesh = build_box(Vec3::ONE);
        assert_eq!(mesh.indices().len(), 36);
        assert_eq!(&mesh.indices()[..6], &[0, 1, 2, 0, 2, 3]);
        assert_eq!(mesh.vertex_bytes().len(), 24 * std::mem::size_of::<Vertex>());
    }
}
