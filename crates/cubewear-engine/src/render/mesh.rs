/// Vertices in the cube triangle list (6 faces x 2 triangles x 3 vertices).
pub const CUBE_VERTEX_COUNT: usize = 36;

/// One cube face: outward normal, RGBA color and its four corners in
/// counter-clockwise order as seen from outside.
struct Face {
    normal: [f32; 3],
    color: [f32; 4],
    corners: [[f32; 3]; 4],
}

const FACES: [Face; 6] = [
    // front
    Face {
        normal: [0.0, 0.0, 1.0],
        color: [1.0, 0.0, 0.0, 1.0],
        corners: [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
    },
    // right
    Face {
        normal: [1.0, 0.0, 0.0],
        color: [0.0, 1.0, 0.0, 1.0],
        corners: [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]],
    },
    // back
    Face {
        normal: [0.0, 0.0, -1.0],
        color: [0.0, 0.0, 1.0, 1.0],
        corners: [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]],
    },
    // left
    Face {
        normal: [-1.0, 0.0, 0.0],
        color: [1.0, 1.0, 0.0, 1.0],
        corners: [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
    },
    // top
    Face {
        normal: [0.0, 1.0, 0.0],
        color: [0.0, 1.0, 1.0, 1.0],
        corners: [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]],
    },
    // bottom
    Face {
        normal: [0.0, -1.0, 0.0],
        color: [1.0, 0.0, 1.0, 1.0],
        corners: [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
    },
];

const FACE_TRIANGLES: [usize; 6] = [0, 1, 2, 0, 2, 3];

/// Unit cube (edge length 2, centered on the origin) as three parallel
/// vertex streams. Immutable once built.
#[derive(Debug, Clone)]
pub struct CubeMesh {
    pub positions: [[f32; 3]; CUBE_VERTEX_COUNT],
    pub colors: [[f32; 4]; CUBE_VERTEX_COUNT],
    pub normals: [[f32; 3]; CUBE_VERTEX_COUNT],
}

impl CubeMesh {
    pub fn new() -> Self {
        let mut positions = [[0.0; 3]; CUBE_VERTEX_COUNT];
        let mut colors = [[0.0; 4]; CUBE_VERTEX_COUNT];
        let mut normals = [[0.0; 3]; CUBE_VERTEX_COUNT];

        for (f, face) in FACES.iter().enumerate() {
            for (k, &corner) in FACE_TRIANGLES.iter().enumerate() {
                let i = f * FACE_TRIANGLES.len() + k;
                positions[i] = face.corners[corner];
                colors[i] = face.color;
                normals[i] = face.normal;
            }
        }

        Self {
            positions,
            colors,
            normals,
        }
    }
}

impl Default for CubeMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn thirty_six_vertices() {
        let m = CubeMesh::new();
        assert_eq!(m.positions.len(), 36);
        assert_eq!(m.colors.len(), 36);
        assert_eq!(m.normals.len(), 36);
    }

    #[test]
    fn triangles_wind_counter_clockwise_outward() {
        let m = CubeMesh::new();
        for t in 0..CUBE_VERTEX_COUNT / 3 {
            let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(m.positions[t * 3 + k]));
            let n = Vec3::from(m.normals[t * 3]);
            let face_normal = (b - a).cross(c - a);
            assert!(face_normal.dot(n) > 0.0, "triangle {t} faces inward");
            // The outward normal points away from the cube center.
            assert!(a.dot(n) > 0.0);
        }
    }

    #[test]
    fn normals_are_unit_and_flat_per_face() {
        let m = CubeMesh::new();
        for face in m.normals.chunks(6) {
            assert!(face.iter().all(|n| *n == face[0]));
            assert!((Vec3::from(face[0]).length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn colors_are_opaque() {
        assert!(CubeMesh::new().colors.iter().all(|c| c[3] == 1.0));
    }

    #[test]
    fn every_corner_is_used() {
        let m = CubeMesh::new();
        for x in [-1.0f32, 1.0] {
            for y in [-1.0f32, 1.0] {
                for z in [-1.0f32, 1.0] {
                    assert!(m.positions.contains(&[x, y, z]));
                }
            }
        }
    }
}
