//! Triangle meshes for confidence ellipsoids.

/// A triangle in 3D.
pub type Triangle = [[f64; 3]; 3];

const OCTAHEDRON_VERTICES: [[f64; 3]; 6] = [
    [1.0, 0.0, 0.0],
    [-1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, -1.0, 0.0],
    [0.0, 0.0, 1.0],
    [0.0, 0.0, -1.0],
];

const OCTAHEDRON_FACES: [[usize; 3]; 8] = [
    [0, 2, 4],
    [2, 1, 4],
    [1, 3, 4],
    [3, 0, 4],
    [2, 0, 5],
    [1, 2, 5],
    [3, 1, 5],
    [0, 3, 5],
];

fn normalize(p: [f64; 3]) -> [f64; 3] {
    let len = p.iter().map(|v| v * v).sum::<f64>().sqrt();
    [p[0] / len, p[1] / len, p[2] / len]
}

fn midpoint(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    normalize([
        f64::midpoint(a[0], b[0]),
        f64::midpoint(a[1], b[1]),
        f64::midpoint(a[2], b[2]),
    ])
}

/// Unit sphere approximated by an octahedron subdivided `smoothness` times.
///
/// Each level splits every face into four, so the mesh has
/// `8 * 4^smoothness` faces.
pub fn unit_sphere(smoothness: u8) -> Vec<Triangle> {
    let mut faces: Vec<Triangle> = OCTAHEDRON_FACES
        .iter()
        .map(|f| f.map(|i| OCTAHEDRON_VERTICES[i]))
        .collect();

    for _ in 0..smoothness {
        faces = faces
            .iter()
            .flat_map(|&[a, b, c]| {
                let (ab, bc, ca) = (midpoint(a, b), midpoint(b, c), midpoint(c, a));
                [[a, ab, ca], [ab, b, bc], [ca, bc, c], [ab, bc, ca]]
            })
            .collect();
    }
    faces
}

/// Scale a unit mesh by per-axis radii and move it to `center`.
pub fn ellipsoid(mesh: &[Triangle], center: [f64; 3], radii: [f64; 3]) -> Vec<Triangle> {
    mesh.iter()
        .map(|tri| {
            tri.map(|p| {
                [
                    p[0].mul_add(radii[0], center[0]),
                    p[1].mul_add(radii[1], center[1]),
                    p[2].mul_add(radii[2], center[2]),
                ]
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_counts() {
        assert_eq!(unit_sphere(0).len(), 8);
        assert_eq!(unit_sphere(1).len(), 32);
        assert_eq!(unit_sphere(2).len(), 128);
        assert_eq!(unit_sphere(3).len(), 512);
    }

    #[test]
    fn test_vertices_on_unit_sphere() {
        for tri in unit_sphere(2) {
            for p in tri {
                let len = p.iter().map(|v| v * v).sum::<f64>().sqrt();
                assert!((len - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_ellipsoid_scaling() {
        let mesh = unit_sphere(0);
        let shape = ellipsoid(&mesh, [1.0, 2.0, 3.0], [2.0, 0.5, 0.0]);
        // first face starts at the +x vertex
        assert!((shape[0][0][0] - 3.0).abs() < 1e-12);
        assert!((shape[0][0][1] - 2.0).abs() < 1e-12);
        // zero radius flattens the z axis onto the center
        assert!(shape.iter().flatten().all(|p| (p[2] - 3.0).abs() < 1e-12));
    }
}
