use bytemuck::{Pod, Zeroable};

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 12, // [f32; 3] is 12 bytes
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: 24,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// Create a disc in the XY plane, centered at origin, facing +Z.
///
/// The disc is a triangle fan around a center vertex, sweeping `theta_length`
/// radians from `theta_start`. A sweep longer than a full turn simply lets
/// the last segment overlap the first. UVs map the disc's bounding square to
/// [0,1] so `uv.y` runs bottom-to-top across the disc.
pub fn create_disc_geometry(
    radius: f32,
    segments: u32,
    theta_start: f32,
    theta_length: f32,
) -> (Vec<Vertex>, Vec<u16>) {
    let normal = [0.0, 0.0, 1.0];

    let mut vertices = Vec::with_capacity(segments as usize + 2);
    vertices.push(Vertex::new([0.0, 0.0, 0.0], normal, [0.5, 0.5]));

    for i in 0..=segments {
        let theta = theta_start + theta_length * (i as f32) / (segments as f32);
        let x = radius * theta.cos();
        let y = radius * theta.sin();
        let uv = [x / (2.0 * radius) + 0.5, y / (2.0 * radius) + 0.5];
        vertices.push(Vertex::new([x, y, 0.0], normal, uv));
    }

    let mut indices = Vec::with_capacity(segments as usize * 3);
    for i in 1..=segments as u16 {
        indices.push(i);
        indices.push(i + 1);
        indices.push(0);
    }

    (vertices, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disc_counts() {
        let (vertices, indices) = create_disc_geometry(20.0, 128, 6.0, 6.3);
        assert_eq!(vertices.len(), 130); // center + 129 ring vertices
        assert_eq!(indices.len(), 128 * 3);
    }

    #[test]
    fn test_ring_vertices_on_radius() {
        let radius = 22.0;
        let (vertices, _) = create_disc_geometry(radius, 64, 6.0, 6.3);
        for v in &vertices[1..] {
            let r = (v.position[0] * v.position[0] + v.position[1] * v.position[1]).sqrt();
            assert!((r - radius).abs() < 1e-3);
            assert_eq!(v.position[2], 0.0);
        }
    }

    #[test]
    fn test_normals_face_forward() {
        let (vertices, _) = create_disc_geometry(20.0, 16, 0.0, 6.3);
        for v in &vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn test_uvs_in_unit_square() {
        let (vertices, _) = create_disc_geometry(20.0, 128, 6.0, 6.3);
        for v in &vertices {
            assert!(v.uv[0] >= -1e-6 && v.uv[0] <= 1.0 + 1e-6);
            assert!(v.uv[1] >= -1e-6 && v.uv[1] <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn test_indices_in_bounds() {
        let (vertices, indices) = create_disc_geometry(20.0, 128, 6.0, 6.3);
        let max = *indices.iter().max().unwrap() as usize;
        assert!(max < vertices.len());
    }
}
