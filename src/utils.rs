use bytemuck::NoUninit;
use wgpu::util::DeviceExt;

#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub normal: [f32; 3],
    pub color: [f32; 4],
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Append another mesh, rebasing its indices.
    pub fn append(&mut self, other: Mesh) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_vertex_buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mesh_index_buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

/// Flat quad in the y = 0 plane, centered on the origin. This is the surface
/// the camera's floor clamp lands on.
pub fn create_ground_mesh(half_extent: f32) -> Mesh {
    let e = half_extent;
    let color = [0.30, 0.42, 0.25, 1.0];
    let normal = [0.0, 1.0, 0.0];

    let vertices = vec![
        Vertex { pos: [-e, 0.0, -e], normal, color },
        Vertex { pos: [-e, 0.0, e], normal, color },
        Vertex { pos: [e, 0.0, e], normal, color },
        Vertex { pos: [e, 0.0, -e], normal, color },
    ];
    let indices = vec![0, 1, 2, 0, 2, 3];

    Mesh { vertices, indices }
}

/// Axis-aligned box with per-face normals, CCW winding when viewed from
/// outside.
pub fn create_box_mesh(center: [f32; 3], half: f32, color: [f32; 4]) -> Mesh {
    let [cx, cy, cz] = center;
    let h = half;

    // (normal, four corners CCW from outside)
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        (
            [0.0, 0.0, 1.0],
            [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
        ),
        (
            [0.0, 0.0, -1.0],
            [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
        ),
        (
            [1.0, 0.0, 0.0],
            [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]],
        ),
        (
            [-1.0, 0.0, 0.0],
            [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
        ),
        (
            [0.0, 1.0, 0.0],
            [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
        ),
        (
            [0.0, -1.0, 0.0],
            [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
        ),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (normal, corners) in faces {
        let base = vertices.len() as u32;
        for corner in corners {
            vertices.push(Vertex {
                pos: [cx + corner[0], cy + corner[1], cz + corner[2]],
                normal,
                color,
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn box_mesh_has_24_vertices_and_36_indices() {
        let mesh = create_box_mesh([0.0, 0.5, 0.0], 0.5, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.indices.len(), 36);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn ground_mesh_lies_in_floor_plane() {
        let mesh = create_ground_mesh(50.0);
        assert!(mesh.vertices.iter().all(|v| v.pos[1] == 0.0));
        assert_eq!(mesh.indices.len(), 6);
    }

    #[test]
    fn append_rebases_indices() {
        let mut scene = create_ground_mesh(10.0);
        let offset = scene.vertices.len() as u32;
        scene.append(create_box_mesh([0.0, 0.5, 0.0], 0.5, [1.0; 4]));
        assert!(scene.indices[6..].iter().all(|&i| i >= offset));
    }
}
