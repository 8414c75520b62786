use wgpu::util::DeviceExt;

use crate::model::SceneBuffers;

/// Scene geometry resident on the GPU: one buffer per vertex attribute plus indices.
pub struct GeometryBuffers {
    pub position_buffer: wgpu::Buffer,
    pub normal_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GeometryBuffers {
    pub fn upload(buffers: &SceneBuffers, device: &wgpu::Device) -> Self {
        let position_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Position Buffer"),
            contents: bytemuck::cast_slice(&buffers.positions),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let normal_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Normal Buffer"),
            contents: bytemuck::cast_slice(&buffers.normals),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Scene Index Buffer"),
            contents: bytemuck::cast_slice(&buffers.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        GeometryBuffers {
            position_buffer,
            normal_buffer,
            index_buffer,
            index_count: buffers.indices.len() as u32,
        }
    }
}

/// Round `size` up to the next multiple of `alignment` (a power of two).
pub fn align_to(size: u64, alignment: u64) -> u64 {
    (size + alignment - 1) & !(alignment - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_to() {
        assert_eq!(align_to(144, 256), 256);
        assert_eq!(align_to(256, 256), 256);
        assert_eq!(align_to(257, 256), 512);
        assert_eq!(align_to(0, 64), 0);
    }
}
