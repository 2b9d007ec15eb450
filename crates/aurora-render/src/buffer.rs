//! GPU buffers for sphere meshes and uniform blocks.
//!
//! Every mesh in the scene is a tessellated sphere whose index count
//! outgrows 16 bits at the configured segment counts, so indices are always
//! uploaded as `u32`.

use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// Index format shared by every mesh.
pub const MESH_INDEX_FORMAT: wgpu::IndexFormat = wgpu::IndexFormat::Uint32;

/// Vertex and index buffers for one indexed mesh.
pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl MeshBuffer {
    pub fn bind<'a>(&'a self, render_pass: &mut wgpu::RenderPass<'a>) {
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), MESH_INDEX_FORMAT);
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

/// Creates the immutable mesh buffers and queue-writable uniform buffers
/// the renderers bind.
pub struct BufferAllocator<'a> {
    device: &'a wgpu::Device,
}

impl<'a> BufferAllocator<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self { device }
    }

    /// Upload `vertices` and their triangle-list `indices`.
    ///
    /// Mesh buffers are never rewritten after upload.
    pub fn create_mesh<V: Pod>(&self, label: &str, vertices: &[V], indices: &[u32]) -> MeshBuffer {
        let vertex_buffer = self.init(
            &format!("{label}-vertices"),
            bytemuck::cast_slice(vertices),
            wgpu::BufferUsages::VERTEX,
        );
        let index_buffer = self.init(
            &format!("{label}-indices"),
            bytemuck::cast_slice(indices),
            wgpu::BufferUsages::INDEX,
        );

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// Create a uniform buffer initialized with `value`, writable from the queue.
    pub fn create_uniform_buffer<T: Pod>(&self, label: &str, value: &T) -> wgpu::Buffer {
        self.init(
            label,
            bytemuck::bytes_of(value),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        )
    }

    fn init(&self, label: &str, contents: &[u8], usage: wgpu::BufferUsages) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents,
                usage,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::texture::create_test_device_queue;

    #[test]
    fn test_mesh_index_count_matches_input() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let vertices: &[[f32; 3]] = &[
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
        ];
        let indices: &[u32] = &[0, 1, 2, 2, 1, 3];

        let mesh = BufferAllocator::new(&device).create_mesh("quad", vertices, indices);

        assert_eq!(mesh.index_count, 6);
        assert_eq!(mesh.vertex_buffer.size(), 4 * 12);
        assert_eq!(mesh.index_buffer.size(), 6 * 4);
    }

    #[test]
    fn test_mesh_buffers_are_not_writable() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let vertices: &[[f32; 4]] = &[[0.0; 4]; 3];
        let mesh = BufferAllocator::new(&device).create_mesh("triangle", vertices, &[0, 1, 2]);

        assert!(mesh.vertex_buffer.usage().contains(wgpu::BufferUsages::VERTEX));
        assert!(mesh.index_buffer.usage().contains(wgpu::BufferUsages::INDEX));
        assert!(!mesh.vertex_buffer.usage().contains(wgpu::BufferUsages::COPY_DST));
    }

    #[test]
    fn test_uniform_buffer_size_matches_value() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let allocator = BufferAllocator::new(&device);
        let buffer = allocator.create_uniform_buffer("test-uniform", &[0.0f32; 8]);
        assert_eq!(buffer.size(), 32);
        assert!(buffer.usage().contains(wgpu::BufferUsages::UNIFORM));
        assert!(buffer.usage().contains(wgpu::BufferUsages::COPY_DST));
    }
}
