use glam::{Vec2, Vec3, Vec4};

/// Accumulating triangle-mesh buffers.
///
/// Geometry is appended strip by strip: a builder records `vertex_count()`
/// before pushing its vertices and emits triangle indices relative to that
/// base. Buffers are never reorganised once written, so recorded bases stay
/// valid for the whole build.
#[derive(Debug, Clone, Default)]
pub struct MeshBuffers {
	pub vertices: Vec<Vec3>,
	pub triangles: Vec<[u32; 3]>,
	pub uvs: Vec<Vec2>,
	/// Per-vertex RGBA, present only for meshes that carry it (foliage).
	pub colors: Option<Vec<Vec4>>,
}

impl MeshBuffers {
	pub fn new() -> Self {
		Self::default()
	}

	/// A buffer set that stores a color for every vertex.
	pub fn with_colors() -> Self {
		Self { colors: Some(Vec::new()), ..Self::default() }
	}

	pub fn vertex_count(&self) -> u32 {
		self.vertices.len() as u32
	}

	pub fn triangle_count(&self) -> usize {
		self.triangles.len()
	}

	/// True when nothing renderable was produced.
	pub fn is_empty(&self) -> bool {
		self.vertices.is_empty() || self.triangles.is_empty()
	}

	pub fn push_vertex(&mut self, position: Vec3, uv: Vec2) {
		self.vertices.push(position);
		self.uvs.push(uv);
	}

	pub fn push_colored_vertex(&mut self, position: Vec3, uv: Vec2, color: Vec4) {
		self.vertices.push(position);
		self.uvs.push(uv);
		if let Some(colors) = self.colors.as_mut() {
			colors.push(color);
		}
	}

	pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
		self.triangles.push([a, b, c]);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_without_triangles() {
		let mut buffers = MeshBuffers::new();
		assert!(buffers.is_empty());
		buffers.push_vertex(Vec3::ZERO, Vec2::ZERO);
		assert!(buffers.is_empty());
		buffers.push_vertex(Vec3::X, Vec2::ZERO);
		buffers.push_vertex(Vec3::Y, Vec2::ZERO);
		buffers.push_triangle(0, 1, 2);
		assert!(!buffers.is_empty());
	}

	#[test]
	fn test_colored_buffers_track_vertices() {
		let mut buffers = MeshBuffers::with_colors();
		buffers.push_colored_vertex(Vec3::ZERO, Vec2::ZERO, Vec4::ONE);
		buffers.push_colored_vertex(Vec3::X, Vec2::X, Vec4::ONE);
		let colors = buffers.colors.as_ref().unwrap();
		assert_eq!(colors.len(), buffers.vertices.len());
	}
}
