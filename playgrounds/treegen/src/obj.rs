use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use treegen::MeshBuffers;

/// Serializes one buffer set as Wavefront OBJ text.
///
/// Positions and UVs are written as `v`/`vt` records and faces as `f` triples
/// with matching texture indices (OBJ indices are 1-based). Vertex colors have
/// no standard OBJ representation and are skipped.
pub fn to_obj(name: &str, buffers: &MeshBuffers) -> String {
	let mut out = String::new();
	let _ = writeln!(out, "o {name}");
	for v in &buffers.vertices {
		let _ = writeln!(out, "v {} {} {}", v.x, v.y, v.z);
	}
	for uv in &buffers.uvs {
		let _ = writeln!(out, "vt {} {}", uv.x, uv.y);
	}
	for [a, b, c] in &buffers.triangles {
		let (a, b, c) = (a + 1, b + 1, c + 1);
		let _ = writeln!(out, "f {a}/{a} {b}/{b} {c}/{c}");
	}
	out
}

pub fn write_obj(path: &Path, name: &str, buffers: &MeshBuffers) -> anyhow::Result<()> {
	fs::write(path, to_obj(name, buffers))?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use glam::{Vec2, Vec3};

	#[test]
	fn test_obj_output_shape() {
		let mut buffers = MeshBuffers::new();
		buffers.push_vertex(Vec3::ZERO, Vec2::ZERO);
		buffers.push_vertex(Vec3::X, Vec2::X);
		buffers.push_vertex(Vec3::Y, Vec2::Y);
		buffers.push_triangle(0, 1, 2);

		let obj = to_obj("bark", &buffers);
		let lines: Vec<&str> = obj.lines().collect();
		assert_eq!(lines[0], "o bark");
		assert_eq!(lines.iter().filter(|l| l.starts_with("v ")).count(), 3);
		assert_eq!(lines.iter().filter(|l| l.starts_with("vt ")).count(), 3);
		assert_eq!(lines.iter().filter(|l| l.starts_with("f ")).count(), 1);
		assert!(obj.contains("f 1/1 2/2 3/3"));
	}
}
