use crate::foliage::leaf_color;
use crate::mesh::MeshBuffers;
use crate::noise_field::NoiseField;
use crate::texture::TextureVariation;
use glam::{Quat, Vec2, Vec3};
use std::f32::consts::PI;

/// Which solid of revolution a shell sweeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ShellKind {
	/// Full ellipsoid, phi over [0, pi].
	Sphere,
	/// Open-bottom half, phi over [0, pi/2].
	Dome,
}

/// Shape and surface parameters for one shell pass.
#[derive(Debug, Clone)]
pub(crate) struct ShellParams {
	pub kind: ShellKind,
	/// Per-axis stretch applied to the unit surface.
	pub shape: Vec3,
	pub noise_scale: f32,
	pub noise_strength: f32,
	pub segments: u32,
	pub texture_tiling: f32,
}

/// Appends one noise-displaced ellipsoid (or hemisphere) shell to `buffers`.
///
/// Vertices are laid out as a ring/segment grid over the unit surface, each
/// displaced along its own radius by two decorrelated noise lookups; using a
/// single lookup leaves axis-aligned banding on the surface. The `seed` is
/// folded into the noise coordinates so every shell reads a different slice.
pub(crate) fn add_shell(
	buffers: &mut MeshBuffers,
	variation: &TextureVariation,
	params: &ShellParams,
	center: Vec3,
	radius: f32,
	rotation: Quat,
	alpha: f32,
	seed: u64,
) {
	let segments = params.segments.max(4) as usize;
	let rings = segments / 2;
	let base_index = buffers.vertex_count();
	let color = leaf_color(alpha);

	let field = NoiseField::new(params.noise_scale, params.noise_strength);
	let phi_span = match params.kind {
		ShellKind::Sphere => PI,
		ShellKind::Dome => PI * 0.5,
	};

	for ring in 0..=rings {
		let phi = phi_span * ring as f32 / rings as f32;
		let y = phi.cos();
		let ring_radius = phi.sin();

		for seg in 0..=segments {
			let theta = 2.0 * PI * seg as f32 / segments as f32;
			let x = ring_radius * theta.cos();
			let z = ring_radius * theta.sin();

			let mut surface = Vec3::new(x, y, z) * params.shape;
			if params.noise_strength > 0.0 {
				let noise_pos = surface * params.noise_scale;
				let s = seed as f32;
				let noise = field.pair(noise_pos.x + s, noise_pos.y + s)
					+ field.pair(noise_pos.z + s * 0.5, noise_pos.x + s * 0.5);
				surface *= 1.0 + noise * params.noise_strength;
			}

			let position = center + rotation * (surface * radius);
			let u = seg as f32 / segments as f32 * params.texture_tiling;
			let v = ring as f32 / rings as f32 * params.texture_tiling;
			let uv = variation.apply(Vec2::new(u, v), position, seed);
			buffers.push_colored_vertex(position, uv, color);
		}
	}

	let stride = (segments + 1) as u32;
	for ring in 0..rings as u32 {
		for seg in 0..segments as u32 {
			let current = base_index + ring * stride + seg;
			let next = current + stride;

			buffers.push_triangle(current, current + 1, next);
			buffers.push_triangle(current + 1, next + 1, next);
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn params(kind: ShellKind) -> ShellParams {
		ShellParams {
			kind,
			shape: Vec3::ONE,
			noise_scale: 2.0,
			noise_strength: 0.0,
			segments: 8,
			texture_tiling: 1.0,
		}
	}

	#[test]
	fn test_sphere_shell_vertex_and_triangle_counts() {
		let mut buffers = MeshBuffers::with_colors();
		let variation = TextureVariation::new(0.0, 1.0, 0.0);
		add_shell(&mut buffers, &variation, &params(ShellKind::Sphere), Vec3::ZERO, 1.0, Quat::IDENTITY, 1.0, 0);

		let segments = 8usize;
		let rings = segments / 2;
		assert_eq!(buffers.vertices.len(), (rings + 1) * (segments + 1));
		assert_eq!(buffers.triangle_count(), rings * segments * 2);
	}

	#[test]
	fn test_dome_stays_above_equator() {
		let mut buffers = MeshBuffers::with_colors();
		let variation = TextureVariation::new(0.0, 1.0, 0.0);
		add_shell(&mut buffers, &variation, &params(ShellKind::Dome), Vec3::ZERO, 1.0, Quat::IDENTITY, 1.0, 0);

		for vertex in &buffers.vertices {
			assert!(vertex.y >= -1e-5);
		}
	}

	#[test]
	fn test_undisplaced_sphere_sits_on_unit_radius() {
		let mut buffers = MeshBuffers::with_colors();
		let variation = TextureVariation::new(0.0, 1.0, 0.0);
		add_shell(&mut buffers, &variation, &params(ShellKind::Sphere), Vec3::ZERO, 2.0, Quat::IDENTITY, 1.0, 0);

		for vertex in &buffers.vertices {
			assert!((vertex.length() - 2.0).abs() < 1e-4);
		}
	}

	#[test]
	fn test_alpha_lands_in_vertex_colors() {
		let mut buffers = MeshBuffers::with_colors();
		let variation = TextureVariation::new(0.0, 1.0, 0.0);
		add_shell(&mut buffers, &variation, &params(ShellKind::Sphere), Vec3::ZERO, 1.0, Quat::IDENTITY, 0.3, 0);

		let colors = buffers.colors.as_ref().unwrap();
		assert_eq!(colors.len(), buffers.vertices.len());
		for color in colors {
			assert!((color.w - 0.3).abs() < 1e-6);
		}
	}
}
