use crate::config::GrowthConfig;
use crate::forest::Branch;
use crate::math::perpendicular;
use crate::mesh::MeshBuffers;
use crate::texture::TextureVariation;
use glam::{Vec2, Vec3};
use std::f32::consts::PI;

/// Extrudes tapering branch polylines into capped cylindrical mesh strips.
///
/// Each branch point becomes a ring of `radial_segments` vertices; consecutive
/// rings are stitched with two triangles per quad and the tip is closed by a
/// fan around a center vertex. When a parent connection direction is given and
/// the blend distance is positive, one extra ring is extruded backward along
/// the parent direction so the child tube starts inside the parent's surface
/// instead of floating next to it.
#[derive(Debug, Clone)]
pub struct TubeBuilder {
	pub radial_segments: u32,
	pub tiling_horizontal: f32,
	pub tiling_vertical: f32,
	pub blend_distance: f32,
	variation: TextureVariation,
}

impl TubeBuilder {
	pub fn new(
		radial_segments: u32,
		tiling_horizontal: f32,
		tiling_vertical: f32,
		blend_distance: f32,
		variation: TextureVariation,
	) -> Self {
		Self { radial_segments, tiling_horizontal, tiling_vertical, blend_distance, variation }
	}

	pub fn from_config(config: &GrowthConfig) -> Self {
		Self::new(
			config.bark.radial_segments,
			config.bark.tiling_horizontal,
			config.bark.tiling_vertical,
			config.bark.blend_distance,
			TextureVariation::new(
				config.bark.uv_randomness,
				config.bark.uv_noise_scale,
				config.bark.uv_noise_strength,
			),
		)
	}

	/// Appends one tube to `buffers`. Branches with fewer than two points
	/// produce nothing.
	pub fn extrude(
		&self,
		buffers: &mut MeshBuffers,
		branch: &Branch,
		parent_direction: Option<Vec3>,
		branch_seed: u64,
	) {
		let points = branch.points();
		if points.len() < 2 {
			return;
		}

		let segments = self.radial_segments as usize;
		let base_index = buffers.vertex_count();
		let point_count = points.len();

		// Cumulative arc length drives the v coordinate so UV density stays
		// independent of segment spacing.
		let mut cumulative = vec![0.0f32; point_count];
		for i in 1..point_count {
			cumulative[i] =
				cumulative[i - 1] + points[i - 1].position.distance(points[i].position);
		}

		let mut ring_count = point_count;
		if let Some(parent_dir) = parent_direction {
			if self.blend_distance > 0.0 && parent_dir.length_squared() > 1e-8 {
				ring_count += 1;
				self.emit_blend_ring(buffers, branch, parent_dir, branch_seed);
			}
		}

		// The root tube keeps its perpendicular frame coherent from ring to
		// ring to avoid visible twisting; other branches recompute per ring.
		let stabilize_twist = branch_seed == 0;
		let mut previous_perpendicular = Vec3::ZERO;

		for (i, point) in points.iter().enumerate() {
			let direction = if i < point_count - 1 {
				(points[i + 1].position - point.position).normalize_or_zero()
			} else {
				(point.position - points[i - 1].position).normalize_or_zero()
			};

			let perp = if stabilize_twist && previous_perpendicular != Vec3::ZERO {
				let projected = previous_perpendicular
					- direction * previous_perpendicular.dot(direction);
				if projected.length_squared() < 1e-4 {
					perpendicular(direction)
				} else {
					projected.normalize()
				}
			} else {
				perpendicular(direction)
			};
			previous_perpendicular = perp;

			let v = cumulative[i] * self.tiling_vertical;
			self.emit_ring(buffers, point.position, direction, perp, point.radius, v, branch_seed);
		}

		// Stitch consecutive rings, including the blend ring when present.
		for ring in 0..ring_count - 1 {
			let ring_start = base_index + (ring * segments) as u32;
			let next_start = base_index + ((ring + 1) * segments) as u32;
			for j in 0..segments as u32 {
				let next_j = (j + 1) % segments as u32;
				buffers.push_triangle(ring_start + j, next_start + next_j, next_start + j);
				buffers.push_triangle(ring_start + j, ring_start + next_j, next_start + next_j);
			}
		}

		// Close the tip with a fan around a single center vertex.
		let tip = points[point_count - 1];
		let center_index = buffers.vertex_count();
		buffers.push_vertex(tip.position, Vec2::new(0.5, 0.5));

		let last_ring_start = base_index + ((ring_count - 1) * segments) as u32;
		for j in 0..segments as u32 {
			let next_j = (j + 1) % segments as u32;
			buffers.push_triangle(center_index, last_ring_start + j, last_ring_start + next_j);
		}
	}

	fn emit_blend_ring(
		&self,
		buffers: &mut MeshBuffers,
		branch: &Branch,
		parent_direction: Vec3,
		branch_seed: u64,
	) {
		let first = branch.points()[0];
		let connection_pos = first.position - parent_direction * self.blend_distance;
		let perp = perpendicular(parent_direction);
		let v = -self.blend_distance * self.tiling_vertical;
		self.emit_ring(
			buffers,
			connection_pos,
			parent_direction,
			perp,
			first.radius,
			v,
			branch_seed,
		);
	}

	fn emit_ring(
		&self,
		buffers: &mut MeshBuffers,
		center: Vec3,
		direction: Vec3,
		perp: Vec3,
		radius: f32,
		v: f32,
		branch_seed: u64,
	) {
		let segments = self.radial_segments;
		let binormal = direction.cross(perp);
		for j in 0..segments {
			let angle = j as f32 * PI * 2.0 / segments as f32;
			let offset = (angle.cos() * perp + angle.sin() * binormal) * radius;
			let position = center + offset;

			let u = (j as f32 / segments as f32) * self.tiling_horizontal;
			let uv = self.variation.apply(Vec2::new(u, v), position, branch_seed);
			buffers.push_vertex(position, uv);
		}
	}
}
