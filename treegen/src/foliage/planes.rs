use super::FoliageStrategy;
use crate::config::{GrowthConfig, PlaneLeafParams};
use crate::foliage::leaf_color;
use crate::forest::Forest;
use crate::math::{clamp01, lerp, look_rotation, perpendicular, uniform};
use crate::mesh::MeshBuffers;
use crate::texture::TextureVariation;
use glam::{Quat, Vec2, Vec3};
use rand::{rngs::StdRng, Rng};

/// How many clump anchors each segment draws when clumping is active.
const CLUMP_ANCHORS_PER_SEGMENT: usize = 2;

/// Billboard-quad foliage scattered along branch segments.
///
/// Unlike the cluster and dome modes this operates per-segment, not
/// per-endpoint: the density parameter is the expected leaf count per
/// qualifying segment, realised with floor plus probabilistic rounding of the
/// remainder.
pub struct PlaneLeaves;

impl FoliageStrategy for PlaneLeaves {
	fn place(
		&self,
		config: &GrowthConfig,
		forest: &Forest,
		rng: &mut StdRng,
		buffers: &mut MeshBuffers,
	) {
		let leaves = &config.leaves;
		let planes = &leaves.planes;
		if forest.is_empty() || leaves.density <= 0.0 {
			return;
		}

		let (min_y, _, height_range) = forest.height_range();
		let variation = TextureVariation::new(
			leaves.uv_randomness,
			leaves.uv_noise_scale,
			leaves.uv_noise_strength,
		);

		let mut total_generated = 0u32;
		let mut reached_cap = false;
		let mut leaf_seed = 0u64;

		for branch in forest {
			if branch.is_degenerate() {
				continue;
			}
			if reached_cap {
				break;
			}

			let points = branch.points();
			for i in 0..points.len() - 1 {
				if reached_cap {
					break;
				}

				let segment_height = (points[i].position.y - min_y) / height_range;
				if segment_height < leaves.start_height {
					continue;
				}

				let radius = points[i].radius;
				if radius < leaves.min_branch_radius {
					continue;
				}

				// Thinner branches carry fewer leaves when distribution
				// optimization is on.
				let density_multiplier = if leaves.optimize_distribution {
					clamp01(radius / config.thickness.base_thickness)
				} else {
					1.0
				};

				let leaves_for_segment = leaves.density * density_multiplier;
				let mut leaf_count = leaves_for_segment.floor() as u32;
				if rng.gen::<f32>() < leaves_for_segment - leaf_count as f32 {
					leaf_count += 1;
				}

				if leaves.max_leaf_count > 0
					&& total_generated + leaf_count > leaves.max_leaf_count
				{
					leaf_count = leaves.max_leaf_count - total_generated;
					reached_cap = true;
				}

				let start = points[i].position;
				let end = points[i + 1].position;
				let direction = (end - start).normalize_or_zero();
				if direction == Vec3::ZERO {
					continue;
				}

				// Tip-biased anchors gather leaves into clumps instead of an
				// even sprinkle along the segment.
				let anchors: Option<Vec<f32>> = (planes.clumpiness > 0.0).then(|| {
					let power = 1.0 + planes.tip_bias * 4.0;
					(0..CLUMP_ANCHORS_PER_SEGMENT)
						.map(|_| 1.0 - rng.gen::<f32>().powf(power))
						.collect()
				});

				for _ in 0..leaf_count {
					let along = match &anchors {
						Some(anchors) if rng.gen::<f32>() < planes.clumpiness => {
							let anchor = anchors[rng.gen_range(0..anchors.len())];
							clamp01(
								anchor
									+ uniform(rng, -planes.clump_spread, planes.clump_spread),
							)
						}
						_ => rng.gen::<f32>(),
					};
					let mut position = start.lerp(end, along);

					let perp = perpendicular(direction);
					let binormal = direction.cross(perp).normalize();
					let spin = uniform(rng, 0.0, 360.0).to_radians();
					let radial = (spin.cos() * perp + spin.sin() * binormal).normalize();
					let radial_offset = (radius
						+ planes.distance_from_branch
						+ uniform(rng, -planes.radial_jitter, planes.radial_jitter))
					.max(radius);
					position += radial * radial_offset;

					// Leaf length points outward from the branch, twisted
					// randomly around its own radial.
					let rotation = Quat::from_axis_angle(
						radial,
						uniform(rng, 0.0, 360.0).to_radians(),
					) * look_rotation(direction, radial);

					let size_variation =
						1.0 + uniform(rng, -leaves.size_variation, leaves.size_variation);
					let height_size = if planes.size_by_height {
						lerp(planes.size_bottom, planes.size_top, clamp01(segment_height))
					} else {
						1.0
					};
					let width = planes.width * size_variation * height_size;
					let length = planes.length * size_variation * height_size;

					add_leaf_quad(
						buffers,
						&variation,
						planes,
						leaves.transparency,
						position,
						rotation,
						width,
						length,
						leaf_seed,
					);
					leaf_seed += 1;
					total_generated += 1;
				}
			}
		}

		log::debug!("placed {} plane leaves", total_generated);
	}
}

#[allow(clippy::too_many_arguments)]
fn add_leaf_quad(
	buffers: &mut MeshBuffers,
	variation: &TextureVariation,
	planes: &PlaneLeafParams,
	transparency: f32,
	center: Vec3,
	rotation: Quat,
	width: f32,
	length: f32,
	leaf_seed: u64,
) {
	let base_index = buffers.vertex_count();
	let right = rotation * Vec3::X * (width * 0.5);
	let up = rotation * Vec3::Y * (length * 0.5);
	let color = leaf_color(transparency);

	let corners = [
		center - right - up,
		center + right - up,
		center + right + up,
		center - right + up,
	];
	let tiling = planes.texture_tiling.max(0.01);
	let base_uvs = [
		Vec2::new(0.0, 0.0) * tiling,
		Vec2::new(1.0, 0.0) * tiling,
		Vec2::new(1.0, 1.0) * tiling,
		Vec2::new(0.0, 1.0) * tiling,
	];

	for (corner, base_uv) in corners.iter().zip(base_uvs.iter()) {
		let uv = variation.apply(*base_uv, *corner, leaf_seed);
		buffers.push_colored_vertex(*corner, uv, color);
	}

	buffers.push_triangle(base_index, base_index + 1, base_index + 2);
	buffers.push_triangle(base_index, base_index + 2, base_index + 3);

	if planes.double_sided {
		buffers.push_triangle(base_index + 2, base_index + 1, base_index);
		buffers.push_triangle(base_index + 3, base_index + 2, base_index);
	}
}
