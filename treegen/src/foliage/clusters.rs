use super::shell::{add_shell, ShellKind, ShellParams};
use super::{
	build_leaf_targets, collect_endpoints, element_size_multiplier, max_distance_from_center,
	tree_center, FoliageStrategy, PROXIMITY_RADIUS_MULTIPLIER, SHELL_SEED_MULTIPLIER,
};
use crate::config::GrowthConfig;
use crate::forest::Forest;
use crate::math::uniform;
use crate::mesh::MeshBuffers;
use crate::texture::TextureVariation;
use glam::{EulerRot, Quat};
use rand::rngs::StdRng;

/// Noise offset decorrelating the outer shell from the inner surface.
const OUTER_SHELL_SEED_OFFSET: u64 = 1000;
/// Outer shells wear their noise louder and coarser for a wispy silhouette.
const OUTER_SHELL_NOISE_MULTIPLIER: f32 = 1.5;
const OUTER_SHELL_NOISE_SCALE: f32 = 0.8;

/// Ellipsoidal leaf shells around branch-tip groups.
///
/// The density parameter is the target cluster count: candidate endpoints are
/// ranked by local density and the least crowded are kept, so isolated tips
/// are covered before the packed canopy interior gets extras.
pub struct ClusterLeaves;

impl FoliageStrategy for ClusterLeaves {
	fn place(
		&self,
		config: &GrowthConfig,
		forest: &Forest,
		rng: &mut StdRng,
		buffers: &mut MeshBuffers,
	) {
		let leaves = &config.leaves;
		let clusters = &leaves.clusters;
		if forest.is_empty() || leaves.density <= 0.0 {
			return;
		}

		let (min_y, _, height_range) = forest.height_range();
		let tip_inset = clusters.radius * 0.2;
		let endpoints = collect_endpoints(
			forest,
			leaves,
			min_y,
			height_range,
			tip_inset,
			clusters.offset,
		);
		if endpoints.is_empty() {
			return;
		}

		let center = tree_center(&endpoints);
		let proximity_radius = clusters.radius * PROXIMITY_RADIUS_MULTIPLIER;
		let target_count = leaves.density.round() as usize;
		let targets = build_leaf_targets(&endpoints, proximity_radius, target_count);

		let max_elements = if leaves.max_leaf_count > 0 {
			targets.len().min(leaves.max_leaf_count as usize)
		} else {
			targets.len()
		};
		let max_distance = max_distance_from_center(&targets, center);

		let variation = TextureVariation::new(
			leaves.uv_randomness,
			leaves.uv_noise_scale,
			leaves.uv_noise_strength,
		);
		let inner = ShellParams {
			kind: ShellKind::Sphere,
			shape: clusters.shape,
			noise_scale: clusters.noise_scale,
			noise_strength: clusters.noise_strength,
			segments: clusters.segments,
			texture_tiling: clusters.texture_tiling,
		};
		let outer = ShellParams {
			noise_scale: clusters.noise_scale * OUTER_SHELL_NOISE_SCALE,
			noise_strength: clusters.noise_strength * OUTER_SHELL_NOISE_MULTIPLIER,
			..inner.clone()
		};

		for (index, &(position, nearby_count)) in targets.iter().take(max_elements).enumerate() {
			let size = element_size_multiplier(
				rng,
				leaves,
				clusters.size_min,
				clusters.size_max,
				position,
				nearby_count,
				center,
				max_distance,
			);
			let radius = clusters.radius * size;

			let rotation = if clusters.randomize_rotation {
				Quat::from_euler(
					EulerRot::YXZ,
					uniform(rng, 0.0, 360.0).to_radians(),
					uniform(rng, 0.0, 360.0).to_radians(),
					uniform(rng, 0.0, 360.0).to_radians(),
				)
			} else {
				Quat::IDENTITY
			};

			let seed = index as u64 * SHELL_SEED_MULTIPLIER;
			add_shell(
				buffers,
				&variation,
				&inner,
				position,
				radius,
				rotation,
				leaves.transparency,
				seed,
			);

			if clusters.outer_shell && clusters.outer_shell_thickness > 1.0 {
				add_shell(
					buffers,
					&variation,
					&outer,
					position,
					radius * clusters.outer_shell_thickness,
					rotation,
					clusters.outer_shell_transparency,
					seed + OUTER_SHELL_SEED_OFFSET,
				);
			}
		}

		log::debug!("placed {} leaf clusters", max_elements);
	}
}
