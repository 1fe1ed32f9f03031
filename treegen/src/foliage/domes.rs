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

/// Open-bottom hemispherical shells for soft canopy silhouettes.
///
/// Same selection flow as clusters — rank candidate endpoints by local
/// density, service the least crowded first — with a half-dome solid of
/// revolution and no outer shell pass. Element sizing reuses the cluster
/// size range.
pub struct DomeLeaves;

impl FoliageStrategy for DomeLeaves {
	fn place(
		&self,
		config: &GrowthConfig,
		forest: &Forest,
		rng: &mut StdRng,
		buffers: &mut MeshBuffers,
	) {
		let leaves = &config.leaves;
		let domes = &leaves.domes;
		if forest.is_empty() || leaves.density <= 0.0 {
			return;
		}

		let (min_y, _, height_range) = forest.height_range();
		let tip_inset = domes.radius * 0.15;
		let endpoints =
			collect_endpoints(forest, leaves, min_y, height_range, tip_inset, domes.offset);
		if endpoints.is_empty() {
			return;
		}

		let center = tree_center(&endpoints);
		let proximity_radius = domes.radius * PROXIMITY_RADIUS_MULTIPLIER;
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
		let shell = ShellParams {
			kind: ShellKind::Dome,
			shape: domes.shape,
			noise_scale: domes.noise_scale,
			noise_strength: domes.noise_strength,
			segments: domes.segments,
			texture_tiling: domes.texture_tiling,
		};

		for (index, &(position, nearby_count)) in targets.iter().take(max_elements).enumerate() {
			let size = element_size_multiplier(
				rng,
				leaves,
				leaves.clusters.size_min,
				leaves.clusters.size_max,
				position,
				nearby_count,
				center,
				max_distance,
			);
			let radius = domes.radius * size;

			let rotation = if domes.randomize_rotation {
				Quat::from_euler(
					EulerRot::YXZ,
					uniform(rng, 0.0, 360.0).to_radians(),
					uniform(rng, 0.0, 360.0).to_radians(),
					uniform(rng, 0.0, 360.0).to_radians(),
				)
			} else {
				Quat::IDENTITY
			};

			add_shell(
				buffers,
				&variation,
				&shell,
				position,
				radius,
				rotation,
				leaves.transparency,
				index as u64 * SHELL_SEED_MULTIPLIER,
			);
		}

		log::debug!("placed {} leaf domes", max_elements);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::LeafMode;
	use crate::forest::{Branch, BranchPoint};
	use glam::Vec3;
	use rand::SeedableRng;

	fn forest() -> Forest {
		let mut forest = Forest::new();
		forest.push(Branch::new(vec![
			BranchPoint::new(Vec3::ZERO, 0.5),
			BranchPoint::new(Vec3::new(0.0, 6.0, 0.0), 0.3),
		]));
		for i in 0..5 {
			let tip = Vec3::new(i as f32 * 2.0, 6.0, 1.0);
			forest.push(Branch::new(vec![
				BranchPoint::new(tip - Vec3::Y, 0.3),
				BranchPoint::new(tip, 0.2),
			]));
		}
		forest
	}

	fn config() -> GrowthConfig {
		let mut config = GrowthConfig::default().with_leaf_mode(LeafMode::Domes);
		config.leaves.start_height = 0.5;
		config.leaves.min_branch_radius = 0.0;
		config
	}

	#[test]
	fn test_density_controls_dome_count() {
		let mut cfg = config();
		cfg.leaves.density = 2.0;
		let mut rng = StdRng::seed_from_u64(1);
		let mut buffers = MeshBuffers::with_colors();
		DomeLeaves.place(&cfg, &forest(), &mut rng, &mut buffers);

		let segments = cfg.leaves.domes.segments as usize;
		let per_dome = (segments / 2) * segments * 2;
		assert_eq!(buffers.triangle_count(), 2 * per_dome);
	}

	#[test]
	fn test_unrotated_domes_open_downward() {
		let mut cfg = config();
		cfg.leaves.density = 3.0;
		cfg.leaves.domes.randomize_rotation = false;
		cfg.leaves.domes.noise_strength = 0.0;
		cfg.leaves.domes.offset = 0.0;
		let mut rng = StdRng::seed_from_u64(1);
		let mut buffers = MeshBuffers::with_colors();
		DomeLeaves.place(&cfg, &forest(), &mut rng, &mut buffers);

		// Hemisphere vertices never dip below their dome center height; the
		// centers all sit near the 6-unit tip line.
		assert!(!buffers.is_empty());
		for vertex in &buffers.vertices {
			assert!(vertex.y >= 6.0 - cfg.leaves.domes.radius);
		}
	}

	#[test]
	fn test_zero_density_produces_no_domes() {
		let mut cfg = config();
		cfg.leaves.density = 0.0;
		let mut rng = StdRng::seed_from_u64(1);
		let mut buffers = MeshBuffers::with_colors();
		DomeLeaves.place(&cfg, &forest(), &mut rng, &mut buffers);
		assert!(buffers.is_empty());
	}
}
